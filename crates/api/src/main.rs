use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pts_observability::init();

    let jwt_secret = std::env::var("PTS_JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("PTS_JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let app = pts_api::app::build_app(jwt_secret).await;

    let bind_addr = std::env::var("PTS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .context("http server terminated")?;
    Ok(())
}
