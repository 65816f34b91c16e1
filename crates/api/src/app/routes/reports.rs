use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path, Query},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use pts_core::PermitId;
use pts_permits::PermitFilter;
use pts_reports::{permit_pdf, permits_excel};

use crate::app::errors;
use crate::app::services::AppServices;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn router() -> Router {
    Router::new()
        .route("/permits/excel", get(excel_report))
        .route("/permits/:id/pdf", get(pdf_report))
}

pub async fn pdf_report(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let permit = match services.lifecycle.get(&PermitId::new(id)).await {
        Ok(permit) => permit,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let bytes = permit_pdf(&permit);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.pdf\"", permit.id),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Spreadsheet export of the filtered permit set; the filter semantics
/// match the permit search endpoint.
pub async fn excel_report(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<PermitFilter>,
) -> axum::response::Response {
    let permits = services.lifecycle.search(&filter).await;
    let bytes = permits_excel(&permits);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"Reporte_PTS.xlsx\"".to_string(),
            ),
        ],
        bytes,
    )
        .into_response()
}
