//! Service construction and environment configuration.

use std::sync::Arc;

use pts_auth::Hs256TokenCodec;
use pts_auth::token::DEFAULT_TOKEN_TTL_SECONDS;
use pts_core::EmployeeId;
use pts_directory::{EmployeeDirectory, PrincipalDirectory};
use pts_equipment::{DcsGateway, EquipmentRegistry, InMemoryEquipmentRegistry, LoggingDcsGateway};
use pts_permits::{InMemoryPermitStore, PermitLifecycle, PermitStore};

/// Everything the handlers need, wired once at startup.
pub struct AppServices {
    pub lifecycle: PermitLifecycle,
    pub equipment: Arc<dyn EquipmentRegistry>,
    pub employees: EmployeeDirectory,
    pub principals: PrincipalDirectory,
    pub token_codec: Arc<Hs256TokenCodec>,
}

/// Build the service graph from the environment.
///
/// `PTS_STORE=postgres` selects the sqlx store (behind the `postgres`
/// feature); anything else runs in memory. `PTS_OVERRIDE_SUPERVISOR` names
/// the identity allowed to sign any permit (default `SUP222`).
pub async fn build_services(jwt_secret: &str) -> AppServices {
    let gateway: Arc<dyn DcsGateway> = Arc::new(LoggingDcsGateway::new());
    let equipment: Arc<dyn EquipmentRegistry> =
        Arc::new(InMemoryEquipmentRegistry::with_plant_seed(gateway));

    let override_supervisor =
        std::env::var("PTS_OVERRIDE_SUPERVISOR").unwrap_or_else(|_| "SUP222".to_string());
    let store = build_store().await;
    let lifecycle = PermitLifecycle::new(
        store,
        equipment.clone(),
        EmployeeId::new(override_supervisor),
    );

    AppServices {
        lifecycle,
        equipment,
        employees: EmployeeDirectory::with_plant_seed(),
        principals: PrincipalDirectory::with_plant_seed(),
        token_codec: Arc::new(Hs256TokenCodec::new(jwt_secret, DEFAULT_TOKEN_TTL_SECONDS)),
    }
}

async fn build_store() -> Arc<dyn PermitStore> {
    let backend = std::env::var("PTS_STORE").unwrap_or_else(|_| "memory".to_string());
    if backend == "postgres" {
        #[cfg(feature = "postgres")]
        {
            let database_url = std::env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set when PTS_STORE=postgres");
            let store = pts_postgres::PostgresPermitStore::connect(&database_url)
                .await
                .expect("failed to connect to Postgres");
            return Arc::new(store);
        }
        #[cfg(not(feature = "postgres"))]
        tracing::warn!("PTS_STORE=postgres but postgres feature not enabled, falling back to in-memory");
    }
    in_memory_store()
}

/// `PTS_SEED_DEMO_DATA=true` pre-loads the demo permits for manual
/// exploration; tests and production start empty.
fn in_memory_store() -> Arc<dyn PermitStore> {
    let seed = std::env::var("PTS_SEED_DEMO_DATA")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if seed {
        tracing::info!("seeding demo permits into the in-memory store");
        Arc::new(InMemoryPermitStore::with_demo_seed())
    } else {
        Arc::new(InMemoryPermitStore::new())
    }
}
