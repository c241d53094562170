use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::config::{AppConfig, StoreBackend};
use crate::diet::{flow::DietPlanFlow, flow::HttpDietPlanFlow, services::DietPlanner};
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub planner: DietPlanner,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL")?;
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    warn!(error = %e, "migration failed; continuing");
                }
                Arc::new(PgDocumentStore::new(db))
            }
            StoreBackend::Memory => {
                info!("using in-memory document store");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        let flow = Arc::new(HttpDietPlanFlow::from_config(&config.flow)) as Arc<dyn DietPlanFlow>;

        Ok(Self::from_parts(config, store, flow))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn DocumentStore>,
        flow: Arc<dyn DietPlanFlow>,
    ) -> Self {
        Self {
            config,
            store,
            planner: DietPlanner::new(flow),
        }
    }
}
