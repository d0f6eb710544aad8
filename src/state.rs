use std::sync::Arc;

use sqlx::SqlitePool;

use crate::clock::LocalClock;
use crate::config::AppConfig;
use crate::db;
use crate::estimation::{EstimationGateway, OpenAiGateway};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn EstimationGateway>,
    pub clock: LocalClock,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;
        let gateway = Arc::new(OpenAiGateway::new(&config.inference)?) as Arc<dyn EstimationGateway>;
        Ok(Self::from_parts(db, config, gateway))
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        gateway: Arc<dyn EstimationGateway>,
    ) -> Self {
        let clock = LocalClock::new(config.local_offset);
        Self {
            db,
            config,
            gateway,
            clock,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory database and a gateway that estimates every meal at zero.
    pub async fn fake() -> Self {
        use crate::estimation::fake::{result_with_total, FakeGateway};
        Self::fake_with(Arc::new(FakeGateway::returning(result_with_total(0.0, 0.0, 0.0, 0.0)))).await
    }

    pub async fn fake_with(gateway: Arc<dyn EstimationGateway>) -> Self {
        Self::fake_with_config(gateway, |_| {}).await
    }

    pub async fn fake_with_config(
        gateway: Arc<dyn EstimationGateway>,
        tweak: impl FnOnce(&mut AppConfig),
    ) -> Self {
        use crate::config::InferenceConfig;
        use std::time::Duration;

        let mut config = AppConfig {
            database_url: "sqlite::memory:".into(),
            inference: InferenceConfig {
                api_key: "test".into(),
                model: "test-model".into(),
                base_url: "http://localhost".into(),
                timeout_secs: 5,
                max_retries: 0,
            },
            estimation_deadline: Duration::from_secs(5),
            transport_token: None,
            local_offset: time::UtcOffset::UTC,
        };
        tweak(&mut config);
        Self::from_parts(db::in_memory().await, Arc::new(config), gateway)
    }
}
