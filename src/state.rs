use schoolbook_config::{CorsConfig, FinanceConfig};
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub cors_config: CorsConfig,
    pub finance_config: FinanceConfig,
}

impl AppState {
    /// State with configuration read from the environment.
    pub fn from_env(db: PgPool) -> Self {
        Self {
            db,
            cors_config: CorsConfig::from_env(),
            finance_config: FinanceConfig::from_env(),
        }
    }
}
