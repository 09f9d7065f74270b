//! # Schoolbook Config
//!
//! Configuration types for the Schoolbook API, loaded from environment variables.
//!
//! - [`server`]: Bind address
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL connection settings
//! - [`finance`]: Invoice numbering and due dates
//!
//! # Example
//!
//! ```no_run
//! use schoolbook_config::{CorsConfig, DatabaseConfig, FinanceConfig, ServerConfig};
//!
//! dotenvy::dotenv().ok();
//! let server = ServerConfig::from_env();
//! let cors = CorsConfig::from_env();
//! let finance = FinanceConfig::from_env();
//! let database = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
//! println!("listening on {}", server.address());
//! ```

pub mod cors;
pub mod database;
pub mod finance;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::{ConfigError, DatabaseConfig};
pub use finance::FinanceConfig;
pub use server::ServerConfig;

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring malformed environment value");
                default
            }
        },
        Err(_) => default,
    }
}
