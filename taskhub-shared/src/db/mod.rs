/// Database access utilities
///
/// - `pool`: PostgreSQL connection pool creation
/// - `migrations`: Migration runner backed by sqlx's migration system

pub mod migrations;
pub mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, DatabaseConfig};
