use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

/// Upper bound for creating the pool at startup.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Upper bound for the informational ping right after startup.
pub const STARTUP_PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Create the database pool. Never fatal.
///
/// The pool connects lazily, so an unreachable database still yields a
/// handle and readiness recovers once the database comes up. `None` means
/// the pool itself could not be built (bad URL, init timeout).
pub async fn connect(database_url: &str, acquire_timeout: Duration) -> Option<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(CONNECT_TIMEOUT)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(true)
        .sqlx_logging(false);

    let db = match tokio::time::timeout(CONNECT_TIMEOUT, Database::connect(options)).await {
        Ok(Ok(db)) => db,
        Ok(Err(e)) => {
            warn!(error = %e, "database pool init failed");
            return None;
        }
        Err(_) => {
            warn!("database pool init timed out");
            return None;
        }
    };

    match tokio::time::timeout(STARTUP_PING_TIMEOUT, db.ping()).await {
        Ok(Ok(())) => info!("database connected"),
        Ok(Err(e)) => warn!(error = %e, "database ping failed at startup"),
        Err(_) => warn!("database ping timed out at startup"),
    }
    Some(db)
}
