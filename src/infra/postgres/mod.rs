pub mod audit_store;

pub use audit_store::PgAuditStore;

use crate::domain::error::AuditError;

/// Applies the crate's schema migrations. Hosts call this once at startup,
/// before handing the pool to [`PgAuditStore`].
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), AuditError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AuditError::Database(sqlx::Error::from(e)))
}
