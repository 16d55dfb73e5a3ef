use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("entity mismatch: cannot diff snapshot of {left} against snapshot of {right}")]
    EntityMismatch { left: String, right: String },

    #[error("snapshot {snapshot_id} is missing field `{field}`")]
    MissingField { snapshot_id: i64, field: String },

    #[error("validation: {0}")]
    Validation(String),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
