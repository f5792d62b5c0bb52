use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database handle is not connected")]
    NotConnected,

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        // Unique-index violations are a distinct, caller-recoverable case.
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() {
                return StoreError::Constraint(db_err.message().to_string());
            }
        }
        StoreError::Database(error)
    }
}

impl StoreError {
    pub fn log(&self, ctx: &str) {
        let message = self.to_string();
        match self {
            StoreError::Database(err) => {
                error!(error = %message, context = %ctx, db_error = %err, "Database error");
            }
            StoreError::Constraint(msg) => {
                warn!(message = %msg, context = %ctx, "Constraint violation");
            }
            StoreError::Validation(msg) => {
                warn!(message = %msg, context = %ctx, "Validation error");
            }
            StoreError::NotConnected => {
                warn!(context = %ctx, "Operation attempted on a closed database handle");
            }
            StoreError::Authentication(msg) => {
                warn!(message = %msg, context = %ctx, "Authentication error");
            }
            StoreError::Internal(msg) => {
                error!(message = %msg, context = %ctx, "Internal error");
            }
        }
    }
}
