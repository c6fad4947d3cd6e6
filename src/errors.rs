use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error body returned by every HTTP endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Bad Request", "Conflict")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// ISO 8601 timestamp when error occurred
    pub timestamp: String,
}

/// Why a supplier group was not turned into a Purchase Order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// A submitted Purchase Order with the identical item set already exists
    Duplicate { existing: String },
    /// Neither the selection nor the company defaults name a currency
    MissingCurrency,
    /// The store rejected a read or write for this supplier
    Persistence { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierFailure {
    pub supplier: String,
    pub reason: FailureReason,
}

impl fmt::Display for SupplierFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FailureReason::Duplicate { existing } => write!(
                f,
                "Purchase Order for supplier {} with these items already exists: {}",
                self.supplier, existing
            ),
            FailureReason::MissingCurrency => write!(
                f,
                "Failed to create PO for {}: no currency on the selection and no default currency configured",
                self.supplier
            ),
            FailureReason::Persistence { reason } => {
                write!(f, "Failed to create PO for {}: {}", self.supplier, reason)
            }
        }
    }
}

/// Outcome of a PO batch in which at least one supplier group was skipped or failed.
///
/// `created` still lists every Purchase Order that was persisted before and after the
/// failures; nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub created: Vec<String>,
    pub failures: Vec<SupplierFailure>,
}

impl BatchFailure {
    pub fn failed_suppliers(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.supplier.as_str())
    }
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Some Purchase Orders could not be created/skipped due to duplicates:"
        )?;
        for failure in &self.failures {
            write!(f, "\n{}", failure)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("{0}")]
    PurchaseOrderBatch(BatchFailure),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::ConfigurationError(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::PurchaseOrderBatch(_) => StatusCode::CONFLICT,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::PurchaseOrderBatch(batch) if !batch.created.is_empty() => {
                Some(format!("Created: {}", batch.created.join(", ")))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            details: self.details(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_message_lists_every_supplier() {
        let err = ServiceError::PurchaseOrderBatch(BatchFailure {
            created: vec!["PO-2".into()],
            failures: vec![
                SupplierFailure {
                    supplier: "S1".into(),
                    reason: FailureReason::Duplicate {
                        existing: "PO-1".into(),
                    },
                },
                SupplierFailure {
                    supplier: "S3".into(),
                    reason: FailureReason::Persistence {
                        reason: "disk full".into(),
                    },
                },
            ],
        });

        let message = err.to_string();
        assert!(message.starts_with("Some Purchase Orders could not be created"));
        assert!(message.contains("supplier S1 with these items already exists: PO-1"));
        assert!(message.contains("Failed to create PO for S3: disk full"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.details().as_deref(), Some("Created: PO-2"));
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let err = ServiceError::DatabaseError(DbErr::Custom("constraint foo".into()));
        assert_eq!(err.response_message(), "Database error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
