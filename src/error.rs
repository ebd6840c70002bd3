//! Errors surfaced by [`CatalogService`](crate::CatalogService).
//!
//! Cache failures never appear here; they degrade to a miss or a dropped write.

use thiserror::Error;

use crate::product::ProductError;
use crate::search::FilterError;
use crate::storage::traits::StorageError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Product with id '{id}' not found")]
    NotFound { id: String },
    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] ProductError),
    #[error("Invalid search request: {0}")]
    InvalidFilters(#[from] FilterError),
    #[error("Upstream failure: {0}")]
    Upstream(#[from] StorageError),
    #[error("No product repository configured")]
    RepositoryUnavailable,
}

/// What a caller-facing layer should make of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    BadRequest,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "NotFound"),
            Self::BadRequest => write!(f, "BadRequest"),
            Self::Internal => write!(f, "Internal"),
        }
    }
}

impl CatalogError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidProduct(_) | Self::InvalidFilters(_) => ErrorCategory::BadRequest,
            Self::Upstream(_) | Self::RepositoryUnavailable => ErrorCategory::Internal,
        }
    }

    /// Message safe to show a client. Internal errors never leak their details.
    pub fn public_message(&self) -> String {
        match self.category() {
            ErrorCategory::Internal => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}
