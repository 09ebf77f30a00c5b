//! Service error vocabulary
//!
//! Every service returns [`ServiceError`]. Storage failures arrive from the
//! repositories as `anyhow::Error` and are translated here; the nested cause
//! is kept verbatim in the message so callers can see what the store said.

use std::fmt;

/// The record kinds managed by the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Article,
    Tag,
    Catalogue,
    Comment,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Article => "article",
            RecordKind::Tag => "tag",
            RecordKind::Catalogue => "catalogue",
            RecordKind::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// Error types for content service operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected before touching the store
    #[error("{0}")]
    InvalidParameter(String),

    /// The store, or a service the operation depends on, failed
    #[error("Error from {origin} repository. Nested exception is {{ {message} }}")]
    RepositoryFailure { origin: String, message: String },

    /// The requested record does not exist
    #[error("Can not find this {kind}")]
    NotFound { kind: RecordKind, id: i64 },
}

impl ServiceError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Wrap a repository error, keeping its whole context chain
    pub fn repository(kind: RecordKind, error: anyhow::Error) -> Self {
        Self::RepositoryFailure {
            origin: kind.to_string(),
            message: format!("{:#}", error),
        }
    }

    /// Wrap the failure of a service this operation depends on
    pub fn nested(origin: impl Into<String>, error: ServiceError) -> Self {
        Self::RepositoryFailure {
            origin: origin.into(),
            message: error.to_string(),
        }
    }

    pub fn not_found(kind: RecordKind, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    /// Stable numeric code for transport layers
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidParameter(_) => 1001,
            Self::RepositoryFailure { .. } => 1002,
            Self::NotFound { .. } => 1003,
        }
    }

    /// `NotFound` counts as a repository failure too; callers that need to
    /// tell them apart match on the variant.
    pub fn is_repository_failure(&self) -> bool {
        matches!(self, Self::RepositoryFailure { .. } | Self::NotFound { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
