use thiserror::Error;

/// Error taxonomy crossing the boundary between the core and its callers.
///
/// Every gate stage and every paginator branch produces one of these kinds
/// explicitly; raw sqlx/reqwest errors never leave the adapters untyped —
/// they arrive here as `Internal` and are logged, not shown.
#[derive(Debug, Error)]
pub enum TaskhubError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("forbidden: {0}")]
    Authorization(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl TaskhubError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Authentication(_) => 401,
            Self::Authorization(_) => 403,
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::OutOfRange(_) => 416,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Short kind tag used in audit log entries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication",
            Self::Authorization(_) => "authorization",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not-found",
            Self::OutOfRange(_) => "out-of-range",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskhubError>;
