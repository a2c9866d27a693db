use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Failure of a single call against the retailer API.
///
/// The set is closed so callers can branch on the variant instead of
/// inspecting messages. The upstream HTTP status survives in `Status` even
/// though the public surface currently folds every upstream failure into one
/// category.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{status} error from {operation}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("{operation} request failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
        timed_out: bool,
    },
    #[error("{operation} returned an unreadable body: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },
    #[error("Upstream client misconfigured: {0}")]
    Configuration(String),
}

impl UpstreamError {
    /// HTTP status returned by the retailer, when the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Transport { timed_out: true, .. })
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;
