// Error types for the sync layer
//
// Remote failures are classified once, in the API client, so callers can
// match on the kind instead of comparing message strings.

use thiserror::Error;

use crate::device::keys::KeyError;

/// A classified failure from the control-plane API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server no longer accepts our session (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// The server rejected the request (validation, auth, server fault).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),

    /// A success status with a body we could not decode.
    #[error("invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether the same request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Rejected { status, .. } => *status >= 500,
            ApiError::Unauthorized | ApiError::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Error returned by every repository operation.
#[derive(Debug, Error)]
pub enum VpnError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("local store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("device key error: {0}")]
    Key(#[from] KeyError),

    /// Local state contradicts what the previous step guaranteed. This is a
    /// bug, not a transient condition.
    #[error("internal invariant violated: {0}")]
    Invariant(&'static str),
}

impl VpnError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, VpnError::Api(e) if e.is_retryable())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, VpnError::Api(ApiError::Unauthorized))
    }

    /// Short message suitable for showing to a user.
    pub fn user_message(&self) -> String {
        match self {
            VpnError::Api(e) => e.to_string(),
            VpnError::Store(_) | VpnError::Io(_) | VpnError::Key(_) => {
                "Local data could not be read or written".to_string()
            }
            VpnError::Invariant(_) => "Unexpected internal error".to_string(),
        }
    }
}

pub type Result<T, E = VpnError> = std::result::Result<T, E>;
