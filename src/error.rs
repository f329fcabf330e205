#[derive(Debug, thiserror::Error)]
pub enum SanError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Code: {status}, Message: {message}")]
    RemoteApi { status: u16, message: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SanError {
    /// HTTP status carried by a [`SanError::RemoteApi`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SanError::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SanError>;
