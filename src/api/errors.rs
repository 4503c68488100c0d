use thiserror::Error;

/// Failure talking to the help-desk backend.
///
/// `Display` is the message shown to the user verbatim: the backend's
/// `message` field when it sent one, the HTTP status text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Could not reach the server: {0}")]
    Network(String),

    #[error("Unexpected response from {path}: {reason}")]
    Decode { path: String, reason: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn decode(path: &str, reason: impl ToString) -> Self {
        ApiError::Decode {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Follow-up suggestions printed under the error by the CLI
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            ApiError::Status { status: 401, .. } => vec![
                "Your session is missing or expired",
                "Log in again: mesa-ayuda login --email <email> --password <password>",
            ],
            ApiError::Status { status: 403, .. } => vec![
                "Your roles do not allow this operation",
                "Check your roles: mesa-ayuda whoami",
            ],
            ApiError::Status { status: 404, .. } => vec![
                "The request does not exist or is not visible to you",
                "List what you can see: mesa-ayuda home",
            ],
            ApiError::Status { .. } => vec!["Nothing was changed; you can retry the action"],
            ApiError::Network(_) => vec![
                "Check that the backend is running",
                "Check the configured base URL: MESA_AYUDA_API__BASE_URL or mesa-ayuda.toml",
            ],
            ApiError::Decode { .. } => vec![
                "The backend answered with an unexpected shape",
                "Check that client and backend versions match",
            ],
        }
    }
}
