use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("not signed in; run `helpdesk login` first")]
    NotAuthenticated,
    /// The backend rejected the session or the credentials.
    #[error("{0}")]
    Unauthorized(String),
    #[error("permission denied: {0}")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Non-success status carrying the server's own message, shown verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("connection error: {0}")]
    Network(String),
    #[error("unexpected response from helpdesk API: {0}")]
    UnexpectedResponse(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
