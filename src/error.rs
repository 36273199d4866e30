use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("YouTube API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("gave up after {0} pages, the continuation token never ran out")]
    PaginationLimit(usize),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error(transparent)]
    OAuth(#[from] yup_oauth2::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
