use thiserror::Error;

#[derive(Error, Debug)]
pub enum TutorError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TutorError>;
