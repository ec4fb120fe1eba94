use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkytrailError>;

#[derive(Error, Debug)]
pub enum SkytrailError {
    #[error("snapshot source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SkytrailError {
    fn from(err: reqwest::Error) -> Self {
        // a body that arrived but could not be decoded is a shape problem, not a transport one
        if err.is_decode() {
            SkytrailError::MalformedSnapshot(err.to_string())
        } else {
            SkytrailError::SourceUnavailable(err.to_string())
        }
    }
}
