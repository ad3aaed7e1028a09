use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("malformed layout {layout}: {reason}")]
    MalformedLayout { layout: String, reason: String },
}
