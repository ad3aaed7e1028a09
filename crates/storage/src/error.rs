use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("host error: {0}")]
    Host(String),

    #[error("host unavailable: {0}")]
    HostUnavailable(String),

    #[error("core error: {0}")]
    Core(#[from] decor_core::CoreError),
}
