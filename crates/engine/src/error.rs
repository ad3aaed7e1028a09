use decor_core::{CoreError, ViewId};
use decor_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("decoration not found: {0}")]
    DecorationNotFound(String),

    #[error("layout not found: {0}")]
    LayoutNotFound(String),

    #[error("editing disabled while {0} reloads")]
    EditingDisabled(ViewId),

    #[error("interaction refused: {0}")]
    InteractionRefused(String),

    #[error("no deletion awaiting confirmation")]
    NoPendingDelete,

    #[error("invalid config: {0}")]
    Config(String),
}
