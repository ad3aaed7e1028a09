pub mod backend;
pub mod error;
pub mod files;
pub mod host;
pub mod kv;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use backend::{Backend, BackendKind};
pub use error::StorageError;
pub use host::{
    HostBackedStorage, HostChannel, HostRequest, HostResponse, HostService, InProcessChannel,
};
pub use kv::{FileKv, KvStorage, KvStore, MemoryKv};
pub use sqlite::SqliteStorage;
pub use traits::*;
