use tracing::info;

use decor_core::{DecorationId, DecorationRecord, LayoutId, LayoutRecord, ViewId};

use crate::error::StorageError;
use crate::host::{HostBackedStorage, HostChannel};
use crate::kv::{KvStorage, KvStore};
use crate::traits::DecorationStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Host,
    KeyValue,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::KeyValue => "key-value",
        }
    }
}

/// The persistence backend chosen once at startup.
pub enum Backend {
    Host(HostBackedStorage<Box<dyn HostChannel>>),
    KeyValue(KvStorage),
}

impl Backend {
    /// Uses the host database when a channel is offered and answers a ping;
    /// otherwise falls back to the key-value store. The fallback is a
    /// supported mode and is only logged.
    pub fn select(host: Option<Box<dyn HostChannel>>, kv: Box<dyn KvStore>) -> Self {
        if let Some(channel) = host {
            let storage = HostBackedStorage::new(channel);
            match storage.ping() {
                Ok(()) => {
                    info!(backend = BackendKind::Host.as_str(), "Persistence backend selected");
                    return Self::Host(storage);
                }
                Err(e) => {
                    info!(error = %e, "Host database unreachable, using key-value store");
                }
            }
        }
        info!(backend = BackendKind::KeyValue.as_str(), "Persistence backend selected");
        Self::KeyValue(KvStorage::new(kv))
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Host(_) => BackendKind::Host,
            Self::KeyValue(_) => BackendKind::KeyValue,
        }
    }

    fn inner(&self) -> &dyn DecorationStorage {
        match self {
            Self::Host(s) => s as &dyn DecorationStorage,
            Self::KeyValue(s) => s as &dyn DecorationStorage,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn DecorationStorage {
        match self {
            Self::Host(s) => s as &mut dyn DecorationStorage,
            Self::KeyValue(s) => s as &mut dyn DecorationStorage,
        }
    }
}

impl DecorationStorage for Backend {
    fn create_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        self.inner_mut().create_decoration(view, record)
    }

    fn update_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        self.inner_mut().update_decoration(view, record)
    }

    fn delete_decoration(&mut self, view: ViewId, id: DecorationId) -> Result<(), StorageError> {
        self.inner_mut().delete_decoration(view, id)
    }

    fn list_decorations(&self, view: ViewId) -> Result<Vec<DecorationRecord>, StorageError> {
        self.inner().list_decorations(view)
    }

    fn create_layout(&mut self, record: &LayoutRecord) -> Result<(), StorageError> {
        self.inner_mut().create_layout(record)
    }

    fn list_layouts(&self) -> Result<Vec<LayoutRecord>, StorageError> {
        self.inner().list_layouts()
    }

    fn get_layout(&self, id: LayoutId) -> Result<Option<LayoutRecord>, StorageError> {
        self.inner().get_layout(id)
    }

    fn delete_layout(&mut self, id: LayoutId) -> Result<(), StorageError> {
        self.inner_mut().delete_layout(id)
    }
}
