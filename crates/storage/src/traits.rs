use decor_core::{DecorationId, DecorationRecord, LayoutId, LayoutRecord, ViewId};

use crate::error::StorageError;

/// CRUD over decoration records (partitioned by view) and named layouts.
///
/// Every backend honours the same contract:
/// - `create_decoration` is idempotent by `(view, id)`; a second create for an
///   existing id leaves the stored record untouched.
/// - `update_decoration` and `delete_decoration` on a missing id return
///   [`StorageError::NotFound`].
/// - `list_decorations` returns records in insertion order.
/// - `list_layouts` returns newest `saved_at` first.
pub trait DecorationStorage {
    fn create_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError>;

    fn update_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError>;

    fn delete_decoration(&mut self, view: ViewId, id: DecorationId) -> Result<(), StorageError>;

    fn list_decorations(&self, view: ViewId) -> Result<Vec<DecorationRecord>, StorageError>;

    fn create_layout(&mut self, record: &LayoutRecord) -> Result<(), StorageError>;

    fn list_layouts(&self) -> Result<Vec<LayoutRecord>, StorageError>;

    fn get_layout(&self, id: LayoutId) -> Result<Option<LayoutRecord>, StorageError>;

    fn delete_layout(&mut self, id: LayoutId) -> Result<(), StorageError>;
}

impl<T: DecorationStorage + ?Sized> DecorationStorage for Box<T> {
    fn create_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        (**self).create_decoration(view, record)
    }

    fn update_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        (**self).update_decoration(view, record)
    }

    fn delete_decoration(&mut self, view: ViewId, id: DecorationId) -> Result<(), StorageError> {
        (**self).delete_decoration(view, id)
    }

    fn list_decorations(&self, view: ViewId) -> Result<Vec<DecorationRecord>, StorageError> {
        (**self).list_decorations(view)
    }

    fn create_layout(&mut self, record: &LayoutRecord) -> Result<(), StorageError> {
        (**self).create_layout(record)
    }

    fn list_layouts(&self) -> Result<Vec<LayoutRecord>, StorageError> {
        (**self).list_layouts()
    }

    fn get_layout(&self, id: LayoutId) -> Result<Option<LayoutRecord>, StorageError> {
        (**self).get_layout(id)
    }

    fn delete_layout(&mut self, id: LayoutId) -> Result<(), StorageError> {
        (**self).delete_layout(id)
    }
}
