use std::cell::RefCell;
use std::collections::BTreeMap;

use decor_core::{DecorationId, DecorationRecord, LayoutId, LayoutRecord, ViewId};
use decor_storage::{DecorationStorage, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CallKind {
    CreateDecoration,
    UpdateDecoration,
    DeleteDecoration,
    ListDecorations,
    CreateLayout,
    ListLayouts,
    GetLayout,
    DeleteLayout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageCall {
    CreateDecoration(ViewId, DecorationId),
    UpdateDecoration(ViewId, DecorationRecord),
    DeleteDecoration(ViewId, DecorationId),
    ListDecorations(ViewId),
    CreateLayout(LayoutId),
    ListLayouts,
    GetLayout(LayoutId),
    DeleteLayout(LayoutId),
}

impl StorageCall {
    pub fn kind(&self) -> CallKind {
        match self {
            Self::CreateDecoration(..) => CallKind::CreateDecoration,
            Self::UpdateDecoration(..) => CallKind::UpdateDecoration,
            Self::DeleteDecoration(..) => CallKind::DeleteDecoration,
            Self::ListDecorations(..) => CallKind::ListDecorations,
            Self::CreateLayout(..) => CallKind::CreateLayout,
            Self::ListLayouts => CallKind::ListLayouts,
            Self::GetLayout(..) => CallKind::GetLayout,
            Self::DeleteLayout(..) => CallKind::DeleteLayout,
        }
    }
}

/// Wraps a backend, recording every call and failing on demand.
pub struct RecordingStorage<S> {
    inner: S,
    calls: RefCell<Vec<StorageCall>>,
    failures: RefCell<BTreeMap<CallKind, usize>>,
}

impl<S: DecorationStorage> RecordingStorage<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
            failures: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.calls.borrow().iter().filter(|c| c.kind() == kind).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Makes the next `times` calls of `kind` fail before reaching the
    /// wrapped backend.
    pub fn fail_next(&self, kind: CallKind, times: usize) {
        self.failures.borrow_mut().insert(kind, times);
    }

    fn record(&self, call: StorageCall) -> Result<(), StorageError> {
        let kind = call.kind();
        self.calls.borrow_mut().push(call);
        let mut failures = self.failures.borrow_mut();
        match failures.get_mut(&kind) {
            Some(left) if *left > 0 => {
                *left -= 1;
                Err(StorageError::Host(format!("injected {kind:?} failure")))
            }
            _ => Ok(()),
        }
    }
}

impl<S: DecorationStorage> DecorationStorage for RecordingStorage<S> {
    fn create_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        self.record(StorageCall::CreateDecoration(view, record.id))?;
        self.inner.create_decoration(view, record)
    }

    fn update_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        self.record(StorageCall::UpdateDecoration(view, record.clone()))?;
        self.inner.update_decoration(view, record)
    }

    fn delete_decoration(&mut self, view: ViewId, id: DecorationId) -> Result<(), StorageError> {
        self.record(StorageCall::DeleteDecoration(view, id))?;
        self.inner.delete_decoration(view, id)
    }

    fn list_decorations(&self, view: ViewId) -> Result<Vec<DecorationRecord>, StorageError> {
        self.record(StorageCall::ListDecorations(view))?;
        self.inner.list_decorations(view)
    }

    fn create_layout(&mut self, record: &LayoutRecord) -> Result<(), StorageError> {
        self.record(StorageCall::CreateLayout(record.id))?;
        self.inner.create_layout(record)
    }

    fn list_layouts(&self) -> Result<Vec<LayoutRecord>, StorageError> {
        self.record(StorageCall::ListLayouts)?;
        self.inner.list_layouts()
    }

    fn get_layout(&self, id: LayoutId) -> Result<Option<LayoutRecord>, StorageError> {
        self.record(StorageCall::GetLayout(id))?;
        self.inner.get_layout(id)
    }

    fn delete_layout(&mut self, id: LayoutId) -> Result<(), StorageError> {
        self.record(StorageCall::DeleteLayout(id))?;
        self.inner.delete_layout(id)
    }
}
