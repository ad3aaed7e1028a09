use std::collections::VecDeque;

use decor_core::{DecorationId, DecorationRecord, ViewId};

/// A persistence call waiting to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOp {
    Create { view: ViewId, record: DecorationRecord },
    Update { view: ViewId, record: DecorationRecord },
    Delete { view: ViewId, id: DecorationId },
    /// Bulk re-read of a view, replacing the in-memory collection.
    Reload { view: ViewId },
}

impl PersistOp {
    pub fn view(&self) -> ViewId {
        match self {
            Self::Create { view, .. }
            | Self::Update { view, .. }
            | Self::Delete { view, .. }
            | Self::Reload { view } => *view,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Reload { .. } => "reload",
        }
    }
}

/// FIFO of fire-and-forget writes. The store is updated optimistically
/// before an op is queued.
#[derive(Debug, Default)]
pub struct PersistQueue {
    ops: VecDeque<PersistOp>,
}

impl PersistQueue {
    pub fn push(&mut self, op: PersistOp) {
        self.ops.push_back(op);
    }

    pub fn pop(&mut self) -> Option<PersistOp> {
        self.ops.pop_front()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersistOp> {
        self.ops.iter()
    }

    pub fn has_reload(&self, view: ViewId) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, PersistOp::Reload { view: v } if *v == view))
    }
}
