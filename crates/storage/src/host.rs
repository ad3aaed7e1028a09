//! Request/response bridge to the privileged host process.
//!
//! The UI process never opens the structured database itself. It encodes a
//! [`HostRequest`] as MessagePack, hands the bytes to a [`HostChannel`], and
//! decodes the [`HostResponse`]. On the other side a [`HostService`] owns the
//! real storage and answers requests one at a time.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use decor_core::{DecorationId, DecorationRecord, LayoutId, LayoutRecord, ViewId};

use crate::error::StorageError;
use crate::files::load_as_data_url;
use crate::traits::DecorationStorage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostRequest {
    Ping,
    CreateDecoration { view: ViewId, record: DecorationRecord },
    UpdateDecoration { view: ViewId, record: DecorationRecord },
    DeleteDecoration { view: ViewId, id: DecorationId },
    ListDecorations { view: ViewId },
    CreateLayout { record: LayoutRecord },
    ListLayouts,
    GetLayout { id: LayoutId },
    DeleteLayout { id: LayoutId },
    ResolveLocalImage { reference: String },
}

impl HostRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::CreateDecoration { .. } => "create_decoration",
            Self::UpdateDecoration { .. } => "update_decoration",
            Self::DeleteDecoration { .. } => "delete_decoration",
            Self::ListDecorations { .. } => "list_decorations",
            Self::CreateLayout { .. } => "create_layout",
            Self::ListLayouts => "list_layouts",
            Self::GetLayout { .. } => "get_layout",
            Self::DeleteLayout { .. } => "delete_layout",
            Self::ResolveLocalImage { .. } => "resolve_local_image",
        }
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>, StorageError> {
        rmp_serde::to_vec_named(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, StorageError> {
        rmp_serde::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostResponse {
    Pong,
    Done,
    Decorations(Vec<DecorationRecord>),
    Layouts(Vec<LayoutRecord>),
    Layout(Option<LayoutRecord>),
    ImageUrl(String),
    NotFound(String),
    Failed(String),
}

impl HostResponse {
    pub fn to_msgpack(&self) -> Result<Vec<u8>, StorageError> {
        rmp_serde::to_vec_named(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, StorageError> {
        rmp_serde::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Transport to the host process: one encoded request in, one encoded
/// response out.
pub trait HostChannel {
    fn call(&mut self, request: &[u8]) -> Result<Vec<u8>, StorageError>;
}

impl<T: HostChannel + ?Sized> HostChannel for Box<T> {
    fn call(&mut self, request: &[u8]) -> Result<Vec<u8>, StorageError> {
        (**self).call(request)
    }
}

/// Round-trips a typed request over any channel.
pub fn call_host<C: HostChannel + ?Sized>(
    channel: &mut C,
    request: &HostRequest,
) -> Result<HostResponse, StorageError> {
    let bytes = request.to_msgpack()?;
    let reply = channel.call(&bytes)?;
    match HostResponse::from_msgpack(&reply)? {
        HostResponse::NotFound(what) => Err(StorageError::NotFound(what)),
        HostResponse::Failed(reason) => Err(StorageError::Host(reason)),
        other => Ok(other),
    }
}

fn unexpected(request: &str, response: &HostResponse) -> StorageError {
    StorageError::Host(format!("unexpected response to {request}: {response:?}"))
}

/// Privileged side of the bridge.
pub struct HostService<S> {
    storage: S,
}

impl<S: DecorationStorage> HostService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Serves one encoded request. Failures are reported inside the
    /// response; only an undecodable request yields an error reply.
    pub fn handle(&mut self, request: &[u8]) -> Result<Vec<u8>, StorageError> {
        let response = match HostRequest::from_msgpack(request) {
            Ok(request) => {
                debug!(request = request.name(), "Host request");
                self.dispatch(request)
            }
            Err(e) => HostResponse::Failed(e.to_string()),
        };
        response.to_msgpack()
    }

    fn dispatch(&mut self, request: HostRequest) -> HostResponse {
        let name = request.name();
        let result = match request {
            HostRequest::Ping => Ok(HostResponse::Pong),
            HostRequest::CreateDecoration { view, record } => self
                .storage
                .create_decoration(view, &record)
                .map(|_| HostResponse::Done),
            HostRequest::UpdateDecoration { view, record } => self
                .storage
                .update_decoration(view, &record)
                .map(|_| HostResponse::Done),
            HostRequest::DeleteDecoration { view, id } => self
                .storage
                .delete_decoration(view, id)
                .map(|_| HostResponse::Done),
            HostRequest::ListDecorations { view } => self
                .storage
                .list_decorations(view)
                .map(HostResponse::Decorations),
            HostRequest::CreateLayout { record } => self
                .storage
                .create_layout(&record)
                .map(|_| HostResponse::Done),
            HostRequest::ListLayouts => self.storage.list_layouts().map(HostResponse::Layouts),
            HostRequest::GetLayout { id } => self.storage.get_layout(id).map(HostResponse::Layout),
            HostRequest::DeleteLayout { id } => {
                self.storage.delete_layout(id).map(|_| HostResponse::Done)
            }
            HostRequest::ResolveLocalImage { reference } => {
                load_as_data_url(&reference).map(HostResponse::ImageUrl)
            }
        };
        match result {
            Ok(response) => response,
            Err(StorageError::NotFound(what)) => HostResponse::NotFound(what),
            Err(e) => {
                warn!(request = name, error = %e, "Host request failed");
                HostResponse::Failed(e.to_string())
            }
        }
    }
}

/// Channel to a [`HostService`] living in the same process. Clones share
/// the service, so the storage client and the image resolver can each hold
/// one.
pub struct InProcessChannel<S> {
    service: Rc<RefCell<HostService<S>>>,
}

impl<S> Clone for InProcessChannel<S> {
    fn clone(&self) -> Self {
        Self {
            service: Rc::clone(&self.service),
        }
    }
}

impl<S: DecorationStorage> InProcessChannel<S> {
    pub fn new(service: HostService<S>) -> Self {
        Self {
            service: Rc::new(RefCell::new(service)),
        }
    }

    pub fn service(&self) -> &Rc<RefCell<HostService<S>>> {
        &self.service
    }
}

impl<S: DecorationStorage> HostChannel for InProcessChannel<S> {
    fn call(&mut self, request: &[u8]) -> Result<Vec<u8>, StorageError> {
        let mut service = self
            .service
            .try_borrow_mut()
            .map_err(|_| StorageError::HostUnavailable("host service is busy".into()))?;
        service.handle(request)
    }
}

/// UI-side [`DecorationStorage`] that forwards every call over a
/// [`HostChannel`].
pub struct HostBackedStorage<C> {
    channel: RefCell<C>,
}

impl<C: HostChannel> HostBackedStorage<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel: RefCell::new(channel),
        }
    }

    /// Checks that the host answers at all.
    pub fn ping(&self) -> Result<(), StorageError> {
        match self.request(&HostRequest::Ping)? {
            HostResponse::Pong => Ok(()),
            other => Err(unexpected("ping", &other)),
        }
    }

    fn request(&self, request: &HostRequest) -> Result<HostResponse, StorageError> {
        let mut channel = self
            .channel
            .try_borrow_mut()
            .map_err(|_| StorageError::HostUnavailable("host channel is busy".into()))?;
        call_host(&mut *channel, request)
    }

    fn expect_done(&self, request: HostRequest) -> Result<(), StorageError> {
        match self.request(&request)? {
            HostResponse::Done => Ok(()),
            other => Err(unexpected(request.name(), &other)),
        }
    }
}

impl<C: HostChannel> DecorationStorage for HostBackedStorage<C> {
    fn create_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        self.expect_done(HostRequest::CreateDecoration {
            view,
            record: record.clone(),
        })
    }

    fn update_decoration(
        &mut self,
        view: ViewId,
        record: &DecorationRecord,
    ) -> Result<(), StorageError> {
        self.expect_done(HostRequest::UpdateDecoration {
            view,
            record: record.clone(),
        })
    }

    fn delete_decoration(&mut self, view: ViewId, id: DecorationId) -> Result<(), StorageError> {
        self.expect_done(HostRequest::DeleteDecoration { view, id })
    }

    fn list_decorations(&self, view: ViewId) -> Result<Vec<DecorationRecord>, StorageError> {
        match self.request(&HostRequest::ListDecorations { view })? {
            HostResponse::Decorations(records) => Ok(records),
            other => Err(unexpected("list_decorations", &other)),
        }
    }

    fn create_layout(&mut self, record: &LayoutRecord) -> Result<(), StorageError> {
        self.expect_done(HostRequest::CreateLayout {
            record: record.clone(),
        })
    }

    fn list_layouts(&self) -> Result<Vec<LayoutRecord>, StorageError> {
        match self.request(&HostRequest::ListLayouts)? {
            HostResponse::Layouts(layouts) => Ok(layouts),
            other => Err(unexpected("list_layouts", &other)),
        }
    }

    fn get_layout(&self, id: LayoutId) -> Result<Option<LayoutRecord>, StorageError> {
        match self.request(&HostRequest::GetLayout { id })? {
            HostResponse::Layout(layout) => Ok(layout),
            other => Err(unexpected("get_layout", &other)),
        }
    }

    fn delete_layout(&mut self, id: LayoutId) -> Result<(), StorageError> {
        self.expect_done(HostRequest::DeleteLayout { id })
    }
}
