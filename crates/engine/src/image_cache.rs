use std::collections::HashMap;

use tracing::{debug, warn};

use decor_storage::{
    StorageError,
    host::{HostChannel, HostRequest, HostResponse, call_host},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRefKind {
    /// `data:` URL, displayable as is.
    Embedded,
    /// `http(s):`, `blob:` or protocol-relative URL.
    Remote,
    /// `file://` URL, drive-letter path or root-relative path.
    LocalPath,
    Other,
}

pub fn classify(reference: &str) -> ImageRefKind {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    if lower.starts_with("data:") {
        return ImageRefKind::Embedded;
    }
    if lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("blob:")
        || reference.starts_with("//")
    {
        return ImageRefKind::Remote;
    }
    if lower.starts_with("file://") || reference.starts_with('/') || reference.starts_with('\\') {
        return ImageRefKind::LocalPath;
    }
    let bytes = reference.as_bytes();
    if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
    {
        return ImageRefKind::LocalPath;
    }
    ImageRefKind::Other
}

/// Converts a local image reference into a URL the display context can load.
pub trait LocalImageSource {
    fn resolve_local_image(&mut self, reference: &str) -> Result<String, StorageError>;
}

/// For environments that can load local paths directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughSource;

impl LocalImageSource for PassthroughSource {
    fn resolve_local_image(&mut self, reference: &str) -> Result<String, StorageError> {
        Ok(reference.to_string())
    }
}

/// Asks the privileged host to read the file and return a data URL.
pub struct HostImageSource<C> {
    channel: C,
}

impl<C: HostChannel> HostImageSource<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }
}

impl<C: HostChannel> LocalImageSource for HostImageSource<C> {
    fn resolve_local_image(&mut self, reference: &str) -> Result<String, StorageError> {
        let request = HostRequest::ResolveLocalImage {
            reference: reference.to_string(),
        };
        match call_host(&mut self.channel, &request)? {
            HostResponse::ImageUrl(url) => Ok(url),
            other => Err(StorageError::Host(format!(
                "unexpected response to resolve_local_image: {other:?}"
            ))),
        }
    }
}

/// Memoizes local-path conversions by original reference. Failed
/// conversions fall back to the raw reference and are retried on the next
/// call.
pub struct ImageCache<L> {
    source: L,
    resolved: HashMap<String, String>,
}

impl<L: LocalImageSource> ImageCache<L> {
    pub fn new(source: L) -> Self {
        Self {
            source,
            resolved: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, reference: &str) -> String {
        if classify(reference) != ImageRefKind::LocalPath {
            return reference.to_string();
        }
        if let Some(url) = self.resolved.get(reference) {
            return url.clone();
        }
        match self.source.resolve_local_image(reference) {
            Ok(url) => {
                debug!(reference, "Resolved local image");
                self.resolved.insert(reference.to_string(), url.clone());
                url
            }
            Err(e) => {
                warn!(reference, error = %e, "Local image resolution failed, using raw reference");
                reference.to_string()
            }
        }
    }

    pub fn cached(&self) -> usize {
        self.resolved.len()
    }

    pub fn source(&self) -> &L {
        &self.source
    }
}
