use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use percent_encoding::percent_decode_str;

use crate::error::StorageError;

/// Returns the filesystem path a reference names. `file://` URLs lose their
/// scheme and have `%XX` escapes decoded; plain paths are taken as is.
pub fn path_from_reference(reference: &str) -> PathBuf {
    let Some(rest) = reference.strip_prefix("file://") else {
        return PathBuf::from(reference);
    };
    let decoded = percent_decode_str(rest).decode_utf8_lossy();
    // file:///C:/x on Windows carries an extra slash before the drive letter
    let bytes = decoded.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'/' && bytes[2] == b':' {
        PathBuf::from(&decoded[1..])
    } else {
        PathBuf::from(decoded.as_ref())
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Reads a local image and encodes it as a `data:` URL.
pub fn load_as_data_url(reference: &str) -> Result<String, StorageError> {
    let path = path_from_reference(reference);
    let bytes = fs::read(&path)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{encoded}", mime_for(&path)))
}
