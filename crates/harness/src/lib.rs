pub mod overlay;
pub mod recording;

pub use overlay::{CONTAINER, TestOverlay, drag, drag_handle, host_overlay, kv_overlay};
pub use recording::{CallKind, RecordingStorage, StorageCall};

/// Routes `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
