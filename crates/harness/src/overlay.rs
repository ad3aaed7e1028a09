use decor_core::{DecorationId, Point, Rect};
use decor_engine::{EngineError, Handle, OverlayConfig, OverlayController};
use decor_engine::{ManualFramePump, PassthroughSource};
use decor_storage::{
    Backend, DecorationStorage, HostChannel, HostService, InProcessChannel, KvStorage, MemoryKv,
    SqliteStorage, StorageError,
};

use crate::RecordingStorage;

pub type TestOverlay<S = KvStorage> = OverlayController<RecordingStorage<S>>;

pub const CONTAINER: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

fn ready<S: DecorationStorage>(storage: S) -> TestOverlay<S> {
    let mut overlay = OverlayController::new(
        RecordingStorage::new(storage),
        ManualFramePump::new(),
        PassthroughSource,
        OverlayConfig::default(),
    );
    overlay.set_container(CONTAINER);
    overlay.set_edit_mode(true);
    overlay
}

/// Overlay over the in-memory key-value backend, in edit mode.
pub fn kv_overlay() -> TestOverlay<KvStorage> {
    ready(KvStorage::in_memory())
}

/// Overlay whose backend was selected against a live in-process host
/// serving an in-memory SQLite database.
pub fn host_overlay() -> Result<TestOverlay<Backend>, StorageError> {
    let channel = InProcessChannel::new(HostService::new(SqliteStorage::open_in_memory()?));
    let host: Box<dyn HostChannel> = Box::new(channel);
    Ok(ready(Backend::select(Some(host), Box::new(MemoryKv::new()))))
}

/// Pointer-down on the decoration body, `steps` moves spread evenly towards
/// `to` with a frame after each, then pointer-up at `to`.
pub fn drag<S: DecorationStorage>(
    overlay: &mut TestOverlay<S>,
    id: DecorationId,
    from: Point,
    to: Point,
    steps: usize,
) -> Result<(), EngineError> {
    overlay.pointer_down_on_decoration(id, from)?;
    move_then_release(overlay, from, to, steps);
    Ok(())
}

/// Same as [`drag`] but grabbing a handle of the (selected) decoration.
pub fn drag_handle<S: DecorationStorage>(
    overlay: &mut TestOverlay<S>,
    id: DecorationId,
    handle: Handle,
    from: Point,
    to: Point,
    steps: usize,
) -> Result<(), EngineError> {
    overlay.pointer_down_on_handle(id, handle, from)?;
    move_then_release(overlay, from, to, steps);
    Ok(())
}

fn move_then_release<S: DecorationStorage>(
    overlay: &mut TestOverlay<S>,
    from: Point,
    to: Point,
    steps: usize,
) {
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        overlay.pointer_move(Point::new(
            from.x + (to.x - from.x) * t,
            from.y + (to.y - from.y) * t,
        ));
        overlay.pump_frames();
    }
    overlay.pointer_up(to);
}
