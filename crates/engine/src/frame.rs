//! Animation-frame batching for pointer-move events.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Schedule-once, cancelable frame callbacks. The host calls back into
/// [`crate::OverlayController::on_frame`] with the handle when the frame fires.
pub trait FrameScheduler {
    fn schedule(&mut self) -> FrameHandle;
    fn cancel(&mut self, handle: FrameHandle);
}

/// Frame source driven by hand, for tests and hosts without a display clock.
#[derive(Debug, Default)]
pub struct ManualFramePump {
    next: u64,
    due: Vec<FrameHandle>,
    scheduled_total: u64,
}

impl ManualFramePump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles waiting for the next frame, oldest first. Draining them is
    /// what "a frame fires" means.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.due)
    }

    pub fn pending(&self) -> usize {
        self.due.len()
    }

    /// Number of frames ever requested.
    pub fn scheduled_total(&self) -> u64 {
        self.scheduled_total
    }
}

impl FrameScheduler for ManualFramePump {
    fn schedule(&mut self) -> FrameHandle {
        self.next += 1;
        self.scheduled_total += 1;
        let handle = FrameHandle(self.next);
        self.due.push(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.due.retain(|h| *h != handle);
    }
}

/// Single-slot holder for the latest not-yet-applied value. Offering a new
/// value overwrites the old one; at most one frame is scheduled at a time.
#[derive(Debug)]
pub struct PendingUpdate<T> {
    slot: Option<T>,
    handle: Option<FrameHandle>,
}

impl<T> Default for PendingUpdate<T> {
    fn default() -> Self {
        Self {
            slot: None,
            handle: None,
        }
    }
}

impl<T> PendingUpdate<T> {
    pub fn offer<F: FrameScheduler + ?Sized>(&mut self, value: T, frames: &mut F) {
        self.slot = Some(value);
        if self.handle.is_none() {
            self.handle = Some(frames.schedule());
        }
    }

    /// Takes the value if `handle` is the frame this holder is waiting on.
    /// Stale or foreign handles yield nothing.
    pub fn take_for_frame(&mut self, handle: FrameHandle) -> Option<T> {
        if self.handle != Some(handle) {
            return None;
        }
        self.handle = None;
        self.slot.take()
    }

    /// Cancels the scheduled frame and hands back the value immediately.
    pub fn flush_now<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) -> Option<T> {
        if let Some(handle) = self.handle.take() {
            frames.cancel(handle);
        }
        self.slot.take()
    }

    pub fn is_scheduled(&self) -> bool {
        self.handle.is_some()
    }
}
