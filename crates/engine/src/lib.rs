pub mod anchor;
pub mod config;
pub mod controller;
pub mod error;
pub mod frame;
pub mod image_cache;
pub mod interaction;
pub mod layout;
pub mod notify;
pub mod persist;
pub mod render;
pub mod store;

pub use anchor::{DayCell, DayCellMap};
pub use config::OverlayConfig;
pub use controller::{Handle, OverlayController};
pub use error::EngineError;
pub use frame::{FrameHandle, FrameScheduler, ManualFramePump, PendingUpdate};
pub use image_cache::{
    HostImageSource, ImageCache, ImageRefKind, LocalImageSource, PassthroughSource,
};
pub use interaction::{Interaction, InteractionAction, InteractionMode};
pub use layout::ApplyOutcome;
pub use notify::{Notice, NoticeLevel, Notifications};
pub use persist::{PersistOp, PersistQueue};
pub use render::{LoadRetries, RenderLayer};
pub use store::DecorationStore;
