pub mod decoration;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod layout;
pub mod time;
pub mod view;

pub use decoration::{AnchorInfo, DayKey, Decoration, DecorationPatch, DecorationRecord};
pub use error::CoreError;
pub use geometry::{Point, Rect, Size, Vector};
pub use ids::*;
pub use layout::{Layout, LayoutRecord, Resolution};
pub use view::ViewId;
