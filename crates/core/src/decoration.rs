use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    CoreError,
    geometry::{Point, Rect, Size},
    ids::DecorationId,
};

/// Calendar day key in `YYYY-MM-DD` form. Treated as an opaque label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binds a decoration's position to a calendar day cell. The absolute
/// position is derived: `x = cell.x + day_offset_x`, `y = cell.y + day_offset_y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorInfo {
    pub date: DayKey,
    pub day_offset_x: f64,
    pub day_offset_y: f64,
}

impl AnchorInfo {
    pub fn relative_to(date: DayKey, cell: &Rect, position: Point) -> Self {
        Self {
            date,
            day_offset_x: position.x - cell.x,
            day_offset_y: position.y - cell.y,
        }
    }

    pub fn project(&self, cell: &Rect) -> Point {
        Point::new(cell.x + self.day_offset_x, cell.y + self.day_offset_y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub id: DecorationId,
    pub image_ref: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_degrees: f64,
    pub z_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorInfo>,
}

impl Decoration {
    pub fn new(image_ref: impl Into<String>, rect: Rect, z_index: i64) -> Self {
        Self {
            id: DecorationId::new(),
            image_ref: image_ref.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            rotation_degrees: 0.0,
            z_index,
            anchor: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.size().is_positive() {
            return Err(CoreError::InvalidGeometry(format!(
                "decoration {} has non-positive size {}x{}",
                self.id, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Merges every field set in `patch` into this decoration.
    pub fn apply(&mut self, patch: &DecorationPatch) {
        if let Some(image_ref) = &patch.image_ref {
            self.image_ref = image_ref.clone();
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(rotation) = patch.rotation_degrees {
            self.rotation_degrees = rotation;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if let Some(anchor) = &patch.anchor {
            self.anchor = anchor.clone();
        }
    }
}

/// Partial update. `anchor: Some(None)` clears the anchor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorationPatch {
    pub image_ref: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation_degrees: Option<f64>,
    pub z_index: Option<i64>,
    pub anchor: Option<Option<AnchorInfo>>,
}

impl DecorationPatch {
    pub fn position(p: Point) -> Self {
        Self {
            x: Some(p.x),
            y: Some(p.y),
            ..Self::default()
        }
    }

    pub fn size(s: Size) -> Self {
        Self {
            width: Some(s.width),
            height: Some(s.height),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation_degrees: Some(degrees),
            ..Self::default()
        }
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorInfo>) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// Flat, backend-agnostic persisted shape of a decoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationRecord {
    pub id: DecorationId,
    pub image_ref: String,
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z_index: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub day_offset_x: Option<f64>,
    #[serde(default)]
    pub day_offset_y: Option<f64>,
}

impl From<&Decoration> for DecorationRecord {
    fn from(d: &Decoration) -> Self {
        Self {
            id: d.id,
            image_ref: d.image_ref.clone(),
            position_x: d.x,
            position_y: d.y,
            width: d.width,
            height: d.height,
            rotation: d.rotation_degrees,
            z_index: d.z_index,
            date: d.anchor.as_ref().map(|a| a.date.as_str().to_string()),
            day_offset_x: d.anchor.as_ref().map(|a| a.day_offset_x),
            day_offset_y: d.anchor.as_ref().map(|a| a.day_offset_y),
        }
    }
}

impl TryFrom<DecorationRecord> for Decoration {
    type Error = CoreError;

    fn try_from(r: DecorationRecord) -> Result<Self, Self::Error> {
        // A stored date without offsets anchors at the cell origin.
        let anchor = r.date.map(|date| AnchorInfo {
            date: DayKey::new(date),
            day_offset_x: r.day_offset_x.unwrap_or(0.0),
            day_offset_y: r.day_offset_y.unwrap_or(0.0),
        });
        let decoration = Decoration {
            id: r.id,
            image_ref: r.image_ref,
            x: r.position_x,
            y: r.position_y,
            width: r.width,
            height: r.height,
            rotation_degrees: r.rotation,
            z_index: r.z_index,
            anchor,
        };
        decoration.validate()?;
        Ok(decoration)
    }
}
