use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CoreError, decoration::Decoration, ids::LayoutId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Named snapshot of exactly one view's decoration collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub id: LayoutId,
    pub name: String,
    pub target_resolution: Resolution,
    pub decorations: Vec<Decoration>,
    /// Epoch milliseconds.
    pub saved_at: i64,
}

impl Layout {
    pub fn snapshot(
        name: impl Into<String>,
        target_resolution: Resolution,
        decorations: Vec<Decoration>,
        saved_at: i64,
    ) -> Self {
        Self {
            id: LayoutId::new(),
            name: name.into(),
            target_resolution,
            decorations,
            saved_at,
        }
    }

    pub fn to_record(&self) -> Result<LayoutRecord, CoreError> {
        let serialized_decorations = serde_json::to_string(&self.decorations)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        Ok(LayoutRecord {
            id: self.id,
            name: self.name.clone(),
            resolution_width: self.target_resolution.width,
            resolution_height: self.target_resolution.height,
            serialized_decorations,
            saved_at: self.saved_at,
        })
    }
}

/// Flat persisted shape of a layout; decorations are JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub id: LayoutId,
    pub name: String,
    pub resolution_width: u32,
    pub resolution_height: u32,
    pub serialized_decorations: String,
    pub saved_at: i64,
}

impl LayoutRecord {
    pub fn to_layout(&self) -> Result<Layout, CoreError> {
        let malformed = |reason: String| CoreError::MalformedLayout {
            layout: self.name.clone(),
            reason,
        };
        let decorations: Vec<Decoration> = serde_json::from_str(&self.serialized_decorations)
            .map_err(|e| malformed(e.to_string()))?;
        let mut seen = HashSet::with_capacity(decorations.len());
        for d in &decorations {
            d.validate().map_err(|e| malformed(e.to_string()))?;
            if !seen.insert(d.id) {
                return Err(malformed(format!("decoration {} appears twice", d.id)));
            }
        }
        Ok(Layout {
            id: self.id,
            name: self.name.clone(),
            target_resolution: Resolution::new(self.resolution_width, self.resolution_height),
            decorations,
            saved_at: self.saved_at,
        })
    }
}
