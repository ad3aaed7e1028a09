use std::collections::HashSet;

use decor_core::{Decoration, DecorationId, Rect};

use crate::image_cache::{ImageCache, LocalImageSource};

/// One absolutely positioned, rotated image layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayer {
    pub id: DecorationId,
    pub src: String,
    /// Raw reference to try once if `src` fails to load.
    pub fallback_src: Option<String>,
    pub rect: Rect,
    pub rotation_degrees: f64,
    pub z_index: i64,
    pub selected: bool,
    /// Resize and rotate handles are shown only for the selection in edit mode.
    pub show_handles: bool,
}

/// Decorations whose resolved image failed to load and now render from
/// their raw reference. Each decoration gets one retry.
#[derive(Debug, Default)]
pub struct LoadRetries {
    retried: HashSet<DecorationId>,
}

impl LoadRetries {
    /// Records a load failure. Returns true if the layer should retry with
    /// its raw reference, false if it already did.
    pub fn on_load_error(&mut self, id: DecorationId) -> bool {
        self.retried.insert(id)
    }

    pub fn has_retried(&self, id: DecorationId) -> bool {
        self.retried.contains(&id)
    }

    pub fn forget(&mut self, id: DecorationId) {
        self.retried.remove(&id);
    }
}

/// Builds layers in paint order: ascending z-index, ties in insertion order.
pub fn build_layers<L: LocalImageSource>(
    decorations: &[Decoration],
    selected: Option<DecorationId>,
    edit_mode: bool,
    images: &mut ImageCache<L>,
    retries: &LoadRetries,
) -> Vec<RenderLayer> {
    let mut layers: Vec<RenderLayer> = decorations
        .iter()
        .map(|d| {
            let is_selected = selected == Some(d.id);
            let (src, fallback_src) = if retries.has_retried(d.id) {
                (d.image_ref.clone(), None)
            } else {
                let resolved = images.resolve(&d.image_ref);
                let fallback = (resolved != d.image_ref).then(|| d.image_ref.clone());
                (resolved, fallback)
            };
            RenderLayer {
                id: d.id,
                src,
                fallback_src,
                rect: d.rect(),
                rotation_degrees: d.rotation_degrees,
                z_index: d.z_index,
                selected: is_selected,
                show_handles: is_selected && edit_mode,
            }
        })
        .collect();
    // sort_by_key is stable
    layers.sort_by_key(|l| l.z_index);
    layers
}
