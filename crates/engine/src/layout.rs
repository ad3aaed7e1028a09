use tracing::{info, warn};

use decor_core::{DecorationRecord, Layout, LayoutId, LayoutRecord, Resolution, time::now_millis};
use decor_storage::DecorationStorage;

use crate::controller::OverlayController;
use crate::error::EngineError;
use crate::frame::FrameScheduler;
use crate::image_cache::LocalImageSource;
use crate::persist::PersistOp;

/// Result of applying a layout to the active view.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    pub layout: LayoutId,
    pub applied: usize,
    /// Set when the layout was saved at a different resolution than the
    /// current container; the host may resize its window to match.
    pub resize_to: Option<Resolution>,
}

impl<S, F, L> OverlayController<S, F, L>
where
    S: DecorationStorage,
    F: FrameScheduler,
    L: LocalImageSource,
{
    fn current_resolution(&self) -> Resolution {
        let container = self.container();
        Resolution::new(
            container.width.max(0.0).round() as u32,
            container.height.max(0.0).round() as u32,
        )
    }

    /// Snapshots the active view's collection under `name`. Without an
    /// explicit resolution the current container size is recorded.
    pub fn save_layout(
        &mut self,
        name: &str,
        resolution: Option<Resolution>,
    ) -> Result<Layout, EngineError> {
        let layout = Layout::snapshot(
            name,
            resolution.unwrap_or_else(|| self.current_resolution()),
            self.decorations().to_vec(),
            now_millis(),
        );
        let record = layout.to_record()?;
        if let Err(e) = self.storage_mut().create_layout(&record) {
            warn!(layout = name, error = %e, "Saving layout failed");
            self.notifications_mut()
                .error(format!("Could not save layout \"{name}\": {e}"));
            return Err(e.into());
        }
        info!(
            layout = name,
            view = %self.active_view(),
            count = layout.decorations.len(),
            "Layout saved"
        );
        Ok(layout)
    }

    pub fn list_layouts(&self) -> Result<Vec<LayoutRecord>, EngineError> {
        Ok(self.storage().list_layouts()?)
    }

    /// Replaces the active view's collection with the layout's decorations,
    /// in memory and in the backend. A layout that fails to parse is refused
    /// and the view is left untouched.
    pub fn apply_layout(&mut self, id: LayoutId) -> Result<ApplyOutcome, EngineError> {
        self.require_editable()?;
        let record = self
            .storage()
            .get_layout(id)?
            .ok_or_else(|| EngineError::LayoutNotFound(id.to_string()))?;
        let layout = match record.to_layout() {
            Ok(layout) => layout,
            Err(e) => {
                warn!(layout = %record.name, error = %e, "Refusing malformed layout");
                self.notifications_mut()
                    .error(format!("Layout \"{}\" is damaged and cannot be applied", record.name));
                return Err(e.into());
            }
        };

        let view = self.active_view();
        self.prepare_bulk_replace(view);

        let existing: Vec<_> = self.decorations().iter().map(|d| d.id).collect();
        for old in existing {
            self.enqueue(PersistOp::Delete { view, id: old });
        }
        for decoration in &layout.decorations {
            self.enqueue(PersistOp::Create {
                view,
                record: DecorationRecord::from(decoration),
            });
        }
        let applied = layout.decorations.len();
        self.replace_active(layout.decorations);

        let resize_to =
            (layout.target_resolution != self.current_resolution())
                .then_some(layout.target_resolution);
        info!(layout = %layout.name, view = %view, applied, "Layout applied");
        Ok(ApplyOutcome {
            layout: id,
            applied,
            resize_to,
        })
    }

    pub fn delete_layout(&mut self, id: LayoutId) -> Result<(), EngineError> {
        self.storage_mut().delete_layout(id)?;
        info!(layout = %id, "Layout deleted");
        Ok(())
    }
}
