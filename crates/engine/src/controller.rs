use std::collections::BTreeSet;

use tracing::{debug, error, info, warn};

use decor_core::{
    Decoration, DecorationId, DecorationPatch, DecorationRecord, Point, Rect, Size, ViewId,
};
use decor_storage::DecorationStorage;

use crate::anchor::{DayCell, DayCellMap};
use crate::config::OverlayConfig;
use crate::error::EngineError;
use crate::frame::{FrameHandle, FrameScheduler, ManualFramePump, PendingUpdate};
use crate::image_cache::{ImageCache, LocalImageSource};
use crate::interaction::Interaction;
use crate::notify::Notifications;
use crate::persist::{PersistOp, PersistQueue};
use crate::render::{LoadRetries, RenderLayer, build_layers};
use crate::store::DecorationStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Resize,
    Rotate,
}

/// Rotation in degrees, normalized to `[0, 360)`.
fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Drives the decoration store from pointer input and keeps the backend in
/// step with it.
///
/// Pointer-move events are coalesced through a [`PendingUpdate`] and applied
/// at most once per frame. Pointer-up flushes synchronously and queues
/// exactly one write of the final geometry. Writes go through a
/// [`PersistQueue`] drained by [`Self::pump_persistence`].
pub struct OverlayController<S, F = ManualFramePump, L = crate::image_cache::PassthroughSource> {
    store: DecorationStore,
    storage: S,
    frames: F,
    images: ImageCache<L>,
    retries: LoadRetries,
    config: OverlayConfig,
    edit_mode: bool,
    container: Rect,
    day_cells: DayCellMap,
    pending: PendingUpdate<Point>,
    queue: PersistQueue,
    notices: Notifications,
    pending_delete: Option<(ViewId, DecorationId)>,
    reloading: BTreeSet<ViewId>,
}

impl<S, F, L> OverlayController<S, F, L>
where
    S: DecorationStorage,
    F: FrameScheduler,
    L: LocalImageSource,
{
    pub fn new(storage: S, frames: F, image_source: L, mut config: OverlayConfig) -> Self {
        config.validate_and_clamp();
        Self {
            store: DecorationStore::default(),
            storage,
            frames,
            images: ImageCache::new(image_source),
            retries: LoadRetries::default(),
            config,
            edit_mode: false,
            container: Rect::default(),
            day_cells: DayCellMap::default(),
            pending: PendingUpdate::default(),
            queue: PersistQueue::default(),
            notices: Notifications::default(),
            pending_delete: None,
            reloading: BTreeSet::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn store(&self) -> &DecorationStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notices
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notices
    }

    pub fn pending_persistence(&self) -> &PersistQueue {
        &self.queue
    }

    pub fn active_view(&self) -> ViewId {
        self.store.active_view()
    }

    pub fn decorations(&self) -> &[Decoration] {
        self.store.decorations(self.store.active_view())
    }

    pub fn container(&self) -> Rect {
        self.container
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn pending_delete(&self) -> Option<DecorationId> {
        self.pending_delete.map(|(_, id)| id)
    }

    /// Editing is disabled on a view while a bulk reload of it is pending.
    pub fn is_editing_enabled(&self, view: ViewId) -> bool {
        self.edit_mode && !self.reloading.contains(&view)
    }

    // ========================================================================
    // Host signals
    // ========================================================================

    /// Leaving edit mode commits any in-flight interaction.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        if !enabled {
            self.finish_interaction(None);
        }
        self.edit_mode = enabled;
    }

    pub fn set_container(&mut self, container: Rect) {
        self.container = container;
    }

    /// Replaces the visible day cells and re-projects anchored decorations of
    /// the active view. Re-projected positions are derived and not persisted.
    pub fn set_day_cells(&mut self, cells: Vec<DayCell>) {
        self.day_cells = DayCellMap::new(cells);
        let view = self.store.active_view();
        let moves = self.day_cells.reproject(self.store.decorations(view));
        for (id, position) in moves {
            self.store
                .update_decoration(view, id, &DecorationPatch::position(position));
        }
    }

    /// Viewport resize: new container bounds and day-cell rectangles.
    pub fn resize_viewport(&mut self, container: Rect, cells: Vec<DayCell>) {
        self.set_container(container);
        self.set_day_cells(cells);
    }

    /// Switches the visible screen and schedules a bulk reload of its
    /// collection.
    pub fn activate_view(&mut self, view: ViewId) {
        if view != self.store.active_view() {
            self.finish_interaction(None);
            self.pending_delete = None;
        }
        self.store.set_active_view(view);
        self.request_reload(view);
    }

    /// Queues a full reload of `view`. An interaction in flight on it is
    /// committed first, and editing stays disabled until the reload runs.
    pub fn request_reload(&mut self, view: ViewId) {
        if view == self.store.active_view() {
            self.finish_interaction(None);
        }
        if self.reloading.insert(view) {
            self.queue.push(PersistOp::Reload { view });
        }
    }

    // ========================================================================
    // Pointer state machine
    // ========================================================================

    fn require(&self, id: DecorationId) -> Result<&Decoration, EngineError> {
        let view = self.store.active_view();
        self.store
            .find(view, id)
            .ok_or_else(|| EngineError::DecorationNotFound(format!("{id} in {view}")))
    }

    /// Edits on a view with a pending reload would race it in the queue.
    pub(crate) fn require_editable(&self) -> Result<(), EngineError> {
        let view = self.store.active_view();
        if self.reloading.contains(&view) {
            return Err(EngineError::EditingDisabled(view));
        }
        Ok(())
    }

    /// Pointer-down on a decoration body. Outside edit mode this only
    /// selects; in edit mode it starts a drag.
    pub fn pointer_down_on_decoration(
        &mut self,
        id: DecorationId,
        pointer: Point,
    ) -> Result<(), EngineError> {
        let position = self.require(id)?.position();
        if !self.edit_mode {
            self.store.select(Some(id));
            return Ok(());
        }
        self.require_editable()?;
        self.finish_interaction(None);
        self.store.start_drag(id, pointer - position);
        debug!(id = %id, "Drag started");
        Ok(())
    }

    /// Pointer-down on a resize or rotate handle. Handles exist only for the
    /// selected decoration in edit mode.
    pub fn pointer_down_on_handle(
        &mut self,
        id: DecorationId,
        handle: Handle,
        pointer: Point,
    ) -> Result<(), EngineError> {
        let decoration = self.require(id)?;
        let (size, center, rotation) = (
            decoration.size(),
            decoration.center(),
            decoration.rotation_degrees,
        );
        if !self.edit_mode || self.store.selected() != Some(id) {
            return Err(EngineError::InteractionRefused(format!(
                "no {handle:?} handle shown for {id}"
            )));
        }
        self.require_editable()?;
        self.finish_interaction(None);
        match handle {
            Handle::Resize => self.store.start_resize(id, pointer, size),
            Handle::Rotate => {
                let angle_offset = (pointer - center).angle_degrees() - rotation;
                self.store.start_rotate(id, angle_offset);
            }
        }
        debug!(id = %id, handle = ?handle, "Handle interaction started");
        Ok(())
    }

    /// Records the latest pointer position. It is applied on the next frame;
    /// earlier unapplied positions are dropped.
    pub fn pointer_move(&mut self, pointer: Point) {
        if !self.store.interaction().is_active() {
            return;
        }
        self.pending.offer(pointer, &mut self.frames);
    }

    /// Frame callback. Applies the pending pointer position, if this is the
    /// frame it was waiting for.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        match self.pending.take_for_frame(handle) {
            Some(pointer) => {
                self.apply_pointer(pointer);
                true
            }
            None => false,
        }
    }

    /// Ends the interaction at `pointer` and queues one write of the final
    /// geometry. Returns the committed decoration, if any.
    pub fn pointer_up(&mut self, pointer: Point) -> Option<DecorationId> {
        self.finish_interaction(Some(pointer))
    }

    fn finish_interaction(&mut self, final_pointer: Option<Point>) -> Option<DecorationId> {
        let latest = self.pending.flush_now(&mut self.frames);
        let interaction = self.store.interaction();
        let id = interaction.id()?;
        if let Some(pointer) = final_pointer.or(latest) {
            self.apply_pointer(pointer);
        }
        self.store.clear_interaction();

        let view = self.store.active_view();
        let record = self.store.find(view, id).map(DecorationRecord::from)?;
        debug!(view = %view, id = %id, mode = ?interaction.mode(), "Interaction committed");
        self.queue.push(PersistOp::Update { view, record });
        Some(id)
    }

    fn apply_pointer(&mut self, pointer: Point) {
        let view = self.store.active_view();
        let interaction = self.store.interaction();
        let Some(id) = interaction.id() else {
            return;
        };
        let Some(decoration) = self.store.find(view, id) else {
            return;
        };

        let patch = match interaction {
            Interaction::Idle => return,
            Interaction::Dragging { offset, .. } => {
                let size = decoration.size();
                let origin = self.container.clamp_origin(pointer - offset, size);
                let center = Rect::from_origin_size(origin, size).center();
                let patch = DecorationPatch::position(origin);
                match self
                    .day_cells
                    .nearest(center, Some(self.config.anchor_snap_distance))
                {
                    Some(cell) => patch.with_anchor(Some(decor_core::AnchorInfo::relative_to(
                        cell.date.clone(),
                        &cell.rect,
                        origin,
                    ))),
                    None => patch,
                }
            }
            Interaction::Resizing {
                start_pointer,
                start_size,
                ..
            } => {
                let moved = pointer - start_pointer;
                let delta = moved.dx.max(moved.dy);
                let side = (start_size.width + delta)
                    .clamp(self.config.min_size, self.config.max_size);
                DecorationPatch::size(Size::new(side, side))
            }
            Interaction::Rotating { angle_offset, .. } => {
                let angle = (pointer - decoration.center()).angle_degrees();
                DecorationPatch::rotation(normalize_degrees(angle - angle_offset))
            }
        };
        self.store.update_decoration(view, id, &patch);
    }

    // ========================================================================
    // Creation & deletion
    // ========================================================================

    /// Adds a dropped or uploaded image to the active view: scaled so its
    /// larger side is at most the configured default, centered in the
    /// container, painted on top, and optionally anchored to the nearest day.
    pub fn add_from_image(
        &mut self,
        image_ref: impl Into<String>,
        natural_size: Size,
        anchor_to_day: bool,
    ) -> Result<DecorationId, EngineError> {
        if !natural_size.is_positive() {
            return Err(decor_core::CoreError::InvalidGeometry(format!(
                "image size {}x{}",
                natural_size.width, natural_size.height
            ))
            .into());
        }
        let view = self.store.active_view();
        let size = natural_size.fit_within(self.config.default_max_dimension);
        let center = self.container.center();
        let origin = Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0);
        let mut decoration = Decoration::new(
            image_ref,
            Rect::from_origin_size(origin, size),
            self.store.next_z_index(view),
        );
        if anchor_to_day {
            decoration.anchor = self.day_cells.nearest(center, None).map(|cell| {
                decor_core::AnchorInfo::relative_to(cell.date.clone(), &cell.rect, origin)
            });
        }
        let id = decoration.id;
        self.add_decoration(decoration)?;
        Ok(id)
    }

    /// Programmatic add to the active view. A duplicate id is a no-op and
    /// queues nothing.
    pub fn add_decoration(&mut self, decoration: Decoration) -> Result<bool, EngineError> {
        decoration.validate()?;
        self.require_editable()?;
        let view = self.store.active_view();
        let record = DecorationRecord::from(&decoration);
        if !self.store.add_decoration(decoration) {
            return Ok(false);
        }
        info!(view = %view, id = %record.id, "Decoration added");
        self.queue.push(PersistOp::Create { view, record });
        Ok(true)
    }

    /// First step of deletion: remembers the target until confirmed.
    pub fn request_delete(&mut self, id: DecorationId) -> Result<(), EngineError> {
        self.require(id)?;
        self.require_editable()?;
        self.pending_delete = Some((self.store.active_view(), id));
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// A refused confirmation keeps the request pending.
    pub fn confirm_delete(&mut self) -> Result<DecorationId, EngineError> {
        let (view, id) = self.pending_delete.ok_or(EngineError::NoPendingDelete)?;
        if self.reloading.contains(&view) {
            return Err(EngineError::EditingDisabled(view));
        }
        self.pending_delete = None;
        if self.store.interaction().id() == Some(id) {
            self.pending.flush_now(&mut self.frames);
        }
        self.store
            .remove_decoration(view, id)
            .ok_or_else(|| EngineError::DecorationNotFound(format!("{id} in {view}")))?;
        self.retries.forget(id);
        info!(view = %view, id = %id, "Decoration deleted");
        self.queue.push(PersistOp::Delete { view, id });
        Ok(id)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render_layers(&mut self) -> Vec<RenderLayer> {
        let view = self.store.active_view();
        build_layers(
            self.store.decorations(view),
            self.store.selected(),
            self.edit_mode,
            &mut self.images,
            &self.retries,
        )
    }

    /// A layer's image failed to load. Returns true if the layer should be
    /// re-rendered from its raw reference.
    pub fn on_image_error(&mut self, id: DecorationId) -> bool {
        let retry = self.retries.on_load_error(id);
        if retry {
            debug!(id = %id, "Image load failed, retrying with raw reference");
        }
        retry
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub(crate) fn enqueue(&mut self, op: PersistOp) {
        self.queue.push(op);
    }

    /// Settles transient state on `view` before its collection is replaced
    /// wholesale: the in-flight interaction is committed and a pending
    /// deletion is forgotten.
    pub(crate) fn prepare_bulk_replace(&mut self, view: ViewId) {
        if view == self.store.active_view() {
            self.finish_interaction(None);
        }
        if matches!(self.pending_delete, Some((v, _)) if v == view) {
            self.pending_delete = None;
        }
    }

    pub(crate) fn replace_active(&mut self, mut decorations: Vec<Decoration>) {
        let view = self.store.active_view();
        for (id, position) in self.day_cells.reproject(&decorations) {
            if let Some(d) = decorations.iter_mut().find(|d| d.id == id) {
                d.apply(&DecorationPatch::position(position));
            }
        }
        for d in self.store.decorations(view) {
            self.retries.forget(d.id);
        }
        self.store.replace_decorations(view, decorations);
    }

    /// Sends every queued op to the backend, in order. Failed creates and
    /// updates are reported but not rolled back; a failed delete forces a
    /// reload of its view. Returns the number of ops processed.
    pub fn pump_persistence(&mut self) -> usize {
        let mut processed = 0;
        while let Some(op) = self.queue.pop() {
            processed += 1;
            let view = op.view();
            let name = op.name();
            let result = match op {
                PersistOp::Create { view, record } => {
                    self.storage.create_decoration(view, &record)
                }
                PersistOp::Update { view, record } => {
                    self.storage.update_decoration(view, &record)
                }
                PersistOp::Delete { view, id } => {
                    let result = self.storage.delete_decoration(view, id);
                    if result.is_err() && self.reloading.insert(view) {
                        self.queue.push(PersistOp::Reload { view });
                    }
                    result
                }
                PersistOp::Reload { view } => {
                    self.reload_now(view);
                    continue;
                }
            };
            if let Err(e) = result {
                error!(view = %view, op = name, error = %e, "Persisting decoration failed");
                self.notices.error(format!("Could not save sticker change: {e}"));
            }
        }
        processed
    }

    fn reload_now(&mut self, view: ViewId) {
        self.reloading.remove(&view);
        let records = match self.storage.list_decorations(view) {
            Ok(records) => records,
            Err(e) => {
                error!(view = %view, error = %e, "Reloading decorations failed");
                self.notices.error(format!("Could not load stickers: {e}"));
                return;
            }
        };
        let mut decorations = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id;
            match Decoration::try_from(record) {
                Ok(d) => decorations.push(d),
                Err(e) => {
                    warn!(view = %view, id = %id, error = %e, "Skipping invalid stored decoration")
                }
            }
        }
        info!(view = %view, count = decorations.len(), "Decorations reloaded");
        if view == self.store.active_view() {
            self.replace_active(decorations);
        } else {
            self.store.replace_decorations(view, decorations);
        }
    }
}

impl<S, L> OverlayController<S, ManualFramePump, L>
where
    S: DecorationStorage,
    L: LocalImageSource,
{
    /// Fires every frame due on the manual pump. Returns how many applied a
    /// pointer update.
    pub fn pump_frames(&mut self) -> usize {
        let due = self.frames.take_due();
        due.into_iter().filter(|h| self.on_frame(*h)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_cache::PassthroughSource;
    use decor_storage::KvStorage;

    type Controller = OverlayController<KvStorage>;

    fn controller() -> Controller {
        let mut c = OverlayController::new(
            KvStorage::in_memory(),
            ManualFramePump::new(),
            PassthroughSource,
            OverlayConfig::default(),
        );
        c.set_container(Rect::new(0.0, 0.0, 1000.0, 800.0));
        c.set_edit_mode(true);
        c
    }

    fn place(c: &mut Controller, rect: Rect) -> DecorationId {
        let d = Decoration::new("data:image/png;base64,AA", rect, 0);
        let id = d.id;
        c.add_decoration(d).unwrap();
        c.pump_persistence();
        id
    }

    #[test]
    fn normalize_wraps_into_range() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }

    #[test]
    fn drag_is_clamped_to_container() {
        let mut c = controller();
        let id = place(&mut c, Rect::new(100.0, 100.0, 80.0, 80.0));
        c.pointer_down_on_decoration(id, Point::new(110.0, 110.0)).unwrap();
        c.pointer_up(Point::new(2000.0, -500.0));
        let d = c.store().find(ViewId::Calendar, id).unwrap();
        assert_eq!(d.position(), Point::new(920.0, 0.0));
    }

    #[test]
    fn moves_without_interaction_schedule_nothing() {
        let mut c = controller();
        c.pointer_move(Point::new(5.0, 5.0));
        assert_eq!(c.frames().scheduled_total(), 0);
    }

    #[test]
    fn selection_click_outside_edit_mode_does_not_move() {
        let mut c = controller();
        let id = place(&mut c, Rect::new(10.0, 10.0, 50.0, 50.0));
        c.set_edit_mode(false);
        c.pointer_down_on_decoration(id, Point::new(20.0, 20.0)).unwrap();
        c.pointer_move(Point::new(300.0, 300.0));
        c.pump_frames();
        assert_eq!(c.pointer_up(Point::new(300.0, 300.0)), None);
        assert_eq!(c.store().selected(), Some(id));
        assert_eq!(c.decorations()[0].position(), Point::new(10.0, 10.0));
        assert!(c.pending_persistence().is_empty());
    }

    #[test]
    fn handle_requires_selection() {
        let mut c = controller();
        let id = place(&mut c, Rect::new(10.0, 10.0, 50.0, 50.0));
        let result = c.pointer_down_on_handle(id, Handle::Resize, Point::new(60.0, 60.0));
        assert!(matches!(result, Err(EngineError::InteractionRefused(_))));
    }

    #[test]
    fn resize_is_clamped_and_square() {
        let mut c = controller();
        let id = place(&mut c, Rect::new(10.0, 10.0, 80.0, 40.0));
        c.store.select(Some(id));
        c.pointer_down_on_handle(id, Handle::Resize, Point::new(90.0, 50.0)).unwrap();
        c.pointer_up(Point::new(1000.0, 60.0));
        assert_eq!(c.decorations()[0].size(), Size::new(300.0, 300.0));

        c.pointer_down_on_handle(id, Handle::Resize, Point::new(300.0, 300.0)).unwrap();
        c.pointer_up(Point::new(0.0, 0.0));
        assert_eq!(c.decorations()[0].size(), Size::new(30.0, 30.0));
    }

    #[test]
    fn add_from_image_centers_and_scales() {
        let mut c = controller();
        let id = c
            .add_from_image("data:image/png;base64,AA", Size::new(400.0, 200.0), false)
            .unwrap();
        let d = c.store().find(ViewId::Calendar, id).unwrap();
        assert_eq!(d.size(), Size::new(80.0, 40.0));
        assert_eq!(d.position(), Point::new(460.0, 380.0));
        assert!(d.anchor.is_none());
        assert_eq!(c.pending_persistence().len(), 1);
    }

    #[test]
    fn add_from_image_rejects_empty_image() {
        let mut c = controller();
        assert!(c.add_from_image("x", Size::new(0.0, 10.0), false).is_err());
        assert!(c.decorations().is_empty());
    }

    #[test]
    fn add_from_image_anchors_to_nearest_day() {
        let mut c = controller();
        c.set_day_cells(vec![
            DayCell::new("2024-06-01", Rect::new(0.0, 0.0, 100.0, 100.0)),
            DayCell::new("2024-06-02", Rect::new(450.0, 350.0, 100.0, 100.0)),
        ]);
        let id = c.add_from_image("a", Size::new(80.0, 80.0), true).unwrap();
        let anchor = c.store().find(ViewId::Calendar, id).unwrap().anchor.clone().unwrap();
        assert_eq!(anchor.date.as_str(), "2024-06-02");
        assert_eq!((anchor.day_offset_x, anchor.day_offset_y), (10.0, 10.0));
    }

    #[test]
    fn pointer_down_refused_while_reloading() {
        let mut c = controller();
        let id = place(&mut c, Rect::new(10.0, 10.0, 50.0, 50.0));
        c.request_reload(ViewId::Calendar);
        assert!(!c.is_editing_enabled(ViewId::Calendar));
        let result = c.pointer_down_on_decoration(id, Point::new(20.0, 20.0));
        assert!(matches!(result, Err(EngineError::EditingDisabled(ViewId::Calendar))));
        c.pump_persistence();
        assert!(c.is_editing_enabled(ViewId::Calendar));
        c.pointer_down_on_decoration(id, Point::new(20.0, 20.0)).unwrap();
    }

    #[test]
    fn add_and_delete_refused_while_reloading() {
        let mut c = controller();
        let id = place(&mut c, Rect::new(10.0, 10.0, 50.0, 50.0));
        c.request_delete(id).unwrap();
        c.request_reload(ViewId::Calendar);

        assert!(matches!(c.confirm_delete(), Err(EngineError::EditingDisabled(_))));
        assert_eq!(c.pending_delete(), Some(id));
        assert!(matches!(
            c.add_from_image("b.png", Size::new(20.0, 20.0), false),
            Err(EngineError::EditingDisabled(ViewId::Calendar))
        ));
        assert!(matches!(c.request_delete(id), Err(EngineError::EditingDisabled(_))));
        assert!(
            c.pending_persistence()
                .iter()
                .all(|op| matches!(op, PersistOp::Reload { .. }))
        );

        c.pump_persistence();
        assert_eq!(c.confirm_delete().unwrap(), id);
        assert!(c.decorations().is_empty());
    }

    #[test]
    fn reload_commits_in_flight_drag_first() {
        let mut c = controller();
        let id = place(&mut c, Rect::new(10.0, 10.0, 50.0, 50.0));
        c.pointer_down_on_decoration(id, Point::new(10.0, 10.0)).unwrap();
        c.pointer_move(Point::new(200.0, 100.0));
        c.request_reload(ViewId::Calendar);
        assert!(!c.store().interaction().is_active());
        c.pump_persistence();
        assert_eq!(c.decorations()[0].position(), Point::new(200.0, 100.0));
    }

    #[test]
    fn cancel_delete_keeps_decoration() {
        let mut c = controller();
        let id = place(&mut c, Rect::new(10.0, 10.0, 50.0, 50.0));
        c.request_delete(id).unwrap();
        c.cancel_delete();
        assert!(matches!(c.confirm_delete(), Err(EngineError::NoPendingDelete)));
        assert_eq!(c.decorations().len(), 1);
    }
}
