use std::collections::BTreeMap;

use tracing::debug;

use decor_core::{Decoration, DecorationId, DecorationPatch, Point, Size, Vector, ViewId};

use crate::interaction::{Interaction, InteractionAction, InteractionMode};

/// Single source of truth for decorations, partitioned by view.
///
/// Selection and the interaction slot always refer to decorations of the
/// active view. Operations addressed to one view never read or write
/// another view's collection.
#[derive(Debug)]
pub struct DecorationStore {
    active_view: ViewId,
    collections: BTreeMap<ViewId, Vec<Decoration>>,
    selected: Option<DecorationId>,
    interaction: Interaction,
}

impl Default for DecorationStore {
    fn default() -> Self {
        Self::new(ViewId::Calendar)
    }
}

impl DecorationStore {
    pub fn new(active_view: ViewId) -> Self {
        Self {
            active_view,
            collections: BTreeMap::new(),
            selected: None,
            interaction: Interaction::Idle,
        }
    }

    pub fn active_view(&self) -> ViewId {
        self.active_view
    }

    /// Changes the implicit target of [`Self::add_decoration`]. Selection and
    /// any in-flight interaction belong to the previous screen and are dropped.
    pub fn set_active_view(&mut self, view: ViewId) {
        if view != self.active_view {
            self.selected = None;
            self.interaction = Interaction::Idle;
        }
        self.active_view = view;
    }

    pub fn decorations(&self, view: ViewId) -> &[Decoration] {
        self.collections.get(&view).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, view: ViewId, id: DecorationId) -> Option<&Decoration> {
        self.decorations(view).iter().find(|d| d.id == id)
    }

    /// One above the highest z-index in the view, so new decorations paint
    /// on top.
    pub fn next_z_index(&self, view: ViewId) -> i64 {
        self.decorations(view)
            .iter()
            .map(|d| d.z_index)
            .max()
            .map_or(0, |z| z + 1)
    }

    pub fn replace_decorations(&mut self, view: ViewId, decorations: Vec<Decoration>) {
        if view == self.active_view {
            if let Some(id) = self.selected {
                if !decorations.iter().any(|d| d.id == id) {
                    self.selected = None;
                }
            }
            self.interaction = self.interaction.reduce(InteractionAction::Clear);
        }
        debug!(view = %view, count = decorations.len(), "Replaced decorations");
        self.collections.insert(view, decorations);
    }

    /// Appends to the active view. Returns false, leaving the store
    /// untouched, if the id is already present.
    pub fn add_decoration(&mut self, decoration: Decoration) -> bool {
        let collection = self.collections.entry(self.active_view).or_default();
        if collection.iter().any(|d| d.id == decoration.id) {
            debug!(view = %self.active_view, id = %decoration.id, "Ignoring duplicate add");
            return false;
        }
        collection.push(decoration);
        true
    }

    pub fn update_decoration(
        &mut self,
        view: ViewId,
        id: DecorationId,
        patch: &DecorationPatch,
    ) -> bool {
        let Some(decoration) = self
            .collections
            .get_mut(&view)
            .and_then(|c| c.iter_mut().find(|d| d.id == id))
        else {
            return false;
        };
        decoration.apply(patch);
        true
    }

    pub fn remove_decoration(&mut self, view: ViewId, id: DecorationId) -> Option<Decoration> {
        let collection = self.collections.get_mut(&view)?;
        let index = collection.iter().position(|d| d.id == id)?;
        let removed = collection.remove(index);
        if view == self.active_view {
            if self.selected == Some(id) {
                self.selected = None;
            }
            if self.interaction.id() == Some(id) {
                self.interaction = self.interaction.reduce(InteractionAction::Clear);
            }
        }
        Some(removed)
    }

    // ========================================================================
    // Selection & interaction
    // ========================================================================

    pub fn selected(&self) -> Option<DecorationId> {
        self.selected
    }

    pub fn select(&mut self, id: Option<DecorationId>) {
        self.selected = id;
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    fn start(&mut self, next: Interaction) {
        if let Some(id) = next.id() {
            self.selected = Some(id);
        }
        self.interaction = self.interaction.reduce(InteractionAction::Start(next));
    }

    pub fn start_drag(&mut self, id: DecorationId, offset: Vector) {
        self.start(Interaction::Dragging { id, offset });
    }

    pub fn start_resize(&mut self, id: DecorationId, start_pointer: Point, start_size: Size) {
        self.start(Interaction::Resizing {
            id,
            start_pointer,
            start_size,
        });
    }

    pub fn start_rotate(&mut self, id: DecorationId, angle_offset: f64) {
        self.start(Interaction::Rotating { id, angle_offset });
    }

    pub fn stop_drag(&mut self) {
        self.interaction = self.interaction.reduce(InteractionAction::Stop(InteractionMode::Drag));
    }

    pub fn stop_resize(&mut self) {
        self.interaction = self
            .interaction
            .reduce(InteractionAction::Stop(InteractionMode::Resize));
    }

    pub fn stop_rotate(&mut self) {
        self.interaction = self
            .interaction
            .reduce(InteractionAction::Stop(InteractionMode::Rotate));
    }

    pub fn clear_interaction(&mut self) {
        self.interaction = self.interaction.reduce(InteractionAction::Clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decor_core::Rect;

    fn deco(x: f64) -> Decoration {
        Decoration::new("data:image/png;base64,AA", Rect::new(x, 0.0, 40.0, 40.0), 0)
    }

    #[test]
    fn add_targets_active_view_only() {
        let mut store = DecorationStore::new(ViewId::Matrix);
        store.add_decoration(deco(1.0));
        assert_eq!(store.decorations(ViewId::Matrix).len(), 1);
        assert!(store.decorations(ViewId::Calendar).is_empty());

        store.set_active_view(ViewId::Calendar);
        store.add_decoration(deco(2.0));
        assert_eq!(store.decorations(ViewId::Matrix).len(), 1);
        assert_eq!(store.decorations(ViewId::Calendar).len(), 1);
    }

    #[test]
    fn duplicate_add_is_ignored() {
        let mut store = DecorationStore::default();
        let d = deco(1.0);
        assert!(store.add_decoration(d.clone()));
        let mut dup = d.clone();
        dup.x = 500.0;
        assert!(!store.add_decoration(dup));
        assert_eq!(store.decorations(ViewId::Calendar), &[d][..]);
    }

    #[test]
    fn update_and_remove_respect_view() {
        let mut store = DecorationStore::new(ViewId::Calendar);
        let d = deco(1.0);
        store.add_decoration(d.clone());

        let patch = DecorationPatch::position(Point::new(9.0, 9.0));
        assert!(!store.update_decoration(ViewId::Record, d.id, &patch));
        assert_eq!(store.remove_decoration(ViewId::Record, d.id), None);
        assert_eq!(store.find(ViewId::Calendar, d.id), Some(&d));

        assert!(store.update_decoration(ViewId::Calendar, d.id, &patch));
        assert_eq!(store.find(ViewId::Calendar, d.id).map(|d| d.x), Some(9.0));
    }

    #[test]
    fn removing_selected_clears_selection() {
        let mut store = DecorationStore::default();
        let d = deco(1.0);
        store.add_decoration(d.clone());
        store.start_drag(d.id, Vector::default());
        assert_eq!(store.selected(), Some(d.id));
        store.remove_decoration(ViewId::Calendar, d.id);
        assert_eq!(store.selected(), None);
        assert_eq!(store.interaction(), Interaction::Idle);
    }

    #[test]
    fn starting_interaction_selects_and_supersedes() {
        let mut store = DecorationStore::default();
        let a = deco(1.0);
        let b = deco(2.0);
        store.add_decoration(a.clone());
        store.add_decoration(b.clone());
        store.start_drag(a.id, Vector::default());
        store.start_rotate(b.id, 10.0);
        assert_eq!(store.selected(), Some(b.id));
        assert_eq!(store.interaction().id(), Some(b.id));

        store.stop_drag();
        assert!(store.interaction().is_active());
        store.stop_rotate();
        assert!(!store.interaction().is_active());
        assert_eq!(store.selected(), Some(b.id));
    }

    #[test]
    fn replace_drops_stale_selection() {
        let mut store = DecorationStore::default();
        let d = deco(1.0);
        store.add_decoration(d.clone());
        store.select(Some(d.id));
        store.replace_decorations(ViewId::Calendar, vec![deco(5.0)]);
        assert_eq!(store.selected(), None);
        assert_eq!(store.decorations(ViewId::Calendar).len(), 1);
    }

    #[test]
    fn next_z_index_tops_the_view() {
        let mut store = DecorationStore::default();
        assert_eq!(store.next_z_index(ViewId::Calendar), 0);
        let mut d = deco(0.0);
        d.z_index = 7;
        store.add_decoration(d);
        assert_eq!(store.next_z_index(ViewId::Calendar), 8);
        assert_eq!(store.next_z_index(ViewId::Matrix), 0);
    }
}
