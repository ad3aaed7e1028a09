use decor_core::{DecorationId, Point, Size, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Drag,
    Resize,
    Rotate,
}

/// The single global geometry-change slot. At most one decoration is being
/// dragged, resized or rotated at any time; input is assumed single-pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        id: DecorationId,
        /// Pointer position minus decoration origin at pointer-down.
        offset: Vector,
    },
    Resizing {
        id: DecorationId,
        start_pointer: Point,
        start_size: Size,
    },
    Rotating {
        id: DecorationId,
        /// Pointer angle around the center minus the rotation at pointer-down,
        /// in degrees.
        angle_offset: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionAction {
    Start(Interaction),
    Stop(InteractionMode),
    Clear,
}

impl Interaction {
    pub fn id(&self) -> Option<DecorationId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } | Self::Rotating { id, .. } => {
                Some(*id)
            }
        }
    }

    pub fn mode(&self) -> Option<InteractionMode> {
        match self {
            Self::Idle => None,
            Self::Dragging { .. } => Some(InteractionMode::Drag),
            Self::Resizing { .. } => Some(InteractionMode::Resize),
            Self::Rotating { .. } => Some(InteractionMode::Rotate),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Pure transition. Starting replaces whatever was in flight; stopping
    /// only ends an interaction of the named mode.
    pub fn reduce(self, action: InteractionAction) -> Interaction {
        match action {
            InteractionAction::Start(next) => next,
            InteractionAction::Stop(mode) if self.mode() == Some(mode) => Interaction::Idle,
            InteractionAction::Stop(_) => self,
            InteractionAction::Clear => Interaction::Idle,
        }
    }
}
