// Slice/reassemble state machine data
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlicePhase {
    #[default]
    Assembled,
    Slicing,
    Sliced,
    Reassembling,
}

/// The boolean flags are derived from a single phase, so slicing and
/// reassembling can never be observed together.
#[derive(Debug, Clone, Default)]
pub struct AnimationState {
    pub phase: SlicePhase,
    pub animation_progress: f64,
    pub current_zoom_level: f64,
    pub labels_visible: bool,
    pub active_labels: BTreeSet<String>,
}

impl AnimationState {
    pub fn is_slicing(&self) -> bool {
        self.phase == SlicePhase::Slicing
    }

    pub fn is_sliced(&self) -> bool {
        self.phase == SlicePhase::Sliced
    }

    pub fn is_reassembling(&self) -> bool {
        self.phase == SlicePhase::Reassembling
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, SlicePhase::Slicing | SlicePhase::Reassembling)
    }
}

impl SlicePhase {
    pub fn label(self) -> &'static str {
        match self {
            SlicePhase::Assembled => "Assembled",
            SlicePhase::Slicing => "Slicing",
            SlicePhase::Sliced => "Sliced",
            SlicePhase::Reassembling => "Reassembling",
        }
    }
}
