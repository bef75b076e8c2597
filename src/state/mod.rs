pub mod animation;
pub mod status;
pub mod touch;
pub mod zoom;

pub use animation::{AnimationState, SlicePhase};
pub use status::{StatusAction, ViewerStatus};
pub use touch::{TouchPoint, TouchState};
pub use zoom::{clamp_zoom, ThresholdKind, Thresholds, ZoomState, MAX_ZOOM, MIN_ZOOM};
