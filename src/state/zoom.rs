// Zoom scalar, animation lock and the threshold table
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;

pub fn clamp_zoom(z: f64) -> f64 {
    if z.is_nan() { MIN_ZOOM } else { z.clamp(MIN_ZOOM, MAX_ZOOM) }
}

/// Named zoom thresholds, in ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThresholdKind {
    NormalView,
    StartSlicing,
    ShowLabels,
    MaxDetail,
}

impl ThresholdKind {
    pub const ALL: [ThresholdKind; 4] = [
        ThresholdKind::NormalView,
        ThresholdKind::StartSlicing,
        ThresholdKind::ShowLabels,
        ThresholdKind::MaxDetail,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ThresholdKind::NormalView => "normalView",
            ThresholdKind::StartSlicing => "startSlicing",
            ThresholdKind::ShowLabels => "showLabels",
            ThresholdKind::MaxDetail => "maxDetail",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub normal_view: f64,
    pub start_slicing: f64,
    pub show_labels: f64,
    pub max_detail: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { normal_view: 1.0, start_slicing: 1.5, show_labels: 2.0, max_detail: 2.5 }
    }
}

impl Thresholds {
    pub fn value(&self, kind: ThresholdKind) -> f64 {
        match kind {
            ThresholdKind::NormalView => self.normal_view,
            ThresholdKind::StartSlicing => self.start_slicing,
            ThresholdKind::ShowLabels => self.show_labels,
            ThresholdKind::MaxDetail => self.max_detail,
        }
    }

    /// Thresholds crossed moving from `old` to `new`, ascending.
    pub fn crossed(&self, old: f64, new: f64) -> Vec<ThresholdKind> {
        ThresholdKind::ALL
            .into_iter()
            .filter(|k| {
                let t = self.value(*k);
                (old < t && t <= new) || (new < t && t <= old)
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ZoomState {
    /// Displayed zoom, interpolated while animating.
    pub current_zoom: f64,
    /// Last committed request.
    pub target_zoom: f64,
    pub is_animating: bool,
    pub thresholds: Thresholds,
}

impl ZoomState {
    pub fn new(thresholds: Thresholds) -> Self {
        let start = clamp_zoom(thresholds.normal_view);
        Self { current_zoom: start, target_zoom: start, is_animating: false, thresholds }
    }
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}
