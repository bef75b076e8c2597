// Snapshot of the viewer session shown by the overlay panels
use std::rc::Rc;

use yew::Reducible;

use super::{SlicePhase, ThresholdKind};
use crate::model::AnatomicalPart;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerStatus {
    pub zoom: f64,
    pub phase: SlicePhase,
    pub progress: f64,
    /// Part ids whose labels are showing, in the order they were announced.
    pub labels: Vec<String>,
    pub last_crossing: Option<ThresholdKind>,
    pub paused: bool,
    pub strategy: Option<&'static str>,
    /// Every part the current model can show, synthetic ones included.
    pub parts: Vec<AnatomicalPart>,
    pub bound_parts: usize,
}

impl ViewerStatus {
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            phase: SlicePhase::Assembled,
            progress: 0.0,
            labels: Vec::new(),
            last_crossing: None,
            paused: false,
            strategy: None,
            parts: Vec::new(),
            bound_parts: 0,
        }
    }

    pub fn is_sliced(&self) -> bool {
        self.phase == SlicePhase::Sliced
    }

    pub fn part(&self, id: &str) -> Option<&AnatomicalPart> {
        self.parts.iter().find(|p| p.id == id)
    }
}

pub enum StatusAction {
    Zoom(f64),
    Crossed(ThresholdKind),
    SliceStarted,
    ReassembleStarted,
    /// `true` when the parts finished separating.
    SliceCompleted(bool),
    Progress(f64),
    LabelShown(String),
    LabelsHidden,
    Paused(bool),
    ModelBound { strategy: Option<&'static str>, parts: Vec<AnatomicalPart>, bound: usize },
}

impl Reducible for ViewerStatus {
    type Action = StatusAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use StatusAction::*;
        let mut new = (*self).clone();
        match action {
            Zoom(z) => new.zoom = z,
            Crossed(kind) => new.last_crossing = Some(kind),
            SliceStarted => {
                new.phase = SlicePhase::Slicing;
                new.progress = 0.0;
            }
            ReassembleStarted => {
                new.phase = SlicePhase::Reassembling;
                new.progress = 0.0;
                new.labels.clear();
            }
            SliceCompleted(sliced) => {
                new.phase = if sliced { SlicePhase::Sliced } else { SlicePhase::Assembled };
                new.progress = 1.0;
            }
            Progress(p) => new.progress = p.clamp(0.0, 1.0),
            LabelShown(id) => {
                if !new.labels.contains(&id) {
                    new.labels.push(id);
                }
            }
            LabelsHidden => new.labels.clear(),
            Paused(p) => new.paused = p,
            ModelBound { strategy, parts, bound } => {
                new.strategy = strategy;
                new.parts = parts;
                new.bound_parts = bound;
                new.labels.clear();
            }
        }
        Rc::new(new)
    }
}
