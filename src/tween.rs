//! Tweening capability for part position animation.
//!
//! A host may inject its own engine; `FrameTweener` is the built-in manual
//! per-frame interpolator and is used whenever none is supplied.

use crate::easing::Easing;
use crate::model::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: Vec3,
    pub to: Vec3,
    pub duration_ms: f64,
    pub easing: Easing,
}

/// One sample of a running tween.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenFrame {
    pub id: TweenId,
    pub value: Vec3,
    /// Linear time fraction in [0, 1].
    pub progress: f64,
    pub finished: bool,
}

pub trait TweenEngine {
    /// Registers a tween. Its clock starts on the next `step`.
    fn start(&mut self, tween: Tween) -> TweenId;
    /// Samples every active tween at `now_ms`. A finished tween is reported
    /// once with `finished = true` and its exact target, then dropped.
    fn step(&mut self, now_ms: f64) -> Vec<TweenFrame>;
    fn cancel(&mut self, id: TweenId);
    /// Drops every tween and returns to the unpaused, unlatched state.
    fn reset(&mut self);
    /// Freezes all tweens; `step` returns nothing until `resume`.
    fn pause(&mut self);
    /// Continues frozen tweens from the progress they had at pause.
    fn resume(&mut self);
    fn active(&self) -> usize;
}

#[derive(Debug, Clone)]
struct Track {
    id: TweenId,
    tween: Tween,
    start_ms: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FrameTweener {
    tracks: Vec<Track>,
    next_id: u64,
    last_step_ms: Option<f64>,
    paused: bool,
    rebase_pending: bool,
}

impl FrameTweener {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TweenEngine for FrameTweener {
    fn start(&mut self, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tracks.push(Track { id, tween, start_ms: None });
        id
    }

    fn step(&mut self, now_ms: f64) -> Vec<TweenFrame> {
        if self.paused {
            return Vec::new();
        }
        if self.rebase_pending {
            if let Some(last) = self.last_step_ms {
                let gap = (now_ms - last).max(0.0);
                for t in self.tracks.iter_mut() {
                    if let Some(s) = t.start_ms.as_mut() {
                        *s += gap;
                    }
                }
            }
            self.rebase_pending = false;
        }
        self.last_step_ms = Some(now_ms);

        let mut frames = Vec::with_capacity(self.tracks.len());
        for track in self.tracks.iter_mut() {
            let start = *track.start_ms.get_or_insert(now_ms);
            let tw = track.tween;
            let progress = if tw.duration_ms <= 0.0 {
                1.0
            } else {
                ((now_ms - start) / tw.duration_ms).clamp(0.0, 1.0)
            };
            let finished = progress >= 1.0;
            let value = if finished { tw.to } else { tw.from.lerp(tw.to, tw.easing.apply(progress)) };
            frames.push(TweenFrame { id: track.id, value, progress, finished });
        }
        self.tracks.retain(|t| !frames.iter().any(|f| f.id == t.id && f.finished));
        frames
    }

    fn cancel(&mut self, id: TweenId) {
        self.tracks.retain(|t| t.id != id);
    }

    fn reset(&mut self) {
        self.tracks.clear();
        self.last_step_ms = None;
        self.paused = false;
        self.rebase_pending = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.rebase_pending = true;
        }
    }

    fn active(&self) -> usize {
        self.tracks.len()
    }
}
