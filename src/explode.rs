//! Reversible exploded-view animation over bound parts.
//!
//! Every part gets its own tween on the shared frame clock; an operation
//! completes on the tick where the last of them finishes. State discipline
//! (no explode while sliced, and so on) belongs to the caller.

use std::collections::HashMap;

use crate::config::ViewerConfig;
use crate::easing::Easing;
use crate::model::{AnatomicalPart, Vec3};
use crate::parts::PartBindings;
use crate::scene::{NodeId, SceneTree};
use crate::tween::{FrameTweener, Tween, TweenEngine, TweenId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplodeDirection {
    Separate,
    Reassemble,
}

#[derive(Debug, Clone)]
struct PartTrack {
    part_id: String,
    node: NodeId,
    tween: TweenId,
    progress: f64,
    finished: bool,
}

pub struct ExplodeAnimator {
    engine: Box<dyn TweenEngine>,
    duration_ms: f64,
    easing: Easing,
    offset_scale: f64,
    tracks: Vec<PartTrack>,
    /// Last position written per part.
    positions: HashMap<String, Vec3>,
    direction: Option<ExplodeDirection>,
    pending: usize,
    paused: bool,
}

impl ExplodeAnimator {
    /// Uses the built-in per-frame interpolator.
    pub fn new(config: &ViewerConfig) -> Self {
        Self::with_engine(config, Box::new(FrameTweener::new()))
    }

    pub fn with_engine(config: &ViewerConfig, engine: Box<dyn TweenEngine>) -> Self {
        Self {
            engine,
            duration_ms: config.explode_duration_ms,
            easing: config.easing,
            offset_scale: config.offset_scale(),
            tracks: Vec::new(),
            positions: HashMap::new(),
            direction: None,
            pending: 0,
            paused: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.direction.is_some()
    }

    /// Time fraction of the running operation, limited by its slowest part.
    pub fn progress(&self) -> f64 {
        if self.direction.is_none() {
            return 1.0;
        }
        self.tracks
            .iter()
            .map(|t| if t.finished { 1.0 } else { t.progress })
            .fold(1.0, f64::min)
    }

    /// Moves every bound part to `rest + exploded_offset`.
    pub fn explode(&mut self, bindings: &PartBindings, parts: &[AnatomicalPart]) {
        let targets = bindings
            .iter()
            .map(|b| {
                let offset = match parts.iter().find(|p| p.id == b.part_id) {
                    Some(p) => p.exploded_offset * self.offset_scale,
                    None => {
                        log::warn!("no part definition for {}, leaving it in place", b.part_id);
                        Vec3::ZERO
                    }
                };
                (b.part_id.clone(), b.node, b.original_local_position, b.original_local_position + offset)
            })
            .collect();
        self.launch(ExplodeDirection::Separate, targets);
    }

    /// Returns every bound part to its captured rest position.
    pub fn reassemble(&mut self, bindings: &PartBindings) {
        let targets = bindings
            .iter()
            .map(|b| (b.part_id.clone(), b.node, b.original_local_position, b.original_local_position))
            .collect();
        self.launch(ExplodeDirection::Reassemble, targets);
    }

    fn launch(&mut self, direction: ExplodeDirection, targets: Vec<(String, NodeId, Vec3, Vec3)>) {
        self.cancel();
        for (part_id, node, rest, to) in targets {
            let from = self.positions.get(&part_id).copied().unwrap_or(rest);
            let tween = self.engine.start(Tween { from, to, duration_ms: self.duration_ms, easing: self.easing });
            self.tracks.push(PartTrack { part_id, node, tween, progress: 0.0, finished: false });
        }
        self.pending = self.tracks.len();
        self.direction = Some(direction);
        log::debug!("{direction:?} started for {} parts", self.pending);
    }

    /// Writes interpolated positions into the model. Returns the direction of
    /// an operation that completed on this tick.
    pub fn tick<S: SceneTree>(&mut self, now_ms: f64, model: &mut S) -> Option<ExplodeDirection> {
        if self.paused {
            return None;
        }
        self.direction?;
        for frame in self.engine.step(now_ms) {
            let Some(track) = self.tracks.iter_mut().find(|t| t.tween == frame.id) else { continue };
            model.set_position(track.node, frame.value);
            self.positions.insert(track.part_id.clone(), frame.value);
            track.progress = frame.progress;
            if frame.finished && !track.finished {
                track.finished = true;
                self.pending -= 1;
            }
        }
        if self.pending > 0 {
            return None;
        }
        self.tracks.clear();
        self.direction.take()
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.engine.pause();
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.engine.resume();
        }
    }

    /// Stops the running operation; parts stay where they were last written.
    pub fn cancel(&mut self) {
        for t in self.tracks.drain(..) {
            self.engine.cancel(t.tween);
        }
        self.pending = 0;
        self.direction = None;
    }

    /// Cancels and forgets all written positions.
    pub fn reset(&mut self) {
        self.cancel();
        self.engine.reset();
        self.positions.clear();
        self.paused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::heart_parts;
    use crate::parts::PartMapper;
    use crate::scene::demo_heart;

    fn frames(anim: &mut ExplodeAnimator, scene: &mut crate::scene::Scene, from: f64, to: f64) -> Option<ExplodeDirection> {
        let mut t = from;
        let mut done = None;
        while t <= to {
            if let Some(d) = anim.tick(t, scene) {
                done = Some(d);
            }
            t += 16.0;
        }
        done
    }

    #[test]
    fn explode_then_reassemble_round_trips() {
        let mut scene = demo_heart();
        let parts = heart_parts();
        let bindings = PartMapper::default().resolve_parts(&mut scene, &parts).bindings;
        let mut anim = ExplodeAnimator::new(&ViewerConfig::default());

        anim.explode(&bindings, &parts);
        assert_eq!(frames(&mut anim, &mut scene, 0.0, 1600.0), Some(ExplodeDirection::Separate));
        for b in bindings.iter() {
            let part = parts.iter().find(|p| p.id == b.part_id).unwrap();
            assert!(scene.position(b.node).approx_eq(b.original_local_position + part.exploded_offset, 1e-9));
        }

        anim.reassemble(&bindings);
        assert_eq!(frames(&mut anim, &mut scene, 2000.0, 3600.0), Some(ExplodeDirection::Reassemble));
        for b in bindings.iter() {
            assert!(scene.position(b.node).approx_eq(b.original_local_position, 1e-9));
        }
    }

    #[test]
    fn completes_only_when_every_part_is_done() {
        let mut scene = demo_heart();
        let parts = heart_parts();
        let bindings = PartMapper::default().resolve_parts(&mut scene, &parts).bindings;
        let mut anim = ExplodeAnimator::new(&ViewerConfig::default());
        anim.explode(&bindings, &parts);
        assert_eq!(anim.tick(0.0, &mut scene), None);
        assert_eq!(anim.tick(1000.0, &mut scene), None);
        assert!(anim.progress() > 0.6 && anim.progress() < 0.7);
        assert!(anim.is_running());
        assert_eq!(anim.tick(1500.0, &mut scene), Some(ExplodeDirection::Separate));
        assert!(!anim.is_running());
        assert_eq!(anim.tick(1600.0, &mut scene), None);
    }

    #[test]
    fn reversal_mid_flight_is_continuous() {
        let mut scene = demo_heart();
        let parts = heart_parts();
        let bindings = PartMapper::default().resolve_parts(&mut scene, &parts).bindings;
        let mut anim = ExplodeAnimator::new(&ViewerConfig::default());
        anim.explode(&bindings, &parts);
        anim.tick(0.0, &mut scene);
        anim.tick(500.0, &mut scene);
        let aorta = bindings.get("aorta").unwrap();
        let mid = scene.position(aorta.node);
        anim.reassemble(&bindings);
        anim.tick(600.0, &mut scene);
        assert!(scene.position(aorta.node).approx_eq(mid, 1e-12));
        assert_eq!(frames(&mut anim, &mut scene, 700.0, 2200.0), Some(ExplodeDirection::Reassemble));
        assert!(scene.position(aorta.node).approx_eq(aorta.original_local_position, 1e-12));
    }

    #[test]
    fn empty_binding_set_completes_on_next_tick() {
        let mut scene = demo_heart();
        let mut anim = ExplodeAnimator::new(&ViewerConfig::default());
        anim.explode(&PartBindings::default(), &[]);
        assert_eq!(anim.tick(0.0, &mut scene), Some(ExplodeDirection::Separate));
    }

    #[test]
    fn separation_distance_scales_offsets() {
        let mut scene = demo_heart();
        let parts = heart_parts();
        let bindings = PartMapper::default().resolve_parts(&mut scene, &parts).bindings;
        let cfg = ViewerConfig { separation_distance: 0.6, explode_duration_ms: 100.0, ..Default::default() };
        let mut anim = ExplodeAnimator::new(&cfg);
        anim.explode(&bindings, &parts);
        frames(&mut anim, &mut scene, 0.0, 200.0);
        let lv = bindings.get("left_ventricle").unwrap();
        let offset = parts.iter().find(|p| p.id == "left_ventricle").unwrap().exploded_offset;
        assert!(scene.position(lv.node).approx_eq(lv.original_local_position + offset * 2.0, 1e-9));
    }

    #[test]
    fn pause_holds_positions() {
        let mut scene = demo_heart();
        let parts = heart_parts();
        let bindings = PartMapper::default().resolve_parts(&mut scene, &parts).bindings;
        let mut anim = ExplodeAnimator::new(&ViewerConfig::default());
        anim.explode(&bindings, &parts);
        anim.tick(0.0, &mut scene);
        anim.tick(300.0, &mut scene);
        let node = bindings.get("septum").unwrap().node;
        let held = scene.position(node);
        anim.pause();
        assert_eq!(anim.tick(900.0, &mut scene), None);
        assert_eq!(scene.position(node), held);
        anim.resume();
        anim.tick(5_000.0, &mut scene);
        assert!(scene.position(node).approx_eq(held, 1e-12));
        assert_eq!(anim.tick(6_200.0, &mut scene), Some(ExplodeDirection::Separate));
    }
}
