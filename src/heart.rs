//! Heart slicing orchestrator.
//!
//! Turns zoom levels into the Assembled -> Slicing -> Sliced -> Reassembling
//! cycle, drives the explode animator and raises lifecycle events for the
//! education panels. Every entry point is safe to call at any time: before a
//! model is loaded, after `destroy`, or repeatedly with the same zoom.

use yew::Callback;

use crate::config::{DeviceProfile, ViewerConfig};
use crate::error::ConfigError;
use crate::explode::{ExplodeAnimator, ExplodeDirection};
use crate::model::{heart_parts, AnatomicalPart, ESSENTIAL_PART_IDS};
use crate::parts::{MappingStrategy, PartBindings, PartMapper};
use crate::scene::SceneTree;
use crate::state::{AnimationState, SlicePhase, Thresholds};
use crate::tween::TweenEngine;

/// Constrained devices keep at most this many animated parts.
pub const MAX_CONSTRAINED_PARTS: usize = 6;

#[derive(Clone, PartialEq)]
pub struct HeartCallbacks {
    pub on_slice_start: Callback<()>,
    /// `true` once the parts are fully separated, `false` once reassembled.
    pub on_slice_complete: Callback<bool>,
    pub on_reassemble_start: Callback<()>,
    pub on_label_show: Callback<String>,
    pub on_labels_hidden: Callback<()>,
}

impl Default for HeartCallbacks {
    fn default() -> Self {
        Self {
            on_slice_start: Callback::noop(),
            on_slice_complete: Callback::noop(),
            on_reassemble_start: Callback::noop(),
            on_label_show: Callback::noop(),
            on_labels_hidden: Callback::noop(),
        }
    }
}

pub struct HeartAnimationController<S: SceneTree> {
    config: ViewerConfig,
    device: DeviceProfile,
    thresholds: Thresholds,
    mapper: PartMapper,
    known_parts: Vec<AnatomicalPart>,
    /// Known parts plus any synthesized by a fallback mapping.
    parts: Vec<AnatomicalPart>,
    model: Option<S>,
    bindings: PartBindings,
    strategy: Option<MappingStrategy>,
    animator: ExplodeAnimator,
    state: AnimationState,
    /// The running transition was requested through a force trigger.
    forced: bool,
    paused: bool,
    interrupted: Option<SlicePhase>,
    callbacks: HeartCallbacks,
}

impl<S: SceneTree> HeartAnimationController<S> {
    pub fn new(config: &ViewerConfig, device: DeviceProfile, callbacks: HeartCallbacks) -> Result<Self, ConfigError> {
        config.validate()?;
        let tuned = config.tuned_for(&device);
        let animator = ExplodeAnimator::new(&tuned);
        Ok(Self::build(tuned, device, callbacks, animator))
    }

    /// Uses a host-provided tweening engine instead of the built-in interpolator.
    pub fn with_tween_engine(
        config: &ViewerConfig,
        device: DeviceProfile,
        callbacks: HeartCallbacks,
        engine: Box<dyn TweenEngine>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let tuned = config.tuned_for(&device);
        let animator = ExplodeAnimator::with_engine(&tuned, engine);
        Ok(Self::build(tuned, device, callbacks, animator))
    }

    fn build(config: ViewerConfig, device: DeviceProfile, callbacks: HeartCallbacks, animator: ExplodeAnimator) -> Self {
        let thresholds = config.thresholds();
        let known_parts = heart_parts();
        Self {
            mapper: PartMapper::new(&config),
            parts: known_parts.clone(),
            known_parts,
            state: AnimationState { current_zoom_level: thresholds.normal_view, ..Default::default() },
            thresholds,
            config,
            device,
            model: None,
            bindings: PartBindings::default(),
            strategy: None,
            animator,
            forced: false,
            paused: false,
            interrupted: None,
            callbacks,
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn model(&self) -> Option<&S> {
        self.model.as_ref()
    }

    pub fn bindings(&self) -> &PartBindings {
        &self.bindings
    }

    pub fn strategy(&self) -> Option<MappingStrategy> {
        self.strategy
    }

    /// Known parts followed by any synthesized for the current model.
    pub fn parts(&self) -> &[AnatomicalPart] {
        &self.parts
    }

    pub fn part(&self, id: &str) -> Option<&AnatomicalPart> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Binds the model's sub-objects to heart parts. `None` (asset failed to
    /// load) defers all mapping until a model arrives.
    pub fn initialize_heart_model(&mut self, model: Option<S>) {
        let Some(mut model) = model else {
            log::warn!("no heart model supplied; slicing deferred until one is loaded");
            return;
        };
        if self.model.is_some() {
            self.animator.reset();
            if self.paused {
                self.animator.pause();
            }
        }

        let mapping = self.mapper.resolve_parts(&mut model, &self.known_parts);
        self.bindings = mapping.bindings;
        self.strategy = mapping.strategy;
        self.parts = self.known_parts.iter().cloned().chain(mapping.synthetic_parts).collect();

        if self.device.is_constrained() && self.bindings.len() > MAX_CONSTRAINED_PARTS {
            let before = self.bindings.len();
            self.bindings.retain(|b| ESSENTIAL_PART_IDS.contains(&b.part_id.as_str()));
            log::info!("constrained device: pruned bindings {before} -> {}", self.bindings.len());
        }
        if self.bindings.is_empty() {
            log::warn!("no parts could be bound; running without slicing");
        }

        self.model = Some(model);
        self.state.phase = SlicePhase::Assembled;
        self.state.animation_progress = 0.0;
        self.state.labels_visible = false;
        self.state.active_labels.clear();
        self.forced = false;
        self.interrupted = None;
        self.apply_display_scale();
        if !self.paused {
            self.evaluate();
        }
    }

    /// Applies the zoom to the model root and advances the state machine.
    /// Safe to call every frame.
    pub fn handle_zoom_change(&mut self, zoom: f64) {
        self.state.current_zoom_level = zoom;
        self.apply_display_scale();
        if self.paused {
            return;
        }
        self.evaluate();
    }

    /// Advances the explode animation. Call once per frame.
    pub fn tick(&mut self, now_ms: f64) {
        if self.paused {
            return;
        }
        let Some(model) = self.model.as_mut() else { return };
        match self.animator.tick(now_ms, model) {
            Some(ExplodeDirection::Separate) => {
                self.state.phase = SlicePhase::Sliced;
                self.state.animation_progress = 1.0;
                log::debug!("slice complete");
                self.callbacks.on_slice_complete.emit(true);
                self.settle();
            }
            Some(ExplodeDirection::Reassemble) => {
                self.state.phase = SlicePhase::Assembled;
                self.state.animation_progress = 1.0;
                log::debug!("reassembly complete");
                self.callbacks.on_slice_complete.emit(false);
                self.settle();
            }
            None => {
                if self.animator.is_running() {
                    self.state.animation_progress = self.animator.progress();
                }
            }
        }
    }

    /// Separates the parts regardless of zoom. No-op when already sliced or slicing.
    pub fn force_slice(&mut self) {
        if !self.can_animate() || matches!(self.state.phase, SlicePhase::Sliced | SlicePhase::Slicing) {
            return;
        }
        self.forced = true;
        self.begin_slicing();
    }

    /// Reassembles regardless of zoom. No-op when already assembled or reassembling.
    pub fn force_reassemble(&mut self) {
        if !self.can_animate() || matches!(self.state.phase, SlicePhase::Assembled | SlicePhase::Reassembling) {
            return;
        }
        self.forced = true;
        self.begin_reassembly();
    }

    /// Freezes the running transition. While paused the in-progress flag reads
    /// cleared; the interrupted phase is restored on resume.
    pub fn pause_animations(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.animator.pause();
        if self.state.is_transitioning() {
            self.interrupted = Some(self.state.phase);
            self.state.phase = SlicePhase::Assembled;
        }
        log::info!("animations paused");
    }

    /// Continues a frozen transition from where it stopped, then reconciles
    /// with any zoom change that arrived meanwhile.
    pub fn resume_animations(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.animator.resume();
        match self.interrupted.take() {
            Some(phase) => self.state.phase = phase,
            None => self.evaluate(),
        }
        log::info!("animations resumed");
    }

    /// Cancels animation and releases the model and bindings. Idempotent.
    pub fn destroy(&mut self) {
        self.animator.reset();
        self.bindings.clear();
        self.parts = self.known_parts.clone();
        self.strategy = None;
        self.model = None;
        self.state = AnimationState::default();
        self.forced = false;
        self.paused = false;
        self.interrupted = None;
        self.callbacks = HeartCallbacks::default();
    }

    fn can_animate(&self) -> bool {
        self.model.is_some() && !self.bindings.is_empty() && !self.paused
    }

    fn apply_display_scale(&mut self) {
        let scale = self.config.base_scale * self.state.current_zoom_level;
        if let Some(model) = self.model.as_mut() {
            let root = model.root();
            model.set_scale(root, scale);
        }
    }

    /// Re-evaluates the transition table after a transition finishes. Forced
    /// transitions hold their result until the next zoom change.
    fn settle(&mut self) {
        if std::mem::take(&mut self.forced) {
            return;
        }
        self.evaluate();
    }

    fn evaluate(&mut self) {
        if self.model.is_none() || self.bindings.is_empty() {
            return;
        }
        let zoom = self.state.current_zoom_level;
        match self.state.phase {
            SlicePhase::Assembled => {
                if zoom >= self.thresholds.start_slicing && self.config.slicing_enabled {
                    self.begin_slicing();
                }
            }
            SlicePhase::Sliced => {
                if zoom < self.thresholds.start_slicing {
                    self.begin_reassembly();
                } else if zoom >= self.thresholds.show_labels {
                    self.show_labels();
                } else {
                    self.hide_labels();
                }
            }
            SlicePhase::Slicing | SlicePhase::Reassembling => {}
        }
    }

    fn begin_slicing(&mut self) {
        self.state.phase = SlicePhase::Slicing;
        self.state.animation_progress = 0.0;
        log::debug!("slicing {} parts at zoom {:.2}", self.bindings.len(), self.state.current_zoom_level);
        self.callbacks.on_slice_start.emit(());
        self.animator.explode(&self.bindings, &self.parts);
    }

    fn begin_reassembly(&mut self) {
        self.hide_labels();
        self.state.phase = SlicePhase::Reassembling;
        self.state.animation_progress = 0.0;
        log::debug!("reassembling at zoom {:.2}", self.state.current_zoom_level);
        self.callbacks.on_reassemble_start.emit(());
        self.animator.reassemble(&self.bindings);
    }

    fn show_labels(&mut self) {
        if self.state.labels_visible {
            return;
        }
        self.state.labels_visible = true;
        for id in self.bindings.ids() {
            self.state.active_labels.insert(id.clone());
            self.callbacks.on_label_show.emit(id);
        }
    }

    fn hide_labels(&mut self) {
        if !self.state.labels_visible {
            return;
        }
        self.state.labels_visible = false;
        self.state.active_labels.clear();
        self.callbacks.on_labels_hidden.emit(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vec3;
    use crate::scene::{demo_heart, Scene};
    use crate::tween::{Tween, TweenFrame, TweenId};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Ev {
        SliceStart,
        SliceComplete(bool),
        ReassembleStart,
        Label(String),
        LabelsHidden,
    }

    fn controller(device: DeviceProfile) -> (HeartAnimationController<Scene>, Rc<RefCell<Vec<Ev>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let push = |f: fn(&mut Vec<Ev>)| {
            let events = events.clone();
            Callback::from(move |_: ()| f(&mut events.borrow_mut()))
        };
        let callbacks = HeartCallbacks {
            on_slice_start: push(|e| e.push(Ev::SliceStart)),
            on_reassemble_start: push(|e| e.push(Ev::ReassembleStart)),
            on_labels_hidden: push(|e| e.push(Ev::LabelsHidden)),
            on_slice_complete: {
                let events = events.clone();
                Callback::from(move |s| events.borrow_mut().push(Ev::SliceComplete(s)))
            },
            on_label_show: {
                let events = events.clone();
                Callback::from(move |id| events.borrow_mut().push(Ev::Label(id)))
            },
        };
        let hc = HeartAnimationController::new(&ViewerConfig::default(), device, callbacks).unwrap();
        (hc, events)
    }

    fn run(hc: &mut HeartAnimationController<Scene>, from: f64, to: f64) {
        let mut t = from;
        while t <= to {
            hc.tick(t);
            t += 16.0;
        }
    }

    fn sliced(hc: &mut HeartAnimationController<Scene>) {
        hc.initialize_heart_model(Some(demo_heart()));
        hc.handle_zoom_change(1.6);
        run(hc, 0.0, 1600.0);
        assert_eq!(hc.state().phase, SlicePhase::Sliced);
    }

    #[test]
    fn zoom_before_model_is_harmless() {
        let (mut hc, events) = controller(DeviceProfile::full());
        hc.handle_zoom_change(2.4);
        hc.tick(0.0);
        hc.force_slice();
        assert_eq!(hc.state().phase, SlicePhase::Assembled);
        assert!(events.borrow().is_empty());
        hc.initialize_heart_model(None);
        assert!(hc.model().is_none());
    }

    #[test]
    fn model_loaded_after_zooming_slices_immediately() {
        let (mut hc, events) = controller(DeviceProfile::full());
        hc.handle_zoom_change(1.8);
        hc.initialize_heart_model(Some(demo_heart()));
        assert_eq!(hc.state().phase, SlicePhase::Slicing);
        assert_eq!(events.borrow()[0], Ev::SliceStart);
    }

    #[test]
    fn repeated_zoom_ticks_do_not_restart() {
        let (mut hc, events) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(demo_heart()));
        for z in [1.5, 1.55, 1.6, 1.6, 1.7] {
            hc.handle_zoom_change(z);
        }
        assert_eq!(events.borrow().iter().filter(|e| **e == Ev::SliceStart).count(), 1);
        assert!(hc.state().is_slicing());
        assert!(!hc.state().is_sliced());
    }

    #[test]
    fn labels_follow_the_label_threshold_while_sliced() {
        let (mut hc, events) = controller(DeviceProfile::full());
        sliced(&mut hc);
        events.borrow_mut().clear();
        hc.handle_zoom_change(2.1);
        assert!(hc.state().labels_visible);
        assert_eq!(hc.state().active_labels.len(), hc.bindings().len());
        let shown = events.borrow().iter().filter(|e| matches!(e, Ev::Label(_))).count();
        assert_eq!(shown, hc.bindings().len());
        hc.handle_zoom_change(2.2);
        assert_eq!(events.borrow().len(), shown);
        hc.handle_zoom_change(1.9);
        assert!(!hc.state().labels_visible);
        assert!(hc.state().active_labels.is_empty());
        assert_eq!(events.borrow().last(), Some(&Ev::LabelsHidden));
        assert!(hc.state().is_sliced());
    }

    #[test]
    fn labels_show_when_slicing_finishes_past_label_threshold() {
        let (mut hc, _) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(demo_heart()));
        hc.handle_zoom_change(2.3);
        assert!(!hc.state().labels_visible);
        run(&mut hc, 0.0, 1600.0);
        assert!(hc.state().labels_visible);
    }

    #[test]
    fn zooming_out_mid_slice_reassembles_after_completion() {
        let (mut hc, events) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(demo_heart()));
        hc.handle_zoom_change(1.6);
        run(&mut hc, 0.0, 500.0);
        hc.handle_zoom_change(1.0);
        assert!(hc.state().is_slicing());
        run(&mut hc, 516.0, 1600.0);
        assert!(hc.state().is_reassembling());
        run(&mut hc, 1616.0, 3400.0);
        assert_eq!(hc.state().phase, SlicePhase::Assembled);
        assert_eq!(
            *events.borrow(),
            vec![Ev::SliceStart, Ev::SliceComplete(true), Ev::ReassembleStart, Ev::SliceComplete(false)]
        );
    }

    #[test]
    fn force_triggers_ignore_zoom_and_hold() {
        let (mut hc, events) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(demo_heart()));
        hc.force_slice();
        hc.force_slice();
        assert!(hc.state().is_slicing());
        run(&mut hc, 0.0, 1600.0);
        // Zoom is still 1.0, but the forced result holds.
        assert!(hc.state().is_sliced());
        hc.force_slice();
        assert_eq!(events.borrow().iter().filter(|e| **e == Ev::SliceStart).count(), 1);

        hc.force_reassemble();
        run(&mut hc, 2000.0, 3600.0);
        assert_eq!(hc.state().phase, SlicePhase::Assembled);
        hc.force_reassemble();
        assert_eq!(hc.state().phase, SlicePhase::Assembled);
        let lv = hc.bindings().get("left_ventricle").unwrap();
        let model = hc.model().unwrap();
        assert!(model.position(lv.node).approx_eq(lv.original_local_position, 1e-9));
    }

    #[test]
    fn disabled_slicing_still_allows_forcing() {
        let cfg = ViewerConfig { slicing_enabled: false, ..Default::default() };
        let mut hc: HeartAnimationController<Scene> =
            HeartAnimationController::new(&cfg, DeviceProfile::full(), HeartCallbacks::default()).unwrap();
        hc.initialize_heart_model(Some(demo_heart()));
        hc.handle_zoom_change(2.0);
        assert_eq!(hc.state().phase, SlicePhase::Assembled);
        hc.force_slice();
        assert!(hc.state().is_slicing());
    }

    #[test]
    fn pause_clears_flag_and_resume_continues() {
        let (mut hc, events) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(demo_heart()));
        hc.handle_zoom_change(1.6);
        run(&mut hc, 0.0, 600.0);
        let progress = hc.state().animation_progress;
        assert!(progress > 0.0 && progress < 1.0);

        hc.pause_animations();
        assert!(!hc.state().is_slicing());
        assert!(!hc.state().is_reassembling());
        hc.tick(700.0);
        hc.handle_zoom_change(1.7);
        assert_eq!(hc.state().animation_progress, progress);
        assert_eq!(events.borrow().len(), 1);

        hc.resume_animations();
        assert!(hc.state().is_slicing());
        hc.tick(20_000.0);
        assert!((hc.state().animation_progress - progress).abs() < 1e-9);
        run(&mut hc, 20_016.0, 21_200.0);
        assert!(hc.state().is_sliced());
        assert_eq!(events.borrow().iter().filter(|e| **e == Ev::SliceStart).count(), 1);
    }

    #[test]
    fn zoom_change_during_pause_is_reconciled_on_resume() {
        let (mut hc, _) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(demo_heart()));
        hc.pause_animations();
        hc.handle_zoom_change(1.8);
        assert_eq!(hc.state().phase, SlicePhase::Assembled);
        hc.resume_animations();
        assert!(hc.state().is_slicing());
    }

    #[test]
    fn flags_are_never_contradictory() {
        let (mut hc, _) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(demo_heart()));
        let zooms = [1.0, 1.6, 2.2, 1.4, 1.9, 2.6, 0.8, 1.5];
        let mut t = 0.0;
        for z in zooms {
            hc.handle_zoom_change(z);
            for _ in 0..40 {
                hc.tick(t);
                t += 16.0;
                let s = hc.state();
                assert!(!(s.is_slicing() && s.is_reassembling()));
                assert!(!(s.is_sliced() && s.is_slicing()));
                assert!(!s.labels_visible || s.is_sliced());
            }
        }
    }

    #[test]
    fn display_scale_follows_zoom() {
        let (mut hc, _) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(demo_heart()));
        hc.handle_zoom_change(1.3);
        let model = hc.model().unwrap();
        assert_eq!(model.scale(model.root()), 1.3);
    }

    #[test]
    fn constrained_device_prunes_to_essentials_and_shortens_animation() {
        let (mut hc, _) = controller(DeviceProfile::constrained());
        hc.initialize_heart_model(Some(demo_heart()));
        let mut ids = hc.bindings().ids();
        ids.sort();
        let mut expected: Vec<String> = ESSENTIAL_PART_IDS.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(ids, expected);
        hc.handle_zoom_change(1.6);
        run(&mut hc, 0.0, 1216.0);
        assert!(hc.state().is_sliced());
    }

    #[test]
    fn model_without_meshes_degrades_to_zoom_only() {
        let (mut hc, events) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(Scene::new("empty")));
        hc.handle_zoom_change(2.5);
        run(&mut hc, 0.0, 2000.0);
        assert_eq!(hc.state().phase, SlicePhase::Assembled);
        assert!(events.borrow().is_empty());
        assert_eq!(hc.model().unwrap().scale(hc.model().unwrap().root()), 2.5);
    }

    #[test]
    fn fallback_parts_slice_with_synthetic_offsets() {
        let (mut hc, _) = controller(DeviceProfile::full());
        let mut scene = Scene::new("scan");
        let root = scene.root();
        let tiny = Vec3::new(0.01, 0.01, 0.01);
        scene.add_mesh(root, "", Vec3::new(-1.0, -1.0, 0.0), tiny);
        scene.add_mesh(root, "", Vec3::new(1.0, 1.0, 0.0), tiny);
        hc.initialize_heart_model(Some(scene));
        assert_eq!(hc.strategy(), Some(MappingStrategy::VirtualGroup));
        hc.handle_zoom_change(1.6);
        run(&mut hc, 0.0, 1600.0);
        let b = hc.bindings().get("virtual_part_0").unwrap();
        let pos = hc.model().unwrap().position(b.node);
        assert!(pos.approx_eq(Vec3::new(-0.3, 0.0, 0.0), 1e-9));
    }

    #[test]
    fn separation_distance_applies_once_to_fallback_offsets() {
        for (cfg, device, expected) in [
            (ViewerConfig { separation_distance: 0.6, ..Default::default() }, DeviceProfile::full(), -0.6),
            (ViewerConfig::default(), DeviceProfile::constrained(), -0.27),
        ] {
            let mut hc: HeartAnimationController<Scene> =
                HeartAnimationController::new(&cfg, device, HeartCallbacks::default()).unwrap();
            let mut scene = Scene::new("scan");
            let root = scene.root();
            let tiny = Vec3::new(0.01, 0.01, 0.01);
            scene.add_mesh(root, "", Vec3::new(-1.0, -1.0, 0.0), tiny);
            scene.add_mesh(root, "", Vec3::new(1.0, 1.0, 0.0), tiny);
            hc.initialize_heart_model(Some(scene));
            hc.handle_zoom_change(1.6);
            run(&mut hc, 0.0, 1600.0);
            let b = hc.bindings().get("virtual_part_0").unwrap();
            let pos = hc.model().unwrap().position(b.node);
            assert!(pos.approx_eq(Vec3::new(expected, 0.0, 0.0), 1e-9), "{pos:?}");
        }
    }

    #[test]
    fn controller_is_reusable_after_destroy_while_paused() {
        let (mut hc, _) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(demo_heart()));
        hc.handle_zoom_change(1.6);
        run(&mut hc, 0.0, 400.0);
        hc.pause_animations();
        hc.destroy();
        assert!(!hc.is_paused());

        hc.initialize_heart_model(Some(demo_heart()));
        hc.handle_zoom_change(1.6);
        assert!(hc.state().is_slicing());
        run(&mut hc, 5_000.0, 6_600.0);
        assert_eq!(hc.state().phase, SlicePhase::Sliced);
    }

    #[test]
    fn model_reloaded_while_paused_slices_after_resume() {
        let (mut hc, _) = controller(DeviceProfile::full());
        hc.initialize_heart_model(Some(demo_heart()));
        hc.pause_animations();
        hc.initialize_heart_model(Some(demo_heart()));
        assert!(hc.is_paused());
        hc.handle_zoom_change(1.6);
        hc.tick(100.0);
        assert_eq!(hc.state().phase, SlicePhase::Assembled);

        hc.resume_animations();
        assert!(hc.state().is_slicing());
        run(&mut hc, 1_000.0, 2_600.0);
        assert_eq!(hc.state().phase, SlicePhase::Sliced);
    }

    /// Engine that lands every tween on its target at the first step.
    #[derive(Default)]
    struct InstantTweener {
        queued: Vec<(TweenId, Tween)>,
        started: Rc<RefCell<usize>>,
        next_id: u64,
        paused: bool,
    }

    impl TweenEngine for InstantTweener {
        fn start(&mut self, tween: Tween) -> TweenId {
            let id = TweenId(self.next_id);
            self.next_id += 1;
            *self.started.borrow_mut() += 1;
            self.queued.push((id, tween));
            id
        }

        fn step(&mut self, _now_ms: f64) -> Vec<TweenFrame> {
            if self.paused {
                return Vec::new();
            }
            self.queued
                .drain(..)
                .map(|(id, tw)| TweenFrame { id, value: tw.to, progress: 1.0, finished: true })
                .collect()
        }

        fn cancel(&mut self, id: TweenId) {
            self.queued.retain(|(q, _)| *q != id);
        }

        fn reset(&mut self) {
            self.queued.clear();
            self.paused = false;
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn active(&self) -> usize {
            self.queued.len()
        }
    }

    #[test]
    fn injected_engine_drives_both_directions() {
        let started = Rc::new(RefCell::new(0));
        let engine = InstantTweener { started: started.clone(), ..Default::default() };
        let mut hc: HeartAnimationController<Scene> = HeartAnimationController::with_tween_engine(
            &ViewerConfig::default(),
            DeviceProfile::full(),
            HeartCallbacks::default(),
            Box::new(engine),
        )
        .unwrap();
        hc.initialize_heart_model(Some(demo_heart()));
        let bound = hc.bindings().len();

        hc.force_slice();
        assert!(hc.state().is_slicing());
        hc.tick(0.0);
        assert_eq!(hc.state().phase, SlicePhase::Sliced);
        assert_eq!(*started.borrow(), bound);
        for b in hc.bindings().iter() {
            let offset = hc.part(&b.part_id).unwrap().exploded_offset;
            let pos = hc.model().unwrap().position(b.node);
            assert!(pos.approx_eq(b.original_local_position + offset, 1e-12));
        }

        // Zoom 1.0 is below the slicing threshold, so the next change reassembles.
        hc.handle_zoom_change(1.0);
        assert!(hc.state().is_reassembling());
        hc.tick(16.0);
        assert_eq!(hc.state().phase, SlicePhase::Assembled);
        assert_eq!(*started.borrow(), bound * 2);
        for b in hc.bindings().iter() {
            assert_eq!(hc.model().unwrap().position(b.node), b.original_local_position);
        }
    }

    #[test]
    fn destroy_is_idempotent_and_final() {
        let (mut hc, events) = controller(DeviceProfile::full());
        sliced(&mut hc);
        events.borrow_mut().clear();
        hc.destroy();
        hc.destroy();
        assert!(hc.model().is_none());
        assert!(hc.bindings().is_empty());
        assert_eq!(hc.state().phase, SlicePhase::Assembled);
        hc.handle_zoom_change(1.0);
        hc.tick(5_000.0);
        assert!(events.borrow().is_empty());
    }
}
