//! Zoom controller: owns the zoom state, animates discrete steps, applies pinch
//! updates immediately and reports threshold crossings.

use yew::Callback;

use crate::config::ViewerConfig;
use crate::easing::Easing;
use crate::error::ConfigError;
use crate::gesture::GestureTracker;
use crate::state::{clamp_zoom, ThresholdKind, Thresholds, TouchPoint, ZoomState};

const ZOOM_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdCrossing {
    pub kind: ThresholdKind,
    /// The requested zoom that caused the crossing.
    pub zoom: f64,
}

#[derive(Clone, PartialEq)]
pub struct ZoomCallbacks {
    pub on_zoom_change: Callback<f64>,
    pub on_threshold_crossed: Callback<ThresholdCrossing>,
}

impl Default for ZoomCallbacks {
    fn default() -> Self {
        Self { on_zoom_change: Callback::noop(), on_threshold_crossed: Callback::noop() }
    }
}

#[derive(Debug, Clone, Copy)]
struct ZoomAnimation {
    from: f64,
    to: f64,
    start_ms: Option<f64>,
}

pub struct ZoomController {
    state: ZoomState,
    step: f64,
    duration_ms: f64,
    animation: Option<ZoomAnimation>,
    callbacks: ZoomCallbacks,
    last_tick_ms: Option<f64>,
    paused: bool,
    rebase_pending: bool,
}

fn same(a: f64, b: f64) -> bool {
    (a - b).abs() <= ZOOM_EPSILON
}

impl ZoomController {
    pub fn new(config: &ViewerConfig, callbacks: ZoomCallbacks) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: ZoomState::new(config.thresholds()),
            step: config.zoom_step,
            duration_ms: config.zoom_animation_ms,
            animation: None,
            callbacks,
            last_tick_ms: None,
            paused: false,
            rebase_pending: false,
        })
    }

    pub fn get_current_zoom(&self) -> f64 {
        self.state.current_zoom
    }

    pub fn target_zoom(&self) -> f64 {
        self.state.target_zoom
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.state.thresholds
    }

    pub fn state(&self) -> &ZoomState {
        &self.state
    }

    /// Requests a zoom level. Out-of-range values clamp silently.
    ///
    /// Crossings are computed against the last requested zoom and fire in
    /// ascending threshold order before the value is applied. With `animate`
    /// the change eases over the configured duration, replacing any running
    /// animation from the currently displayed value; without it the value is
    /// committed and reported immediately.
    pub fn set_zoom(&mut self, value: f64, animate: bool) {
        let clamped = clamp_zoom(value);
        let old = self.state.target_zoom;
        if same(clamped, old) && (animate || !self.state.is_animating) {
            return;
        }

        for kind in self.state.thresholds.crossed(old, clamped) {
            log::debug!("zoom crossed {} ({old:.2} -> {clamped:.2})", kind.label());
            self.callbacks.on_threshold_crossed.emit(ThresholdCrossing { kind, zoom: clamped });
        }
        self.state.target_zoom = clamped;

        if animate && !same(self.state.current_zoom, clamped) {
            self.animation = Some(ZoomAnimation { from: self.state.current_zoom, to: clamped, start_ms: None });
            self.state.is_animating = true;
            return;
        }

        self.animation = None;
        self.state.is_animating = false;
        if !same(self.state.current_zoom, clamped) {
            self.state.current_zoom = clamped;
            self.callbacks.on_zoom_change.emit(clamped);
        }
    }

    /// Ignored while an animation is running.
    pub fn zoom_in(&mut self) {
        if self.state.is_animating {
            return;
        }
        self.set_zoom(self.state.current_zoom + self.step, true);
    }

    /// Ignored while an animation is running.
    pub fn zoom_out(&mut self) {
        if self.state.is_animating {
            return;
        }
        self.set_zoom(self.state.current_zoom - self.step, true);
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(self.state.thresholds.normal_view, true);
    }

    /// Advances the running animation. The clock latches on the first tick.
    pub fn tick(&mut self, now_ms: f64) {
        if self.paused {
            return;
        }
        if self.rebase_pending {
            if let (Some(last), Some(anim)) = (self.last_tick_ms, self.animation.as_mut()) {
                if let Some(start) = anim.start_ms.as_mut() {
                    *start += (now_ms - last).max(0.0);
                }
            }
            self.rebase_pending = false;
        }
        self.last_tick_ms = Some(now_ms);

        let Some(anim) = self.animation.as_mut() else { return };
        let Some(start) = anim.start_ms else {
            anim.start_ms = Some(now_ms);
            return;
        };
        let p = if self.duration_ms <= 0.0 { 1.0 } else { ((now_ms - start) / self.duration_ms).clamp(0.0, 1.0) };
        let value = if p >= 1.0 {
            anim.to
        } else {
            anim.from + (anim.to - anim.from) * Easing::Decelerate.apply(p)
        };
        if p >= 1.0 {
            self.animation = None;
            self.state.is_animating = false;
        }
        self.state.current_zoom = value;
        self.callbacks.on_zoom_change.emit(value);
    }

    pub fn handle_touch_start(&mut self, gestures: &mut GestureTracker, touches: &[TouchPoint], time_ms: f64) {
        gestures.on_touch_start(touches, self.state.current_zoom, time_ms);
    }

    /// Applies a pinch update without animation. Returns whether zoom was requested.
    pub fn handle_touch_move(&mut self, gestures: &mut GestureTracker, touches: &[TouchPoint], time_ms: f64) -> bool {
        match gestures.on_touch_move(touches, time_ms) {
            Some(z) => {
                self.set_zoom(z, false);
                true
            }
            None => false,
        }
    }

    pub fn handle_touch_end(&mut self, gestures: &mut GestureTracker, remaining: usize, time_ms: f64) {
        gestures.on_touch_end(remaining, time_ms);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.rebase_pending = true;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Drops any in-flight animation and detaches listeners. Idempotent.
    pub fn destroy(&mut self) {
        self.animation = None;
        self.state.is_animating = false;
        self.state.target_zoom = self.state.current_zoom;
        self.paused = false;
        self.rebase_pending = false;
        self.last_tick_ms = None;
        self.callbacks = ZoomCallbacks::default();
    }
}
