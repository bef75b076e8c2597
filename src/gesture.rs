//! Two-finger pinch tracking.
//!
//! Converts touch sequences into absolute zoom requests relative to the zoom
//! captured when the pinch began. Events touching a UI control are ignored so
//! taps on overlay buttons never reach the zoom math.

use crate::state::{TouchPoint, TouchState};

#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    state: TouchState,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TouchState {
        &self.state
    }

    pub fn is_pinching(&self) -> bool {
        self.state.is_pinching
    }

    fn touches_control(touches: &[TouchPoint]) -> bool {
        touches.iter().any(|t| t.on_control)
    }

    /// Starts a pinch when exactly two points are down.
    pub fn on_touch_start(&mut self, touches: &[TouchPoint], current_zoom: f64, time_ms: f64) {
        if Self::touches_control(touches) {
            return;
        }
        self.state.last_touch_time = time_ms;
        if touches.len() != 2 {
            return;
        }
        let dist = touches[0].distance(&touches[1]).max(1.0);
        self.state.is_pinching = true;
        self.state.initial_distance = dist;
        self.state.base_zoom = current_zoom;
        log::debug!("pinch start: distance {dist:.1}px, base zoom {current_zoom:.2}");
    }

    /// Returns the requested zoom (`base_zoom * current / initial`) while pinching.
    pub fn on_touch_move(&mut self, touches: &[TouchPoint], time_ms: f64) -> Option<f64> {
        if !self.state.is_pinching || touches.len() < 2 || Self::touches_control(touches) {
            return None;
        }
        self.state.last_touch_time = time_ms;
        let dist = touches[0].distance(&touches[1]);
        let scale = dist / self.state.initial_distance;
        Some(self.state.base_zoom * scale)
    }

    /// `remaining` is the number of touches still down. The zoom is left where it is.
    pub fn on_touch_end(&mut self, remaining: usize, time_ms: f64) {
        self.state.last_touch_time = time_ms;
        if remaining < 2 && self.state.is_pinching {
            self.state.is_pinching = false;
            self.state.initial_distance = 0.0;
            log::debug!("pinch end");
        }
    }

    pub fn reset(&mut self) {
        self.state = TouchState::default();
    }
}
