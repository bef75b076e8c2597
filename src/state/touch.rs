// Pinch gesture state owned by the gesture tracker

/// A single touch point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
    /// Landed on a button or other element flagged as a UI control.
    pub on_control: bool,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, on_control: false }
    }

    pub fn control(x: f64, y: f64) -> Self {
        Self { x, y, on_control: true }
    }

    pub fn distance(&self, other: &TouchPoint) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

#[derive(Default, Debug, Clone)]
pub struct TouchState {
    pub is_pinching: bool,
    pub initial_distance: f64,
    pub base_zoom: f64,
    pub last_touch_time: f64,
}
