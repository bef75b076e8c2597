//! Easing curves shared by zoom and explode animations.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Easing {
    Linear,
    /// Cubic ease-out: fast start, settles gently.
    #[default]
    Decelerate,
    /// Cubic ease-in.
    Accelerate,
    /// Cubic ease-in-out.
    Standard,
}

impl Easing {
    /// Maps a time fraction to an eased fraction. Input is clamped to [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let p = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => p,
            Easing::Decelerate => 1.0 - (1.0 - p).powi(3),
            Easing::Accelerate => p * p * p,
            Easing::Standard => {
                if p < 0.5 {
                    4.0 * p * p * p
                } else {
                    1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}
