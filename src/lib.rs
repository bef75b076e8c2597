//! Zoom-driven exploded-view heart viewer.
//!
//! The core (zoom, gestures, part mapping, explode animation, slicing state
//! machine) is frame driven and independent of the browser; `components`
//! wires it into a Yew page.

pub mod components;
pub mod config;
pub mod easing;
pub mod error;
pub mod explode;
pub mod gesture;
pub mod heart;
pub mod model;
pub mod parts;
pub mod scene;
pub mod state;
pub mod tween;
pub mod util;
pub mod zoom;

pub use config::{DeviceProfile, DeviceTier, ViewerConfig};
pub use error::ConfigError;
pub use heart::{HeartAnimationController, HeartCallbacks};
pub use zoom::{ThresholdCrossing, ZoomCallbacks, ZoomController};
