//! Viewer configuration and device-tier tuning.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::ConfigError;
use crate::state::{ThresholdKind, Thresholds, MAX_ZOOM, MIN_ZOOM};

/// Separation distance the part table's offsets are authored for.
pub const REFERENCE_SEPARATION: f64 = 0.3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub normal_view_threshold: f64,
    pub slice_threshold: f64,
    pub label_threshold: f64,
    pub max_detail_threshold: f64,
    pub explode_duration_ms: f64,
    pub zoom_animation_ms: f64,
    pub separation_distance: f64,
    pub easing: Easing,
    pub zoom_step: f64,
    pub slicing_enabled: bool,
    /// Root display scale at zoom 1.0.
    pub base_scale: f64,
    /// Spatial clustering radius is `max(size.x, size.y) / cluster_radius_divisor`.
    pub cluster_radius_divisor: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            normal_view_threshold: 1.0,
            slice_threshold: 1.5,
            label_threshold: 2.0,
            max_detail_threshold: 2.5,
            explode_duration_ms: 1500.0,
            zoom_animation_ms: 300.0,
            separation_distance: REFERENCE_SEPARATION,
            easing: Easing::Decelerate,
            zoom_step: 0.2,
            slicing_enabled: true,
            base_scale: 1.0,
            cluster_radius_divisor: 3.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: ViewerConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            normal_view: self.normal_view_threshold,
            start_slicing: self.slice_threshold,
            show_labels: self.label_threshold,
            max_detail: self.max_detail_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_thresholds(&self.thresholds())?;
        for (field, value) in [
            ("explodeDurationMs", self.explode_duration_ms),
            ("zoomAnimationMs", self.zoom_animation_ms),
            ("separationDistance", self.separation_distance),
            ("zoomStep", self.zoom_step),
            ("baseScale", self.base_scale),
            ("clusterRadiusDivisor", self.cluster_radius_divisor),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }

    /// Effective configuration for a device tier.
    pub fn tuned_for(&self, device: &DeviceProfile) -> ViewerConfig {
        match device.tier {
            DeviceTier::Full => self.clone(),
            DeviceTier::Constrained => ViewerConfig {
                explode_duration_ms: self.explode_duration_ms * 0.8,
                separation_distance: self.separation_distance * 0.9,
                ..self.clone()
            },
        }
    }

    /// Factor applied to authored part offsets.
    pub fn offset_scale(&self) -> f64 {
        self.separation_distance / REFERENCE_SEPARATION
    }
}

pub fn validate_thresholds(t: &Thresholds) -> Result<(), ConfigError> {
    for kind in ThresholdKind::ALL {
        let value = t.value(kind);
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&value) {
            return Err(ConfigError::ThresholdOutOfRange { kind, value, min: MIN_ZOOM, max: MAX_ZOOM });
        }
    }
    for pair in ThresholdKind::ALL.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if t.value(lower) >= t.value(upper) {
            return Err(ConfigError::ThresholdOrder {
                lower,
                lower_value: t.value(lower),
                upper,
                upper_value: t.value(upper),
            });
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Constrained,
    #[default]
    Full,
}

/// Capability descriptor supplied by the embedding application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub tier: DeviceTier,
}

impl DeviceProfile {
    pub fn constrained() -> Self {
        Self { tier: DeviceTier::Constrained }
    }

    pub fn full() -> Self {
        Self { tier: DeviceTier::Full }
    }

    pub fn is_constrained(&self) -> bool {
        self.tier == DeviceTier::Constrained
    }
}
