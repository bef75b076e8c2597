use super::viewer::HeartViewer;
use crate::config::{DeviceProfile, ViewerConfig};
use yew::prelude::*;

/// Inline `<script type="application/json">` holding a partial `ViewerConfig`.
const CONFIG_ELEMENT_ID: &str = "viewer-config";
/// Devices reporting this many logical cores or fewer get the reduced animation tier.
const CONSTRAINED_CORES: f64 = 4.0;

fn load_config() -> ViewerConfig {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());
    let Some(raw) = raw else {
        return ViewerConfig::default();
    };
    match ViewerConfig::from_json(&raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {e}");
            ViewerConfig::default()
        }
    }
}

fn detect_device() -> DeviceProfile {
    let cores = web_sys::window().map(|w| w.navigator().hardware_concurrency()).unwrap_or(0.0);
    if cores > 0.0 && cores <= CONSTRAINED_CORES {
        DeviceProfile::constrained()
    } else {
        DeviceProfile::full()
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| load_config());
    let device = use_memo((), |_| detect_device());
    log::info!("device tier: {:?}", device.tier);
    html! { <HeartViewer config={(*config).clone()} device={*device} /> }
}
