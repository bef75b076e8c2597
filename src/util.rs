// Formatting and logging helpers shared by the viewer components.

pub fn format_zoom(zoom: f64) -> String {
    format!("{:.1}x", zoom)
}

pub fn format_progress(progress: f64) -> String {
    format!("{}%", (progress.clamp(0.0, 1.0) * 100.0).round() as u32)
}

/// Routes `log` records to the browser console. Does nothing off wasm.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Debug) {
            web_sys::console::warn_1(&format!("logger already initialised: {e}").into());
        }
    }
}
