use heart_zoom_viewer::components::app::App;
use heart_zoom_viewer::util::init_logging;

fn main() {
    init_logging();
    log::info!("heart viewer starting");
    yew::Renderer::<App>::new().render();
}
