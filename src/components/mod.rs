pub mod app;
pub mod part_labels;
pub mod status_panel;
pub mod viewer;
pub mod zoom_controls;
