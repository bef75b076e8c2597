use crate::state::{MAX_ZOOM, MIN_ZOOM};
use crate::util::format_zoom;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomControlsProps {
    pub zoom: f64,
    pub sliced: bool,
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    pub on_reset: Callback<()>,
    pub on_slice: Callback<()>,
    pub on_reassemble: Callback<()>,
}

#[function_component(ZoomControls)]
pub fn zoom_controls(props: &ZoomControlsProps) -> Html {
    let zi = {
        let cb = props.on_zoom_in.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let zo = {
        let cb = props.on_zoom_out.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let rs = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let toggle = {
        let cb = if props.sliced { props.on_reassemble.clone() } else { props.on_slice.clone() };
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div data-ui-control="zoom" style="position:absolute; left:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
        <button onclick={zo} disabled={props.zoom <= MIN_ZOOM}> {"-"} </button>
        <span style="min-width:44px; text-align:center; font-variant-numeric:tabular-nums;">{ format_zoom(props.zoom) }</span>
        <button onclick={zi} disabled={props.zoom >= MAX_ZOOM}> {"+"} </button>
        <span style="width:8px;"></span>
        <button onclick={rs}> {"Reset"} </button>
        <span style="width:8px;"></span>
        <button onclick={toggle}> { if props.sliced { "Reassemble" } else { "Slice" } } </button>
    </div>}
}
