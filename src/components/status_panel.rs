use crate::state::{SlicePhase, ViewerStatus};
use crate::util::{format_progress, format_zoom};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatusPanelProps {
    pub status: ViewerStatus,
}

#[function_component]
pub fn StatusPanel(props: &StatusPanelProps) -> Html {
    let s = &props.status;
    let row_style = "display:flex; align-items:center; gap:8px;";
    let label_style = "flex:1; color:#8b949e;";
    let value_style = "min-width:90px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let phase = if matches!(s.phase, SlicePhase::Slicing | SlicePhase::Reassembling) {
        format!("{} {}", s.phase.label(), format_progress(s.progress))
    } else {
        s.phase.label().to_string()
    };
    let mapping = match s.strategy {
        Some(name) => format!("{} ({})", name, s.bound_parts),
        None => "none".to_string(),
    };
    html! {
        <div data-ui-control="status" style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:8px; font-size:13px; color:#c9d1d9;">
            <div style={row_style}>
                <span style={label_style}>{"Zoom"}</span>
                <span style={value_style}>{ format_zoom(s.zoom) }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Phase"}</span>
                <span style={value_style}>{ phase }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Parts"}</span>
                <span style={value_style}>{ mapping }</span>
            </div>
            { if let Some(kind) = s.last_crossing { html!{
                <div style={row_style}>
                    <span style={label_style}>{"Last threshold"}</span>
                    <span style={value_style}>{ kind.label() }</span>
                </div>
            } } else { html!{} } }
            { if s.paused { html!{<div style="color:#f0883e; font-weight:600;">{"Paused"}</div>} } else { html!{} } }
        </div>
    }
}
