use crate::model::AnatomicalPart;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
struct LabelRowProps {
    part: AnatomicalPart,
}

#[function_component(LabelRow)]
fn label_row(props: &LabelRowProps) -> Html {
    let p = &props.part;
    html! {
        <div style="margin:6px 0; padding-top:6px; border-top:1px solid #30363d;">
            <div style="display:flex; align-items:center; gap:8px; font-weight:600;">
                <span style={format!("display:inline-block; width:12px; height:12px; background:{}; border:1px solid #30363d; border-radius:2px;", p.color)}></span>
                <span>{ p.display_name.clone() }</span>
            </div>
            { if p.description.is_empty() { html!{} } else { html!{<div style="font-size:12px; margin-top:4px;">{ p.description.clone() }</div>} } }
            { if p.function_text.is_empty() { html!{} } else { html!{<div style="font-size:11px; color:#8b949e; margin-top:2px;">{ p.function_text.clone() }</div>} } }
            { if p.conditions.is_empty() { html!{} } else { html!{
                <div style="font-size:11px; color:#f0883e; margin-top:2px;">{ format!("Related: {}", p.conditions.join(", ")) }</div>
            } } }
        </div>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct PartLabelsProps {
    pub parts: Vec<AnatomicalPart>,
    /// Ids of the parts whose labels are showing.
    pub active: Vec<String>,
}

#[function_component]
pub fn PartLabels(props: &PartLabelsProps) -> Html {
    if props.active.is_empty() {
        return html! {};
    }
    let rows = props
        .active
        .iter()
        .filter_map(|id| props.parts.iter().find(|p| &p.id == id))
        .map(|p| html! { <LabelRow key={p.id.clone()} part={p.clone()} /> });
    html! {
        <div data-ui-control="labels" style="position:absolute; right:12px; top:12px; bottom:12px; overflow-y:auto; background:rgba(22,27,34,0.95); border:1px solid #30363d; border-radius:8px; padding:12px 16px; min-width:220px; max-width:280px; font-size:13px; color:#c9d1d9;">
            <div style="font-weight:600; font-size:15px;">{"Anatomy"}</div>
            { for rows }
        </div>
    }
}
