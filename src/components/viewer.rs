//! Canvas viewer: wires the zoom controller and the heart orchestrator to
//! browser input and the animation frame loop.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, HtmlElement, TouchEvent, TouchList, VisibilityState, WheelEvent};
use yew::prelude::*;

use super::part_labels::PartLabels;
use super::status_panel::StatusPanel;
use super::zoom_controls::ZoomControls;
use crate::config::{DeviceProfile, ViewerConfig};
use crate::gesture::GestureTracker;
use crate::heart::{HeartAnimationController, HeartCallbacks};
use crate::scene::{demo_heart, NodeId, Scene, SceneTree};
use crate::state::{StatusAction, TouchPoint, ViewerStatus};
use crate::zoom::{ThresholdCrossing, ZoomCallbacks, ZoomController};

/// Touches landing inside these never drive the pinch gesture.
const CONTROL_SELECTOR: &str = "button, [data-ui-control]";
/// Pixels per model unit at zoom 1.0, relative to the shorter canvas side.
const VIEW_FILL: f64 = 1.2;
const BACKGROUND: &str = "#0e1116";
const UNBOUND_COLOR: &str = "#3c4454";

type SharedZoom = Rc<RefCell<Option<ZoomController>>>;
type SharedHeart = Rc<RefCell<Option<HeartAnimationController<Scene>>>>;
type SharedGestures = Rc<RefCell<GestureTracker>>;
type Teardown = Box<dyn FnOnce()>;
type FrameCell = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[derive(Properties, PartialEq, Clone)]
pub struct HeartViewerProps {
    pub config: ViewerConfig,
    pub device: DeviceProfile,
}

fn touch_points(list: &TouchList) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| {
            let on_control = t
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(CONTROL_SELECTOR).ok().flatten())
                .is_some();
            let (x, y) = (t.client_x() as f64, t.client_y() as f64);
            if on_control { TouchPoint::control(x, y) } else { TouchPoint::new(x, y) }
        })
        .collect()
}

fn build_heart(
    config: &ViewerConfig,
    device: DeviceProfile,
    status: &UseReducerDispatcher<ViewerStatus>,
) -> Option<HeartAnimationController<Scene>> {
    let callbacks = HeartCallbacks {
        on_slice_start: {
            let status = status.clone();
            Callback::from(move |_| status.dispatch(StatusAction::SliceStarted))
        },
        on_slice_complete: {
            let status = status.clone();
            Callback::from(move |sliced| status.dispatch(StatusAction::SliceCompleted(sliced)))
        },
        on_reassemble_start: {
            let status = status.clone();
            Callback::from(move |_| status.dispatch(StatusAction::ReassembleStarted))
        },
        on_label_show: {
            let status = status.clone();
            Callback::from(move |id| status.dispatch(StatusAction::LabelShown(id)))
        },
        on_labels_hidden: {
            let status = status.clone();
            Callback::from(move |_| status.dispatch(StatusAction::LabelsHidden))
        },
    };
    match HeartAnimationController::new(config, device, callbacks) {
        Ok(heart) => Some(heart),
        Err(e) => {
            log::error!("slicing disabled: {e}");
            None
        }
    }
}

fn build_zoom(config: &ViewerConfig, heart: &SharedHeart, status: &UseReducerDispatcher<ViewerStatus>) -> Option<ZoomController> {
    let callbacks = ZoomCallbacks {
        on_zoom_change: {
            let heart = heart.clone();
            let status = status.clone();
            Callback::from(move |zoom: f64| {
                if let Some(h) = heart.borrow_mut().as_mut() {
                    h.handle_zoom_change(zoom);
                }
                status.dispatch(StatusAction::Zoom(zoom));
            })
        },
        on_threshold_crossed: {
            let status = status.clone();
            Callback::from(move |c: ThresholdCrossing| status.dispatch(StatusAction::Crossed(c.kind)))
        },
    };
    match ZoomController::new(config, callbacks) {
        Ok(zoom) => Some(zoom),
        Err(e) => {
            log::error!("zoom disabled: {e}");
            None
        }
    }
}

/// Mesh leaves under each bound part, paired with the part color.
fn part_colors(heart: &HeartAnimationController<Scene>, model: &Scene) -> Vec<(NodeId, String)> {
    let mut out = Vec::new();
    for b in heart.bindings().iter() {
        let Some(part) = heart.part(&b.part_id) else { continue };
        let mut stack = vec![b.node];
        while let Some(n) = stack.pop() {
            if model.is_mesh(n) {
                out.push((n, part.color.clone()));
            }
            stack.extend(model.children(n));
        }
    }
    out
}

fn draw(canvas: &HtmlCanvasElement, heart: &HeartAnimationController<Scene>) {
    if !canvas.is_connected() {
        return;
    }
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        return;
    };
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w, h);

    let Some(model) = heart.model() else { return };
    let unit = w.min(h) * VIEW_FILL;
    let (cx, cy) = (w * 0.5, h * 0.5);
    let colors = part_colors(heart, model);

    // Back to front.
    let mut leaves: Vec<NodeId> = model.mesh_leaves().into_iter().filter(|id| model.is_visible(*id)).collect();
    leaves.sort_by(|a, b| model.world_position(*a).z.total_cmp(&model.world_position(*b).z));
    for leaf in leaves {
        let Some(bounds) = model.world_bounds(leaf) else { continue };
        let c = bounds.center();
        let s = bounds.size();
        let color = colors.iter().find(|(n, _)| *n == leaf).map(|(_, c)| c.as_str()).unwrap_or(UNBOUND_COLOR);
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        let rx = (s.x * 0.5 * unit).max(1.0);
        let ry = (s.y * 0.5 * unit).max(1.0);
        if ctx.ellipse(cx + c.x * unit, cy - c.y * unit, rx, ry, 0.0, 0.0, std::f64::consts::TAU).is_ok() {
            ctx.fill();
        }
    }

    if heart.state().labels_visible {
        ctx.set_fill_style_str("#c9d1d9");
        ctx.set_font("12px sans-serif");
        ctx.set_text_align("center");
        for b in heart.bindings().iter() {
            let Some(bounds) = model.world_bounds(b.node) else { continue };
            let c = bounds.center();
            let name = heart.part(&b.part_id).map(|p| p.display_name.as_str()).unwrap_or(b.part_id.as_str());
            let _ = ctx.fill_text(name, cx + c.x * unit, cy - c.y * unit);
        }
    }
}

fn request_frame(window: &web_sys::Window, frame_cell: &FrameCell, raf_id: &Rc<RefCell<Option<i32>>>) {
    if let Some(cb) = frame_cell.borrow().as_ref() {
        if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            *raf_id.borrow_mut() = Some(id);
        }
    }
}

/// Builds the session and attaches every listener. Returns `None` when the
/// DOM is not ready.
fn mount(
    config: &ViewerConfig,
    device: DeviceProfile,
    container_ref: &NodeRef,
    canvas_ref: &NodeRef,
    zoom: SharedZoom,
    heart: SharedHeart,
    gestures: SharedGestures,
    status: UseReducerDispatcher<ViewerStatus>,
) -> Option<Teardown> {
    let window = web_sys::window()?;
    let document = window.document()?;
    let container = container_ref.cast::<HtmlElement>()?;
    let canvas = canvas_ref.cast::<HtmlCanvasElement>()?;

    *heart.borrow_mut() = build_heart(config, device, &status);
    *zoom.borrow_mut() = build_zoom(config, &heart, &status);
    if let Some(h) = heart.borrow_mut().as_mut() {
        h.initialize_heart_model(Some(demo_heart()));
        status.dispatch(StatusAction::ModelBound {
            strategy: h.strategy().map(|s| s.label()),
            parts: h.parts().to_vec(),
            bound: h.bindings().len(),
        });
    }

    let fit_canvas = {
        let canvas = canvas.clone();
        let container = container.clone();
        move || {
            canvas.set_width(container.client_width().max(0) as u32);
            canvas.set_height(container.client_height().max(0) as u32);
        }
    };
    fit_canvas();

    // Frame loop
    let raf_id = Rc::new(RefCell::new(None::<i32>));
    let frame_cell: FrameCell = Rc::new(RefCell::new(None));
    {
        let frame_next = frame_cell.clone();
        let raf_id = raf_id.clone();
        let window_loop = window.clone();
        let document_loop = document.clone();
        let zoom = zoom.clone();
        let heart = heart.clone();
        let canvas = canvas.clone();
        let status = status.clone();
        *frame_cell.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            // Hidden: the loop stays unscheduled until visibilitychange re-arms it.
            if document_loop.hidden() {
                raf_id.borrow_mut().take();
                return;
            }
            if let Some(z) = zoom.borrow_mut().as_mut() {
                z.tick(now);
            }
            if let Some(h) = heart.borrow_mut().as_mut() {
                h.tick(now);
                if h.state().is_transitioning() {
                    status.dispatch(StatusAction::Progress(h.state().animation_progress));
                }
            }
            if let Some(h) = heart.borrow().as_ref() {
                draw(&canvas, h);
            }
            request_frame(&window_loop, &frame_next, &raf_id);
        }) as Box<dyn FnMut(f64)>));
    }
    request_frame(&window, &frame_cell, &raf_id);

    // Wheel: one zoom step per notch
    let wheel_cb = {
        let zoom = zoom.clone();
        Closure::wrap(Box::new(move |e: WheelEvent| {
            e.prevent_default();
            if let Some(z) = zoom.borrow_mut().as_mut() {
                if e.delta_y() < 0.0 {
                    z.zoom_in();
                } else if e.delta_y() > 0.0 {
                    z.zoom_out();
                }
            }
        }) as Box<dyn FnMut(_)>)
    };
    container.add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref()).ok();

    // Touch: pinch zoom, controls excluded
    let touch_start_cb = {
        let zoom = zoom.clone();
        let gestures = gestures.clone();
        Closure::wrap(Box::new(move |e: TouchEvent| {
            let touches = touch_points(&e.touches());
            if touches.iter().any(|t| t.on_control) {
                return;
            }
            if let Some(z) = zoom.borrow_mut().as_mut() {
                z.handle_touch_start(&mut gestures.borrow_mut(), &touches, e.time_stamp());
            }
            e.prevent_default();
        }) as Box<dyn FnMut(_)>)
    };
    container.add_event_listener_with_callback("touchstart", touch_start_cb.as_ref().unchecked_ref()).ok();

    let touch_move_cb = {
        let zoom = zoom.clone();
        let gestures = gestures.clone();
        Closure::wrap(Box::new(move |e: TouchEvent| {
            let touches = touch_points(&e.touches());
            if let Some(z) = zoom.borrow_mut().as_mut() {
                if z.handle_touch_move(&mut gestures.borrow_mut(), &touches, e.time_stamp()) {
                    e.prevent_default();
                }
            }
        }) as Box<dyn FnMut(_)>)
    };
    container.add_event_listener_with_callback("touchmove", touch_move_cb.as_ref().unchecked_ref()).ok();

    let touch_end_cb = {
        let zoom = zoom.clone();
        let gestures = gestures.clone();
        Closure::wrap(Box::new(move |e: TouchEvent| {
            let remaining = e.touches().length() as usize;
            if let Some(z) = zoom.borrow_mut().as_mut() {
                z.handle_touch_end(&mut gestures.borrow_mut(), remaining, e.time_stamp());
            }
        }) as Box<dyn FnMut(_)>)
    };
    container.add_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref()).ok();
    container.add_event_listener_with_callback("touchcancel", touch_end_cb.as_ref().unchecked_ref()).ok();

    // Hidden tab: freeze zoom and slicing, pick up where they stopped
    let visibility_cb = {
        let document = document.clone();
        let zoom = zoom.clone();
        let heart = heart.clone();
        let status = status.clone();
        let window = window.clone();
        let frame_cell = frame_cell.clone();
        let raf_id = raf_id.clone();
        Closure::wrap(Box::new(move |_e: web_sys::Event| {
            let hidden = document.visibility_state() == VisibilityState::Hidden;
            if let Some(z) = zoom.borrow_mut().as_mut() {
                if hidden { z.pause() } else { z.resume() }
            }
            if let Some(h) = heart.borrow_mut().as_mut() {
                if hidden { h.pause_animations() } else { h.resume_animations() }
            }
            status.dispatch(StatusAction::Paused(hidden));
            if !hidden && raf_id.borrow().is_none() {
                request_frame(&window, &frame_cell, &raf_id);
            }
        }) as Box<dyn FnMut(_)>)
    };
    document.add_event_listener_with_callback("visibilitychange", visibility_cb.as_ref().unchecked_ref()).ok();

    let resize_cb = Closure::wrap(Box::new(move |_e: web_sys::Event| fit_canvas()) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref()).ok();

    Some(Box::new(move || {
        let _ = container.remove_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref());
        let _ = container.remove_event_listener_with_callback("touchstart", touch_start_cb.as_ref().unchecked_ref());
        let _ = container.remove_event_listener_with_callback("touchmove", touch_move_cb.as_ref().unchecked_ref());
        let _ = container.remove_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref());
        let _ = container.remove_event_listener_with_callback("touchcancel", touch_end_cb.as_ref().unchecked_ref());
        let _ = document.remove_event_listener_with_callback("visibilitychange", visibility_cb.as_ref().unchecked_ref());
        let _ = window.remove_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
        if let Some(id) = raf_id.borrow_mut().take() {
            let _ = window.cancel_animation_frame(id);
        }
        // Breaks the frame closure's reference to itself.
        frame_cell.borrow_mut().take();
        if let Some(mut z) = zoom.borrow_mut().take() {
            z.destroy();
        }
        if let Some(mut h) = heart.borrow_mut().take() {
            h.destroy();
        }
        gestures.borrow_mut().reset();
        log::info!("viewer torn down");
    }))
}

#[function_component(HeartViewer)]
pub fn heart_viewer(props: &HeartViewerProps) -> Html {
    let container_ref = use_node_ref();
    let canvas_ref = use_node_ref();
    let zoom: SharedZoom = use_mut_ref(|| None);
    let heart: SharedHeart = use_mut_ref(|| None);
    let gestures: SharedGestures = use_mut_ref(GestureTracker::new);
    let status = use_reducer(|| ViewerStatus::new(props.config.normal_view_threshold));

    {
        let container_ref = container_ref.clone();
        let canvas_ref = canvas_ref.clone();
        let zoom = zoom.clone();
        let heart = heart.clone();
        let gestures = gestures.clone();
        let dispatcher = status.dispatcher();
        use_effect_with((props.config.clone(), props.device), move |(config, device)| {
            let teardown = mount(config, *device, &container_ref, &canvas_ref, zoom, heart, gestures, dispatcher);
            move || {
                if let Some(t) = teardown {
                    t();
                }
            }
        });
    }

    let on_zoom_in = {
        let zoom = zoom.clone();
        Callback::from(move |_| {
            if let Some(z) = zoom.borrow_mut().as_mut() {
                z.zoom_in();
            }
        })
    };
    let on_zoom_out = {
        let zoom = zoom.clone();
        Callback::from(move |_| {
            if let Some(z) = zoom.borrow_mut().as_mut() {
                z.zoom_out();
            }
        })
    };
    let on_reset = {
        let zoom = zoom.clone();
        Callback::from(move |_| {
            if let Some(z) = zoom.borrow_mut().as_mut() {
                z.reset_zoom();
            }
        })
    };
    let on_slice = {
        let heart = heart.clone();
        Callback::from(move |_| {
            if let Some(h) = heart.borrow_mut().as_mut() {
                h.force_slice();
            }
        })
    };
    let on_reassemble = {
        let heart = heart.clone();
        Callback::from(move |_| {
            if let Some(h) = heart.borrow_mut().as_mut() {
                h.force_reassemble();
            }
        })
    };

    html! {
        <div ref={container_ref} style="position:relative; width:100vw; height:100vh; overflow:hidden; background:#0e1116; touch-action:none; font-family:sans-serif;">
            <canvas ref={canvas_ref} style="display:block; width:100%; height:100%;"></canvas>
            <StatusPanel status={(*status).clone()} />
            <PartLabels parts={status.parts.clone()} active={status.labels.clone()} />
            <ZoomControls
                zoom={status.zoom}
                sliced={status.is_sliced()}
                {on_zoom_in}
                {on_zoom_out}
                {on_reset}
                {on_slice}
                {on_reassemble}
            />
        </div>
    }
}
