use std::cell::RefCell;
use std::rc::Rc;

use heart_zoom_viewer::scene::{demo_heart, Scene, SceneTree};
use heart_zoom_viewer::state::{SlicePhase, ThresholdKind};
use heart_zoom_viewer::{
    DeviceProfile, HeartAnimationController, HeartCallbacks, ThresholdCrossing, ViewerConfig, ZoomCallbacks, ZoomController,
};
use yew::Callback;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Crossed(ThresholdKind),
    SliceStart,
    SliceComplete(bool),
    ReassembleStart,
    Label(String),
    LabelsHidden,
}

type Events = Rc<RefCell<Vec<Event>>>;
type Heart = Rc<RefCell<HeartAnimationController<Scene>>>;

fn recorder<T: 'static>(events: &Events, f: fn(T) -> Event) -> Callback<T> {
    let events = events.clone();
    Callback::from(move |v| events.borrow_mut().push(f(v)))
}

/// Zoom controller feeding a heart orchestrator, the way the viewer wires them.
fn session() -> (ZoomController, Heart, Events) {
    let events: Events = Rc::new(RefCell::new(Vec::new()));
    let cfg = ViewerConfig::default();
    let callbacks = HeartCallbacks {
        on_slice_start: recorder(&events, |_| Event::SliceStart),
        on_slice_complete: recorder(&events, Event::SliceComplete),
        on_reassemble_start: recorder(&events, |_| Event::ReassembleStart),
        on_label_show: recorder(&events, Event::Label),
        on_labels_hidden: recorder(&events, |_| Event::LabelsHidden),
    };
    let heart = Rc::new(RefCell::new(HeartAnimationController::new(&cfg, DeviceProfile::full(), callbacks).unwrap()));
    heart.borrow_mut().initialize_heart_model(Some(demo_heart()));

    let zoom_callbacks = ZoomCallbacks {
        on_zoom_change: {
            let heart = heart.clone();
            Callback::from(move |z| heart.borrow_mut().handle_zoom_change(z))
        },
        on_threshold_crossed: recorder(&events, |c: ThresholdCrossing| Event::Crossed(c.kind)),
    };
    let zoom = ZoomController::new(&cfg, zoom_callbacks).unwrap();
    (zoom, heart, events)
}

/// Runs frames at 60 Hz over `[from, to]` and returns the phases seen, deduplicated.
fn frames(zoom: &mut ZoomController, heart: &Heart, from: f64, to: f64) -> Vec<SlicePhase> {
    let mut phases: Vec<SlicePhase> = vec![heart.borrow().state().phase];
    let mut t = from;
    while t <= to {
        zoom.tick(t);
        heart.borrow_mut().tick(t);
        let phase = heart.borrow().state().phase;
        if phases.last() != Some(&phase) {
            phases.push(phase);
        }
        t += 16.0;
    }
    phases
}

#[test]
fn zooming_in_past_start_slicing_slices_the_heart() {
    let (mut zoom, heart, events) = session();
    zoom.set_zoom(1.6, true);
    assert_eq!(*events.borrow(), vec![Event::Crossed(ThresholdKind::StartSlicing)]);

    let phases = frames(&mut zoom, &heart, 0.0, 2_500.0);
    assert_eq!(phases, vec![SlicePhase::Assembled, SlicePhase::Slicing, SlicePhase::Sliced]);
    assert_eq!(zoom.get_current_zoom(), 1.6);
    assert_eq!(
        *events.borrow(),
        vec![Event::Crossed(ThresholdKind::StartSlicing), Event::SliceStart, Event::SliceComplete(true)]
    );
    assert!(!heart.borrow().state().labels_visible);
}

#[test]
fn zooming_out_hides_labels_then_reassembles_to_rest() {
    let (mut zoom, heart, events) = session();
    zoom.set_zoom(2.2, false);
    frames(&mut zoom, &heart, 0.0, 1_600.0);
    {
        let h = heart.borrow();
        assert!(h.state().is_sliced());
        assert!(h.state().labels_visible);
        assert_eq!(h.state().active_labels.len(), h.bindings().len());
    }
    let labels = events.borrow().iter().filter(|e| matches!(e, Event::Label(_))).count();
    assert_eq!(labels, heart.borrow().bindings().len());
    events.borrow_mut().clear();

    zoom.set_zoom(1.2, true);
    let phases = frames(&mut zoom, &heart, 2_000.0, 4_000.0);
    assert_eq!(phases, vec![SlicePhase::Sliced, SlicePhase::Reassembling, SlicePhase::Assembled]);

    let after: Vec<Event> = events.borrow().iter().filter(|e| !matches!(e, Event::Crossed(_))).cloned().collect();
    assert_eq!(after, vec![Event::LabelsHidden, Event::ReassembleStart, Event::SliceComplete(false)]);

    let h = heart.borrow();
    assert!(!h.state().labels_visible);
    let model = h.model().unwrap();
    for b in h.bindings().iter() {
        assert!(
            model.position(b.node).approx_eq(b.original_local_position, 1e-9),
            "{} not back at rest",
            b.part_id
        );
    }
}
