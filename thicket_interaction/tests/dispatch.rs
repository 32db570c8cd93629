// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch tests driven through native events.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Affine, Point, Rect, Vec2};
use thicket_geometry::{Command, CommandTape, Layer, Mark, MarkType, Section};
use thicket_index::Identity;
use thicket_interaction::{
    AlwaysListening, Device, DragPhase, EventManager, Graphic, HitSource, InteractionError,
    InteractionEvent, InteractionKind as K, NativeEvent, NativeEventName as N, NativeSurface,
    PointerCoords, RootTransform,
};

type Events = Rc<RefCell<Vec<InteractionEvent>>>;

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<(bool, N)>>>);

impl NativeSurface for Recorder {
    fn attach(&mut self, name: N) {
        self.0.borrow_mut().push((true, name));
    }
    fn detach(&mut self, name: N) {
        self.0.borrow_mut().push((false, name));
    }
}

fn section() -> Rc<Section> {
    let r = Rect::new(0.0, 0.0, 200.0, 100.0);
    Rc::new(Section::new("plot", r, r))
}

fn bar(id: &str, x: f64, y: f64) -> Rc<Mark> {
    let tape = CommandTape::new(vec![Command::rect(x, y, 30.0, 20.0)]).unwrap();
    Rc::new(Mark::new(id, MarkType::Rectangle, tape, section()))
}

fn recording(events: &Events) -> impl Fn(&InteractionEvent, &mut EventManager) + 'static {
    let events = events.clone();
    move |event, _| events.borrow_mut().push(event.clone())
}

fn kinds(events: &Events) -> Vec<K> {
    events.borrow().iter().map(|e| e.kind).collect()
}

fn mouse(name: N, x: f64, y: f64) -> NativeEvent {
    NativeEvent::at(name, Point::new(x, y))
}

#[test]
fn hover_fires_one_enter_then_one_exit() {
    let mut manager = EventManager::new(Device::Mouse, AlwaysListening);
    let events: Events = Rc::default();
    let mark = bar("bar", 10.0, 10.0);
    manager
        .add_mark_interaction(K::MouseOver, &mark, recording(&events))
        .unwrap();
    manager
        .add_mark_interaction(K::MouseOut, &mark, recording(&events))
        .unwrap();

    for (x, y) in [(0.0, 0.0), (20.0, 15.0), (21.0, 16.0), (35.0, 25.0), (100.0, 50.0), (110.0, 50.0)] {
        manager.handle(&mouse(N::MouseMove, x, y));
    }

    assert_eq!(kinds(&events), [K::MouseOver, K::MouseOut]);
    let events = events.borrow();
    assert_eq!(events[0].identity, Some(Identity::Mark("bar".into())));
    assert_eq!(events[0].hit_source, HitSource::Mark);
    assert_eq!(events[0].mark_type, Some(MarkType::Rectangle));
    assert_eq!(events[0].hit_bbox, Some(Rect::new(10.0, 10.0, 40.0, 30.0)));
    assert_eq!(events[1].screen_coordinates, Point::new(100.0, 50.0));
    assert!(manager.hovered().is_empty());
}

#[test]
fn hover_enters_before_exits() {
    let mut manager = EventManager::new(Device::Mouse, AlwaysListening);
    let events: Events = Rc::default();
    for mark in [bar("left", 10.0, 10.0), bar("right", 40.0, 10.0)] {
        manager
            .add_mark_interaction(K::MouseOver, &mark, recording(&events))
            .unwrap();
        manager
            .add_mark_interaction(K::MouseOut, &mark, recording(&events))
            .unwrap();
    }

    manager.handle(&mouse(N::MouseMove, 20.0, 15.0));
    manager.handle(&mouse(N::MouseMove, 60.0, 15.0));

    let log: Vec<_> = events
        .borrow()
        .iter()
        .map(|e| (e.kind, e.identity.clone().unwrap().to_string()))
        .collect();
    assert_eq!(
        log,
        [
            (K::MouseOver, "left".to_string()),
            (K::MouseOver, "right".to_string()),
            (K::MouseOut, "left".to_string()),
        ]
    );
}

#[test]
fn drag_session_start_drag_drag_end() {
    let mut manager = EventManager::new(Device::Mouse, AlwaysListening);
    let events: Events = Rc::default();
    let mark = bar("bar", 10.0, 10.0);
    manager
        .add_mark_interaction(K::MouseDrag, &mark, recording(&events))
        .unwrap();

    manager.handle(&mouse(N::MouseMove, 20.0, 15.0));
    manager.handle(&mouse(N::MouseDown, 20.0, 15.0));
    manager.handle(&mouse(N::MouseMove, 25.0, 15.0));
    // Leaves the mark; the grabbed set does not change mid-drag.
    manager.handle(&mouse(N::MouseMove, 90.0, 60.0));
    manager.handle(&mouse(N::MouseUp, 90.0, 60.0));
    assert!(manager.dragging().is_empty());

    let phases: Vec<_> = events.borrow().iter().map(|e| e.drag_type).collect();
    assert_eq!(
        phases,
        [
            Some(DragPhase::Start),
            Some(DragPhase::Drag),
            Some(DragPhase::Drag),
            Some(DragPhase::End),
        ]
    );
    let deltas: Vec<_> = events.borrow().iter().map(|e| e.delta).collect();
    assert_eq!(
        deltas,
        [
            Some(Vec2::ZERO),
            Some(Vec2::new(5.0, 0.0)),
            Some(Vec2::new(65.0, 45.0)),
            Some(Vec2::ZERO),
        ]
    );

    // A fresh session with no leftovers.
    events.borrow_mut().clear();
    manager.handle(&mouse(N::MouseMove, 30.0, 20.0));
    assert!(events.borrow().is_empty());
    manager.handle(&mouse(N::MouseDown, 30.0, 20.0));
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(events.borrow()[0].drag_type, Some(DragPhase::Start));
    assert_eq!(manager.dragging(), [&Identity::Mark("bar".into())]);
}

#[test]
fn down_outside_everything_starts_no_drag() {
    let mut manager = EventManager::new(Device::Mouse, AlwaysListening);
    let events: Events = Rc::default();
    manager
        .add_mark_interaction(K::MouseDrag, &bar("bar", 10.0, 10.0), recording(&events))
        .unwrap();
    manager.handle(&mouse(N::MouseDown, 150.0, 80.0));
    manager.handle(&mouse(N::MouseMove, 20.0, 15.0));
    manager.handle(&mouse(N::MouseUp, 20.0, 15.0));
    assert!(events.borrow().is_empty());
}

#[test]
fn removing_a_mark_mid_drag_clears_its_session() {
    let mut manager = EventManager::new(Device::Mouse, AlwaysListening);
    let events: Events = Rc::default();
    manager
        .add_mark_interaction(K::MouseDrag, &bar("bar", 10.0, 10.0), recording(&events))
        .unwrap();
    manager.handle(&mouse(N::MouseDown, 20.0, 15.0));
    manager.remove_mark("bar");
    manager.handle(&mouse(N::MouseMove, 25.0, 15.0));
    manager.handle(&mouse(N::MouseUp, 25.0, 15.0));

    assert_eq!(kinds(&events), [K::MouseDrag]);
    assert!(manager.dragging().is_empty());
    assert!(manager.index().is_empty());
    assert_eq!(manager.listener_count(N::MouseMove), 0);
}

#[test]
fn callbacks_may_unregister_during_dispatch() {
    let mut manager = EventManager::new(Device::Mouse, AlwaysListening);
    let fired: Rc<RefCell<Vec<String>>> = Rc::default();

    let log = fired.clone();
    manager
        .add_mark_interaction(K::Click, &bar("a", 10.0, 10.0), move |e, m| {
            log.borrow_mut().push(e.identity.clone().unwrap().to_string());
            m.remove_mark_interaction(K::Click, "a");
            m.remove_mark_interaction(K::Click, "b");
        })
        .unwrap();
    let log = fired.clone();
    manager
        .add_mark_interaction(K::Click, &bar("b", 15.0, 12.0), move |e, _| {
            log.borrow_mut().push(e.identity.clone().unwrap().to_string());
        })
        .unwrap();

    manager.handle(&mouse(N::Click, 20.0, 15.0));
    manager.handle(&mouse(N::Click, 20.0, 15.0));

    assert_eq!(*fired.borrow(), ["a"]);
    assert!(manager.index().is_empty());
    assert_eq!(manager.listener_count(N::Click), 0);
}

#[test]
fn native_listeners_are_reference_counted() {
    let surface = Recorder::default();
    let log = surface.0.clone();
    let mut manager = EventManager::new(Device::Mouse, surface);
    let (a, b) = (bar("a", 10.0, 10.0), bar("b", 100.0, 10.0));
    let noop = |_: &InteractionEvent, _: &mut EventManager| {};

    manager.add_mark_interaction(K::MouseOver, &a, noop).unwrap();
    manager.add_mark_interaction(K::MouseOver, &b, noop).unwrap();
    manager.add_mark_interaction(K::MouseDrag, &b, noop).unwrap();
    // Overwrites silently.
    manager.add_mark_interaction(K::MouseDrag, &b, noop).unwrap();
    assert_eq!(manager.listener_count(N::MouseMove), 2);
    assert_eq!(manager.index().len(), 2);

    manager.remove_mark_interaction(K::MouseOver, "a");
    assert_eq!(manager.index().len(), 1);
    manager.remove_mark_interaction(K::MouseOver, "b");
    assert_eq!(manager.listener_count(N::MouseMove), 1);
    assert!(manager.is_registered(K::MouseDrag, "b"));
    manager.remove_mark_interaction(K::MouseDrag, "b");
    manager.remove_mark_interaction(K::MouseDrag, "unknown");

    assert!(manager.index().is_empty());
    assert_eq!(
        *log.borrow(),
        [
            (true, N::MouseMove),
            (true, N::MouseDown),
            (true, N::MouseUp),
            (false, N::MouseDown),
            (false, N::MouseMove),
            (false, N::MouseUp),
        ]
    );
}

#[test]
fn unsupported_kinds_are_rejected() {
    let mut mouse = EventManager::new(Device::Mouse, AlwaysListening);
    let mark = bar("bar", 10.0, 10.0);
    let noop = |_: &InteractionEvent, _: &mut EventManager| {};

    assert!(matches!(
        mouse.add_mark_interaction(K::TouchDown, &mark, noop),
        Err(InteractionError::UnsupportedKind { kind: K::TouchDown, device: Device::Mouse, .. })
    ));
    assert!(matches!(
        mouse.add_mark_interaction(K::Wheel, &mark, noop),
        Err(InteractionError::UnsupportedKind { target: HitSource::Mark, .. })
    ));
    assert!(matches!(
        mouse.add_interaction(K::MouseOver, &section(), noop),
        Err(InteractionError::UnsupportedKind { target: HitSource::Section, .. })
    ));
    assert!(mouse.index().is_empty());
}

#[test]
fn layer_elements_carry_index_and_key() {
    let mut manager = EventManager::new(Device::Mouse, AlwaysListening);
    let events: Events = Rc::default();
    let tapes = (0..3_u32)
        .map(|i| CommandTape::new(vec![Command::rect(10.0 + f64::from(i) * 40.0, 10.0, 30.0, 20.0)]).unwrap())
        .collect();
    let layer = Rc::new(
        Layer::new("bars", MarkType::Rectangle, tapes, section())
            .with_keys(vec!["a".into(), "b".into(), "c".into()]),
    );
    manager
        .add_layer_interaction(K::MouseDown, &layer, recording(&events))
        .unwrap();

    manager.handle(&mouse(N::MouseDown, 60.0, 15.0));

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].hit_source, HitSource::Layer);
    assert_eq!(events[0].index, Some(1));
    assert_eq!(events[0].key.as_deref(), Some("b"));
    assert_eq!(
        events[0].identity,
        Some(Identity::Keyed {
            layer: "bars".into(),
            key: "b".into(),
        })
    );
    assert_eq!(events[0].native_type, N::MouseDown);
}

#[test]
fn section_interactions_use_local_coordinates() {
    let r = Rect::new(0.0, 0.0, 200.0, 100.0);
    let padded = Rect::new(10.0, 10.0, 190.0, 90.0);
    let section = Rc::new(Section::new("plot", r, padded).with_coordinates(Affine::scale(2.0)));
    let mut manager = EventManager::new(Device::Mouse, AlwaysListening);
    let events: Events = Rc::default();
    manager
        .add_interaction(K::Wheel, &section, recording(&events))
        .unwrap();

    manager.handle(&mouse(N::Wheel, 5.0, 5.0).with_wheel_delta(Vec2::new(0.0, 3.0)));
    manager.handle(&mouse(N::Wheel, 100.0, 40.0).with_wheel_delta(Vec2::new(0.0, -3.0)));

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].hit_source, HitSource::Section);
    assert_eq!(events[0].identity, None);
    assert_eq!(events[0].local_coordinates, Point::new(50.0, 20.0));
    assert_eq!(events[0].delta, Some(Vec2::new(0.0, -3.0)));
}

#[test]
fn client_points_go_through_the_root_transform() {
    let mut manager = EventManager::new(Device::Mouse, AlwaysListening).with_transform(
        RootTransform::Canvas {
            origin: Point::new(100.0, 100.0),
        },
    );
    let events: Events = Rc::default();
    manager
        .add_mark_interaction(K::Click, &bar("bar", 10.0, 10.0), recording(&events))
        .unwrap();

    manager.handle(&mouse(N::Click, 20.0, 15.0));
    manager.handle(&mouse(N::Click, 120.0, 115.0));

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].screen_coordinates, Point::new(20.0, 15.0));
    assert_eq!(events[0].client, Point::new(120.0, 115.0));
}

#[test]
fn pinch_reports_distance_change_over_section_height() {
    let mut manager = EventManager::new(Device::Touch, AlwaysListening);
    let events: Events = Rc::default();
    manager
        .add_interaction(K::Pinch, &section(), recording(&events))
        .unwrap();

    let touches = |name, a: (f64, f64), b: (f64, f64)| {
        NativeEvent::touches(name, &[Point::new(a.0, a.1), Point::new(b.0, b.1)])
    };
    manager.handle(&touches(N::TouchStart, (50.0, 50.0), (150.0, 50.0)));
    manager.handle(&touches(N::TouchMove, (60.0, 50.0), (140.0, 50.0)));
    manager.handle(&touches(N::TouchMove, (50.0, 50.0), (150.0, 50.0)));
    manager.handle(&NativeEvent::touches(N::TouchEnd, &[]));
    manager.handle(&touches(N::TouchMove, (40.0, 50.0), (160.0, 50.0)));

    let events = events.borrow();
    assert_eq!(events.len(), 2);
    let first = events[0].pinch.unwrap();
    assert!((first.delta - 0.2).abs() < 1e-12, "{}", first.delta);
    assert_eq!(first.center, Point::new(100.0, 50.0));
    assert_eq!(first.fingers, [Point::new(60.0, 50.0), Point::new(140.0, 50.0)]);
    let second = events[1].pinch.unwrap();
    assert!((second.delta + 0.2).abs() < 1e-12, "{}", second.delta);
}

#[test]
fn touch_hover_and_drag_through_start_move_end() {
    let mut manager = EventManager::new(Device::Touch, AlwaysListening);
    let events: Events = Rc::default();
    for mark in [bar("left", 10.0, 10.0), bar("right", 60.0, 10.0)] {
        for kind in [K::TouchOver, K::TouchOut, K::TouchDrag] {
            manager
                .add_mark_interaction(kind, &mark, recording(&events))
                .unwrap();
        }
    }
    let touch = |name, x, y| NativeEvent::touches(name, &[Point::new(x, y)]);

    manager.handle(&touch(N::TouchStart, 20.0, 15.0));
    assert_eq!(manager.dragging(), [&Identity::Mark("left".into())]);
    manager.handle(&touch(N::TouchMove, 65.0, 15.0));
    manager.handle(&touch(N::TouchMove, 66.0, 16.0));
    // The grab set stays as it was at touch-down.
    assert_eq!(manager.dragging(), [&Identity::Mark("left".into())]);
    manager.handle(&touch(N::TouchEnd, 66.0, 16.0));

    let log: Vec<_> = events
        .borrow()
        .iter()
        .map(|e| (e.kind, e.identity.clone().unwrap().to_string(), e.drag_type, e.delta))
        .collect();
    let left = || "left".to_string();
    let right = || "right".to_string();
    assert_eq!(
        log,
        [
            (K::TouchOver, left(), None, None),
            (K::TouchDrag, left(), Some(DragPhase::Start), Some(Vec2::ZERO)),
            (K::TouchOver, right(), None, None),
            (K::TouchOut, left(), None, None),
            (K::TouchDrag, left(), Some(DragPhase::Drag), Some(Vec2::new(45.0, 0.0))),
            (K::TouchDrag, left(), Some(DragPhase::Drag), Some(Vec2::new(1.0, 1.0))),
            (K::TouchOut, right(), None, None),
            (K::TouchDrag, left(), Some(DragPhase::End), Some(Vec2::ZERO)),
        ]
    );
    assert!(manager.dragging().is_empty());
    assert!(manager.hovered().is_empty());
}

#[test]
fn touch_drag_ends_on_cancel_without_pointers() {
    let mut manager = EventManager::new(Device::Touch, AlwaysListening);
    let events: Events = Rc::default();
    manager
        .add_mark_interaction(K::TouchDrag, &bar("bar", 10.0, 10.0), recording(&events))
        .unwrap();

    manager.handle(&NativeEvent::touches(N::TouchStart, &[Point::new(20.0, 15.0)]));
    manager.handle(&NativeEvent::touches(N::TouchMove, &[Point::new(22.0, 18.0)]));
    manager.handle(&NativeEvent::touches(N::TouchCancel, &[]));

    let events = events.borrow();
    let phases: Vec<_> = events.iter().map(|e| e.drag_type).collect();
    assert_eq!(
        phases,
        [Some(DragPhase::Start), Some(DragPhase::Drag), Some(DragPhase::End)]
    );
    assert_eq!(events[2].screen_coordinates, Point::new(22.0, 18.0));
    assert!(manager.dragging().is_empty());
}

#[test]
fn graphic_routes_by_device() {
    let mut graphic = Graphic::new(RootTransform::default(), AlwaysListening, AlwaysListening);
    let events: Events = Rc::default();
    let mark = bar("bar", 10.0, 10.0);
    graphic
        .add_mark_interaction(K::TouchDown, &mark, recording(&events))
        .unwrap();
    graphic
        .add_mark_interaction(K::Click, &mark, recording(&events))
        .unwrap();
    assert_eq!(graphic.touch().index().len(), 1);
    assert_eq!(graphic.mouse().index().len(), 1);

    graphic.handle(&NativeEvent::new(N::TouchStart, [PointerCoords::at(Point::new(20.0, 15.0))]));
    graphic.handle(&mouse(N::Click, 20.0, 15.0));
    assert_eq!(kinds(&events), [K::TouchDown, K::Click]);

    // Moved out from under the pointer.
    graphic.update_mark(&bar("bar", 100.0, 50.0));
    graphic.handle(&mouse(N::Click, 20.0, 15.0));
    assert_eq!(events.borrow().len(), 2);

    graphic.remove("bar");
    assert!(graphic.mouse().index().is_empty());
    assert!(graphic.touch().index().is_empty());

    assert_eq!(graphic.next_id(), 0);
    assert_eq!(graphic.next_id(), 1);
}
