// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-device event dispatch.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Vec2};
use thicket_geometry::{GeometryError, Layer, Mark, Section};
use thicket_index::{HitParams, Identity, IndexMode, IndexedItem, SpatialIndex, Source};
use tracing::{debug, trace};

use crate::drag::DragState;
use crate::error::InteractionError;
use crate::event::{DragPhase, HitSource, InteractionEvent, Pinch};
use crate::kind::{Device, InteractionKind, NativeEventName};
use crate::native::{Listeners, NativeEvent, NativeSurface, RootTransform};

use InteractionKind as K;
use NativeEventName as N;

const HOVER_KINDS: [InteractionKind; 4] = [K::MouseOver, K::MouseOut, K::TouchOver, K::TouchOut];
const DRAG_KINDS: [InteractionKind; 2] = [K::MouseDrag, K::TouchDrag];

/// An interaction callback. It may register, unregister, load or remove
/// through the manager it is handed.
pub type InteractionCallback = Rc<dyn Fn(&InteractionEvent, &mut EventManager)>;

struct Registration<T> {
    target: T,
    callbacks: HashMap<InteractionKind, InteractionCallback>,
}

impl<T> Registration<T> {
    fn new(target: T) -> Self {
        Self {
            target,
            callbacks: HashMap::new(),
        }
    }
}

/// Transient per-session state. Everything here is dropped when the session
/// ends or its last listener goes away.
#[derive(Debug, Default)]
struct Sessions {
    hover: HashMap<Identity, IndexedItem>,
    drag: HashMap<Identity, IndexedItem>,
    drag_state: DragState,
    /// Previous finger distance per pinching section.
    pinch: HashMap<String, f64>,
}

impl Sessions {
    fn forget_hover(&mut self, owner: &str) {
        self.hover.retain(|identity, _| identity.owner() != owner);
    }

    fn forget_drag(&mut self, owner: &str) {
        self.drag.retain(|identity, _| identity.owner() != owner);
        if self.drag.is_empty() {
            self.drag_state.end();
        }
    }

    fn forget(&mut self, owner: &str) {
        self.forget_hover(owner);
        self.forget_drag(owner);
    }
}

enum Target {
    Item(IndexedItem),
    Section(Rc<Section>),
}

/// One callback invocation, computed before any callback runs.
struct Pending {
    kind: InteractionKind,
    target: Target,
    at: Point,
    drag: Option<DragPhase>,
    delta: Option<Vec2>,
    pinch: Option<Pinch>,
}

impl Pending {
    fn new(kind: InteractionKind, target: Target, at: Point) -> Self {
        Self {
            kind,
            target,
            at,
            drag: None,
            delta: None,
            pinch: None,
        }
    }

    fn item(kind: InteractionKind, item: IndexedItem, at: Point) -> Self {
        Self::new(kind, Target::Item(item), at)
    }

    fn with_drag(mut self, phase: DragPhase, delta: Option<Vec2>) -> Self {
        self.drag = Some(phase);
        self.delta = delta;
        self
    }

    fn into_event(self, native: &NativeEvent) -> InteractionEvent {
        let primary = native.primary().copied().unwrap_or_default();
        let mut event = InteractionEvent {
            kind: self.kind,
            native_type: native.name,
            screen_coordinates: self.at,
            local_coordinates: self.at,
            hit_source: HitSource::Section,
            identity: None,
            mark_type: None,
            hit_bbox: None,
            index: None,
            key: None,
            drag_type: self.drag,
            delta: self.delta,
            pinch: self.pinch,
            modifiers: native.modifiers,
            client: primary.client,
            page: primary.page,
            screen: primary.screen,
            time_stamp: native.time_stamp,
        };
        match self.target {
            Target::Item(item) => {
                event.local_coordinates = item.source.section().to_local(self.at);
                event.hit_source = if item.source.is_layer() {
                    HitSource::Layer
                } else {
                    HitSource::Mark
                };
                event.mark_type = Some(item.source.kind());
                event.hit_bbox = Some(item.rect());
                event.index = item.index;
                event.key = item.key;
                event.identity = Some(item.identity);
            }
            Target::Section(section) => {
                event.local_coordinates = section.to_local(self.at);
            }
        }
        if self.kind == K::Wheel {
            event.delta = Some(native.wheel_delta);
        }
        event
    }
}

fn sort_items(items: &mut [IndexedItem]) {
    items.sort_by(|a, b| a.identity.cmp(&b.identity));
}

fn same_source(a: &Source, b: &Source) -> bool {
    match (a, b) {
        (Source::Mark(a), Source::Mark(b)) => Rc::ptr_eq(a, b),
        (Source::Layer(a), Source::Layer(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Dispatches one device's native events to mark, layer and section callbacks.
///
/// The manager owns an extent-mode [`SpatialIndex`] of everything that has an
/// interaction registered. Each [`handle`](Self::handle) call:
///
/// 1. maps the client position into root pixels,
/// 2. runs every handler the event feeds (hit-testing where the kind needs it,
///    diffing against session state where it keeps any),
/// 3. invokes the resulting callbacks in order.
///
/// Step 2 finishes before step 3 begins, and each callback is looked up again
/// right before it runs. A callback may therefore unregister itself or others;
/// emissions for ids that are no longer registered are skipped.
pub struct EventManager {
    device: Device,
    index: SpatialIndex,
    transform: RootTransform,
    surface: Box<dyn NativeSurface>,
    listeners: Listeners,
    /// Registrations per kind, across marks, layers and sections.
    kinds: HashMap<InteractionKind, usize>,
    marks: HashMap<String, Registration<Source>>,
    sections: HashMap<String, Registration<Rc<Section>>>,
    sessions: Sessions,
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("device", &self.device)
            .field("index", &self.index)
            .field("transform", &self.transform)
            .field("listeners", &self.listeners)
            .field("kinds", &self.kinds)
            .field("marks", &self.marks.len())
            .field("sections", &self.sections.len())
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

impl EventManager {
    /// A manager for `device` that attaches native listeners on `surface`.
    pub fn new(device: Device, surface: impl NativeSurface + 'static) -> Self {
        Self {
            device,
            index: SpatialIndex::new(IndexMode::Extent),
            transform: RootTransform::default(),
            surface: Box::new(surface),
            listeners: Listeners::default(),
            kinds: HashMap::new(),
            marks: HashMap::new(),
            sections: HashMap::new(),
            sessions: Sessions::default(),
        }
    }

    /// Set the client-to-root mapping.
    #[must_use]
    pub fn with_transform(mut self, transform: RootTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the hit tolerances.
    #[must_use]
    pub fn with_params(mut self, params: HitParams) -> Self {
        self.index = mem::take(&mut self.index).with_params(params);
        self
    }

    /// The device this manager serves.
    pub fn device(&self) -> Device {
        self.device
    }

    /// The hit-testing index.
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// The client-to-root mapping.
    pub fn transform(&self) -> &RootTransform {
        &self.transform
    }

    /// Replace the client-to-root mapping, e.g. after the root moved.
    pub fn set_transform(&mut self, transform: RootTransform) {
        self.transform = transform;
    }

    /// How many active interaction kinds hold the native listener for `name`.
    pub fn listener_count(&self, name: NativeEventName) -> usize {
        self.listeners.count(name)
    }

    /// Returns `true` if a mark, layer or section `id` has a `kind` callback.
    pub fn is_registered(&self, kind: InteractionKind, id: &str) -> bool {
        self.marks
            .get(id)
            .map(|r| &r.callbacks)
            .or_else(|| self.sections.get(id).map(|r| &r.callbacks))
            .is_some_and(|callbacks| callbacks.contains_key(&kind))
    }

    /// Identities under the pointer, as of the last hover update. Sorted.
    pub fn hovered(&self) -> Vec<&Identity> {
        let mut ids: Vec<_> = self.sessions.hover.keys().collect();
        ids.sort_unstable();
        ids
    }

    /// Identities grabbed by the current drag session. Sorted.
    pub fn dragging(&self) -> Vec<&Identity> {
        let mut ids: Vec<_> = self.sessions.drag.keys().collect();
        ids.sort_unstable();
        ids
    }

    /// Items whose geometry contains a root-relative point.
    pub fn query_point(&self, point: Point) -> Vec<&IndexedItem> {
        self.index.query_point(point)
    }

    /// Items whose box intersects a root-relative rectangle.
    pub fn query_box(&self, rect: Rect) -> Vec<&IndexedItem> {
        self.index.query_box(rect)
    }

    /// Register `callback` for `kind` on a mark, indexing the mark if needed.
    ///
    /// Registering the same kind again replaces the callback.
    pub fn add_mark_interaction(
        &mut self,
        kind: InteractionKind,
        mark: &Rc<Mark>,
        callback: impl Fn(&InteractionEvent, &mut Self) + 'static,
    ) -> Result<(), InteractionError> {
        self.check(kind, HitSource::Mark)?;
        self.register(kind, Source::Mark(Rc::clone(mark)), Rc::new(callback))
    }

    /// Register `callback` for `kind` on every element of a layer.
    pub fn add_layer_interaction(
        &mut self,
        kind: InteractionKind,
        layer: &Rc<Layer>,
        callback: impl Fn(&InteractionEvent, &mut Self) + 'static,
    ) -> Result<(), InteractionError> {
        self.check(kind, HitSource::Layer)?;
        self.register(kind, Source::Layer(Rc::clone(layer)), Rc::new(callback))
    }

    /// Register `callback` for `kind` on a section background.
    pub fn add_interaction(
        &mut self,
        kind: InteractionKind,
        section: &Rc<Section>,
        callback: impl Fn(&InteractionEvent, &mut Self) + 'static,
    ) -> Result<(), InteractionError> {
        self.check(kind, HitSource::Section)?;
        let registration = self
            .sections
            .entry(section.id.clone())
            .or_insert_with(|| Registration::new(Rc::clone(section)));
        registration.target = Rc::clone(section);
        if registration.callbacks.insert(kind, Rc::new(callback)).is_none() {
            self.acquire(kind);
        }
        debug!(?kind, section = %section.id, "add section interaction");
        Ok(())
    }

    /// Drop a mark's `kind` callback. The last kind of a mark un-indexes it.
    pub fn remove_mark_interaction(&mut self, kind: InteractionKind, id: &str) {
        self.unregister(kind, id);
    }

    /// Drop a layer's `kind` callback. The last kind of a layer un-indexes it.
    pub fn remove_layer_interaction(&mut self, kind: InteractionKind, id: &str) {
        self.unregister(kind, id);
    }

    /// Drop a section's `kind` callback.
    pub fn remove_interaction(&mut self, kind: InteractionKind, section_id: &str) {
        let Some(registration) = self.sections.get_mut(section_id) else {
            return;
        };
        if registration.callbacks.remove(&kind).is_none() {
            return;
        }
        if registration.callbacks.is_empty() {
            self.sections.remove(section_id);
        }
        if kind == K::Pinch {
            self.sessions.pinch.remove(section_id);
        }
        self.release(kind);
    }

    /// Index or re-index a mark. Registered callbacks are kept.
    pub fn load_mark(&mut self, mark: &Rc<Mark>) {
        self.index.index_mark(mark);
        if let Some(registration) = self.marks.get_mut(&mark.id) {
            registration.target = Source::Mark(Rc::clone(mark));
        }
    }

    /// Index or re-index a layer. On error the layer is removed.
    pub fn load_layer(&mut self, layer: &Rc<Layer>) -> Result<(), GeometryError> {
        if let Err(err) = self.index.index_layer(layer) {
            self.remove_source(&layer.id);
            return Err(err);
        }
        if let Some(registration) = self.marks.get_mut(&layer.id) {
            registration.target = Source::Layer(Rc::clone(layer));
        }
        Ok(())
    }

    /// Un-index a mark and drop all of its registrations and session state.
    pub fn remove_mark(&mut self, id: &str) {
        self.remove_source(id);
    }

    /// Un-index a layer and drop all of its registrations and session state.
    pub fn remove_layer(&mut self, id: &str) {
        self.remove_source(id);
    }

    /// Dispatch a native event forwarded by the host.
    ///
    /// Events of the other device are ignored.
    pub fn handle(&mut self, event: &NativeEvent) {
        if event.name.device() != self.device {
            return;
        }
        let points: Vec<Point> = event
            .pointers
            .iter()
            .map(|p| self.transform.to_root(p.client))
            .collect();
        let at = points.first().copied();
        let mut out = Vec::new();
        match event.name {
            N::Click => self.press(K::Click, at, &mut out),
            N::MouseDown => {
                self.press(K::MouseDown, at, &mut out);
                self.drag_start(K::MouseDrag, at, &mut out);
            }
            N::MouseUp => {
                self.press(K::MouseUp, at, &mut out);
                self.drag_end(K::MouseDrag, at, &mut out);
            }
            N::MouseMove => {
                self.hover(K::MouseOver, K::MouseOut, at, &mut out);
                self.drag_move(K::MouseDrag, at, &mut out);
                self.background(K::MouseMove, at, &mut out);
            }
            N::Wheel => self.background(K::Wheel, at, &mut out),
            N::TouchStart => {
                self.press(K::TouchDown, at, &mut out);
                self.hover(K::TouchOver, K::TouchOut, at, &mut out);
                self.drag_start(K::TouchDrag, at, &mut out);
                self.pinch_start(&points);
            }
            N::TouchMove => {
                self.hover(K::TouchOver, K::TouchOut, at, &mut out);
                self.drag_move(K::TouchDrag, at, &mut out);
                self.pinch_move(&points, &mut out);
                self.background(K::TouchMove, at, &mut out);
            }
            N::TouchEnd | N::TouchCancel => {
                if event.name == N::TouchEnd {
                    self.press(K::TouchUp, at, &mut out);
                }
                self.hover_exit_all(K::TouchOut, at, &mut out);
                self.drag_end(K::TouchDrag, at, &mut out);
                self.sessions.pinch.clear();
            }
        }
        trace!(event = event.name.as_str(), emissions = out.len(), "dispatch");
        self.emit(event, out);
    }

    fn check(&self, kind: InteractionKind, target: HitSource) -> Result<(), InteractionError> {
        let fits = match target {
            HitSource::Section => kind.on_sections(),
            HitSource::Mark | HitSource::Layer => kind.on_marks(),
        };
        if fits && kind.device() == self.device {
            Ok(())
        } else {
            Err(InteractionError::UnsupportedKind {
                kind,
                device: self.device,
                target,
            })
        }
    }

    fn register(
        &mut self,
        kind: InteractionKind,
        source: Source,
        callback: InteractionCallback,
    ) -> Result<(), InteractionError> {
        let id = String::from(source.id());
        let stale = self
            .marks
            .get(&id)
            .is_none_or(|r| !same_source(&r.target, &source));
        if stale {
            let indexed = match &source {
                Source::Mark(mark) => {
                    self.index.index_mark(mark);
                    Ok(())
                }
                Source::Layer(layer) => self.index.index_layer(layer),
            };
            if let Err(err) = indexed {
                self.remove_source(&id);
                return Err(err.into());
            }
        }
        debug!(?kind, %id, "add interaction");
        let registration = self
            .marks
            .entry(id)
            .or_insert_with(|| Registration::new(source.clone()));
        registration.target = source;
        if registration.callbacks.insert(kind, callback).is_none() {
            self.acquire(kind);
        }
        Ok(())
    }

    fn unregister(&mut self, kind: InteractionKind, id: &str) {
        let Some(registration) = self.marks.get_mut(id) else {
            return;
        };
        if registration.callbacks.remove(&kind).is_none() {
            return;
        }
        let callbacks = &registration.callbacks;
        let hovers = HOVER_KINDS.iter().any(|k| callbacks.contains_key(k));
        let drags = DRAG_KINDS.iter().any(|k| callbacks.contains_key(k));
        if callbacks.is_empty() {
            self.marks.remove(id);
            self.index.unindex_mark(id);
        }
        if !hovers {
            self.sessions.forget_hover(id);
        }
        if !drags {
            self.sessions.forget_drag(id);
        }
        debug!(?kind, id, "remove interaction");
        self.release(kind);
    }

    fn remove_source(&mut self, id: &str) {
        self.index.unindex_mark(id);
        self.sessions.forget(id);
        if let Some(registration) = self.marks.remove(id) {
            for kind in registration.callbacks.into_keys() {
                self.release(kind);
            }
        }
    }

    fn acquire(&mut self, kind: InteractionKind) {
        let count = self.kinds.entry(kind).or_insert(0);
        *count += 1;
        if *count == 1 {
            self.listeners
                .acquire(kind.native_events(), self.surface.as_mut());
        }
    }

    fn release(&mut self, kind: InteractionKind) {
        let Some(count) = self.kinds.get_mut(&kind) else {
            return;
        };
        *count -= 1;
        if *count > 0 {
            return;
        }
        self.kinds.remove(&kind);
        self.listeners
            .release(kind.native_events(), self.surface.as_mut());
        match kind {
            K::MouseOver | K::MouseOut | K::TouchOver | K::TouchOut => {
                if !HOVER_KINDS.iter().any(|k| self.is_active(*k)) {
                    self.sessions.hover.clear();
                }
            }
            K::MouseDrag | K::TouchDrag => {
                self.sessions.drag.clear();
                self.sessions.drag_state.end();
            }
            K::Pinch => self.sessions.pinch.clear(),
            _ => {}
        }
    }

    fn is_active(&self, kind: InteractionKind) -> bool {
        self.kinds.contains_key(&kind)
    }

    /// Indexed items under `at` inside their section whose owner registered
    /// any of `kinds`, sorted by identity.
    fn hits(&self, at: Point, kinds: &[InteractionKind]) -> Vec<IndexedItem> {
        let mut hits: Vec<IndexedItem> = self
            .index
            .query_point(at)
            .into_iter()
            .filter(|item| item.source.section().contains(at))
            .filter(|item| {
                self.marks
                    .get(item.source.id())
                    .is_some_and(|r| kinds.iter().any(|k| r.callbacks.contains_key(k)))
            })
            .cloned()
            .collect();
        sort_items(&mut hits);
        hits
    }

    /// Stateless kinds: every hit item, then every section under the point.
    fn press(&self, kind: InteractionKind, at: Option<Point>, out: &mut Vec<Pending>) {
        let Some(at) = at else {
            return;
        };
        if !self.is_active(kind) {
            return;
        }
        out.extend(
            self.hits(at, &[kind])
                .into_iter()
                .map(|item| Pending::item(kind, item, at)),
        );
        self.background(kind, Some(at), out);
    }

    fn background(&self, kind: InteractionKind, at: Option<Point>, out: &mut Vec<Pending>) {
        let Some(at) = at else {
            return;
        };
        if !self.is_active(kind) {
            return;
        }
        let mut sections: Vec<Rc<Section>> = self
            .sections
            .values()
            .filter(|r| r.callbacks.contains_key(&kind) && r.target.contains(at))
            .map(|r| Rc::clone(&r.target))
            .collect();
        sections.sort_by(|a, b| a.id.cmp(&b.id));
        out.extend(
            sections
                .into_iter()
                .map(|section| Pending::new(kind, Target::Section(section), at)),
        );
    }

    /// Enter for newly hit identities, then exit for those no longer hit.
    fn hover(
        &mut self,
        over: InteractionKind,
        exit: InteractionKind,
        at: Option<Point>,
        out: &mut Vec<Pending>,
    ) {
        let Some(at) = at else {
            return;
        };
        if !self.is_active(over) && !self.is_active(exit) {
            return;
        }
        let current: HashMap<Identity, IndexedItem> = self
            .hits(at, &[over, exit])
            .into_iter()
            .map(|item| (item.identity.clone(), item))
            .collect();
        let previous = mem::replace(&mut self.sessions.hover, current);
        let current = &self.sessions.hover;

        let mut entered: Vec<IndexedItem> = current
            .values()
            .filter(|item| !previous.contains_key(&item.identity))
            .cloned()
            .collect();
        let mut exited: Vec<IndexedItem> = previous
            .into_values()
            .filter(|item| !current.contains_key(&item.identity))
            .collect();
        sort_items(&mut entered);
        sort_items(&mut exited);
        out.extend(entered.into_iter().map(|item| Pending::item(over, item, at)));
        out.extend(exited.into_iter().map(|item| Pending::item(exit, item, at)));
    }

    /// The pointer left the surface: everything hovered exits.
    fn hover_exit_all(&mut self, exit: InteractionKind, at: Option<Point>, out: &mut Vec<Pending>) {
        let mut exited: Vec<IndexedItem> = self.sessions.hover.drain().map(|(_, item)| item).collect();
        sort_items(&mut exited);
        out.extend(exited.into_iter().map(|item| {
            let at = at.unwrap_or_else(|| item.rect().center());
            Pending::item(exit, item, at)
        }));
    }

    /// Grab everything under the pointer. A session already running keeps
    /// its grabbed set.
    fn drag_start(&mut self, kind: InteractionKind, at: Option<Point>, out: &mut Vec<Pending>) {
        let Some(at) = at else {
            return;
        };
        if !self.is_active(kind) || self.sessions.drag_state.is_dragging() {
            return;
        }
        let grabbed = self.hits(at, &[kind]);
        if grabbed.is_empty() {
            return;
        }
        debug!(?kind, grabbed = grabbed.len(), "drag start");
        self.sessions.drag_state.start(at);
        self.sessions.drag = grabbed
            .iter()
            .map(|item| (item.identity.clone(), item.clone()))
            .collect();
        out.extend(grabbed.into_iter().map(|item| {
            Pending::item(kind, item, at).with_drag(DragPhase::Start, Some(Vec2::ZERO))
        }));
    }

    fn drag_move(&mut self, kind: InteractionKind, at: Option<Point>, out: &mut Vec<Pending>) {
        let Some(at) = at else {
            return;
        };
        let Some(delta) = self.sessions.drag_state.update(at) else {
            return;
        };
        let mut active: Vec<IndexedItem> = self.sessions.drag.values().cloned().collect();
        sort_items(&mut active);
        out.extend(
            active
                .into_iter()
                .map(|item| Pending::item(kind, item, at).with_drag(DragPhase::Drag, Some(delta))),
        );
    }

    fn drag_end(&mut self, kind: InteractionKind, at: Option<Point>, out: &mut Vec<Pending>) {
        let Some(at) = at.or_else(|| self.sessions.drag_state.last()) else {
            return;
        };
        if !self.sessions.drag_state.is_dragging() {
            return;
        }
        let delta = self.sessions.drag_state.update(at);
        self.sessions.drag_state.end();
        let mut ended: Vec<IndexedItem> = self.sessions.drag.drain().map(|(_, item)| item).collect();
        sort_items(&mut ended);
        debug!(?kind, ended = ended.len(), "drag end");
        out.extend(
            ended
                .into_iter()
                .map(|item| Pending::item(kind, item, at).with_drag(DragPhase::End, delta)),
        );
    }

    fn pinch_start(&mut self, points: &[Point]) {
        let &[a, b, ..] = points else {
            return;
        };
        if !self.is_active(K::Pinch) {
            return;
        }
        let distance = a.distance(b);
        for (id, registration) in &self.sections {
            let section = &registration.target;
            if registration.callbacks.contains_key(&K::Pinch)
                && section.contains(a)
                && section.contains(b)
            {
                self.sessions.pinch.insert(id.clone(), distance);
            }
        }
    }

    fn pinch_move(&mut self, points: &[Point], out: &mut Vec<Pending>) {
        let &[a, b, ..] = points else {
            return;
        };
        if self.sessions.pinch.is_empty() {
            return;
        }
        let distance = a.distance(b);
        let center = a.midpoint(b);
        let mut ids: Vec<String> = self.sessions.pinch.keys().cloned().collect();
        ids.sort_unstable();
        for id in ids {
            let Some(section) = self.sections.get(&id).map(|r| Rc::clone(&r.target)) else {
                continue;
            };
            let Some(previous) = self.sessions.pinch.insert(id, distance) else {
                continue;
            };
            let height = section.padded_bbox.height();
            if height <= 0.0 {
                continue;
            }
            let pinch = Pinch {
                center,
                fingers: [section.to_local(a), section.to_local(b)],
                delta: (previous - distance) / height,
            };
            let mut pending = Pending::new(K::Pinch, Target::Section(section), center);
            pending.pinch = Some(pinch);
            out.push(pending);
        }
    }

    fn callback(&self, kind: InteractionKind, target: &Target) -> Option<InteractionCallback> {
        let callbacks = match target {
            Target::Item(item) => &self.marks.get(item.source.id())?.callbacks,
            Target::Section(section) => &self.sections.get(&section.id)?.callbacks,
        };
        callbacks.get(&kind).cloned()
    }

    fn emit(&mut self, native: &NativeEvent, pending: Vec<Pending>) {
        for p in pending {
            // Looked up per emission: an earlier callback may have unregistered it.
            let Some(callback) = self.callback(p.kind, &p.target) else {
                trace!(kind = ?p.kind, "skip unregistered");
                continue;
            };
            let event = p.into_event(native);
            callback(&event, self);
        }
    }
}
