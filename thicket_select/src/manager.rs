// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle and lasso brushing sessions.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Vec2};
use thicket_geometry::{GeometryError, Layer, Mark};
use thicket_index::{Identity, IndexMode, IndexedItem, SpatialIndex, Source};
use tracing::{debug, trace};

use crate::lasso::{bounds, in_polygon, in_triangle};
use crate::selection::SelectionSet;

/// Whether an identity entered or left the selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SelectChange {
    /// Newly selected.
    Select,
    /// Newly deselected.
    Deselect,
}

/// Passed to selection callbacks.
#[derive(Clone, Debug)]
pub struct SelectEvent {
    /// Select or deselect.
    pub change: SelectChange,
    /// The affected identity.
    pub identity: Identity,
    /// Its mark or layer.
    pub source: Source,
    /// Layer element index.
    pub index: Option<usize>,
    /// Layer element key.
    pub key: Option<String>,
    /// The centroid the brush tested.
    pub centroid: Point,
}

impl SelectEvent {
    fn new(change: SelectChange, item: &IndexedItem) -> Self {
        Self {
            change,
            identity: item.identity.clone(),
            source: item.source.clone(),
            index: item.index,
            key: item.key.clone(),
            centroid: centroid(item),
        }
    }
}

/// A selection callback. It may load, unload or brush through the manager.
pub type SelectCallback = Rc<dyn Fn(&SelectEvent, &mut SelectManager)>;

/// The callbacks of one mark or layer.
#[derive(Clone, Default)]
pub struct SelectCallbacks {
    on_select: Option<SelectCallback>,
    on_deselect: Option<SelectCallback>,
}

impl fmt::Debug for SelectCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectCallbacks")
            .field("on_select", &self.on_select.is_some())
            .field("on_deselect", &self.on_deselect.is_some())
            .finish()
    }
}

impl SelectCallbacks {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for each newly selected identity.
    #[must_use]
    pub fn on_select(mut self, f: impl Fn(&SelectEvent, &mut SelectManager) + 'static) -> Self {
        self.on_select = Some(Rc::new(f));
        self
    }

    /// Called for each newly deselected identity.
    #[must_use]
    pub fn on_deselect(mut self, f: impl Fn(&SelectEvent, &mut SelectManager) + 'static) -> Self {
        self.on_deselect = Some(Rc::new(f));
        self
    }

    fn get(&self, change: SelectChange) -> Option<&SelectCallback> {
        match change {
            SelectChange::Select => self.on_select.as_ref(),
            SelectChange::Deselect => self.on_deselect.as_ref(),
        }
    }
}

/// Brushing over a centroid index.
///
/// Rectangle sessions diff each update against the previous hit set, like
/// hover. Lasso sessions toggle only the centroids inside the triangle each new
/// vertex adds, so a step costs the new area rather than the whole polygon.
///
/// Callbacks run after the selection has been updated, over a snapshot of the
/// changes; a callback whose mark was unloaded by an earlier callback is
/// skipped.
pub struct SelectManager {
    index: SpatialIndex,
    callbacks: HashMap<String, SelectCallbacks>,
    selection: SelectionSet,
    lasso: Vec<Point>,
}

impl fmt::Debug for SelectManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectManager")
            .field("index", &self.index)
            .field("callbacks", &self.callbacks.len())
            .field("selection", &self.selection.len())
            .field("lasso", &self.lasso)
            .finish()
    }
}

impl Default for SelectManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectManager {
    /// An empty manager.
    pub fn new() -> Self {
        Self {
            index: SpatialIndex::new(IndexMode::Centroid),
            callbacks: HashMap::new(),
            selection: SelectionSet::default(),
            lasso: Vec::new(),
        }
    }

    /// The centroid index.
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Vertices of the current lasso.
    pub fn select_polygon(&self) -> &[Point] {
        &self.lasso
    }

    /// Index a mark's centroid and set its callbacks, replacing earlier ones.
    ///
    /// Reloading keeps the mark selected if it was.
    pub fn load_mark(&mut self, mark: &Rc<Mark>, callbacks: SelectCallbacks) {
        self.index.index_mark(mark);
        self.refresh_selection(&mark.id);
        self.callbacks.insert(mark.id.clone(), callbacks);
    }

    /// Index a layer's element centroids and set its callbacks.
    ///
    /// Selected elements whose identity survives the reload stay selected.
    /// On error the layer is unloaded.
    pub fn load_layer(
        &mut self,
        layer: &Rc<Layer>,
        callbacks: SelectCallbacks,
    ) -> Result<(), GeometryError> {
        if let Err(err) = self.index.index_layer(layer) {
            self.unload(&layer.id);
            return Err(err);
        }
        self.refresh_selection(&layer.id);
        self.callbacks.insert(layer.id.clone(), callbacks);
        Ok(())
    }

    /// Re-index a loaded mark, keeping its callbacks. Unknown marks are ignored.
    pub fn reload_mark(&mut self, mark: &Rc<Mark>) {
        if !self.callbacks.contains_key(&mark.id) {
            return;
        }
        self.index.index_mark(mark);
        self.refresh_selection(&mark.id);
    }

    fn refresh_selection(&mut self, owner: &str) {
        let fresh = self
            .index
            .items()
            .filter(|item| item.source.id() == owner)
            .cloned();
        self.selection.refresh_owner(owner, fresh);
    }

    /// Remove a mark; its selected identities are dropped without callbacks.
    pub fn unload_mark(&mut self, id: &str) {
        self.unload(id);
    }

    /// Remove a layer; its selected identities are dropped without callbacks.
    pub fn unload_layer(&mut self, id: &str) {
        self.unload(id);
    }

    fn unload(&mut self, id: &str) {
        self.index.unindex_mark(id);
        self.callbacks.remove(id);
        self.selection.forget_owner(id);
    }

    /// Start a fresh rectangle session: deselect everything, then select what
    /// `rect` covers.
    pub fn select_rectangle(&mut self, rect: Rect) {
        self.lasso.clear();
        let covered = self.covered_by_rect(rect);
        let mut changes = self.deselect_all();
        changes.extend(self.diff_to(&covered));
        debug!(?rect, selected = self.selection.len(), "select rectangle");
        self.emit(changes);
    }

    /// Move the rectangle: select newly covered, deselect newly uncovered.
    pub fn update_select_rectangle(&mut self, rect: Rect) {
        let covered = self.covered_by_rect(rect);
        trace!(?rect, covered = covered.len(), "update select rectangle");
        let changes = self.diff_to(&covered);
        self.emit(changes);
    }

    /// Deselect everything.
    pub fn reset_select_rectangle(&mut self) {
        let changes = self.deselect_all();
        self.emit(changes);
    }

    /// Start a lasso at `point`, deselecting everything.
    pub fn start_select_polygon(&mut self, point: Point) {
        let changes = self.deselect_all();
        self.lasso.clear();
        self.lasso.push(point);
        debug!(x = point.x, y = point.y, "start select polygon");
        self.emit(changes);
    }

    /// Extend the lasso, toggling every centroid in the triangle between the
    /// start, the previous vertex and `point`.
    ///
    /// Without a started lasso the point starts one.
    pub fn add_point_to_select_polygon(&mut self, point: Point) {
        let (Some(&start), Some(&prev)) = (self.lasso.first(), self.lasso.last()) else {
            self.lasso.push(point);
            return;
        };
        self.lasso.push(point);
        if self.lasso.len() < 3 {
            return;
        }
        let Some(area) = bounds(&[start, prev, point]) else {
            return;
        };
        let toggled: Vec<IndexedItem> = self
            .index
            .query_box(area)
            .into_iter()
            .filter(|item| in_triangle(start, prev, point, centroid(item)))
            .cloned()
            .collect();
        trace!(toggled = toggled.len(), vertices = self.lasso.len(), "lasso step");
        let mut changes = Vec::with_capacity(toggled.len());
        for item in toggled {
            if let Some(removed) = self.selection.remove(&item.identity) {
                changes.push((SelectChange::Deselect, removed));
            } else {
                self.selection.insert(item.clone());
                changes.push((SelectChange::Select, item));
            }
        }
        self.emit(changes);
    }

    /// Translate the lasso by `delta` and re-select what it now encloses.
    pub fn move_select_polygon(&mut self, delta: Vec2) {
        for p in &mut self.lasso {
            *p += delta;
        }
        let enclosed: Vec<IndexedItem> = match bounds(&self.lasso) {
            Some(area) if self.lasso.len() >= 3 => self
                .index
                .query_box(area)
                .into_iter()
                .filter(|item| in_polygon(&self.lasso, centroid(item)))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };
        let changes = self.diff_to(&enclosed);
        self.emit(changes);
    }

    /// Deselect everything and drop the lasso.
    pub fn reset_select_polygon(&mut self) {
        self.lasso.clear();
        let changes = self.deselect_all();
        self.emit(changes);
    }

    fn covered_by_rect(&self, rect: Rect) -> Vec<IndexedItem> {
        self.index.query_box(rect).into_iter().cloned().collect()
    }

    /// Make the selection exactly `current`, returning the changes.
    fn diff_to(&mut self, current: &[IndexedItem]) -> Vec<(SelectChange, IndexedItem)> {
        let keep: HashSet<&Identity> = current.iter().map(|item| &item.identity).collect();
        let mut changes = Vec::new();
        for identity in self.selection.sorted().into_iter().cloned().collect::<Vec<_>>() {
            if !keep.contains(&identity) {
                if let Some(removed) = self.selection.remove(&identity) {
                    changes.push((SelectChange::Deselect, removed));
                }
            }
        }
        for item in current {
            if self.selection.insert(item.clone()) {
                changes.push((SelectChange::Select, item.clone()));
            }
        }
        changes
    }

    fn deselect_all(&mut self) -> Vec<(SelectChange, IndexedItem)> {
        self.selection
            .take_all()
            .into_iter()
            .map(|item| (SelectChange::Deselect, item))
            .collect()
    }

    fn emit(&mut self, changes: Vec<(SelectChange, IndexedItem)>) {
        for (change, item) in changes {
            // Looked up per event: an earlier callback may have unloaded the owner.
            let Some(callback) = self
                .callbacks
                .get(item.source.id())
                .and_then(|c| c.get(change))
                .cloned()
            else {
                continue;
            };
            callback(&SelectEvent::new(change, &item), self);
        }
    }
}

fn centroid(item: &IndexedItem) -> Point {
    Point::new(item.bbox.min_x, item.bbox.min_y)
}
