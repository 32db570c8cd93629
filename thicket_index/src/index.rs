// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-context index of marks and layers.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect};
use smallvec::SmallVec;
use thicket_geometry::{
    ApproxTextMeasure, Extent, GeometryError, Layer, Mark, MarkProps, Part, TextMeasure,
};
use thicket_rtree::{Aabb2D, Bounded, RTree, RTreeConfig};
use tracing::{debug, trace};

use crate::hit::{HitParams, HitShape, ShapeBuilder};
use crate::identity::{Identity, Source};

/// What an index stores for each mark.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum IndexMode {
    /// Clipped hit boxes, refined against exact geometry (pointer contexts).
    #[default]
    Extent,
    /// A zero-area box at each element's centroid (brushing).
    Centroid,
}

/// One box in the index.
#[derive(Clone, Debug)]
pub struct IndexedItem {
    /// The stored box.
    pub bbox: Aabb2D,
    /// Identity of the mark or layer element.
    pub identity: Identity,
    /// The mark or layer the box came from.
    pub source: Source,
    /// Layer element index.
    pub index: Option<usize>,
    /// Segment index, for line marks.
    pub segment: Option<usize>,
    /// Layer element key.
    pub key: Option<String>,
    shape: HitShape,
}

impl IndexedItem {
    /// The stored box as a Kurbo rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.bbox.min_x, self.bbox.min_y, self.bbox.max_x, self.bbox.max_y)
    }

    /// The element's resolved properties.
    pub fn props(&self) -> Result<MarkProps, GeometryError> {
        match &self.source {
            Source::Mark(mark) => Ok(mark.props.clone()),
            Source::Layer(layer) => layer.element_props(self.index.unwrap_or_default()),
        }
    }

    /// Returns `true` if `point` hits the item's exact geometry.
    pub fn hit(&self, point: Point, params: &HitParams) -> bool {
        self.shape.hit(point, params)
    }
}

impl Bounded for IndexedItem {
    fn aabb(&self) -> Aabb2D {
        self.bbox
    }
}

pub(crate) fn to_aabb(rect: Rect) -> Aabb2D {
    let r = rect.abs();
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

/// A spatial index of marks and layers for one interaction context.
///
/// Each indexed mark or layer contributes one or more [`IndexedItem`]s. Indexing
/// an id again replaces its items; unindexing an unknown id does nothing.
pub struct SpatialIndex {
    tree: RTree<IndexedItem>,
    mode: IndexMode,
    params: HitParams,
    measure: Rc<dyn TextMeasure>,
    /// Boxes stored per mark or layer id.
    owners: HashMap<String, SmallVec<[Aabb2D; 4]>>,
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("mode", &self.mode)
            .field("params", &self.params)
            .field("owners", &self.owners.len())
            .field("items", &self.tree.len())
            .finish_non_exhaustive()
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(IndexMode::default())
    }
}

impl SpatialIndex {
    /// An empty index.
    pub fn new(mode: IndexMode) -> Self {
        Self::with_config(mode, RTreeConfig::default())
    }

    /// An empty index with a tree configuration.
    pub fn with_config(mode: IndexMode, config: RTreeConfig) -> Self {
        Self {
            tree: RTree::with_config(config),
            mode,
            params: HitParams::default(),
            measure: Rc::new(ApproxTextMeasure::default()),
            owners: HashMap::new(),
        }
    }

    /// Set the hit tolerances.
    #[must_use]
    pub fn with_params(mut self, params: HitParams) -> Self {
        self.params = params;
        self
    }

    /// Set the text measurer used for label boxes.
    #[must_use]
    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Rc::new(measure);
        self
    }

    /// What the index stores.
    pub fn mode(&self) -> IndexMode {
        self.mode
    }

    /// Hit tolerances.
    pub fn params(&self) -> &HitParams {
        &self.params
    }

    /// Number of indexed marks and layers.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Number of stored boxes.
    pub fn item_count(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if a mark or layer with this id is indexed.
    pub fn contains(&self, id: &str) -> bool {
        self.owners.contains_key(id)
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.owners.clear();
    }

    /// Index a mark, replacing any items already stored under its id.
    pub fn index_mark(&mut self, mark: &Rc<Mark>) {
        self.unindex(&mark.id);
        let source = Source::Mark(Rc::clone(mark));
        let identity = Identity::Mark(mark.id.clone());
        let items = match self.mode {
            IndexMode::Extent => {
                let extents = mark.extents(self.measure.as_ref());
                let mut builder = ShapeBuilder::new(mark.kind, &mark.tape, &mark.props);
                extents
                    .iter()
                    .map(|e| extent_item(e, &mut builder, &identity, &source, None, None))
                    .collect::<Vec<_>>()
            }
            IndexMode::Centroid => mark
                .centroid(self.measure.as_ref())
                .map(|c| centroid_item(c, identity, source, None, None))
                .into_iter()
                .collect(),
        };
        debug!(id = %mark.id, boxes = items.len(), mode = ?self.mode, "index mark");
        self.store(&mark.id, items);
    }

    /// Remove a mark's items. Returns `false` if it was not indexed.
    pub fn unindex_mark(&mut self, id: &str) -> bool {
        self.unindex(id)
    }

    /// Index every element of a layer, replacing any items already stored
    /// under its id.
    ///
    /// On error the index is left without the layer.
    pub fn index_layer(&mut self, layer: &Rc<Layer>) -> Result<(), GeometryError> {
        self.unindex(&layer.id);
        let source = Source::Layer(Rc::clone(layer));
        let mut items = Vec::with_capacity(layer.len());
        for (index, tape) in layer.positioning.iter().enumerate() {
            let props = layer.element_props(index)?;
            let identity = Identity::of_element(layer, index);
            let key = layer.key(index).map(String::from);
            match self.mode {
                IndexMode::Extent => {
                    let clip = layer.section.clip_rect(props.clip);
                    let extents =
                        layer
                            .kind
                            .bounding_boxes(tape, &props, clip, self.measure.as_ref());
                    let mut builder = ShapeBuilder::new(layer.kind, tape, &props);
                    items.extend(extents.iter().map(|e| {
                        extent_item(e, &mut builder, &identity, &source, Some(index), key.clone())
                    }));
                }
                IndexMode::Centroid => {
                    if let Some(c) = layer.kind.centroid(tape, &props, self.measure.as_ref()) {
                        items.push(centroid_item(c, identity, source.clone(), Some(index), key));
                    }
                }
            }
        }
        debug!(id = %layer.id, elements = layer.len(), boxes = items.len(), mode = ?self.mode, "index layer");
        self.store(&layer.id, items);
        Ok(())
    }

    /// Remove a layer's items. Returns `false` if it was not indexed.
    pub fn unindex_layer(&mut self, id: &str) -> bool {
        self.unindex(id)
    }

    /// Items whose exact geometry contains `point`, one per identity, in tree
    /// order.
    pub fn query_point(&self, point: Point) -> Vec<&IndexedItem> {
        let query = Aabb2D::from_point(point.x, point.y);
        let coarse = self.tree.search(&query);
        let refine = self.mode == IndexMode::Extent;
        let hits = dedup(
            coarse
                .into_iter()
                .filter(|item| !refine || item.hit(point, &self.params)),
        );
        trace!(x = point.x, y = point.y, hits = hits.len(), "query point");
        hits
    }

    /// Items whose box intersects `rect`, one per identity, unrefined.
    pub fn query_box(&self, rect: Rect) -> Vec<&IndexedItem> {
        let hits = dedup(self.tree.search(&to_aabb(rect)).into_iter());
        trace!(?rect, hits = hits.len(), "query box");
        hits
    }

    /// Every stored item, in tree order.
    pub fn items(&self) -> impl Iterator<Item = &IndexedItem> + '_ {
        self.tree.iter()
    }

    fn store(&mut self, id: &str, items: Vec<IndexedItem>) {
        let boxes = items.iter().map(|item| item.bbox).collect();
        self.tree.load(items);
        self.owners.insert(id.into(), boxes);
    }

    fn unindex(&mut self, id: &str) -> bool {
        let Some(boxes) = self.owners.remove(id) else {
            return false;
        };
        for bbox in &boxes {
            self.tree
                .remove_by(bbox, |item| item.source.id() == id && item.bbox == *bbox);
        }
        debug!(id, boxes = boxes.len(), "unindex");
        true
    }
}

fn extent_item(
    extent: &Extent,
    builder: &mut ShapeBuilder<'_>,
    identity: &Identity,
    source: &Source,
    index: Option<usize>,
    key: Option<String>,
) -> IndexedItem {
    IndexedItem {
        bbox: to_aabb(extent.bbox),
        identity: identity.clone(),
        source: source.clone(),
        index,
        segment: match extent.part {
            Part::Segment(i) => Some(i),
            _ => None,
        },
        key,
        shape: builder.shape(&extent.part),
    }
}

fn centroid_item(
    centroid: Point,
    identity: Identity,
    source: Source,
    index: Option<usize>,
    key: Option<String>,
) -> IndexedItem {
    IndexedItem {
        bbox: Aabb2D::from_point(centroid.x, centroid.y),
        identity,
        source,
        index,
        segment: None,
        key,
        shape: HitShape::Coarse,
    }
}

/// Keep the first item of each identity.
fn dedup<'a>(items: impl Iterator<Item = &'a IndexedItem>) -> Vec<&'a IndexedItem> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(&item.identity) {
            out.push(item);
        }
    }
    out
}
