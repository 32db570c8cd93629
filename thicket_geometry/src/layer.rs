// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layers: batches of homogeneous marks with per-element properties.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::error::GeometryError;
use crate::label::{Anchor, TextMeasure};
use crate::mark::{Extent, MarkProps, MarkType};
use crate::section::{ClipMode, Section};
use crate::tape::CommandTape;

/// A layer property: one value for every element, one per element, or computed
/// from the element index.
#[derive(Clone)]
pub enum Aesthetic<T> {
    /// Shared by every element.
    Constant(T),
    /// Element `i` takes entry `i`.
    Array(Vec<T>),
    /// Element `i` takes `f(i)`.
    Function(Rc<dyn Fn(usize) -> T>),
}

impl<T: fmt::Debug> fmt::Debug for Aesthetic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Array(values) => f.debug_tuple("Array").field(values).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl<T: Default> Default for Aesthetic<T> {
    fn default() -> Self {
        Self::Constant(T::default())
    }
}

impl<T: Clone> Aesthetic<T> {
    /// A value shared by every element.
    pub fn constant(value: T) -> Self {
        Self::Constant(value)
    }

    /// One value per element.
    pub fn array(values: impl Into<Vec<T>>) -> Self {
        Self::Array(values.into())
    }

    /// A value computed from the element index.
    pub fn function(f: impl Fn(usize) -> T + 'static) -> Self {
        Self::Function(Rc::new(f))
    }

    /// Value for element `index`, or `None` past the end of an array.
    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            Self::Constant(value) => Some(value.clone()),
            Self::Array(values) => values.get(index).cloned(),
            Self::Function(f) => Some(f(index)),
        }
    }
}

/// Per-element style and geometry attributes of a [`Layer`].
///
/// Mirrors [`MarkProps`] field for field.
#[derive(Clone, Debug)]
pub struct LayerProps {
    /// Fill paint.
    pub fill: Aesthetic<Option<String>>,
    /// Stroke paint.
    pub stroke: Aesthetic<Option<String>>,
    /// Stroke width in pixels.
    pub stroke_width: Aesthetic<f64>,
    /// Opacity.
    pub opacity: Aesthetic<f64>,
    /// Clip override.
    pub clip: Aesthetic<Option<ClipMode>>,
    /// Label rotation in degrees.
    pub rotate: Aesthetic<f64>,
    /// Label anchor.
    pub anchor_point: Aesthetic<Anchor>,
    /// Label font size.
    pub font_size: Aesthetic<f64>,
    /// Label font family.
    pub font_family: Aesthetic<Option<String>>,
    /// Label text.
    pub text: Aesthetic<Option<String>>,
}

impl Default for LayerProps {
    fn default() -> Self {
        Self::uniform(MarkProps::default())
    }
}

impl LayerProps {
    /// Every element shares `props`.
    pub fn uniform(props: MarkProps) -> Self {
        Self {
            fill: Aesthetic::Constant(props.fill),
            stroke: Aesthetic::Constant(props.stroke),
            stroke_width: Aesthetic::Constant(props.stroke_width),
            opacity: Aesthetic::Constant(props.opacity),
            clip: Aesthetic::Constant(props.clip),
            rotate: Aesthetic::Constant(props.rotate),
            anchor_point: Aesthetic::Constant(props.anchor_point),
            font_size: Aesthetic::Constant(props.font_size),
            font_family: Aesthetic::Constant(props.font_family),
            text: Aesthetic::Constant(props.text),
        }
    }
}

/// N homogeneous marks sharing one id, type and property schema.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Identifier, unique within a graphic.
    pub id: String,
    /// Mark type of every element.
    pub kind: MarkType,
    /// One tape per element.
    pub positioning: Vec<CommandTape>,
    /// Per-element properties.
    pub props: LayerProps,
    /// Optional stable keys, one per element.
    pub keys: Option<Vec<String>>,
    /// The section the layer is drawn in.
    pub section: Rc<Section>,
}

impl Layer {
    /// A layer with default properties and no keys.
    pub fn new(
        id: impl Into<String>,
        kind: MarkType,
        positioning: Vec<CommandTape>,
        section: Rc<Section>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            positioning,
            props: LayerProps::default(),
            keys: None,
            section,
        }
    }

    /// Replace the properties.
    #[must_use]
    pub fn with_props(mut self, props: LayerProps) -> Self {
        self.props = props;
        self
    }

    /// Set element keys.
    #[must_use]
    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.positioning.len()
    }

    /// Returns `true` if the layer has no elements.
    pub fn is_empty(&self) -> bool {
        self.positioning.is_empty()
    }

    /// The key of element `index`, if keys were supplied for it.
    pub fn key(&self, index: usize) -> Option<&str> {
        self.keys.as_ref()?.get(index).map(String::as_str)
    }

    /// Resolve the properties of element `index`.
    pub fn element_props(&self, index: usize) -> Result<MarkProps, GeometryError> {
        fn pick<T: Clone>(
            layer: &str,
            property: &'static str,
            value: &Aesthetic<T>,
            index: usize,
        ) -> Result<T, GeometryError> {
            value.get(index).ok_or_else(|| GeometryError::MissingElement {
                layer: layer.into(),
                property,
                index,
            })
        }
        let p = &self.props;
        let id = self.id.as_str();
        Ok(MarkProps {
            fill: pick(id, "fill", &p.fill, index)?,
            stroke: pick(id, "stroke", &p.stroke, index)?,
            stroke_width: pick(id, "stroke_width", &p.stroke_width, index)?,
            opacity: pick(id, "opacity", &p.opacity, index)?,
            clip: pick(id, "clip", &p.clip, index)?,
            rotate: pick(id, "rotate", &p.rotate, index)?,
            anchor_point: pick(id, "anchor_point", &p.anchor_point, index)?,
            font_size: pick(id, "font_size", &p.font_size, index)?,
            font_family: pick(id, "font_family", &p.font_family, index)?,
            text: pick(id, "text", &p.text, index)?,
        })
    }

    /// Hit boxes of every element, tagged with the element index.
    pub fn extents(&self, measure: &dyn TextMeasure) -> Result<Vec<(usize, Extent)>, GeometryError> {
        let mut out = Vec::with_capacity(self.len());
        for (index, tape) in self.positioning.iter().enumerate() {
            let props = self.element_props(index)?;
            let clip = self.section.clip_rect(props.clip);
            out.extend(
                self.kind
                    .bounding_boxes(tape, &props, clip, measure)
                    .into_iter()
                    .map(|extent| (index, extent)),
            );
        }
        Ok(out)
    }

    /// Centroid of every non-empty element, tagged with the element index.
    pub fn centroids(&self, measure: &dyn TextMeasure) -> Result<Vec<(usize, Point)>, GeometryError> {
        let mut out = Vec::with_capacity(self.len());
        for (index, tape) in self.positioning.iter().enumerate() {
            let props = self.element_props(index)?;
            if let Some(c) = self.kind.centroid(tape, &props, measure) {
                out.push((index, c));
            }
        }
        Ok(out)
    }
}
