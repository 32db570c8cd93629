// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable identities for marks and layer elements.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use thicket_geometry::{Layer, Mark, MarkType, Section};

/// The key used to diff hits across frames.
///
/// Identities survive re-indexing: a mark keeps its id, a layer element keeps
/// its index (or its key, when the layer supplies keys).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identity {
    /// A standalone mark.
    Mark(String),
    /// Element `index` of a layer without keys.
    Element {
        /// The layer id.
        layer: String,
        /// The element index.
        index: usize,
    },
    /// A keyed layer element.
    Keyed {
        /// The layer id.
        layer: String,
        /// The element key.
        key: String,
    },
}

impl Identity {
    /// Identity of element `index` of `layer`: keyed if the layer has a key for it.
    pub fn of_element(layer: &Layer, index: usize) -> Self {
        match layer.key(index) {
            Some(key) => Self::Keyed {
                layer: layer.id.clone(),
                key: key.into(),
            },
            None => Self::Element {
                layer: layer.id.clone(),
                index,
            },
        }
    }

    /// Id of the mark or layer this identity belongs to.
    pub fn owner(&self) -> &str {
        match self {
            Self::Mark(id) | Self::Element { layer: id, .. } | Self::Keyed { layer: id, .. } => id,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mark(id) => f.write_str(id),
            Self::Element { layer, index } => write!(f, "{layer}-{index}"),
            Self::Keyed { key, .. } => f.write_str(key),
        }
    }
}

/// The mark or layer an indexed item was extracted from.
#[derive(Clone, Debug)]
pub enum Source {
    /// A standalone mark.
    Mark(Rc<Mark>),
    /// A layer.
    Layer(Rc<Layer>),
}

impl Source {
    /// Id of the mark or layer.
    pub fn id(&self) -> &str {
        match self {
            Self::Mark(mark) => &mark.id,
            Self::Layer(layer) => &layer.id,
        }
    }

    /// Mark type.
    pub fn kind(&self) -> MarkType {
        match self {
            Self::Mark(mark) => mark.kind,
            Self::Layer(layer) => layer.kind,
        }
    }

    /// The section the source is drawn in.
    pub fn section(&self) -> &Section {
        match self {
            Self::Mark(mark) => &mark.section,
            Self::Layer(layer) => &layer.section,
        }
    }

    /// Returns `true` for layers.
    pub fn is_layer(&self) -> bool {
        matches!(self, Self::Layer(_))
    }
}
