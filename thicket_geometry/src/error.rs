// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use thiserror::Error;

/// Errors raised while building command tapes or resolving layer properties.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// An `arc` or `ellipse` op was given a negative radius.
    #[error("negative radius {radius} in `{op}`")]
    NegativeRadius {
        /// The op name.
        op: &'static str,
        /// The offending radius.
        radius: f64,
    },
    /// An argument was NaN or infinite.
    #[error("non-finite argument in `{op}`")]
    NonFinite {
        /// The op name.
        op: &'static str,
    },
    /// The op name is not a known drawing operation.
    #[error("unknown drawing op `{0}`")]
    UnknownOp(String),
    /// The op was given the wrong number of arguments.
    #[error("`{op}` takes {expected} arguments, got {got}")]
    Arity {
        /// The op name.
        op: &'static str,
        /// Accepted argument counts, e.g. `"5 or 6"`.
        expected: &'static str,
        /// Number of arguments supplied.
        got: usize,
    },
    /// A per-element layer property has no value for an element.
    #[error("layer `{layer}` has no `{property}` for element {index}")]
    MissingElement {
        /// The layer id.
        layer: String,
        /// The property name.
        property: &'static str,
        /// The element index.
        index: usize,
    },
}
