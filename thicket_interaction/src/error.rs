// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thicket_geometry::GeometryError;
use thiserror::Error;

use crate::event::HitSource;
use crate::kind::{Device, InteractionKind};

/// Errors raised while registering interactions.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InteractionError {
    /// The kind belongs to another device, or cannot target this kind of source.
    #[error("{kind:?} cannot be registered on a {target:?} of the {device:?} manager")]
    UnsupportedKind {
        /// The rejected kind.
        kind: InteractionKind,
        /// Device of the manager asked to register it.
        device: Device,
        /// What it was registered on.
        target: HitSource,
    },
    /// A layer failed to index.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
