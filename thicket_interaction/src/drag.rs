// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer tracking for drag sessions.

use kurbo::{Point, Vec2};

/// Where a drag began and where the pointer was last seen.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DragState {
    start: Option<Point>,
    last: Option<Point>,
}

impl DragState {
    pub(crate) fn start(&mut self, at: Point) {
        self.start = Some(at);
        self.last = Some(at);
    }

    /// Movement since the last update; `None` when not dragging.
    pub(crate) fn update(&mut self, at: Point) -> Option<Vec2> {
        self.start?;
        let delta = self.last.map(|last| at - last);
        self.last = Some(at);
        delta
    }

    /// Last seen pointer position.
    pub(crate) fn last(&self) -> Option<Point> {
        self.last
    }

    pub(crate) fn end(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.start.is_some()
    }
}
