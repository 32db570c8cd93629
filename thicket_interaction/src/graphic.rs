// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The root object of one rendered chart.

use alloc::rc::Rc;

use thicket_geometry::{Layer, Mark, Section};
use thicket_select::SelectManager;

use crate::error::InteractionError;
use crate::event::InteractionEvent;
use crate::kind::{Device, InteractionKind};
use crate::manager::EventManager;
use crate::native::{NativeEvent, NativeSurface, RootTransform};

/// Everything interactive about one chart: a mouse manager, a touch manager,
/// a select manager and the id counter for generated mark ids.
///
/// Registration calls route to the manager of the kind's device.
#[derive(Debug)]
pub struct Graphic {
    mouse: EventManager,
    touch: EventManager,
    select: SelectManager,
    next_id: u64,
}

impl Graphic {
    /// A graphic whose managers attach listeners on the given surfaces.
    pub fn new(
        transform: RootTransform,
        mouse_surface: impl NativeSurface + 'static,
        touch_surface: impl NativeSurface + 'static,
    ) -> Self {
        Self {
            mouse: EventManager::new(Device::Mouse, mouse_surface).with_transform(transform),
            touch: EventManager::new(Device::Touch, touch_surface).with_transform(transform),
            select: SelectManager::new(),
            next_id: 0,
        }
    }

    /// The mouse manager.
    pub fn mouse(&self) -> &EventManager {
        &self.mouse
    }

    /// The touch manager.
    pub fn touch(&self) -> &EventManager {
        &self.touch
    }

    /// The manager for `device`.
    pub fn manager_mut(&mut self, device: Device) -> &mut EventManager {
        match device {
            Device::Mouse => &mut self.mouse,
            Device::Touch => &mut self.touch,
        }
    }

    /// The select manager.
    pub fn select(&self) -> &SelectManager {
        &self.select
    }

    /// The select manager, mutably.
    pub fn select_mut(&mut self) -> &mut SelectManager {
        &mut self.select
    }

    /// A fresh id, unique within this graphic.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Update the client-to-root mapping of both managers.
    pub fn set_transform(&mut self, transform: RootTransform) {
        self.mouse.set_transform(transform);
        self.touch.set_transform(transform);
    }

    /// See [`EventManager::add_mark_interaction`].
    pub fn add_mark_interaction(
        &mut self,
        kind: InteractionKind,
        mark: &Rc<Mark>,
        callback: impl Fn(&InteractionEvent, &mut EventManager) + 'static,
    ) -> Result<(), InteractionError> {
        self.manager_mut(kind.device())
            .add_mark_interaction(kind, mark, callback)
    }

    /// See [`EventManager::add_layer_interaction`].
    pub fn add_layer_interaction(
        &mut self,
        kind: InteractionKind,
        layer: &Rc<Layer>,
        callback: impl Fn(&InteractionEvent, &mut EventManager) + 'static,
    ) -> Result<(), InteractionError> {
        self.manager_mut(kind.device())
            .add_layer_interaction(kind, layer, callback)
    }

    /// See [`EventManager::add_interaction`].
    pub fn add_interaction(
        &mut self,
        kind: InteractionKind,
        section: &Rc<Section>,
        callback: impl Fn(&InteractionEvent, &mut EventManager) + 'static,
    ) -> Result<(), InteractionError> {
        self.manager_mut(kind.device())
            .add_interaction(kind, section, callback)
    }

    /// See [`EventManager::remove_mark_interaction`].
    pub fn remove_mark_interaction(&mut self, kind: InteractionKind, id: &str) {
        self.manager_mut(kind.device())
            .remove_mark_interaction(kind, id);
    }

    /// See [`EventManager::remove_layer_interaction`].
    pub fn remove_layer_interaction(&mut self, kind: InteractionKind, id: &str) {
        self.manager_mut(kind.device())
            .remove_layer_interaction(kind, id);
    }

    /// See [`EventManager::remove_interaction`].
    pub fn remove_interaction(&mut self, kind: InteractionKind, section_id: &str) {
        self.manager_mut(kind.device())
            .remove_interaction(kind, section_id);
    }

    /// Re-index an updated mark everywhere it is indexed.
    pub fn update_mark(&mut self, mark: &Rc<Mark>) {
        for manager in [&mut self.mouse, &mut self.touch] {
            if manager.index().contains(&mark.id) {
                manager.load_mark(mark);
            }
        }
        self.select.reload_mark(mark);
    }

    /// Remove a mark or layer from every manager.
    pub fn remove(&mut self, id: &str) {
        self.mouse.remove_mark(id);
        self.touch.remove_mark(id);
        self.select.unload_mark(id);
    }

    /// Route a native event to the manager of its device.
    pub fn handle(&mut self, event: &NativeEvent) {
        self.manager_mut(event.name.device()).handle(event);
    }
}
