//! Components and messages shared by the rotator systems and UI

use bevy::prelude::*;
use rotator_core::{Offset, SelectionChange, Settings};

pub use rotator_core::Rotator as RotatorState;

/// A named object in the scene; its controllers are its children
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct SceneObject {
    pub name: String,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A named, movable point belonging to a [`SceneObject`]
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct Controller {
    pub name: String,
}

impl Controller {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Controller entities the rotator currently points at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bindings {
    /// Controller being rotated
    pub local: Option<Entity>,
    /// Controller being looked at
    pub remote: Option<Entity>,
}

/// Keeps one controller of its object facing another controller.
///
/// Goes on the same entity as the host [`SceneObject`].
#[derive(Component, Debug, Clone)]
pub struct Rotator {
    pub state: RotatorState,
    pub bindings: Bindings,
}

impl Rotator {
    pub fn new(host_object: impl Into<String>) -> Self {
        Self {
            state: RotatorState::new(host_object),
            bindings: Bindings::default(),
        }
    }

    pub fn from_settings(host_object: impl Into<String>, settings: &Settings) -> Self {
        Self {
            state: RotatorState::from_settings(host_object, settings),
            bindings: Bindings::default(),
        }
    }

    pub fn settings(&self) -> Settings {
        self.state.settings()
    }
}

/// What a [`RotatorRequest`] asks for
#[derive(Debug, Clone, PartialEq)]
pub enum RotatorAction {
    SetLocalController(String),
    SetRemoteObject(String),
    SetRemoteController(String),
    SetOffset(Offset),
    SetPaused(bool),
    ResetOffset,
    RecordOffset,
}

/// User request against one rotator, usually sent by the settings panel
#[derive(Message, Debug, Clone)]
pub struct RotatorRequest {
    pub rotator: Entity,
    pub action: RotatorAction,
}

impl RotatorRequest {
    pub fn new(rotator: Entity, action: RotatorAction) -> Self {
        Self { rotator, action }
    }
}

/// A rotator's selection changed and its bindings need resolving
#[derive(Message, Debug, Clone)]
pub struct SelectionChanged {
    pub rotator: Entity,
    pub change: SelectionChange,
}

/// System sets of the rotator plugin
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RotatorSystems {
    /// Apply requests and resolve bindings (Update)
    Selection,
    /// Turn controllers toward their targets (FixedUpdate)
    Orient,
}
