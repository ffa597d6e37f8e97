//! Rotator Scene - Bevy integration of the rotator
//!
//! Keeps one [`Controller`] of a [`SceneObject`] facing a controller of
//! another (or the same) object. Selections change through
//! [`RotatorRequest`] messages, usually sent by the settings panel in
//! [`ui`]; the orientation itself is updated once per fixed step.

pub mod directory;
pub mod systems;
pub mod types;
pub mod ui;

use bevy::prelude::*;

/// Plugin that registers the rotator messages and systems
pub struct RotatorPlugin;

impl Plugin for RotatorPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<RotatorRequest>()
            .add_message::<SelectionChanged>()
            .add_systems(
                Update,
                (
                    systems::init_rotators,
                    systems::apply_requests,
                    systems::resolve_bindings,
                )
                    .chain()
                    .in_set(RotatorSystems::Selection),
            )
            .add_systems(
                FixedUpdate,
                systems::orient_controllers.in_set(RotatorSystems::Orient),
            );
    }
}

// Re-export commonly used types
pub use directory::WorldDirectory;
pub use types::*;
pub use ui::RotatorUiPlugin;
