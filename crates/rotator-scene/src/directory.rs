//! Scene directory over the ECS world

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use rotator_core::glam;
use rotator_core::{Pose, SceneDirectory};

use crate::types::{Controller, SceneObject};

/// World pose of a transform, in rotator-core types
pub fn pose_of(global: &GlobalTransform) -> Pose {
    let (_, rotation, translation) = global.to_scale_rotation_translation();
    Pose::new(
        glam::Vec3::from_array(translation.to_array()),
        glam::Quat::from_array(rotation.to_array()),
    )
}

/// Rotation from rotator-core types back into the engine's
pub fn engine_quat(rotation: glam::Quat) -> Quat {
    Quat::from_array(rotation.to_array())
}

/// Looks up [`SceneObject`]s and their [`Controller`] children by name.
///
/// Objects are listed by name; controllers in child order. When two objects
/// share a name the first one found wins.
#[derive(SystemParam)]
pub struct WorldDirectory<'w, 's> {
    objects: Query<'w, 's, (&'static SceneObject, Option<&'static Children>)>,
    controllers: Query<'w, 's, (&'static Controller, &'static GlobalTransform)>,
}

impl WorldDirectory<'_, '_> {
    fn object_controllers(&self, object: &str) -> Option<Vec<Entity>> {
        let (_, children) = self
            .objects
            .iter()
            .find(|(scene_object, _)| scene_object.name == object)?;

        let Some(children) = children else {
            return Some(Vec::new());
        };
        let children: &[Entity] = children;
        Some(
            children
                .iter()
                .copied()
                .filter(|&child| self.controllers.contains(child))
                .collect(),
        )
    }

    /// Whether `entity` is still a live controller
    pub fn is_controller(&self, entity: Entity) -> bool {
        self.controllers.contains(entity)
    }

    /// Entity of a named controller on a named object
    pub fn controller_entity(&self, object: &str, controller: &str) -> Option<Entity> {
        self.object_controllers(object)?
            .into_iter()
            .find(|&entity| {
                self.controllers
                    .get(entity)
                    .is_ok_and(|(found, _)| found.name == controller)
            })
    }
}

impl SceneDirectory for WorldDirectory<'_, '_> {
    fn objects(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .objects
            .iter()
            .map(|(scene_object, _)| scene_object.name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn controllers(&self, object: &str) -> Option<Vec<String>> {
        let entities = self.object_controllers(object)?;
        Some(
            entities
                .into_iter()
                .filter_map(|entity| self.controllers.get(entity).ok())
                .map(|(controller, _)| controller.name.clone())
                .collect(),
        )
    }

    fn controller_pose(&self, object: &str, controller: &str) -> Option<Pose> {
        let entity = self.controller_entity(object, controller)?;
        let (_, global) = self.controllers.get(entity).ok()?;
        Some(pose_of(global))
    }
}
