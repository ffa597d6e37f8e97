//! Selection handling and the per-step orientation update

use bevy::ecs::entity::EntityHashMap;
use bevy::prelude::*;
use rotator_core::SelectionChange;
use tracing::debug;

use crate::directory::{engine_quat, pose_of, WorldDirectory};
use crate::types::{Bindings, Controller, Rotator, RotatorAction, RotatorRequest, SelectionChanged};

/// Pick default selections for new rotators and queue their first resolve
pub fn init_rotators(
    mut rotators: Query<(Entity, &mut Rotator), Added<Rotator>>,
    directory: WorldDirectory,
    mut changed: MessageWriter<SelectionChanged>,
) {
    for (entity, mut rotator) in rotators.iter_mut() {
        let selections = rotator.state.selections_mut();
        selections.select_default_local(&directory);

        let local = selections.local_controller().map(str::to_owned);
        let remote = selections.remote_controller().map(str::to_owned);
        changed.write(SelectionChanged {
            rotator: entity,
            change: SelectionChange::LocalController(local),
        });
        changed.write(SelectionChanged {
            rotator: entity,
            change: SelectionChange::RemoteController(remote),
        });
    }
}

/// Apply user requests to rotator state
pub fn apply_requests(
    mut requests: MessageReader<RotatorRequest>,
    mut rotators: Query<&mut Rotator>,
    directory: WorldDirectory,
    mut changed: MessageWriter<SelectionChanged>,
) {
    for request in requests.read() {
        let Ok(mut rotator) = rotators.get_mut(request.rotator) else {
            debug!(rotator = ?request.rotator, "Request for missing rotator dropped");
            continue;
        };
        let state = &mut rotator.state;

        let changes = match &request.action {
            RotatorAction::SetLocalController(name) => {
                state.selections_mut().set_local_controller(name.as_str())
            }
            RotatorAction::SetRemoteObject(name) => {
                state.selections_mut().set_remote_object(&directory, name.as_str())
            }
            RotatorAction::SetRemoteController(name) => {
                state.selections_mut().set_remote_controller(name.as_str())
            }
            RotatorAction::SetOffset(offset) => {
                state.set_offset(*offset);
                Vec::new()
            }
            RotatorAction::SetPaused(paused) => {
                state.set_paused(*paused);
                Vec::new()
            }
            RotatorAction::ResetOffset => {
                state.reset_offset();
                Vec::new()
            }
            RotatorAction::RecordOffset => {
                let local = state.selections().resolve_local(&directory);
                let remote = state.selections().resolve_remote(&directory);
                state.record_offset(local.as_ref(), remote.as_ref());
                Vec::new()
            }
        };

        changed.write_batch(changes.into_iter().map(|change| SelectionChanged {
            rotator: request.rotator,
            change,
        }));
    }
}

/// Re-resolve controller entities of rotators.
///
/// A side is resolved again when its selection changed, when it is selected
/// but unbound (the controller may have spawned since), or when its entity is
/// no longer a controller.
pub fn resolve_bindings(
    mut changed: MessageReader<SelectionChanged>,
    mut rotators: Query<(Entity, &mut Rotator)>,
    directory: WorldDirectory,
) {
    let mut dirty: EntityHashMap<(bool, bool)> = EntityHashMap::default();
    for message in changed.read() {
        let sides = dirty.entry(message.rotator).or_default();
        sides.0 |= message.change.affects_local();
        sides.1 |= message.change.affects_remote();
    }

    for (entity, mut rotator) in rotators.iter_mut() {
        let (local_changed, remote_changed) = dirty.get(&entity).copied().unwrap_or_default();
        let selections = rotator.state.selections();
        let local = selections.local_binding();
        let remote = selections.remote_binding();

        let mut bindings = rotator.bindings;
        if local_changed || needs_resolve(&directory, bindings.local, local.is_some()) {
            bindings.local =
                local.and_then(|(object, controller)| directory.controller_entity(object, controller));
        }
        if remote_changed || needs_resolve(&directory, bindings.remote, remote.is_some()) {
            bindings.remote =
                remote.and_then(|(object, controller)| directory.controller_entity(object, controller));
        }

        if rotator.bindings != bindings {
            debug!(rotator = ?entity, ?bindings, "Bindings resolved");
            rotator.bindings = bindings;
        }
    }
}

fn needs_resolve(directory: &WorldDirectory, bound: Option<Entity>, selected: bool) -> bool {
    match bound {
        Some(entity) => !directory.is_controller(entity),
        None => selected,
    }
}

/// Turn each bound local controller toward its remote controller.
///
/// Paused rotators, missing bindings and despawned controllers are skipped
/// without touching the transform.
pub fn orient_controllers(
    rotators: Query<&Rotator>,
    mut controllers: Query<(&mut Transform, &GlobalTransform, Option<&ChildOf>), With<Controller>>,
    parents: Query<&GlobalTransform>,
) {
    for rotator in rotators.iter() {
        if rotator.state.is_paused() {
            continue;
        }
        let Bindings {
            local: Some(local),
            remote: Some(remote),
        } = rotator.bindings
        else {
            continue;
        };

        let Ok((_, remote_global, _)) = controllers.get(remote) else {
            continue;
        };
        let remote_pose = pose_of(remote_global);

        let Ok((mut transform, local_global, child_of)) = controllers.get_mut(local) else {
            continue;
        };
        let local_pose = pose_of(local_global);

        let Some(world_rotation) = rotator.state.step(Some(&local_pose), Some(&remote_pose)) else {
            continue;
        };

        // Transform.rotation is relative to the parent
        let parent_rotation = child_of
            .and_then(|child_of| parents.get(child_of.parent()).ok())
            .map(|parent| parent.to_scale_rotation_translation().1)
            .unwrap_or(Quat::IDENTITY);
        transform.rotation = (parent_rotation.inverse() * engine_quat(world_rotation)).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SceneObject;
    use crate::RotatorPlugin;
    use bevy::time::TimeUpdateStrategy;
    use rotator_core::{Offset, Settings};
    use std::time::Duration;

    const EPS: f32 = 1e-4;

    struct TestScene {
        app: App,
        person: Entity,
        head: Entity,
        sphere_control: Entity,
    }

    /// App whose clock never advances, so fixed steps only run when a test asks
    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin, RotatorPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::ZERO));
        app
    }

    fn test_scene() -> TestScene {
        let mut app = test_app();

        let person = app
            .world_mut()
            .spawn((
                SceneObject::new("Person"),
                Transform::from_xyz(0.0, 0.0, 0.0),
                Rotator::new("Person"),
            ))
            .id();
        let head = app
            .world_mut()
            .spawn((
                Controller::new("headControl"),
                Transform::from_xyz(0.0, 1.5, 0.0),
                ChildOf(person),
            ))
            .id();
        app.world_mut().spawn((
            Controller::new("hipControl"),
            Transform::from_xyz(0.0, 1.0, 0.0),
            ChildOf(person),
        ));

        let sphere = app
            .world_mut()
            .spawn((SceneObject::new("Sphere"), Transform::from_xyz(0.0, 1.5, 5.0)))
            .id();
        let sphere_control = app
            .world_mut()
            .spawn((Controller::new("control"), Transform::default(), ChildOf(sphere)))
            .id();

        app.update();
        TestScene {
            app,
            person,
            head,
            sphere_control,
        }
    }

    fn request(scene: &mut TestScene, action: RotatorAction) {
        let rotator = scene.person;
        scene
            .app
            .world_mut()
            .write_message(RotatorRequest::new(rotator, action));
        scene.app.update();
    }

    fn fixed_step(scene: &mut TestScene) {
        scene.app.world_mut().run_schedule(FixedUpdate);
        scene.app.update();
    }

    fn forward_of(scene: &TestScene, entity: Entity) -> Vec3 {
        let global = scene.app.world().get::<GlobalTransform>(entity).unwrap();
        global.to_scale_rotation_translation().1 * Vec3::Z
    }

    fn rotator(scene: &TestScene) -> &Rotator {
        scene.app.world().get::<Rotator>(scene.person).unwrap()
    }

    #[test]
    fn test_new_rotator_picks_first_controller() {
        let scene = test_scene();
        let rotator = rotator(&scene);

        assert_eq!(rotator.state.selections().local_controller(), Some("headControl"));
        assert_eq!(rotator.bindings.local, Some(scene.head));
        assert_eq!(rotator.bindings.remote, None);
    }

    #[test]
    fn test_unresolved_remote_leaves_rotation() {
        let mut scene = test_scene();
        fixed_step(&mut scene);

        let transform = scene.app.world().get::<Transform>(scene.head).unwrap();
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_controller_faces_remote() {
        let mut scene = test_scene();
        request(&mut scene, RotatorAction::SetRemoteObject("Sphere".into()));

        // Sphere has a single controller, so it is selected automatically
        let bindings = rotator(&scene).bindings;
        assert_eq!(bindings.remote, Some(scene.sphere_control));

        fixed_step(&mut scene);
        assert!(forward_of(&scene, scene.head).abs_diff_eq(Vec3::Z, EPS));
    }

    #[test]
    fn test_rotation_accounts_for_parent() {
        let mut scene = test_scene();
        scene
            .app
            .world_mut()
            .get_mut::<Transform>(scene.person)
            .unwrap()
            .rotation = Quat::from_rotation_y(1.0);
        scene.app.update();

        request(&mut scene, RotatorAction::SetRemoteObject("Sphere".into()));
        fixed_step(&mut scene);

        let head = scene.app.world().get::<GlobalTransform>(scene.head).unwrap();
        let target = scene
            .app
            .world()
            .get::<GlobalTransform>(scene.sphere_control)
            .unwrap();
        let expected = (target.translation() - head.translation()).normalize();
        assert!(forward_of(&scene, scene.head).abs_diff_eq(expected, EPS));
    }

    #[test]
    fn test_pause_freezes_rotation() {
        let mut scene = test_scene();
        request(&mut scene, RotatorAction::SetRemoteObject("Sphere".into()));
        fixed_step(&mut scene);
        let before = scene.app.world().get::<Transform>(scene.head).unwrap().rotation;

        request(&mut scene, RotatorAction::SetPaused(true));
        scene
            .app
            .world_mut()
            .get_mut::<Transform>(scene.sphere_control)
            .unwrap()
            .translation = Vec3::new(4.0, 0.0, 0.0);
        for _ in 0..5 {
            fixed_step(&mut scene);
        }

        let after = scene.app.world().get::<Transform>(scene.head).unwrap().rotation;
        assert_eq!(before, after);
    }

    #[test]
    fn test_despawned_remote_is_skipped() {
        let mut scene = test_scene();
        request(&mut scene, RotatorAction::SetRemoteObject("Sphere".into()));
        fixed_step(&mut scene);
        let before = scene.app.world().get::<Transform>(scene.head).unwrap().rotation;

        scene.app.world_mut().despawn(scene.sphere_control);
        fixed_step(&mut scene);

        let after = scene.app.world().get::<Transform>(scene.head).unwrap().rotation;
        assert_eq!(before, after);
    }

    #[test]
    fn test_record_and_reset_requests() {
        let mut scene = test_scene();
        request(&mut scene, RotatorAction::SetRemoteObject("Sphere".into()));

        // Pose the head by hand: pitched 30 degrees relative to facing the sphere
        scene
            .app
            .world_mut()
            .get_mut::<Transform>(scene.head)
            .unwrap()
            .rotation = Quat::from_rotation_x(30f32.to_radians());
        scene.app.update();

        request(&mut scene, RotatorAction::RecordOffset);
        let offset = rotator(&scene).state.offset();
        assert!((offset.x - 30.0).abs() < 1e-2, "got {offset:?}");
        assert!(offset.y.abs() < 1e-2);
        assert!(offset.z.abs() < 1e-2);

        request(&mut scene, RotatorAction::ResetOffset);
        assert!(rotator(&scene).state.offset().is_zero());
    }

    #[test]
    fn test_set_offset_request_clamps() {
        let mut scene = test_scene();
        request(
            &mut scene,
            RotatorAction::SetOffset(Offset { x: 500.0, y: 0.0, z: -190.0 }),
        );
        assert_eq!(rotator(&scene).state.offset(), Offset::new(180.0, 0.0, -180.0));
    }

    #[test]
    fn test_switching_local_controller_rebinds() {
        let mut scene = test_scene();
        request(&mut scene, RotatorAction::SetLocalController("hipControl".into()));

        let rotator = rotator(&scene);
        assert_ne!(rotator.bindings.local, Some(scene.head));
        assert!(rotator.bindings.local.is_some());
    }

    #[test]
    fn test_target_spawned_later_is_bound() {
        let mut app = test_app();

        let settings = Settings {
            local_controller: Some("eye".into()),
            remote_object: Some("Target".into()),
            remote_controller: Some("core".into()),
            ..Default::default()
        };
        let host = app
            .world_mut()
            .spawn((SceneObject::new("Camera"), Rotator::from_settings("Camera", &settings)))
            .id();
        let eye = app
            .world_mut()
            .spawn((Controller::new("eye"), ChildOf(host)))
            .id();
        app.update();
        assert_eq!(app.world().get::<Rotator>(host).unwrap().bindings.remote, None);

        // Target arrives after the rotator has already resolved once
        let target = app.world_mut().spawn(SceneObject::new("Target")).id();
        let core = app
            .world_mut()
            .spawn((Controller::new("core"), Transform::from_xyz(3.0, 0.0, 0.0), ChildOf(target)))
            .id();
        app.update();

        let rotator = app.world().get::<Rotator>(host).unwrap();
        assert_eq!(rotator.bindings.local, Some(eye));
        assert_eq!(rotator.bindings.remote, Some(core));

        app.world_mut().run_schedule(FixedUpdate);
        app.update();
        let forward = app
            .world()
            .get::<GlobalTransform>(eye)
            .unwrap()
            .to_scale_rotation_translation()
            .1
            * Vec3::Z;
        assert!(forward.abs_diff_eq(Vec3::X, EPS), "got {forward:?}");
    }

    #[test]
    fn test_respawned_remote_is_rebound() {
        let mut scene = test_scene();
        request(&mut scene, RotatorAction::SetRemoteObject("Sphere".into()));
        let sphere = scene
            .app
            .world()
            .get::<ChildOf>(scene.sphere_control)
            .unwrap()
            .parent();

        scene.app.world_mut().despawn(scene.sphere_control);
        scene.app.update();
        assert_eq!(rotator(&scene).bindings.remote, None);

        let replacement = scene
            .app
            .world_mut()
            .spawn((Controller::new("control"), Transform::from_xyz(0.0, 0.0, 1.0), ChildOf(sphere)))
            .id();
        scene.app.update();
        assert_eq!(rotator(&scene).bindings.remote, Some(replacement));

        fixed_step(&mut scene);
        assert!(forward_of(&scene, scene.head).abs_diff_eq(Vec3::Z, EPS));
    }

    #[test]
    fn test_restored_settings_bind_on_spawn() {
        let mut app = test_app();

        let settings = Settings {
            local_controller: Some("eye".into()),
            remote_object: Some("Target".into()),
            remote_controller: Some("core".into()),
            ..Default::default()
        };
        let target = app.world_mut().spawn(SceneObject::new("Target")).id();
        let core = app
            .world_mut()
            .spawn((Controller::new("core"), Transform::from_xyz(3.0, 0.0, 0.0), ChildOf(target)))
            .id();
        let host = app
            .world_mut()
            .spawn((SceneObject::new("Camera"), Rotator::from_settings("Camera", &settings)))
            .id();
        let eye = app
            .world_mut()
            .spawn((Controller::new("eye"), ChildOf(host)))
            .id();

        app.update();
        let rotator = app.world().get::<Rotator>(host).unwrap();
        assert_eq!(rotator.bindings.local, Some(eye));
        assert_eq!(rotator.bindings.remote, Some(core));

        app.world_mut().run_schedule(FixedUpdate);
        app.update();
        let forward = app
            .world()
            .get::<GlobalTransform>(eye)
            .unwrap()
            .to_scale_rotation_translation()
            .1
            * Vec3::Z;
        assert!(forward.abs_diff_eq(Vec3::X, EPS));
    }
}
