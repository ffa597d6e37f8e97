//! Demo scene: a turret that tracks an orbiting target

use bevy::prelude::*;
use rotator_scene::{Controller, Rotator, SceneObject};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::{save_config, TargetConfig, ViewerConfig};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene)
            .add_systems(Update, (orbit_target, save_settings));
    }
}

/// Loaded configuration and where to write it back
#[derive(Resource, Debug, Clone)]
pub struct ViewerState {
    pub config: ViewerConfig,
    pub config_path: PathBuf,
}

/// Controller moved along the target orbit
#[derive(Component)]
struct Orbiting;

/// Position on the target orbit after `elapsed` seconds
fn orbit_position(target: &TargetConfig, elapsed: f32) -> Vec3 {
    let angle = elapsed * target.speed;
    Vec3::new(
        target.radius * angle.cos(),
        target.height + 0.5 * (2.0 * angle).sin(),
        target.radius * angle.sin(),
    )
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    viewer: Res<ViewerState>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-3.0, 3.0, 5.0).looking_at(Vec3::new(0.0, 0.8, 0.0), Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 5000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(2.0, 6.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 200000.0,
            shadows_enabled: false,
            color: Color::srgb(1.0, 0.95, 0.9),
            ..default()
        },
        Transform::from_xyz(-2.0, 3.0, -2.0),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(10.0, 10.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.25, 0.27, 0.3))),
    ));

    let body = materials.add(Color::srgb(0.6, 0.62, 0.68));
    let accent = materials.add(Color::srgb(0.9, 0.45, 0.1));

    // Head is long along +Z so its facing is visible
    commands.spawn((
        SceneObject::new("Turret"),
        Rotator::from_settings("Turret", &viewer.config.settings),
        Transform::default(),
        Visibility::default(),
        children![
            (
                Controller::new("Base"),
                Mesh3d(meshes.add(Cylinder::new(0.4, 0.3))),
                MeshMaterial3d(body.clone()),
                Transform::from_xyz(0.0, 0.15, 0.0),
            ),
            (
                Controller::new("Head"),
                Mesh3d(meshes.add(Cuboid::new(0.3, 0.3, 0.8))),
                MeshMaterial3d(body),
                Transform::from_xyz(0.0, 0.8, 0.0),
                children![(
                    Mesh3d(meshes.add(Cuboid::new(0.1, 0.1, 0.3))),
                    MeshMaterial3d(accent.clone()),
                    Transform::from_xyz(0.0, 0.0, 0.5),
                )],
            ),
        ],
    ));

    commands.spawn((
        SceneObject::new("Target"),
        Transform::default(),
        Visibility::default(),
        children![(
            Controller::new("Core"),
            Orbiting,
            Mesh3d(meshes.add(Sphere::new(0.15))),
            MeshMaterial3d(accent),
            Transform::from_translation(orbit_position(&viewer.config.target, 0.0)),
        )],
    ));

    info!("Scene ready, press S to save rotator settings");
}

fn orbit_target(
    time: Res<Time>,
    viewer: Res<ViewerState>,
    mut targets: Query<&mut Transform, With<Orbiting>>,
) {
    let position = orbit_position(&viewer.config.target, time.elapsed_secs());
    for mut transform in targets.iter_mut() {
        transform.translation = position;
    }
}

fn save_settings(
    keys: Res<ButtonInput<KeyCode>>,
    rotators: Query<&Rotator>,
    mut viewer: ResMut<ViewerState>,
) {
    if !keys.just_pressed(KeyCode::KeyS) {
        return;
    }
    let Some(rotator) = rotators.iter().next() else {
        return;
    };

    viewer.config.settings = rotator.settings();
    match save_config(&viewer.config, &viewer.config_path) {
        Ok(()) => info!(path = %viewer.config_path.display(), "Saved rotator settings"),
        Err(e) => warn!(error = %e, "Failed to save rotator settings"),
    }
}
