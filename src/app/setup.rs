//! Startup systems: scene, lights and the player camera.
//!
//! The occupancy grid and door set are built in `main` before the app runs;
//! this module only spawns entities that render or follow them.
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use roomwalk::grid::OccupancyGrid;
use roomwalk::level::LevelLayout;
use roomwalk::player::{CameraConfig, CameraController};
use roomwalk::settings::Settings;

use super::player::PlayerFillLight;

/// Spawn the floor, lights and the camera at the level's spawn point.
///
/// # Arguments
/// - `commands`: Commands used to spawn entities and insert resources.
/// - `meshes`, `materials`: asset stores for the floor plane.
/// - `settings`: camera tuning.
/// - `layout`: spawn point and ground level.
/// - `grid`: floor extent.
/// - `windows`: primary window, for the initial mouse-look center.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
    layout: Res<LevelLayout>,
    grid: Res<OccupancyGrid>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let (width, height) = windows
        .get_single()
        .map_or((1280.0, 720.0), |w| (w.resolution.width(), w.resolution.height()));

    let mut controller = CameraController::new(CameraConfig::from_settings(&settings), width, height);
    controller.set_ground_level(layout.ground_level);
    controller.set_position(layout.spawn.0, layout.spawn.1);
    info!(
        "spawning camera at ({}, {}) in level '{}'",
        layout.spawn.0, layout.spawn.1, layout.name
    );

    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(controller.position())
                .looking_to(controller.forward(), Vec3::Y),
            ..default()
        },
        controller,
    ));

    commands.spawn(PbrBundle {
        mesh: meshes.add(Plane3d::default().mesh().size(grid.size(), grid.size())),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.33, 0.3),
            perceptual_roughness: 0.9,
            ..default()
        }),
        ..default()
    });

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            shadows_enabled: false,
            illuminance: 1200.0,
            color: Color::srgb(0.72, 0.78, 0.90),
            ..default()
        },
        transform: Transform::from_xyz(0.0, 10.0, 0.0).looking_at(Vec3::new(2.0, 0.0, 1.0), Vec3::Y),
        ..default()
    });

    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                intensity: 4000.0,
                range: 20.0,
                color: Color::srgb(0.9, 0.92, 1.0),
                shadows_enabled: false,
                ..default()
            },
            transform: Transform::from_translation(Vec3::new(layout.spawn.0, layout.ground_level, layout.spawn.1)),
            ..default()
        },
        PlayerFillLight,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });
}
