//! Debug utilities: a gizmo overlay of blocked cells (F2 default) and a
//! system (F3 default) that dumps the camera state and an ASCII map of the
//! occupancy grid to a timestamped text file in './debug-dumps/'.
//!
//! The dump is handy for checking why the camera stops where it does without
//! attaching a debugger.
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;

use crate::grid::OccupancyGrid;
use crate::player::controller::CameraController;
use crate::player::input::{Action, KeyBindings};

/// Cap on cells drawn per frame by the overlay.
const MAX_RENDER_CELLS: usize = 4096;
/// Overlay lines sit slightly above the floor to avoid z-fighting.
const OVERLAY_LIFT: f32 = 0.02;
const DUMP_DIR: &str = "debug-dumps";

#[derive(Resource, Default)]
pub struct DebugGridVisible(pub bool);

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugGridVisible>()
            .add_systems(Update, (toggle_debug_grid, render_blocked_cells, debug_input_system));
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_grid(
    mut visible: ResMut<DebugGridVisible>,
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
) {
    if keys.just_pressed(bindings.key(Action::ToggleDebugGrid)) {
        visible.0 = !visible.0;
    }
}

/// Outline every blocked cell on the floor plane.
///
/// # Arguments
/// * `visible` - overlay toggle
/// * `gizmos` - immediate-mode line drawing
/// * `grid` - occupancy grid to visualise
#[allow(clippy::needless_pass_by_value)]
pub fn render_blocked_cells(visible: Res<DebugGridVisible>, mut gizmos: Gizmos, grid: Res<OccupancyGrid>) {
    if !visible.0 {
        return;
    }
    let y = OVERLAY_LIFT;
    let red = Color::srgb(1.0, 0.1, 0.1);
    let half = grid.cell_size() / 2.0;

    for (cx, cz) in grid.iter_blocked().take(MAX_RENDER_CELLS) {
        let Some(center) = grid.cell_center(cx, cz) else { continue };
        let corners = [
            Vec3::new(center.x - half, y, center.y - half),
            Vec3::new(center.x + half, y, center.y - half),
            Vec3::new(center.x + half, y, center.y + half),
            Vec3::new(center.x - half, y, center.y + half),
        ];
        for i in 0..4 {
            gizmos.line(corners[i], corners[(i + 1) % 4], red);
        }
        gizmos.line(corners[0], corners[2], red);
    }
}

/// Human-readable snapshot of the camera and the grid around it.
///
/// # Arguments
/// * `controller` - camera to describe
/// * `grid` - occupancy grid, drawn with the camera's cell marked `@`
/// * `fps` - smoothed frame rate, if diagnostics are available
/// * `now` - timestamp written into the header
#[must_use]
pub fn snapshot_text(controller: &CameraController, grid: &OccupancyGrid, fps: Option<f64>, now: DateTime<Utc>) -> String {
    let pos = controller.position();
    let pose = controller.pose();
    let vel = controller.velocity();
    let cell = grid.world_to_grid(pos.x, pos.z);

    let mut out = String::new();
    writeln!(out, "Debug dump: {}", now.timestamp()).ok();
    writeln!(out, "Timestamp: {}", now.format("%Y-%m-%d %H:%M:%S")).ok();
    if let Some(fps) = fps {
        writeln!(out, "FPS: {fps:.1}").ok();
    }
    writeln!(out, "Mode: {:?}", controller.mode()).ok();
    writeln!(out, "Position: ({:.3}, {:.3}, {:.3})", pos.x, pos.y, pos.z).ok();
    writeln!(out, "Yaw/pitch: {:.2} / {:.2} deg", pose.yaw, pose.pitch).ok();
    writeln!(
        out,
        "Velocity: ({:.3}, {:.3}, {:.3}), sprint x{:.3}",
        vel.velocity.x, vel.velocity.y, vel.velocity.z, vel.speed_multiplier
    )
    .ok();
    writeln!(out, "Jump: {:?}, ground level {:.2}", vel.jump, controller.ground_level()).ok();
    let contact = controller.last_contact();
    if contact.any() {
        writeln!(out, "Contact: x={} z={}", contact.x, contact.z).ok();
    }
    let look = controller.mouse_look();
    let window = look.window_size();
    writeln!(out, "Window: {} x {}, mouse anchored {}", window.x, window.y, look.is_anchored()).ok();
    match cell {
        Some((cx, cz)) => writeln!(out, "Cell: ({cx}, {cz})").ok(),
        None => writeln!(out, "Cell: off grid").ok(),
    };
    writeln!(
        out,
        "Grid: {} x {} cells of {:.2}, {} blocked",
        grid.segments(),
        grid.segments(),
        grid.cell_size(),
        grid.blocked_count()
    )
    .ok();
    writeln!(out, "\n{}", grid.ascii_map(cell)).ok();
    out
}

/// Write a debug dump when the dump key goes down.
#[allow(clippy::needless_pass_by_value)]
fn debug_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    diagnostics: Option<Res<DiagnosticsStore>>,
    grid: Res<OccupancyGrid>,
    cameras: Query<&CameraController>,
) {
    if !keys.just_pressed(bindings.key(Action::DebugDump)) {
        return;
    }
    let Ok(controller) = cameras.get_single() else {
        warn!("debug dump: no camera controller");
        return;
    };

    let now = Utc::now();
    let fps = diagnostics
        .as_ref()
        .and_then(|d| d.get(&FrameTimeDiagnosticsPlugin::FPS))
        .and_then(Diagnostic::smoothed);
    let out = snapshot_text(controller, &grid, fps, now);
    let fname = format!("{DUMP_DIR}/debug-{}.txt", now.timestamp());

    if let Err(e) = fs::create_dir_all(DUMP_DIR) {
        error!("debug dump: failed to create dir '{DUMP_DIR}': {e}");
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {fname}: {e}");
    } else {
        info!("wrote debug dump: {fname}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshot_marks_camera_cell() {
        let mut grid = OccupancyGrid::new(4.0, 4);
        grid.add_blocked(0, 0);
        let mut cam = CameraController::default();
        cam.set_ground_level(1.8);
        cam.set_position(0.5, -0.5);

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).single().expect("valid date");
        let text = snapshot_text(&cam, &grid, Some(60.0), now);

        assert!(text.contains("Timestamp: 2024-05-01 12:30:00"));
        assert!(text.contains("FPS: 60.0"));
        assert!(text.contains("Mode: Walk"));
        assert!(text.contains("Position: (0.500, 1.800, -0.500)"));
        assert!(text.contains("Cell: (2, 1)"));
        assert!(text.contains("Window: 1024 x 720, mouse anchored false"));
        assert!(!text.contains("Contact"));
        assert!(text.contains("#...\n..@.\n....\n....\n"));
    }

    #[test]
    fn snapshot_handles_off_grid_camera() {
        let grid = OccupancyGrid::new(4.0, 4);
        let mut cam = CameraController::default();
        cam.set_position(50.0, 0.0);
        let text = snapshot_text(&cam, &grid, None, Utc::now());
        assert!(text.contains("Cell: off grid"));
        assert!(!text.contains("FPS"));
    }

    #[test]
    fn snapshot_reports_wall_contact() {
        let mut grid = OccupancyGrid::default();
        for cz in 0..40 {
            grid.add_blocked(25, cz);
        }
        let mut cam = CameraController::default();
        cam.set_ground_level(0.0);
        cam.set_position(4.9, 5.0);
        cam.set_look(90.0, 0.0);
        cam.on_key_down(Action::MoveForward);
        cam.update(1.0 / 60.0, &grid);

        let text = snapshot_text(&cam, &grid, None, Utc::now());
        assert!(text.contains("Contact: x=true z=false"), "{text}");
    }
}
