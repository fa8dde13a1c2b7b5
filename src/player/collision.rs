//! Axis-separated collision against the occupancy grid.
//!
//! X is resolved first, then Z against the already-resolved X. Each axis is
//! probed a little ahead of the candidate position (`padding` in the direction
//! of travel) so the camera stops short of a blocked cell instead of sitting
//! exactly on its boundary. A blocked axis keeps its position and loses its
//! velocity; the other axis is unaffected, which lets the camera slide along
//! walls.

use bevy::math::Vec3;

use crate::grid::OccupancyGrid;

pub const COLLISION_PADDING: f32 = 0.2;

/// Which axes hit blocked space this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisContact {
    pub x: bool,
    pub z: bool,
}

impl AxisContact {
    #[must_use]
    pub fn any(self) -> bool {
        self.x || self.z
    }
}

/// Probe one axis. Returns the committed coordinate, or `None` if blocked.
fn probe_axis(current: f32, velocity: f32, padding: f32, dt: f32, blocked: impl Fn(f32) -> bool) -> Option<f32> {
    let candidate = current + velocity * dt;
    let probe = candidate + padding.copysign(velocity);
    (!blocked(probe)).then_some(candidate)
}

/// Apply the X/Z part of `velocity` to `position`, stopping at blocked cells.
///
/// # Arguments
/// * `grid` - occupancy grid to test against (read-only)
/// * `position` - camera position; only `x` and `z` are touched
/// * `velocity` - camera velocity; a blocked axis is zeroed
/// * `padding` - look-ahead distance added in the direction of travel
/// * `dt` - already-clamped frame time
///
/// # Return
/// * `AxisContact` - which axes were stopped
pub fn resolve_horizontal(
    grid: &OccupancyGrid,
    position: &mut Vec3,
    velocity: &mut Vec3,
    padding: f32,
    dt: f32,
) -> AxisContact {
    let mut contact = AxisContact::default();

    if velocity.x != 0.0 {
        let z = position.z;
        match probe_axis(position.x, velocity.x, padding, dt, |x| grid.is_blocked(x, z)) {
            Some(x) => position.x = x,
            None => {
                velocity.x = 0.0;
                contact.x = true;
            }
        }
    }

    if velocity.z != 0.0 {
        let x = position.x;
        match probe_axis(position.z, velocity.z, padding, dt, |z| grid.is_blocked(x, z)) {
            Some(z) => position.z = z,
            None => {
                velocity.z = 0.0;
                contact.z = true;
            }
        }
    }

    contact
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_block_at(x: f32, z: f32) -> OccupancyGrid {
        let mut grid = OccupancyGrid::default();
        assert!(grid.block_world_point(x, z));
        grid
    }

    #[test]
    fn blocked_forward_motion_keeps_position() {
        // cell covering x in [5,6), z in [5,6)
        let grid = grid_with_block_at(5.5, 5.5);
        let mut pos = Vec3::new(4.9, 1.8, 5.0);
        let mut vel = Vec3::new(12.0, 0.0, 0.0); // 4.9 -> 5.1 in 1/60 s
        let contact = resolve_horizontal(&grid, &mut pos, &mut vel, 0.2, 1.0 / 60.0);

        assert!(contact.x && !contact.z);
        assert!((pos.x - 4.9).abs() < f32::EPSILON);
        assert!(vel.x.abs() < f32::EPSILON);
    }

    #[test]
    fn diagonal_slides_along_free_axis() {
        let grid = grid_with_block_at(5.5, 5.5);
        let mut pos = Vec3::new(4.9, 1.8, 5.5);
        let mut vel = Vec3::new(3.0, 0.0, 3.0);
        let dt = 1.0 / 60.0;
        let contact = resolve_horizontal(&grid, &mut pos, &mut vel, 0.2, dt);

        assert_eq!(contact, AxisContact { x: true, z: false });
        assert!((pos.x - 4.9).abs() < f32::EPSILON);
        assert!(vel.x.abs() < f32::EPSILON);
        assert!((vel.z - 3.0).abs() < f32::EPSILON);
        assert!((pos.z - (5.5 + 3.0 * dt)).abs() < 1e-6);
    }

    #[test]
    fn padding_stops_short_of_the_boundary() {
        let grid = grid_with_block_at(5.5, 0.5);
        let mut pos = Vec3::new(4.7, 0.0, 0.5);
        let mut vel = Vec3::new(1.0, 0.0, 0.0);
        // candidate 4.81 is free, but the padded probe at 5.01 is not
        resolve_horizontal(&grid, &mut pos, &mut vel, 0.2, 0.11);
        assert!((pos.x - 4.7).abs() < f32::EPSILON);

        // moving away is never blocked by the cell behind
        let mut vel = Vec3::new(-1.0, 0.0, 0.0);
        let contact = resolve_horizontal(&grid, &mut pos, &mut vel, 0.2, 0.1);
        assert!(!contact.any());
        assert!((pos.x - 4.6).abs() < 1e-6);
    }

    #[test]
    fn grid_edge_is_a_wall() {
        let grid = OccupancyGrid::default();
        let mut pos = Vec3::new(19.85, 0.0, 0.0);
        let mut vel = Vec3::new(2.0, 0.0, 0.0);
        let contact = resolve_horizontal(&grid, &mut pos, &mut vel, 0.2, 0.05);
        assert!(contact.x);
        assert!((pos.x - 19.85).abs() < f32::EPSILON);
    }

    #[test]
    fn z_is_resolved_against_updated_x() {
        // moving +X lands in column 25; the cell ahead in Z is only blocked there
        let grid = grid_with_block_at(5.5, 6.5);
        let mut pos = Vec3::new(4.95, 0.0, 5.7);
        let mut vel = Vec3::new(6.0, 0.0, 6.0);
        let contact = resolve_horizontal(&grid, &mut pos, &mut vel, 0.0, 0.05);
        assert!(!contact.x);
        assert!(contact.z);
        assert!((pos.x - 5.25).abs() < 1e-5);
        assert!((pos.z - 5.7).abs() < f32::EPSILON);
    }
}
