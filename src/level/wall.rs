//! Inside walls: straight segments with a thickness.

use bevy::log::debug;
use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::OccupancyGrid;
use crate::level::stamp_rect;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub start: (f32, f32),
    pub end: (f32, f32),
    #[serde(default = "WallSpec::default_thickness")]
    pub thickness: f32,
}

impl WallSpec {
    fn default_thickness() -> f32 { 0.5 }

    /// Axis-aligned footprint: the segment's bounding box grown by half the thickness.
    #[must_use]
    pub fn footprint(&self) -> (Vec2, Vec2) {
        let a = Vec2::new(self.start.0, self.start.1);
        let b = Vec2::new(self.end.0, self.end.1);
        let half = Vec2::splat(self.thickness.abs() / 2.0);
        (a.min(b) - half, a.max(b) + half)
    }
}

/// Block the cells under a wall. Returns how many cells became blocked.
pub fn stamp_wall(grid: &mut OccupancyGrid, wall: &WallSpec) -> usize {
    let (min, max) = wall.footprint();
    let stamped = stamp_rect(grid, min, max);
    debug!("wall x[{:.1}, {:.1}] z[{:.1}, {:.1}]: {stamped} cells", min.x, max.x, min.y, max.y);
    stamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_is_order_independent() {
        let a = WallSpec { start: (4.0, 0.0), end: (-4.0, 0.0), thickness: 0.5 };
        let b = WallSpec { start: (-4.0, 0.0), end: (4.0, 0.0), thickness: 0.5 };
        assert_eq!(a.footprint(), b.footprint());
        assert_eq!(a.footprint(), (Vec2::new(-4.25, -0.25), Vec2::new(4.25, 0.25)));
    }

    #[test]
    fn thin_wall_blocks_both_rows_it_straddles() {
        let mut grid = OccupancyGrid::default();
        let wall = WallSpec { start: (0.0, 0.0), end: (0.0, -2.0), thickness: 0.5 };
        stamp_wall(&mut grid, &wall);
        // x in [-0.25, 0.25] touches columns 19 and 20
        assert!(grid.is_blocked(-0.1, -1.0));
        assert!(grid.is_blocked(0.1, -1.0));
        assert!(!grid.is_blocked(1.5, -1.0));
        assert!(!grid.is_blocked(0.1, 1.5));
    }
}
