//! Corner towers: square pillars with stepped rims at the base.

use bevy::log::debug;
use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::OccupancyGrid;
use crate::level::stamp_rect;

/// Number of stepped rim layers around a tower base.
pub const TOWER_RIM_LAYERS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerSpec {
    pub x: f32,
    pub z: f32,
    #[serde(default = "TowerSpec::default_width")]
    pub width: f32,
    /// How far each rim layer steps out from the one above it.
    #[serde(default = "TowerSpec::default_rim_overhang")]
    pub rim_overhang: f32,
}

impl TowerSpec {
    fn default_width() -> f32 { 1.5 }
    fn default_rim_overhang() -> f32 { 0.15 }

    /// Half the width of the widest (bottom) rim layer.
    #[must_use]
    pub fn half_extent(&self) -> f32 {
        (self.width + 2.0 * TOWER_RIM_LAYERS * self.rim_overhang) / 2.0
    }
}

impl Default for TowerSpec {
    fn default() -> Self {
        Self { x: 0.0, z: 0.0, width: Self::default_width(), rim_overhang: Self::default_rim_overhang() }
    }
}

/// Block the square footprint of a tower base. Returns how many cells became blocked.
pub fn stamp_tower(grid: &mut OccupancyGrid, tower: &TowerSpec) -> usize {
    let center = Vec2::new(tower.x, tower.z);
    let half = Vec2::splat(tower.half_extent());
    let stamped = stamp_rect(grid, center - half, center + half);
    debug!("tower at ({:.1}, {:.1}): {stamped} cells", tower.x, tower.z);
    stamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tower_covers_widest_rim() {
        let t = TowerSpec::default();
        assert!((t.half_extent() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn tower_blocks_a_three_by_three_patch() {
        let mut grid = OccupancyGrid::default();
        let stamped = stamp_tower(&mut grid, &TowerSpec { x: 0.5, z: 0.5, ..TowerSpec::default() });
        // samples from -0.7 to 1.3 touch cells -1, 0 and 1 on each axis
        assert_eq!(stamped, 9);
        assert!(grid.is_blocked(-0.5, 1.5));
        assert!(!grid.is_blocked(2.5, 0.5));
    }
}
