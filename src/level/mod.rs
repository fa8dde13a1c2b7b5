//! Static level geometry that populates the occupancy grid.
//!
//! A `LevelLayout` describes the spawn point, the ground height and the
//! walls, towers and doors of one level. `build_level` stamps the layout into
//! an `OccupancyGrid`; after that only doors change the grid.
//!
//! Layouts are data: they deserialize from RON files in `data/levels`, and
//! `LevelLayout::default()` is the built-in escape room.

pub mod door;
pub mod loader;
pub mod tower;
pub mod wall;

use bevy::log::info;
use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::grid::OccupancyGrid;

pub use door::{DoorAxis, DoorSpec, Doors};
pub use tower::TowerSpec;
pub use wall::WallSpec;

/// Spacing of the sample points used when rasterizing footprints.
pub const FOOTPRINT_STEP: f32 = 0.5;

/// Level description as stored on disk.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    #[serde(default)]
    pub name: String,
    /// Floor position `(x, z)` the camera starts at.
    #[serde(default = "LevelLayout::default_spawn")]
    pub spawn: (f32, f32),
    #[serde(default = "LevelLayout::default_ground_level")]
    pub ground_level: f32,
    /// Block the outermost ring of cells.
    #[serde(default = "LevelLayout::default_boundary")]
    pub boundary: bool,
    #[serde(default)]
    pub walls: Vec<WallSpec>,
    #[serde(default)]
    pub towers: Vec<TowerSpec>,
    #[serde(default)]
    pub doors: Vec<DoorSpec>,
}

impl LevelLayout {
    fn default_spawn() -> (f32, f32) { (-18.0, -18.0) }
    fn default_ground_level() -> f32 { 1.8 }
    fn default_boundary() -> bool { true }

    /// The escape room: four rooms split by inside walls, five corner towers
    /// and one door on the south corridor.
    #[must_use]
    pub fn escape_room() -> Self {
        let wall = |x1, z1, x2, z2| WallSpec { start: (x1, z1), end: (x2, z2), thickness: 0.5 };
        let tower = |x, z| TowerSpec { x, z, ..TowerSpec::default() };
        Self {
            name: "escape_room".into(),
            spawn: Self::default_spawn(),
            ground_level: Self::default_ground_level(),
            boundary: true,
            walls: vec![
                wall(-20.0, -16.0, 16.0, -16.0),
                wall(-16.0, 0.0, 16.0, 0.0),
                wall(-16.0, 16.0, 20.0, 16.0),
                wall(-16.0, 0.0, -16.0, 16.0),
                wall(0.0, 0.0, 0.0, -12.0),
            ],
            towers: vec![
                tower(16.0, -16.0),
                tower(16.0, 0.0),
                tower(0.0, -12.0),
                tower(-16.0, 16.0),
                tower(-16.0, 0.0),
            ],
            doors: vec![DoorSpec { x: 1.0, z: -18.0, axis: DoorAxis::Z, open: false }],
        }
    }
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::escape_room()
    }
}

/// Block column 0, column N-1, row 0 and row N-1.
pub fn block_boundary(grid: &mut OccupancyGrid) {
    let Ok(last) = i32::try_from(grid.segments()) else { return };
    let last = last - 1;
    for i in 0..=last {
        grid.add_blocked(0, i);
        grid.add_blocked(last, i);
        grid.add_blocked(i, 0);
        grid.add_blocked(i, last);
    }
}

/// Block every cell hit by sampling the rectangle `[min, max]` at `FOOTPRINT_STEP`.
///
/// The rectangle is clipped to the grid extent first, so the sample count is
/// bounded by the grid size. Returns the number of cells that became blocked.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn stamp_rect(grid: &mut OccupancyGrid, min: Vec2, max: Vec2) -> usize {
    if !(min.is_finite() && max.is_finite()) {
        return 0;
    }
    let half = grid.half_size();
    let min = min.max(Vec2::splat(-half));
    let max = max.min(Vec2::splat(half));
    if min.x > max.x || min.y > max.y {
        return 0;
    }
    let before = grid.blocked_count();
    let steps_x = ((max.x - min.x) / FOOTPRINT_STEP).floor() as usize;
    let steps_z = ((max.y - min.y) / FOOTPRINT_STEP).floor() as usize;
    for i in 0..=steps_x {
        let x = min.x + i as f32 * FOOTPRINT_STEP;
        for j in 0..=steps_z {
            grid.block_world_point(x, min.y + j as f32 * FOOTPRINT_STEP);
        }
    }
    grid.blocked_count() - before
}

/// Stamp a whole layout into `grid` and return the live door set.
///
/// The grid is not cleared first; call `OccupancyGrid::clear` to rebuild.
pub fn build_level(layout: &LevelLayout, grid: &mut OccupancyGrid) -> Doors {
    if layout.boundary {
        block_boundary(grid);
    }
    for w in &layout.walls {
        wall::stamp_wall(grid, w);
    }
    for t in &layout.towers {
        tower::stamp_tower(grid, t);
    }
    let mut doors = Doors::default();
    for d in &layout.doors {
        doors.add_door(grid, *d);
    }

    info!(
        "level '{}': {} walls, {} towers, {} doors, {} blocked cells",
        layout.name,
        layout.walls.len(),
        layout.towers.len(),
        doors.len(),
        grid.blocked_count()
    );
    doors
}
