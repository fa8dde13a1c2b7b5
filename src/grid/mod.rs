//! Occupancy grid used for movement blocking.
//!
//! The `OccupancyGrid` resource is a fixed `N×N` boolean map over the floor
//! plane (X/Z), centered on the world origin. Static geometry (walls, towers,
//! doors) stamps cells into it during level setup; the camera controller only
//! ever reads it. Lookups are fail-closed: anything outside the grid extent
//! is reported as blocked.
//!
//! # Example:
//!
//! ```
//! use roomwalk::grid::OccupancyGrid;
//!
//! let mut grid = OccupancyGrid::new(40.0, 40);
//! assert!(grid.set_blocked(25, 25, true));
//! assert!(grid.is_blocked(5.5, 5.5));
//! assert!(grid.is_blocked(100.0, 0.0)); // outside the extent
//! ```

use bevy::log::warn;
use bevy::math::Vec2;
use bevy::prelude::Resource;

/// Total width/depth of the default grid in world units.
pub const DEFAULT_GRID_SIZE: f32 = 40.0;
/// Number of cells along each axis of the default grid.
pub const DEFAULT_GRID_SEGMENTS: usize = 40;
/// Largest accepted cell count per axis.
pub const MAX_GRID_SEGMENTS: usize = 4096;

/// Boolean floor map with world↔cell transforms.
///
/// Cells are stored row-major, `blocked[cell_z * segments + cell_x]`.
#[derive(Resource, Debug, Clone)]
pub struct OccupancyGrid {
    size: f32,
    segments: usize,
    cell_size: f32,
    half_size: f32,
    blocked: Vec<bool>,
}

impl OccupancyGrid {
    /// Create an empty (fully walkable) grid covering `[-size/2, size/2]` on X and Z.
    ///
    /// # Arguments
    /// * `size` - total extent of the grid in world units (must be positive and finite)
    /// * `segments` - number of cells per axis (`1..=MAX_GRID_SEGMENTS`)
    ///
    /// # Return
    /// * `OccupancyGrid` - a new grid with no blocked cells. Invalid dimensions
    ///   fall back to the defaults and are logged.
    #[must_use]
    pub fn new(size: f32, segments: usize) -> Self {
        let cells = if (1..=MAX_GRID_SEGMENTS).contains(&segments) { segments.checked_mul(segments) } else { None };
        let (size, segments, cells) = match cells {
            Some(cells) if size.is_finite() && size > 0.0 => (size, segments, cells),
            _ => {
                warn!(
                    "occupancy grid: invalid dimensions size={size} segments={segments}, using {DEFAULT_GRID_SIZE}x{DEFAULT_GRID_SEGMENTS}"
                );
                (DEFAULT_GRID_SIZE, DEFAULT_GRID_SEGMENTS, DEFAULT_GRID_SEGMENTS * DEFAULT_GRID_SEGMENTS)
            }
        };

        #[allow(clippy::cast_precision_loss)]
        let cell_size = size / segments as f32;

        Self {
            size,
            segments,
            cell_size,
            half_size: size / 2.0,
            blocked: vec![false; cells],
        }
    }

    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[must_use]
    pub fn segments(&self) -> usize {
        self.segments
    }

    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[must_use]
    pub fn half_size(&self) -> f32 {
        self.half_size
    }

    /// Convert world X/Z coordinates into cell indices.
    ///
    /// # Arguments
    /// * `x`, `z` - world coordinates on the floor plane
    ///
    /// # Return
    /// * `Option<(usize, usize)>` - `(cell_x, cell_z)`, or `None` when the point
    ///   lies outside `[-half_size, half_size)` or is not finite
    #[must_use]
    pub fn world_to_grid(&self, x: f32, z: f32) -> Option<(usize, usize)> {
        Some((self.axis_to_cell(x)?, self.axis_to_cell(z)?))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn axis_to_cell(&self, v: f32) -> Option<usize> {
        if !v.is_finite() {
            return None;
        }
        let cell = ((v + self.half_size) / self.cell_size).floor();
        if cell < 0.0 || cell >= self.segments as f32 {
            return None;
        }
        Some(cell as usize)
    }

    /// World-space center `(x, z)` of a cell, or `None` if the indices are out of range.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_center(&self, cell_x: usize, cell_z: usize) -> Option<Vec2> {
        if cell_x >= self.segments || cell_z >= self.segments {
            return None;
        }
        Some(Vec2::new(
            -self.half_size + (cell_x as f32 + 0.5) * self.cell_size,
            -self.half_size + (cell_z as f32 + 0.5) * self.cell_size,
        ))
    }

    /// Whether the world point `(x, z)` may not be occupied.
    ///
    /// Fail-closed: points outside the grid are always blocked.
    #[must_use]
    pub fn is_blocked(&self, x: f32, z: f32) -> bool {
        match self.world_to_grid(x, z) {
            Some((cx, cz)) => self.blocked[cz * self.segments + cx],
            None => true,
        }
    }

    /// Whether the cell `(cell_x, cell_z)` is blocked. Out-of-range cells are blocked.
    #[must_use]
    pub fn is_cell_blocked(&self, cell_x: i32, cell_z: i32) -> bool {
        self.index(cell_x, cell_z).is_none_or(|i| self.blocked[i])
    }

    fn index(&self, cell_x: i32, cell_z: i32) -> Option<usize> {
        let cx = usize::try_from(cell_x).ok()?;
        let cz = usize::try_from(cell_z).ok()?;
        (cx < self.segments && cz < self.segments).then(|| cz * self.segments + cx)
    }

    /// Mark or clear a cell.
    ///
    /// # Arguments
    /// * `cell_x`, `cell_z` - cell indices (signed so callers can pass raw offsets)
    /// * `blocked` - new state for the cell
    ///
    /// # Return
    /// * `bool` - `true` if the cell was updated, `false` if the indices were out of
    ///   range (the request is rejected and logged)
    pub fn set_blocked(&mut self, cell_x: i32, cell_z: i32, blocked: bool) -> bool {
        match self.index(cell_x, cell_z) {
            Some(i) => {
                self.blocked[i] = blocked;
                true
            }
            None => {
                warn!(
                    "occupancy grid: rejected set_blocked({cell_x}, {cell_z}, {blocked}) outside 0..{}",
                    self.segments
                );
                false
            }
        }
    }

    /// Shorthand for `set_blocked(cell_x, cell_z, true)`.
    pub fn add_blocked(&mut self, cell_x: i32, cell_z: i32) -> bool {
        self.set_blocked(cell_x, cell_z, true)
    }

    /// Shorthand for `set_blocked(cell_x, cell_z, false)`.
    pub fn remove_blocked(&mut self, cell_x: i32, cell_z: i32) -> bool {
        self.set_blocked(cell_x, cell_z, false)
    }

    /// Block the cell containing world point `(x, z)`. Points off the grid are ignored.
    pub fn block_world_point(&mut self, x: f32, z: f32) -> bool {
        match self.world_to_grid(x, z) {
            Some((cx, cz)) => {
                self.blocked[cz * self.segments + cx] = true;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|b| **b).count()
    }

    /// Iterate over all blocked cells as `(cell_x, cell_z)`.
    pub fn iter_blocked(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.segments;
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(move |(i, _)| (i % n, i / n))
    }

    /// Make every cell walkable again.
    pub fn clear(&mut self) {
        self.blocked.fill(false);
    }

    /// Render the grid as text, one row per Z index (`#` blocked, `.` free).
    ///
    /// # Arguments
    /// * `marker` - optional cell drawn as `@` (e.g. the camera's current cell)
    #[must_use]
    pub fn ascii_map(&self, marker: Option<(usize, usize)>) -> String {
        let n = self.segments;
        let mut out = String::with_capacity(n * (n + 1));
        for cz in 0..n {
            for cx in 0..n {
                let c = if marker == Some((cx, cz)) {
                    '@'
                } else if self.blocked[cz * n + cx] {
                    '#'
                } else {
                    '.'
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

impl Default for OccupancyGrid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, DEFAULT_GRID_SEGMENTS)
    }
}
