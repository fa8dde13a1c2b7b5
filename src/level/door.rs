//! Doors: four-cell spans whose middle two cells open and close.
//!
//! A door at `(x, z)` spans the cells `-1..=2` along its axis, relative to
//! the cell just below-left of its center point. The outer two cells are
//! posts and stay blocked; the inner two are the panels.

use bevy::log::{info, warn};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grid::OccupancyGrid;
use crate::player::controller::CameraController;
use crate::player::input::{Action, KeyBindings};

/// Default distance within which a door can be operated.
pub const DOOR_INTERACTION_RANGE: f32 = 2.5;

/// Cell offsets of the posts along the door axis.
const POST_OFFSETS: [i32; 2] = [-1, 2];
/// Cell offsets of the panels along the door axis.
const PANEL_OFFSETS: [i32; 2] = [0, 1];

/// Axis a door spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorAxis {
    X,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorSpec {
    pub x: f32,
    pub z: f32,
    pub axis: DoorAxis,
    #[serde(default)]
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub spec: DoorSpec,
    /// Cell just below-left of the center point, `None` if off the grid.
    center: Option<(i32, i32)>,
}

impl Door {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.spec.open
    }

    /// Grid cell at `offset` along the door axis.
    fn cell(&self, offset: i32) -> Option<(i32, i32)> {
        let (cx, cz) = self.center?;
        Some(match self.spec.axis {
            DoorAxis::X => (cx + offset, cz),
            DoorAxis::Z => (cx, cz + offset),
        })
    }

    fn apply(&self, grid: &mut OccupancyGrid) {
        for (cx, cz) in POST_OFFSETS.iter().filter_map(|o| self.cell(*o)) {
            grid.add_blocked(cx, cz);
        }
        for (cx, cz) in PANEL_OFFSETS.iter().filter_map(|o| self.cell(*o)) {
            grid.set_blocked(cx, cz, !self.spec.open);
        }
    }
}

/// All doors of the current level.
#[derive(Resource, Debug, Clone)]
pub struct Doors {
    doors: Vec<Door>,
    pub interaction_range: f32,
}

impl Default for Doors {
    fn default() -> Self {
        Self { doors: Vec::new(), interaction_range: DOOR_INTERACTION_RANGE }
    }
}

impl Doors {
    #[must_use]
    pub fn len(&self) -> usize {
        self.doors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Door> {
        self.doors.get(index)
    }

    /// Register a door and stamp its current state into `grid`. Returns its index.
    pub fn add_door(&mut self, grid: &mut OccupancyGrid, spec: DoorSpec) -> usize {
        // nudge so a center on a cell boundary resolves to the lower cell
        let center = grid
            .world_to_grid(spec.x - 0.1, spec.z - 0.1)
            .and_then(|(cx, cz)| Some((i32::try_from(cx).ok()?, i32::try_from(cz).ok()?)));
        if center.is_none() {
            warn!("door at ({}, {}) is off the grid, ignoring its footprint", spec.x, spec.z);
        }
        let door = Door { spec, center };
        door.apply(grid);
        self.doors.push(door);
        self.doors.len() - 1
    }

    /// Open or close a door and update its panel cells.
    ///
    /// # Return
    /// * `bool` - `false` if `index` does not name a door
    pub fn set_open(&mut self, grid: &mut OccupancyGrid, index: usize, open: bool) -> bool {
        let Some(door) = self.doors.get_mut(index) else { return false };
        if door.spec.open != open {
            door.spec.open = open;
            info!("door {index} {}", if open { "opened" } else { "closed" });
        }
        door.apply(grid);
        true
    }

    /// Flip a door. Returns the new open state, or `None` for an unknown index.
    pub fn toggle(&mut self, grid: &mut OccupancyGrid, index: usize) -> Option<bool> {
        let open = !self.get(index)?.is_open();
        self.set_open(grid, index, open).then_some(open)
    }

    /// Index of the closest door strictly within `interaction_range` of `(x, z)`.
    #[must_use]
    pub fn nearest_door(&self, x: f32, z: f32) -> Option<usize> {
        let p = Vec2::new(x, z);
        self.doors
            .iter()
            .enumerate()
            .map(|(i, d)| (i, Vec2::new(d.spec.x, d.spec.z).distance(p)))
            .filter(|(_, dist)| *dist < self.interaction_range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

/// Toggle the nearest door when the interact key goes down.
///
/// Runs before the camera update so the grid is settled for the frame.
#[allow(clippy::needless_pass_by_value)]
pub fn door_interaction(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut doors: ResMut<Doors>,
    mut grid: ResMut<OccupancyGrid>,
    cameras: Query<&CameraController>,
) {
    if !keys.just_pressed(bindings.key(Action::Interact)) {
        return;
    }
    let Ok(controller) = cameras.get_single() else { return };
    let pos = controller.position();
    if let Some(index) = doors.nearest_door(pos.x, pos.z) {
        doors.toggle(&mut grid, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z_door() -> DoorSpec {
        DoorSpec { x: 1.0, z: -18.0, axis: DoorAxis::Z, open: false }
    }

    #[test]
    fn closed_door_blocks_all_four_cells() {
        let mut grid = OccupancyGrid::default();
        let mut doors = Doors::default();
        doors.add_door(&mut grid, z_door());
        // center cell is (20, 1); the span runs along Z
        for cz in 0..=3 {
            assert!(grid.is_cell_blocked(20, cz), "cell (20, {cz})");
        }
        assert_eq!(grid.blocked_count(), 4);
    }

    #[test]
    fn opening_clears_only_the_panels() {
        let mut grid = OccupancyGrid::default();
        let mut doors = Doors::default();
        let idx = doors.add_door(&mut grid, z_door());
        assert_eq!(doors.toggle(&mut grid, idx), Some(true));
        assert!(doors.get(idx).is_some_and(Door::is_open));
        assert!(grid.is_cell_blocked(20, 0));
        assert!(!grid.is_cell_blocked(20, 1));
        assert!(!grid.is_cell_blocked(20, 2));
        assert!(grid.is_cell_blocked(20, 3));

        assert_eq!(doors.toggle(&mut grid, idx), Some(false));
        assert!(grid.is_cell_blocked(20, 1) && grid.is_cell_blocked(20, 2));
        assert_eq!(doors.toggle(&mut grid, 7), None);
    }

    #[test]
    fn x_door_spans_columns() {
        let mut grid = OccupancyGrid::default();
        let mut doors = Doors::default();
        doors.add_door(&mut grid, DoorSpec { x: 0.0, z: 0.0, axis: DoorAxis::X, open: true });
        // center cell (19, 19); posts at x 18 and 21
        assert!(grid.is_cell_blocked(18, 19));
        assert!(!grid.is_cell_blocked(19, 19));
        assert!(!grid.is_cell_blocked(20, 19));
        assert!(grid.is_cell_blocked(21, 19));
    }

    #[test]
    fn nearest_door_respects_range() {
        let mut grid = OccupancyGrid::default();
        let mut doors = Doors::default();
        doors.add_door(&mut grid, z_door());
        doors.add_door(&mut grid, DoorSpec { x: 3.0, z: -18.0, axis: DoorAxis::Z, open: false });
        assert_eq!(doors.nearest_door(1.5, -17.0), Some(0));
        assert_eq!(doors.nearest_door(2.6, -18.0), Some(1));
        assert_eq!(doors.nearest_door(1.0, -15.5), None); // exactly at range
        assert_eq!(doors.nearest_door(10.0, 10.0), None);
    }
}
