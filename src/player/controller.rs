//! The camera controller: Walk/Fly state machine driving one frame of locomotion.
//!
//! `CameraController::update` runs the fixed per-frame pipeline:
//!
//! 1. recompute the orientation basis from yaw/pitch
//! 2. resolve mode-specific input (jump in walk, arrow-key look in fly)
//! 3. smooth the sprint factor and the velocity
//! 4. vertical physics (walk) or vertical integration (fly)
//! 5. grid collision on X then Z (walk only) and commit
//!
//! The controller owns the pose and velocity exclusively. It borrows the
//! occupancy grid read-only for the duration of an update and never mutates
//! it. Windowing side effects (cursor visibility, warping) are reported back
//! to the host rather than performed here.

use bevy::log::{info, warn};
use bevy::math::{Vec2, Vec3};
use bevy::prelude::Component;

use crate::grid::OccupancyGrid;
use crate::player::camera::{CameraPose, MouseLook};
use crate::player::collision::{self, AxisContact};
use crate::player::input::{Action, InputProvider, InputState};
use crate::player::movement::{self, SmoothingRates, VelocityState};
use crate::player::orientation::OrientationBasis;
use crate::player::physics::{self, JumpPhysics};
use crate::settings::Settings;

/// Locomotion mode. Walk is the game mode; Fly is the developer free camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Walk,
    Fly,
}

impl CameraMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Walk => CameraMode::Fly,
            CameraMode::Fly => CameraMode::Walk,
        }
    }
}

/// Side effects the host applies after a mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub mode: CameraMode,
    /// Warp the cursor back to the window center.
    pub recenter_cursor: bool,
    pub cursor_visible: bool,
}

/// Frame-time cap used when the configured one is unusable.
pub const FALLBACK_MAX_FRAME_TIME: f32 = 0.1;

/// All tunables of the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub walk_speed: f32,
    pub fly_speed: f32,
    /// Arrow-key look rate in degrees per second.
    pub look_speed: f32,
    /// Mouse look in degrees per pixel.
    pub mouse_sensitivity: f32,
    pub invert_x: bool,
    pub invert_y: bool,
    pub rates: SmoothingRates,
    pub sprint_multiplier: f32,
    pub sprint_acceleration: f32,
    pub max_frame_time: f32,
    pub physics: JumpPhysics,
    pub collision_padding: f32,
}

impl CameraConfig {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let m = &settings.movement;
        Self {
            walk_speed: m.walk_speed,
            fly_speed: m.fly_speed,
            look_speed: settings.controls.look_speed,
            mouse_sensitivity: settings.controls.mouse_sensitivity,
            invert_x: settings.controls.invert_x,
            invert_y: settings.controls.invert_y,
            rates: SmoothingRates { acceleration: m.acceleration, damping: m.damping },
            sprint_multiplier: m.sprint_multiplier,
            sprint_acceleration: m.sprint_acceleration,
            max_frame_time: if m.max_frame_time.is_finite() && m.max_frame_time > 0.0 {
                m.max_frame_time
            } else {
                warn!("camera config: invalid max_frame_time {}, using {FALLBACK_MAX_FRAME_TIME}", m.max_frame_time);
                FALLBACK_MAX_FRAME_TIME
            },
            physics: JumpPhysics {
                gravity: settings.physics.gravity,
                jump_force: settings.physics.jump_force,
            },
            collision_padding: settings.physics.collision_padding,
        }
    }

    /// Base horizontal speed for `mode`, before sprint.
    #[must_use]
    pub fn base_speed(&self, mode: CameraMode) -> f32 {
        match mode {
            CameraMode::Walk => self.walk_speed,
            CameraMode::Fly => self.fly_speed,
        }
    }

    /// Clamp a raw frame time into `[0, max_frame_time]`; garbage becomes 0.
    #[must_use]
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 { dt.min(self.max_frame_time) } else { 0.0 }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// First-person camera with smoothed movement, jumping and grid collision.
#[derive(Component, Debug, Clone)]
pub struct CameraController {
    pose: CameraPose,
    basis: OrientationBasis,
    velocity: VelocityState,
    input: InputState,
    mouse: MouseLook,
    mode: CameraMode,
    ground_level: f32,
    config: CameraConfig,
    recenter_requested: bool,
    last_contact: AxisContact,
}

impl CameraController {
    /// Create a walking camera at the default pose for a window of the given size.
    #[must_use]
    pub fn new(config: CameraConfig, window_width: f32, window_height: f32) -> Self {
        let pose = CameraPose::default();
        Self {
            basis: OrientationBasis::from_angles(pose.yaw, pose.pitch),
            pose,
            velocity: VelocityState::default(),
            input: InputState::default(),
            mouse: MouseLook::new(window_width, window_height),
            mode: CameraMode::Walk,
            ground_level: 0.0,
            config,
            recenter_requested: true,
            last_contact: AxisContact::default(),
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    #[must_use]
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.basis.forward
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.basis.right
    }

    #[must_use]
    pub fn velocity(&self) -> &VelocityState {
        &self.velocity
    }

    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.velocity.is_jumping()
    }

    #[must_use]
    pub fn ground_level(&self) -> f32 {
        self.ground_level
    }

    #[must_use]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    #[must_use]
    pub fn mouse_look(&self) -> &MouseLook {
        &self.mouse
    }

    /// Axes stopped by the grid during the last update.
    #[must_use]
    pub fn last_contact(&self) -> AxisContact {
        self.last_contact
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Swap in new tuning; motion state is kept.
    pub fn apply_config(&mut self, config: CameraConfig) {
        self.config = config;
    }

    /// Teleport to `(x, z)` on the ground. Clears velocity and any jump in progress.
    pub fn set_position(&mut self, x: f32, z: f32) {
        self.pose.position = Vec3::new(x, self.ground_level, z);
        self.velocity.reset();
    }

    /// Set the resting height and move the camera onto it. Clears velocity.
    pub fn set_ground_level(&mut self, level: f32) {
        self.ground_level = level;
        self.pose.position.y = level;
        self.velocity.reset();
    }

    /// Set the look angles directly (degrees); pitch is clamped.
    pub fn set_look(&mut self, yaw: f32, pitch: f32) {
        self.pose.yaw = 0.0;
        self.pose.pitch = 0.0;
        self.pose.rotate(yaw, pitch);
        self.basis = OrientationBasis::from_angles(self.pose.yaw, self.pose.pitch);
    }

    /// Flip between Walk and Fly and report what the host has to do.
    pub fn toggle_mode(&mut self) -> ModeTransition {
        self.mode = self.mode.toggled();
        self.velocity.jump = physics::JumpState::Grounded;
        self.velocity.velocity.y = 0.0;
        self.input.jump_requested = false;

        match self.mode {
            CameraMode::Fly => {
                info!("camera: fly mode enabled");
                ModeTransition { mode: CameraMode::Fly, recenter_cursor: false, cursor_visible: true }
            }
            CameraMode::Walk => {
                info!("camera: walk mode enabled");
                self.pose.position.y = self.ground_level;
                self.mouse.reset();
                self.recenter_requested = true;
                ModeTransition { mode: CameraMode::Walk, recenter_cursor: true, cursor_visible: false }
            }
        }
    }

    /// Start a jump if walking and on the ground. Returns whether a jump started.
    pub fn jump(&mut self) -> bool {
        if self.mode != CameraMode::Walk {
            return false;
        }
        physics::jump(&mut self.velocity.jump, &mut self.velocity.velocity.y, &self.config.physics)
    }

    pub fn on_window_resize(&mut self, width: f32, height: f32) {
        self.mouse.on_window_resize(width, height);
    }

    /// Handle a key press. Held actions update the input state; toggles act immediately.
    pub fn on_key_down(&mut self, action: Action) -> Option<ModeTransition> {
        if action == Action::ToggleMode {
            return Some(self.toggle_mode());
        }
        self.input.set_action(action, true);
        None
    }

    pub fn on_key_up(&mut self, action: Action) {
        self.input.set_action(action, false);
    }

    /// Sample a provider for this frame. Returns the mode transition if the toggle fired.
    pub fn read_input<P: InputProvider + ?Sized>(&mut self, provider: &P) -> Option<ModeTransition> {
        self.input.sample(provider);
        provider.just_pressed(Action::ToggleMode).then(|| self.toggle_mode())
    }

    /// Mouse look from an absolute cursor position. Only active while walking.
    ///
    /// Returns whether the cursor should be warped back to the center.
    pub fn on_mouse_move(&mut self, x: f32, y: f32) -> bool {
        let position = Vec2::new(x, y);
        self.input.mouse = Some(position);
        if self.mode != CameraMode::Walk {
            return false;
        }

        let c = &self.config;
        let outcome = self.mouse.on_mouse_move(position, c.mouse_sensitivity, c.invert_x, c.invert_y);
        if let Some(rotation) = outcome.rotation {
            self.pose.rotate(rotation.x, rotation.y);
        }
        self.recenter_requested |= outcome.recenter;
        outcome.recenter
    }

    /// Drop held keys and re-anchor mouse look, e.g. when the window loses focus.
    pub fn on_focus_lost(&mut self) {
        self.input.release_all();
        self.mouse.reset();
        self.recenter_requested = true;
    }

    /// Return and clear a pending cursor re-center request.
    pub fn take_recenter_request(&mut self) -> bool {
        std::mem::take(&mut self.recenter_requested)
    }

    /// Advance the camera by one frame.
    ///
    /// # Arguments
    /// * `dt` - frame time in seconds; clamped to `max_frame_time`
    /// * `grid` - collision grid, read-only
    pub fn update(&mut self, dt: f32, grid: &OccupancyGrid) {
        let dt = self.config.clamp_dt(dt);

        self.basis = OrientationBasis::from_angles(self.pose.yaw, self.pose.pitch);

        match self.mode {
            CameraMode::Walk => {
                if self.input.jump_requested {
                    self.jump();
                }
            }
            CameraMode::Fly => self.apply_look_keys(dt),
        }
        self.input.jump_requested = false;

        let c = &self.config;
        self.velocity.speed_multiplier = movement::smooth_sprint(
            self.velocity.speed_multiplier,
            self.input.sprint,
            c.sprint_multiplier,
            c.sprint_acceleration,
            dt,
        );
        let speed = c.base_speed(self.mode) * self.velocity.speed_multiplier;
        let direction = movement::move_direction(&self.input, &self.basis);
        movement::smooth_horizontal(&mut self.velocity.velocity, direction, speed, c.rates, dt);

        match self.mode {
            CameraMode::Walk => {
                physics::step_vertical(
                    &mut self.pose.position.y,
                    &mut self.velocity.velocity.y,
                    &mut self.velocity.jump,
                    &c.physics,
                    self.ground_level,
                    dt,
                );
                self.last_contact = collision::resolve_horizontal(
                    grid,
                    &mut self.pose.position,
                    &mut self.velocity.velocity,
                    c.collision_padding,
                    dt,
                );
            }
            CameraMode::Fly => {
                movement::smooth_vertical(&mut self.velocity.velocity, &self.input, speed, c.rates, dt);
                self.pose.position += self.velocity.velocity * dt;
                self.last_contact = AxisContact::default();
            }
        }
    }

    fn apply_look_keys(&mut self, dt: f32) {
        let step = self.config.look_speed * dt;
        let mut yaw = 0.0;
        let mut pitch = 0.0;
        if self.input.look_left {
            yaw -= step;
        }
        if self.input.look_right {
            yaw += step;
        }
        if self.input.look_up {
            pitch += step;
        }
        if self.input.look_down {
            pitch -= step;
        }
        self.pose.rotate(yaw, pitch);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraConfig::default(), 1024.0, 720.0)
    }
}
