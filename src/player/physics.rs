//! Player vertical physics: gravity, jumping and landing.
//!
//! Walk mode owns the vertical axis through a two-state machine. A jump sets
//! an instantaneous upward velocity; while airborne gravity is integrated each
//! frame and the camera lands once the next step would reach the ground while
//! falling. Grounded frames pin the camera to the ground level.

pub const GRAVITY: f32 = -20.0;
pub const JUMP_VELOCITY: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpState {
    #[default]
    Grounded,
    Airborne,
}

impl JumpState {
    #[must_use]
    pub fn is_airborne(self) -> bool {
        self == JumpState::Airborne
    }
}

/// Gravity and jump strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpPhysics {
    /// Vertical acceleration, negative is down.
    pub gravity: f32,
    pub jump_force: f32,
}

impl JumpPhysics {
    /// Peak height above the launch point, `jump_force² / (2|g|)`.
    #[must_use]
    pub fn apex_height(&self) -> f32 {
        self.jump_force * self.jump_force / (2.0 * self.gravity.abs())
    }

    /// Time from launch until landing back at launch height, `2·jump_force / |g|`.
    #[must_use]
    pub fn airtime(&self) -> f32 {
        2.0 * self.jump_force / self.gravity.abs()
    }
}

impl Default for JumpPhysics {
    fn default() -> Self {
        Self { gravity: GRAVITY, jump_force: JUMP_VELOCITY }
    }
}

/// Start a jump. Only possible from `Grounded`; returns whether it happened.
pub fn jump(state: &mut JumpState, velocity_y: &mut f32, physics: &JumpPhysics) -> bool {
    if state.is_airborne() {
        return false;
    }
    *state = JumpState::Airborne;
    *velocity_y = physics.jump_force;
    true
}

/// Step the vertical axis for one frame and commit the new height.
///
/// # Arguments
/// * `y` - camera height, updated in place
/// * `velocity_y` - vertical velocity, updated in place
/// * `state` - jump state, switched to `Grounded` on landing
/// * `ground_level` - height the camera rests at
/// * `dt` - already-clamped frame time
///
/// # Return
/// * `bool` - `true` on the frame the camera lands
pub fn step_vertical(
    y: &mut f32,
    velocity_y: &mut f32,
    state: &mut JumpState,
    physics: &JumpPhysics,
    ground_level: f32,
    dt: f32,
) -> bool {
    match *state {
        JumpState::Grounded => {
            *y = ground_level;
            *velocity_y = 0.0;
            false
        }
        JumpState::Airborne => {
            *velocity_y += physics.gravity * dt;
            if *y + *velocity_y * dt <= ground_level && *velocity_y < 0.0 {
                *y = ground_level;
                *velocity_y = 0.0;
                *state = JumpState::Grounded;
                true
            } else {
                *y += *velocity_y * dt;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Simulate a full jump and return (apex height, airtime).
    fn simulate(dt: f32) -> (f32, f32) {
        let physics = JumpPhysics { gravity: -20.0, jump_force: 8.0 };
        let (mut y, mut vy, mut state) = (0.0f32, 0.0f32, JumpState::Grounded);
        assert!(jump(&mut state, &mut vy, &physics));

        let mut apex = 0.0f32;
        let mut t = 0.0f32;
        for _ in 0..1_000_000 {
            t += dt;
            if step_vertical(&mut y, &mut vy, &mut state, &physics, 0.0, dt) {
                return (apex, t);
            }
            apex = apex.max(y);
        }
        panic!("never landed");
    }

    #[test]
    fn closed_form_kinematics() {
        let physics = JumpPhysics { gravity: -20.0, jump_force: 8.0 };
        assert!((physics.apex_height() - 1.6).abs() < 1e-6);
        assert!((physics.airtime() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn simulated_apex_matches_closed_form() {
        // power-of-two step keeps the velocity sums exact in f32
        let (apex, _) = simulate(1.0 / 8192.0);
        assert!((apex - 1.6).abs() < 1e-3, "apex={apex}");
    }

    #[test]
    fn simulated_airtime_matches_closed_form() {
        let (_, airtime) = simulate(1.0 / 1024.0);
        assert!((airtime - 0.8).abs() < 1e-2, "airtime={airtime}");
    }

    #[test]
    fn cannot_double_jump() {
        let physics = JumpPhysics::default();
        let (mut vy, mut state) = (0.0, JumpState::Grounded);
        assert!(jump(&mut state, &mut vy, &physics));
        vy = -1.0;
        assert!(!jump(&mut state, &mut vy, &physics));
        assert!((vy + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn grounded_frames_pin_to_ground() {
        let physics = JumpPhysics::default();
        let (mut y, mut vy, mut state) = (2.3, -4.0, JumpState::Grounded);
        for _ in 0..3 {
            assert!(!step_vertical(&mut y, &mut vy, &mut state, &physics, 1.8, 0.016));
            assert!((y - 1.8).abs() < f32::EPSILON);
            assert!(vy.abs() < f32::EPSILON);
        }
    }
}
