//! Velocity smoothing: sprint blending and exponential-lag velocity.
//!
//! Directional input is discrete, but the camera should never jump between
//! speeds. Every frame the velocity moves a fraction `rate * dt` of the way
//! toward a target, using a faster rate while keys are held
//! (`acceleration`) and a separate rate for coasting back to rest
//! (`damping`). Sprint works the same way on a scalar speed factor.

use bevy::math::{Vec2, Vec3};

use crate::player::input::InputState;
use crate::player::orientation::OrientationBasis;

/// Directions shorter than this count as "no input".
const MIN_DIRECTION_LENGTH: f32 = 1e-4;

/// First-order approach of `current` toward `target`: `current + (target - current) * rate * dt`.
///
/// For `rate * dt` in `[0, 1]` the result lies between `current` and `target`
/// and never overshoots.
#[inline]
#[must_use]
pub fn exp_blend(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * rate * dt
}

/// Blend and acceleration rates shared by the horizontal and fly-vertical axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingRates {
    pub acceleration: f32,
    pub damping: f32,
}

impl SmoothingRates {
    /// Acceleration while input is active, damping otherwise.
    #[must_use]
    pub fn rate(&self, active: bool) -> f32 {
        if active { self.acceleration } else { self.damping }
    }
}

impl Default for SmoothingRates {
    fn default() -> Self {
        Self { acceleration: 12.0, damping: 10.0 }
    }
}

/// Current velocity, sprint factor and jump flag of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityState {
    pub velocity: Vec3,
    /// Smoothed sprint factor, within `[1, sprint_multiplier]`.
    pub speed_multiplier: f32,
    pub jump: crate::player::physics::JumpState,
}

impl VelocityState {
    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.jump.is_airborne()
    }

    /// Stop all motion (teleports, ground level changes).
    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
        self.jump = crate::player::physics::JumpState::Grounded;
    }
}

impl Default for VelocityState {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            speed_multiplier: 1.0,
            jump: crate::player::physics::JumpState::Grounded,
        }
    }
}

/// Move the sprint factor toward `sprint_multiplier` while sprinting, else toward 1.
#[must_use]
pub fn smooth_sprint(current: f32, sprinting: bool, sprint_multiplier: f32, rate: f32, dt: f32) -> f32 {
    let target = if sprinting { sprint_multiplier } else { 1.0 };
    exp_blend(current, target, rate, dt)
}

/// Normalized floor-plane direction requested by the held movement keys.
///
/// Opposing keys cancel; `None` means no effective horizontal input.
#[must_use]
pub fn move_direction(input: &InputState, basis: &OrientationBasis) -> Option<Vec2> {
    if !input.has_horizontal_input() {
        return None;
    }
    let fwd = Vec2::new(basis.forward.x, basis.forward.z);
    let right = Vec2::new(basis.right.x, basis.right.z);

    let mut dir = Vec2::ZERO;
    if input.move_forward {
        dir += fwd;
    }
    if input.move_back {
        dir -= fwd;
    }
    if input.strafe_left {
        dir -= right;
    }
    if input.strafe_right {
        dir += right;
    }

    let len = dir.length();
    (len > MIN_DIRECTION_LENGTH).then(|| dir / len)
}

/// Blend the X/Z velocity toward `direction * speed` and return whether input was active.
pub fn smooth_horizontal(
    velocity: &mut Vec3,
    direction: Option<Vec2>,
    speed: f32,
    rates: SmoothingRates,
    dt: f32,
) -> bool {
    let target = direction.map_or(Vec2::ZERO, |d| d * speed);
    let rate = rates.rate(direction.is_some());
    velocity.x = exp_blend(velocity.x, target.x, rate, dt);
    velocity.z = exp_blend(velocity.z, target.y, rate, dt);
    direction.is_some()
}

/// Blend the fly-mode vertical velocity. Up wins when both directions are held.
pub fn smooth_vertical(velocity: &mut Vec3, input: &InputState, speed: f32, rates: SmoothingRates, dt: f32) {
    let target = if input.fly_up {
        speed
    } else if input.fly_down {
        -speed
    } else {
        0.0
    };
    velocity.y = exp_blend(velocity.y, target, rates.rate(input.has_vertical_input()), dt);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_converges_monotonically_without_overshoot() {
        let target = 7.5;
        for (rate, dt) in [(12.0, 1.0 / 60.0), (10.0, 0.05), (2.0, 0.1)] {
            let mut v = 0.0f32;
            let mut err = (target - v).abs();
            for _ in 0..2_000 {
                v = exp_blend(v, target, rate, dt);
                let next = (target - v).abs();
                assert!(v <= target, "overshoot at rate={rate} dt={dt}");
                // strictly shrinking until f32 resolution stalls it
                if err > 1e-3 {
                    assert!(next < err);
                } else {
                    assert!(next <= err);
                }
                err = next;
            }
            assert!(err < 1e-4, "rate={rate} dt={dt} err={err}");
        }
    }

    #[test]
    fn sprint_rises_then_decays_within_one_percent() {
        let (factor, rate, dt) = (2.5f32, 10.0f32, 1.0f32 / 120.0);
        let mut m = 1.0f32;
        let mut prev = m;

        for _ in 0..120 {
            m = smooth_sprint(m, true, factor, rate, dt);
            assert!(m >= prev && m < factor);
            prev = m;
        }

        let settle_steps = ((5.0 / rate) / dt).ceil() as usize;
        for _ in 0..settle_steps {
            m = smooth_sprint(m, false, factor, rate, dt);
            assert!(m <= prev && m > 1.0);
            prev = m;
        }
        assert!((m - 1.0).abs() <= 0.01 * 1.0, "m={m}");
    }

    #[test]
    fn vertical_keys_alone_give_no_direction() {
        let basis = OrientationBasis::from_angles(30.0, 0.0);
        let input = InputState { fly_up: true, sprint: true, ..Default::default() };
        assert!(move_direction(&input, &basis).is_none());
    }

    #[test]
    fn opposite_keys_cancel() {
        let basis = OrientationBasis::from_angles(0.0, 0.0);
        let input = InputState { move_forward: true, move_back: true, ..Default::default() };
        assert!(move_direction(&input, &basis).is_none());
    }

    #[test]
    fn diagonal_is_normalized_and_ignores_pitch() {
        let basis = OrientationBasis::from_angles(0.0, 60.0);
        let input = InputState { move_forward: true, strafe_right: true, ..Default::default() };
        let dir = move_direction(&input, &basis).expect("direction");
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x > 0.0 && dir.y < 0.0);
    }

    #[test]
    fn damping_applies_without_input() {
        let rates = SmoothingRates { acceleration: 12.0, damping: 4.0 };
        let mut v = Vec3::new(2.0, 0.0, -2.0);
        let active = smooth_horizontal(&mut v, None, 3.0, rates, 0.1);
        assert!(!active);
        assert!((v.x - 1.2).abs() < 1e-6);
        assert!((v.z + 1.2).abs() < 1e-6);
    }

    #[test]
    fn fly_vertical_prefers_up() {
        let mut v = Vec3::ZERO;
        let input = InputState { fly_up: true, fly_down: true, ..Default::default() };
        smooth_vertical(&mut v, &input, 8.0, SmoothingRates::default(), 0.05);
        assert!(v.y > 0.0);
    }
}
