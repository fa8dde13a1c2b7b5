//! Yaw/pitch to forward/right basis vectors.

use bevy::math::Vec3;

/// Below this horizontal length the right vector is rebuilt from yaw alone.
const DEGENERATE_RIGHT_EPSILON: f32 = 1e-4;

/// Unit view/movement basis derived from the camera angles each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl OrientationBasis {
    /// Compute the basis for `yaw`/`pitch` given in degrees.
    ///
    /// Yaw 0° with zero pitch looks down -Z and positive yaw turns toward +X.
    /// `right` always lies in the horizontal plane so strafing never changes
    /// height.
    #[must_use]
    pub fn from_angles(yaw_deg: f32, pitch_deg: f32) -> Self {
        let yaw = yaw_deg.to_radians();
        let pitch = pitch_deg.to_radians();

        let forward = Vec3::new(
            pitch.cos() * yaw.sin(),
            pitch.sin(),
            -pitch.cos() * yaw.cos(),
        );

        let (rx, rz) = (-forward.z, forward.x);
        let len = (rx * rx + rz * rz).sqrt();
        let right = if len > DEGENERATE_RIGHT_EPSILON {
            Vec3::new(rx / len, 0.0, rz / len)
        } else {
            Vec3::new(yaw.cos(), 0.0, yaw.sin())
        };

        Self { forward, right }
    }
}

impl Default for OrientationBasis {
    fn default() -> Self {
        Self::from_angles(-90.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep() -> impl Iterator<Item = (f32, f32)> {
        (0..360).step_by(5).flat_map(|y| {
            (-89..=89).step_by(4).map(move |p| (y as f32, p as f32))
        })
    }

    #[test]
    fn forward_is_unit_length() {
        for (yaw, pitch) in sweep() {
            let b = OrientationBasis::from_angles(yaw, pitch);
            assert!((b.forward.length() - 1.0).abs() < 1e-5, "yaw={yaw} pitch={pitch}");
        }
    }

    #[test]
    fn right_is_orthogonal_and_horizontal() {
        for (yaw, pitch) in sweep() {
            let b = OrientationBasis::from_angles(yaw, pitch);
            assert!(b.forward.dot(b.right).abs() < 1e-5, "yaw={yaw} pitch={pitch}");
            assert!(b.right.dot(Vec3::Y).abs() < 1e-6);
            assert!((b.right.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_yaw_looks_down_negative_z() {
        let b = OrientationBasis::from_angles(0.0, 0.0);
        assert!(b.forward.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(b.right.abs_diff_eq(Vec3::X, 1e-6));

        // startup yaw
        let b = OrientationBasis::default();
        assert!(b.forward.abs_diff_eq(Vec3::NEG_X, 1e-6));
        assert!(b.right.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn vertical_forward_falls_back_to_yaw_right() {
        let b = OrientationBasis::from_angles(30.0, 90.0);
        let yaw = 30.0f32.to_radians();
        assert!(b.right.abs_diff_eq(Vec3::new(yaw.cos(), 0.0, yaw.sin()), 1e-6));
    }
}
