//! Vector and Orientation Math
//!
//! Thin helpers over nalgebra for the rider simulation.
//!
//! ## Conventions
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  World: +Y up, ground plane XZ                              │
//! │  Body:  -Z forward (nose), +Y up, +X right                  │
//! │                                                             │
//! │  Euler decomposition order: YXZ                             │
//! │    yaw   = rotation about Y (spin)                          │
//! │    pitch = rotation about X (flip)                          │
//! │    roll  = rotation about Z (roll)                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::f32::consts::FRAC_PI_2;

use nalgebra as na;

/// World-space vector (meters, m/s, rad/s depending on context).
pub type Vec3 = na::Vector3<f32>;

/// Unit quaternion orientation.
pub type Quat = na::UnitQuaternion<f32>;

/// Practical small length for comparisons.
pub const VEC_EPS: f32 = 1.0e-6;

/// World up (+Y).
#[inline]
pub fn world_up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// Body-local forward (-Z).
#[inline]
pub fn local_forward() -> Vec3 {
    Vec3::new(0.0, 0.0, -1.0)
}

/// Body forward direction in world space.
#[inline]
pub fn forward_of(orientation: &Quat) -> Vec3 {
    orientation * local_forward()
}

/// Body up direction in world space.
#[inline]
pub fn up_of(orientation: &Quat) -> Vec3 {
    orientation * world_up()
}

/// Remove the component of `v` along the unit `normal`.
#[inline]
pub fn project_on_plane(v: &Vec3, normal: &Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Rotate `v` about world up by `angle` radians.
#[inline]
pub fn rotate_about_up(v: &Vec3, angle: f32) -> Vec3 {
    Quat::from_axis_angle(&Vec3::y_axis(), angle) * v
}

/// Heading angle (about +Y) of a direction, using the -Z forward convention.
///
/// Returns `None` when the direction has no planar component.
#[inline]
pub fn heading_of(direction: &Vec3) -> Option<f32> {
    let planar_sq = direction.x * direction.x + direction.z * direction.z;
    if planar_sq <= VEC_EPS * VEC_EPS {
        return None;
    }
    Some((-direction.x).atan2(-direction.z))
}

/// Orientation whose forward is `forward` and whose up is `up`.
///
/// `forward` is re-orthogonalized against `up`. Returns `None` when the two
/// are (nearly) collinear or either is degenerate.
pub fn look_rotation(forward: &Vec3, up: &Vec3) -> Option<Quat> {
    let up = up.try_normalize(VEC_EPS)?;
    let right = forward.cross(&up).try_normalize(VEC_EPS)?;
    let fwd = up.cross(&right);

    let basis = na::Matrix3::from_columns(&[right, up, -fwd]);
    let rotation = na::Rotation3::from_matrix_unchecked(basis);
    Some(Quat::from_rotation_matrix(&rotation))
}

/// Yaw-only orientation that keeps the heading of `orientation`.
///
/// Falls back to the heading of body up when the rider points straight up
/// or down, and to identity when neither gives a heading.
pub fn upright(orientation: &Quat) -> Quat {
    let heading = heading_of(&forward_of(orientation))
        .or_else(|| heading_of(&-up_of(orientation)))
        .unwrap_or(0.0);
    Quat::from_axis_angle(&Vec3::y_axis(), heading)
}

/// Upright heading rolled 90 degrees onto the side (crash pose).
pub fn lying_on_side(orientation: &Quat) -> Quat {
    upright(orientation) * Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2)
}

/// Advance `orientation` by angular velocity `omega` over `dt`.
///
/// Pre-multiplies a rotation of `|omega| * dt` about `normalize(omega)`
/// (world frame) and renormalizes. Near-zero `omega` leaves it unchanged.
pub fn integrate_orientation(orientation: &Quat, omega: &Vec3, dt: f32) -> Quat {
    let rate = omega.norm();
    if rate <= VEC_EPS || dt <= 0.0 {
        return *orientation;
    }

    let axis = na::Unit::new_unchecked(omega / rate);
    let mut next = Quat::from_axis_angle(&axis, rate * dt) * orientation;
    next.renormalize();
    next
}

/// Euler angles in radians, YXZ order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerYxz {
    /// Rotation about Y
    pub yaw: f32,
    /// Rotation about X
    pub pitch: f32,
    /// Rotation about Z
    pub roll: f32,
}

/// Decompose a rotation into yaw/pitch/roll (R = Ry * Rx * Rz).
pub fn euler_yxz(rotation: &Quat) -> EulerYxz {
    let m = rotation.to_rotation_matrix();
    let m = m.matrix();

    let m12 = m[(1, 2)].clamp(-1.0, 1.0);
    let pitch = (-m12).asin();

    if m12.abs() < 0.999_999_9 {
        EulerYxz {
            yaw: m[(0, 2)].atan2(m[(2, 2)]),
            pitch,
            roll: m[(1, 0)].atan2(m[(1, 1)]),
        }
    } else {
        // Gimbal lock: fold roll into yaw.
        EulerYxz {
            yaw: (-m[(2, 0)]).atan2(m[(0, 0)]),
            pitch,
            roll: 0.0,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1.0e-4;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < TOL
    }

    #[test]
    fn test_identity_axes() {
        let q = Quat::identity();
        assert!((forward_of(&q) - Vec3::new(0.0, 0.0, -1.0)).norm() < TOL);
        assert!((up_of(&q) - Vec3::new(0.0, 1.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn test_euler_single_axes() {
        let yaw = Quat::from_axis_angle(&Vec3::y_axis(), 0.5);
        let e = euler_yxz(&yaw);
        assert!(approx(e.yaw, 0.5) && approx(e.pitch, 0.0) && approx(e.roll, 0.0));

        let pitch = Quat::from_axis_angle(&Vec3::x_axis(), -0.3);
        let e = euler_yxz(&pitch);
        assert!(approx(e.yaw, 0.0) && approx(e.pitch, -0.3) && approx(e.roll, 0.0));

        let roll = Quat::from_axis_angle(&Vec3::z_axis(), 0.7);
        let e = euler_yxz(&roll);
        assert!(approx(e.yaw, 0.0) && approx(e.pitch, 0.0) && approx(e.roll, 0.7));
    }

    #[test]
    fn test_look_rotation_matches_forward_and_up() {
        let forward = Vec3::new(1.0, -0.2, 0.0);
        let up = Vec3::new(0.1, 1.0, 0.0).normalize();
        let q = look_rotation(&forward, &up).expect("non-degenerate basis");

        assert!((up_of(&q) - up).norm() < TOL);
        let expected_fwd = project_on_plane(&forward, &up).normalize();
        assert!((forward_of(&q) - expected_fwd).norm() < TOL);
    }

    #[test]
    fn test_look_rotation_degenerate() {
        assert!(look_rotation(&Vec3::new(0.0, 2.0, 0.0), &world_up()).is_none());
        assert!(look_rotation(&Vec3::zeros(), &world_up()).is_none());
    }

    #[test]
    fn test_integrate_orientation() {
        let q = Quat::identity();
        let omega = Vec3::new(0.0, std::f32::consts::PI, 0.0);
        let next = integrate_orientation(&q, &omega, 0.5);

        assert!(approx(next.angle(), FRAC_PI_2));
        assert!(approx(next.quaternion().norm(), 1.0));

        // Zero angular velocity is a no-op
        let same = integrate_orientation(&next, &Vec3::zeros(), 0.016);
        assert_eq!(same, next);
    }

    #[test]
    fn test_upright_keeps_heading() {
        let heading = 1.2;
        let tilted = Quat::from_axis_angle(&Vec3::y_axis(), heading)
            * Quat::from_axis_angle(&Vec3::x_axis(), 0.4);
        let q = upright(&tilted);

        assert!((up_of(&q) - world_up()).norm() < TOL);
        assert!(approx(heading_of(&forward_of(&q)).unwrap_or(0.0), heading));
    }

    #[test]
    fn test_lying_on_side() {
        let q = lying_on_side(&Quat::identity());
        // Body up now lies in the ground plane
        assert!(up_of(&q).dot(&world_up()).abs() < TOL);
    }

    #[test]
    fn test_heading_of() {
        assert!(approx(heading_of(&Vec3::new(0.0, 0.0, -1.0)).unwrap_or(9.0), 0.0));
        assert!(heading_of(&Vec3::new(0.0, 1.0, 0.0)).is_none());
    }
}
