//! Orientation and scale shaping applied after integration: look-at, per-axis
//! Euler clamping and stretch.

use glam::{EulerRot, Mat3, Quat, Vec3};

const EPS: f32 = 1e-6;

/// Rotation whose +Z points along `forward` and whose +Y is as close to `up`
/// as possible. Returns `None` when `forward` has no length.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let f = forward.try_normalize()?;
    let cross = up.cross(f);
    // up parallel to forward (or zero): any perpendicular right axis will do
    let right = if cross.length_squared() > EPS * EPS { cross.normalize() } else { f.any_orthonormal_vector() };
    let u = f.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, u, f)).normalize())
}

/// Euler angles of `rotation` in degrees as (pitch, yaw, roll), applied in
/// Y-X-Z order. Yaw and roll fall in (-180, 180], pitch in [-90, 90].
pub fn euler_degrees(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

/// Inverse of [`euler_degrees`].
pub fn from_euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, angles.y.to_radians(), angles.x.to_radians(), angles.z.to_radians())
}

/// Wraps each angle into [0, 360), the range limits are compared against.
/// Pitch therefore reads as [0, 90] or [270, 360).
pub fn wrap_degrees(angles: Vec3) -> Vec3 {
    let wrap = |a: f32| {
        let r = a.rem_euclid(360.0);
        // tiny negatives round up to exactly 360
        if r >= 360.0 { 0.0 } else { r }
    };
    Vec3::new(wrap(angles.x), wrap(angles.y), wrap(angles.z))
}

fn clamp_axis(value: f32, lower: f32, upper: f32) -> f32 {
    // lower bound is checked first, as crossed limits must still resolve
    if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    }
}

/// Clamps each Euler component into its own [lower, upper] range. Axes are
/// independent; the result is not re-orthogonalized.
pub fn clamp_euler(angles: Vec3, lower: Vec3, upper: Vec3) -> Vec3 {
    Vec3::new(
        clamp_axis(angles.x, lower.x, upper.x),
        clamp_axis(angles.y, lower.y, upper.y),
        clamp_axis(angles.z, lower.z, upper.z),
    )
}

/// Clamps `rotation` through its Euler decomposition, with every angle
/// wrapped into [0, 360) first. A yaw of -30 is clamped as 330.
pub fn clamp_rotation(rotation: Quat, lower: Vec3, upper: Vec3) -> Quat {
    from_euler_degrees(clamp_euler(wrap_degrees(euler_degrees(rotation)), lower, upper))
}

/// Squash and stretch: the bone grows along +Z and thins on X/Y with
/// displacement, capped above by `upper`.
pub fn stretch_scale(displacement: f32, side: f32, front: f32, lower: Vec3, upper: Vec3) -> Vec3 {
    let scale = lower + Vec3::new(-side, -side, front) * displacement;
    Vec3::new(
        if scale.x > upper.x { upper.x } else { scale.x },
        if scale.y > upper.y { upper.y } else { scale.y },
        if scale.z > upper.z { upper.z } else { scale.z },
    )
}
