//! Angle and aim math helpers.

use glam::Vec3;

/// Wrap an angle in degrees into [0, 360).
#[inline]
pub fn wrap_deg(a: f32) -> f32 {
    let r = a % 360.0;
    if r < 0.0 {
        r + 360.0
    } else {
        r
    }
}

/// Interpolate between two angles along the shorter arc. Interpolating
/// 350 -> 10 at t = 0.5 yields 0 (mod 360), never 180.
pub fn lerp_angle_deg(a: f32, b: f32, t: f32) -> f32 {
    let a = wrap_deg(a);
    let b = wrap_deg(b);
    let mut delta = b - a;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    wrap_deg(a + delta * t)
}

/// Yaw in degrees for a direction on the ground plane.
#[inline]
pub fn vec_to_yaw_deg(dir: Vec3) -> f32 {
    wrap_deg(dir.x.atan2(dir.z).to_degrees())
}

/// (pitch, yaw, 0) in degrees looking from `from` toward `to`. Positive
/// pitch looks down.
pub fn look_at_deg(from: Vec3, to: Vec3) -> Vec3 {
    let d = to - from;
    let horiz = (d.x * d.x + d.z * d.z).sqrt();
    let yaw = vec_to_yaw_deg(d);
    let pitch = if horiz > 1e-6 || d.y.abs() > 1e-6 {
        (-d.y).atan2(horiz).to_degrees()
    } else {
        0.0
    };
    Vec3::new(pitch, yaw, 0.0)
}

/// Unit forward vector for a yaw in degrees.
#[inline]
pub fn forward_from_yaw_deg(yaw: f32) -> Vec3 {
    let r = yaw.to_radians();
    Vec3::new(r.sin(), 0.0, r.cos())
}

/// Right-hand basis vector for a yaw in degrees.
#[inline]
pub fn right_from_yaw_deg(yaw: f32) -> Vec3 {
    let f = forward_from_yaw_deg(yaw);
    Vec3::new(-f.z, 0.0, f.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_arc_across_zero() {
        let mid = lerp_angle_deg(350.0, 10.0, 0.5);
        assert!(
            mid < 1e-3 || (360.0 - mid) < 1e-3,
            "midpoint took the long arc: {mid}"
        );
        let mid = lerp_angle_deg(10.0, 350.0, 0.5);
        assert!(mid < 1e-3 || (360.0 - mid) < 1e-3, "reverse arc: {mid}");
    }

    #[test]
    fn plain_arcs_stay_linear() {
        assert!((lerp_angle_deg(0.0, 90.0, 0.5) - 45.0).abs() < 1e-3);
        assert!((lerp_angle_deg(90.0, 0.0, 0.5) - 45.0).abs() < 1e-3);
    }

    #[test]
    fn yaw_roundtrip() {
        for yaw in [0.0f32, 45.0, 90.0, 180.0, 270.0, 359.0] {
            let f = forward_from_yaw_deg(yaw);
            let back = vec_to_yaw_deg(f);
            let diff = (wrap_deg(back - yaw + 180.0) - 180.0).abs();
            assert!(diff < 1e-2, "yaw {yaw} -> {back}");
        }
    }
}
