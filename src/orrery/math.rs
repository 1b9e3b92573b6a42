use nalgebra::Vector3;
use std::f32::consts::{PI, TAU};

pub type Vec3 = Vector3<f32>;

/// Default astronomical unit to world unit conversion.
pub const AU_TO_WORLD: f32 = 200.0;

pub fn au_to_world(au: f32, scale: f32) -> f32 {
    au * scale
}

pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    x.max(lo).min(hi)
}

/// Folds any finite angle into `(-PI, PI]` in constant time.
///
/// Past about 1e7 radians an f32 no longer resolves the fractional turn, so the result there is
/// in range but otherwise arbitrary. Non-finite input is returned unchanged.
pub fn wrap_phase(angle: f32) -> f32 {
    if !angle.is_finite() || (angle > -PI && angle <= PI) {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}

/// Moves `angle` forward by `delta` and wraps. A non-finite step leaves the phase where it was.
pub fn advance_phase(angle: f32, delta: f32) -> f32 {
    let next = angle + delta;
    if next.is_finite() {
        wrap_phase(next)
    } else {
        angle
    }
}

/// Angular velocity in radians per simulated hour for a period given in days.
pub fn angular_velocity(period_days: f32) -> f32 {
    if period_days == 0.0 {
        0.0
    } else {
        TAU / (period_days * 24.0)
    }
}

/// Unit direction on the look sphere for horizontal and vertical look angles.
pub fn look_direction(horizontal: f32, vertical: f32) -> Vec3 {
    let (sin_v, cos_v) = vertical.sin_cos();
    let (sin_h, cos_h) = horizontal.sin_cos();
    Vec3::new(cos_v * sin_h, sin_v, cos_v * cos_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_upper_bound_inclusive() {
        assert_eq!(wrap_phase(PI), PI);
        assert!((wrap_phase(PI + 0.5) - (-PI + 0.5)).abs() < 1e-5);
    }

    #[test]
    fn wrap_folds_large_steps() {
        let wrapped = wrap_phase(-PI + 5.0 * TAU + 0.25);
        assert!(wrapped > -PI && wrapped <= PI);
        assert!((wrapped - (-PI + 0.25)).abs() < 1e-4);
    }

    #[test]
    fn wrap_handles_huge_and_negative_angles() {
        for angle in [1.0e12, 3.4e38, -1.0e12, -PI, -PI - 0.25, -7.0 * TAU] {
            let wrapped = wrap_phase(angle);
            assert!(wrapped > -PI && wrapped <= PI, "{angle} wrapped to {wrapped}");
        }
        assert_eq!(wrap_phase(-PI), PI);
        assert!((wrap_phase(-PI - 0.25) - (PI - 0.25)).abs() < 1e-5);
    }

    #[test]
    fn non_finite_steps_leave_the_phase_alone() {
        assert_eq!(advance_phase(0.5, f32::INFINITY), 0.5);
        assert_eq!(advance_phase(0.5, f32::NAN), 0.5);
        assert_eq!(advance_phase(0.5, f32::MAX), wrap_phase(0.5 + f32::MAX));
    }

    #[test]
    fn zero_period_has_no_angular_velocity() {
        assert_eq!(angular_velocity(0.0), 0.0);
        assert!((angular_velocity(1.0) - TAU / 24.0).abs() < 1e-7);
    }

    #[test]
    fn look_direction_is_unit_length() {
        for (h, v) in [(0.0, 0.0), (1.2, -0.7), (-2.9, 1.5)] {
            assert!((look_direction(h, v).norm() - 1.0).abs() < 1e-6);
        }
        assert!((look_direction(0.0, 0.0) - Vec3::z()).norm() < 1e-6);
    }
}
