//! Smoothing and Angle Helpers
//!
//! Frame-rate independent exponential smoothing:
//! `x += (target - x) * (1 - e^(-rate * dt))`.
//! Running the filter twice with `dt/2` lands where one step with `dt`
//! does, so smoothing speed does not depend on the frame rate.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

/// Blend factor for one step of exponential smoothing.
#[inline]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

#[inline]
pub fn smooth_f32(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_factor(rate, dt)
}

#[inline]
pub fn smooth_vec2(current: Vec2, target: Vec2, rate: f32, dt: f32) -> Vec2 {
    current + (target - current) * smoothing_factor(rate, dt)
}

#[inline]
pub fn smooth_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current + (target - current) * smoothing_factor(rate, dt)
}

/// Quadratic ease-in-out on `t` in [0, 1].
#[inline]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Wrap an angle in degrees into [0, 360).
#[inline]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest rotation from `from` to `to`, in radians within [-π, π).
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    (to - from + PI).rem_euclid(TAU) - PI
}

/// Interpolate an angle along the shortest arc.
#[inline]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    from + shortest_angle_delta(from, to) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothing_is_frame_rate_independent() {
        let one = smooth_f32(0.0, 10.0, 5.0, 0.1);
        let half = smooth_f32(0.0, 10.0, 5.0, 0.05);
        let two = smooth_f32(half, 10.0, 5.0, 0.05);
        assert!((one - two).abs() < 1e-4);
    }

    #[test]
    fn test_smoothing_zero_rate_or_dt() {
        assert_eq!(smooth_f32(1.0, 5.0, 0.0, 0.1), 1.0);
        assert_eq!(smooth_f32(1.0, 5.0, 3.0, 0.0), 1.0);
    }

    #[test]
    fn test_ease_in_out_quad_endpoints() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert_eq!(ease_in_out_quad(1.5), 1.0);
        assert!((ease_in_out_quad(0.25) - 0.125).abs() < 1e-6);
        assert!((ease_in_out_quad(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_degrees_range() {
        for deg in [-720.0, -360.0, -1e-9, -0.5, 0.0, 359.9, 360.0, 725.0] {
            let w = wrap_degrees(deg);
            assert!((0.0..360.0).contains(&w), "{} wrapped to {}", deg, w);
        }
        assert_eq!(wrap_degrees(370.0), 10.0);
    }

    #[test]
    fn test_shortest_angle_delta() {
        let d = shortest_angle_delta(170f32.to_radians(), (-170f32).to_radians());
        assert!((d - 20f32.to_radians()).abs() < 1e-4);

        let d = shortest_angle_delta(0.0, 3.0 * PI / 2.0);
        assert!((d + PI / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_lerp_angle_crosses_wrap() {
        let a = lerp_angle(350f32.to_radians(), 10f32.to_radians(), 0.5);
        let expected = 360f32.to_radians();
        assert!(shortest_angle_delta(a, expected).abs() < 1e-4);
    }
}
