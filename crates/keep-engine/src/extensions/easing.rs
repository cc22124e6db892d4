use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A timing curve mapping progress in [0, 1] to eased progress in [0, 1].
/// Serialized in snake_case so content files can name one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// CSS `ease-in-out`.
    EaseInOut,
    /// Quadratic in/out. Page scrolls use this.
    QuadInOut,
    /// Cubic in/out. Flights between waypoints.
    CubicInOut,
    /// Half a cosine wave. Hover loops.
    SineInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => CubicBezier::EASE_IN_OUT.sample(t),
            Easing::QuadInOut => mirrored(t, |u| u * u),
            Easing::CubicInOut => mirrored(t, |u| u * u * u),
            Easing::SineInOut => 0.5 - 0.5 * (PI * t).cos(),
        }
    }

    /// Eased value between `from` and `to` at progress `t`.
    pub fn interpolate<T: Interpolate>(self, from: T, to: T, t: f32) -> T {
        T::interpolate(from, to, self.apply(t))
    }
}

/// Build an in/out curve from an ease-in curve: first half accelerates,
/// second half is the point reflection.
fn mirrored(t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    if t < 0.5 {
        ease_in(2.0 * t) / 2.0
    } else {
        1.0 - ease_in(2.0 - 2.0 * t) / 2.0
    }
}

/// Values a tween can move between.
pub trait Interpolate: Copy {
    /// Linear blend; `t` is already eased.
    fn interpolate(from: Self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from.lerp(to, t)
    }
}

/// CSS `cubic-bezier(x1, y1, x2, y2)` with fixed endpoints (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const EASE_IN_OUT: Self = Self::new(0.42, 0.0, 0.58, 1.0);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn curve(p1: f32, p2: f32, s: f32) -> f32 {
        let r = 1.0 - s;
        3.0 * r * r * s * p1 + 3.0 * r * s * s * p2 + s * s * s
    }

    fn slope(p1: f32, p2: f32, s: f32) -> f32 {
        let r = 1.0 - s;
        3.0 * r * r * p1 + 6.0 * r * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    }

    /// Output for input progress `x`: solve x(s) = x, then evaluate y(s).
    /// Newton iteration first, bisection if the slope flattens out.
    pub fn sample(&self, x: f32) -> f32 {
        const EPSILON: f32 = 1e-6;
        let x = x.clamp(0.0, 1.0);

        let mut s = x;
        for _ in 0..8 {
            let err = Self::curve(self.x1, self.x2, s) - x;
            if err.abs() < EPSILON {
                return Self::curve(self.y1, self.y2, s);
            }
            let d = Self::slope(self.x1, self.x2, s);
            if d.abs() < EPSILON {
                break;
            }
            s = (s - err / d).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        s = x;
        for _ in 0..32 {
            let at = Self::curve(self.x1, self.x2, s);
            if (at - x).abs() < EPSILON {
                break;
            }
            if at < x {
                lo = s;
            } else {
                hi = s;
            }
            s = 0.5 * (lo + hi);
        }
        Self::curve(self.y1, self.y2, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseInOut,
        Easing::QuadInOut,
        Easing::CubicInOut,
        Easing::SineInOut,
    ];

    #[test]
    fn curves_start_at_zero_and_end_at_one() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-5, "{:?} at 0", e);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-5, "{:?} at 1", e);
        }
    }

    #[test]
    fn in_out_curves_pass_through_the_middle() {
        for e in ALL {
            assert!((e.apply(0.5) - 0.5).abs() < 1e-4, "{:?}", e);
            let (a, b) = (e.apply(0.2), e.apply(0.8));
            assert!((a + b - 1.0).abs() < 1e-4, "{:?} not symmetric", e);
        }
    }

    #[test]
    fn quad_matches_closed_form() {
        assert!((Easing::QuadInOut.apply(0.25) - 0.125).abs() < 1e-6);
        assert!((Easing::CubicInOut.apply(0.25) - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn css_ease_in_out_is_slow_at_the_edges() {
        let early = Easing::EaseInOut.apply(0.1);
        assert!(early > 0.0 && early < 0.05, "got {}", early);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(Easing::QuadInOut.apply(-3.0), 0.0);
        assert_eq!(Easing::QuadInOut.apply(7.0), 1.0);
    }

    #[test]
    fn names_parse_from_content() {
        let e: Easing = serde_json::from_str("\"ease_in_out\"").unwrap();
        assert_eq!(e, Easing::EaseInOut);
    }

    #[test]
    fn interpolates_points() {
        let p = Easing::Linear.interpolate(Vec2::new(0.0, 10.0), Vec2::new(100.0, 30.0), 0.5);
        assert_eq!(p, Vec2::new(50.0, 20.0));
        assert_eq!(Easing::Linear.interpolate(100.0_f32, 200.0, 0.25), 125.0);
    }
}
