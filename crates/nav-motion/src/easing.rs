//! Easing curves
//!
//! CSS-style cubic-bezier timing functions, evaluated on the CPU so that a
//! transition's transform is a pure function of elapsed time.

use serde::{Deserialize, Serialize};

/// A timing curve mapping linear progress `t` in [0, 1] to eased progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Easing {
    /// Constant velocity
    #[default]
    Linear,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier {
        /// First control point x (clamped to [0, 1])
        x1: f32,
        /// First control point y
        y1: f32,
        /// Second control point x (clamped to [0, 1])
        x2: f32,
        /// Second control point y
        y2: f32,
    },
}

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 24;
const EPSILON: f32 = 1e-5;

impl Easing {
    /// Create a cubic-bezier curve
    pub const fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Easing::CubicBezier { x1, y1, x2, y2 }
    }

    /// Evaluate the curve at linear progress `t`
    ///
    /// Input is clamped to [0, 1]; the endpoints map exactly to 0 and 1.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            Easing::Linear => t,
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                if t <= 0.0 {
                    return 0.0;
                }
                if t >= 1.0 {
                    return 1.0;
                }
                let x1 = x1.clamp(0.0, 1.0);
                let x2 = x2.clamp(0.0, 1.0);
                let s = solve_curve_x(x1, x2, t);
                bezier(y1, y2, s)
            }
        }
    }

    /// CSS representation of this curve
    pub fn css(&self) -> String {
        match self {
            Easing::Linear => "linear".to_string(),
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                format!("cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
        }
    }
}

/// One coordinate of a cubic bezier with endpoints 0 and 1
#[inline]
fn bezier(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x coordinate equals `x`
fn solve_curve_x(x1: f32, x2: f32, x: f32) -> f32 {
    // Newton-Raphson first, bisection when the slope is too flat
    let mut s = x;
    for _ in 0..NEWTON_ITERATIONS {
        let error = bezier(x1, x2, s) - x;
        if error.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= error / slope;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..BISECTION_ITERATIONS {
        let value = bezier(x1, x2, s);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    s
}
