/// Easing curves used by entry tweens and the loader fade.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    /// `1 - sqrt(1 - t)` mirrored: fast start, soft landing.
    CircOut,
    /// The CSS `ease-in-out` curve, `cubic-bezier(0.42, 0, 0.58, 1)`.
    InOut,
    /// CSS-style `cubic-bezier(x1, y1, x2, y2)` with endpoints fixed at (0,0) and (1,1).
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Ease {
    /// The page's signature curve: `cubic-bezier(0.16, 1, 0.3, 1)`.
    pub const EXPO_OUT: Ease = Ease::CubicBezier {
        x1: 0.16,
        y1: 1.0,
        x2: 0.3,
        y2: 1.0,
    };

    /// Default curve for untyped tweens, `cubic-bezier(0, 0, 0.58, 1)`.
    pub const EASE_OUT: Ease = Ease::CubicBezier {
        x1: 0.0,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CircOut => (1.0 - (t - 1.0).powi(2)).max(0.0).sqrt(),
            Self::InOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn bezier_coord(p1: f64, p2: f64, s: f64) -> f64 {
    // B(s) for one axis with P0 = 0 and P3 = 1.
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

fn bezier_slope(p1: f64, p2: f64, s: f64) -> f64 {
    let u = 1.0 - s;
    3.0 * u * u * p1 + 6.0 * u * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);

    // Solve x(s) = t for s. Newton first, bisection when the slope is flat.
    let mut s = t;
    for _ in 0..8 {
        let err = bezier_coord(x1, x2, s) - t;
        if err.abs() < 1e-7 {
            return bezier_coord(y1, y2, s);
        }
        let d = bezier_slope(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..64 {
        let x = bezier_coord(x1, x2, s);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    bezier_coord(y1, y2, s)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
