use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// 0-based index into the frame sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub usize);

/// Logical (CSS pixel) viewport dimensions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport with finite, non-negative dimensions.
    pub fn new(width: f64, height: f64) -> ReelResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ReelError::validation(
                "viewport width/height must be finite and >= 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// A viewport with no drawable area.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Width over height. Callers check [`Viewport::is_empty`] first.
    pub fn aspect(self) -> f64 {
        self.width / self.height
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Physical pixel dimensions of a backing store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BackingSize {
    pub width: u32,
    pub height: u32,
}

impl BackingSize {
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Visual transform of an overlay element: translate, then scale about `anchor`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform2D {
    pub translate: Vec2,
    pub scale: Vec2,  // default (1,1)
    pub anchor: Vec2, // pivot in local space
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            anchor: Vec2::ZERO,
        }
    }
}

impl Transform2D {
    pub fn to_affine(self) -> Affine {
        let t_translate = Affine::translate(self.translate);
        let t_anchor = Affine::translate(self.anchor);
        let t_unanchor = Affine::translate(-self.anchor);
        let t_scale = Affine::scale_non_uniform(self.scale.x, self.scale.y);

        // T(translate) * T(anchor) * S(scale) * T(-anchor)
        t_translate * t_anchor * t_scale * t_unanchor
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
