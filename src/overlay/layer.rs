use crate::{
    animation::{
        track::{Length, Track},
        tween::Tween,
    },
    foundation::core::{Affine, Point, Transform2D, Vec2, Viewport},
    foundation::error::ReelResult,
};

/// Resolved visual properties of one element at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visual {
    pub opacity: f64,
    /// Offset in logical pixels.
    pub translate: Vec2,
    pub scale: Vec2,
}

impl Default for Visual {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Visual {
    pub const IDENTITY: Visual = Visual {
        opacity: 1.0,
        translate: Vec2::ZERO,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Nest `inner` inside `self`: opacities multiply, offsets add, scales multiply.
    pub fn then(self, inner: Visual) -> Visual {
        Visual {
            opacity: self.opacity * inner.opacity,
            translate: self.translate + inner.translate,
            scale: Vec2::new(self.scale.x * inner.scale.x, self.scale.y * inner.scale.y),
        }
    }

    /// Affine placing an element whose transform origin sits at `origin`.
    pub fn to_affine(self, origin: Point) -> Affine {
        Transform2D {
            translate: self.translate,
            scale: self.scale,
            anchor: origin.to_vec2(),
        }
        .to_affine()
    }

    pub fn is_hidden(self) -> bool {
        self.opacity <= 0.0
    }
}

/// Layout inputs shared by every panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutCtx {
    pub viewport: Viewport,
}

impl LayoutCtx {
    /// Width at or above which the page uses its desktop layout.
    pub const MD_BREAKPOINT: f64 = 768.0;

    pub fn is_md(self) -> bool {
        self.viewport.width >= Self::MD_BREAKPOINT
    }

    /// Pick the mobile or desktop variant of a value.
    pub fn md(self, mobile: f64, desktop: f64) -> f64 {
        if self.is_md() { desktop } else { mobile }
    }

    pub fn center(self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }
}

/// Scroll-progress driven properties of a panel. Absent properties stay at identity.
#[derive(Clone, Debug)]
pub struct ScrollTracks {
    pub opacity: Track<f64>,
    pub x: Track<Length>,
    pub y: Track<Length>,
    pub scale: Track<f64>,
}

impl Default for ScrollTracks {
    fn default() -> Self {
        Self {
            opacity: Track::constant(1.0),
            x: Track::constant(Length::ZERO),
            y: Track::constant(Length::ZERO),
            scale: Track::constant(1.0),
        }
    }
}

impl ScrollTracks {
    pub fn opacity(mut self, at: &[f64], values: &[f64]) -> ReelResult<Self> {
        self.opacity = Track::linear(at, values)?;
        Ok(self)
    }

    pub fn x(mut self, at: &[f64], values: &[Length]) -> ReelResult<Self> {
        self.x = Track::linear(at, values)?;
        Ok(self)
    }

    pub fn y(mut self, at: &[f64], values: &[Length]) -> ReelResult<Self> {
        self.y = Track::linear(at, values)?;
        Ok(self)
    }

    pub fn scale(mut self, at: &[f64], values: &[f64]) -> ReelResult<Self> {
        self.scale = Track::linear(at, values)?;
        Ok(self)
    }

    /// `element` is the panel's own size, against which `%` lengths resolve.
    pub fn sample(&self, progress: f64, ctx: LayoutCtx, element: Vec2) -> Visual {
        let vh = ctx.viewport.height;
        let s = self.scale.sample(progress);
        Visual {
            opacity: self.opacity.sample(progress).clamp(0.0, 1.0),
            translate: Vec2::new(
                self.x.sample(progress).resolve(vh, element.x),
                self.y.sample(progress).resolve(vh, element.y),
            ),
            scale: Vec2::new(s, s),
        }
    }
}

/// Time-driven entry animation of one element, sampled in seconds since mount.
#[derive(Clone, Debug)]
pub struct Entry {
    pub opacity: Tween<f64>,
    pub x: Tween<Length>,
    pub y: Tween<Length>,
    pub scale_x: Tween<f64>,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            opacity: Tween::new(1.0, 1.0, 0.0),
            x: Tween::new(Length::ZERO, Length::ZERO, 0.0),
            y: Tween::new(Length::ZERO, Length::ZERO, 0.0),
            scale_x: Tween::new(1.0, 1.0, 0.0),
        }
    }
}

impl Entry {
    pub fn opacity(mut self, tween: Tween<f64>) -> Self {
        self.opacity = tween;
        self
    }

    pub fn x(mut self, tween: Tween<Length>) -> Self {
        self.x = tween;
        self
    }

    pub fn y(mut self, tween: Tween<Length>) -> Self {
        self.y = tween;
        self
    }

    pub fn scale_x(mut self, tween: Tween<f64>) -> Self {
        self.scale_x = tween;
        self
    }

    pub fn sample(&self, elapsed_s: f64, ctx: LayoutCtx, element: Vec2) -> Visual {
        let vh = ctx.viewport.height;
        Visual {
            opacity: self.opacity.sample(elapsed_s).clamp(0.0, 1.0),
            translate: Vec2::new(
                self.x.sample(elapsed_s).resolve(vh, element.x),
                self.y.sample(elapsed_s).resolve(vh, element.y),
            ),
            scale: Vec2::new(self.scale_x.sample(elapsed_s), 1.0),
        }
    }

    /// Whether every part of the entry has played out by `elapsed_s`.
    pub fn is_settled(&self, elapsed_s: f64) -> bool {
        self.opacity.is_finished(elapsed_s)
            && self.x.is_finished(elapsed_s)
            && self.y.is_finished(elapsed_s)
            && self.scale_x.is_finished(elapsed_s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/layer.rs"]
mod tests;
