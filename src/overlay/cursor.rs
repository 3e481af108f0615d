use crate::{
    animation::{
        ease::Ease,
        spring::{Spring2, SpringConfig},
        track::Lerp,
    },
    foundation::core::{Affine, Point, Vec2},
    overlay::markup::{ASTON_GREEN, Markup},
};

const WING_BODY: &str =
    "M30 14L58 10C59 10 60 9 56 6C52 3 45 6 36 8L30 8L24 8C15 6 8 3 4 6C0 9 1 10 2 10L30 14Z";
const WING_CENTER: &str = "M28 8L30 2L32 8";

/// Position and scale of the cursor glyph at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorVisual {
    pub position: Point,
    pub scale: f64,
}

/// A wing-shaped cursor trailing the pointer through a spring.
#[derive(Clone, Debug)]
pub struct CursorTrail {
    spring: Spring2,
    hovering: bool,
    scale_from: f64,
    hover_changed_at_s: f64,
}

impl Default for CursorTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorTrail {
    pub const HOVER_SCALE: f64 = 1.5;
    pub const HOVER_EASE_S: f64 = 0.2;
    pub const WIDTH: f64 = 60.0;
    pub const HEIGHT: f64 = 24.0;

    pub fn new() -> Self {
        Self {
            spring: Spring2::new(SpringConfig::TRAIL, Vec2::ZERO),
            hovering: false,
            scale_from: 1.0,
            hover_changed_at_s: f64::NEG_INFINITY,
        }
    }

    /// Record a pointer move at `now_s` seconds.
    pub fn pointer_moved(&mut self, at: Point, over_interactive: bool, now_s: f64) {
        self.spring.set_target(at.to_vec2());
        if over_interactive != self.hovering {
            self.scale_from = self.scale(now_s);
            self.hovering = over_interactive;
            self.hover_changed_at_s = now_s;
        }
    }

    pub fn step(&mut self, dt_s: f64) {
        self.spring.step(dt_s);
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn scale(&self, now_s: f64) -> f64 {
        let target = if self.hovering { Self::HOVER_SCALE } else { 1.0 };
        let t = ((now_s - self.hover_changed_at_s) / Self::HOVER_EASE_S).clamp(0.0, 1.0);
        f64::lerp(&self.scale_from, &target, Ease::InOut.apply(t))
    }

    pub fn visual(&self, now_s: f64) -> CursorVisual {
        CursorVisual {
            position: self.spring.position().to_point(),
            scale: self.scale(now_s),
        }
    }

    pub fn write_markup(&self, m: &mut Markup, now_s: f64) {
        let v = self.visual(now_s);
        let placement = Affine::translate(v.position.to_vec2())
            * Affine::scale(v.scale)
            * Affine::translate((-Self::WIDTH / 2.0, -Self::HEIGHT / 2.0));
        m.open_group(placement, 1.0);
        m.path(WING_BODY, "#e0e0e0", ASTON_GREEN, 0.5);
        m.path(WING_CENTER, "none", ASTON_GREEN, 1.0);
        m.circle(Self::WIDTH / 2.0, Self::HEIGHT / 2.0, 2.0, "#ffffff");
        m.close_group();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/cursor.rs"]
mod tests;
