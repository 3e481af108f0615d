use crate::{
    animation::{ease::Ease, track::Length, tween::Tween},
    foundation::core::{Affine, Rect, Vec2},
    overlay::{
        layer::{Entry, LayoutCtx, Visual},
        markup::{Anchor, FONT_BODY, FONT_DISPLAY, Markup, TextStyle, WHITE},
    },
};

pub const NAV_ITEMS: [&str; 3] = ["MODEL", "HISTORY", "INNOVATION"];

/// Fixed top navigation bar.
#[derive(Clone, Debug)]
pub struct Navbar {
    entry: Entry,
}

impl Default for Navbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Navbar {
    /// Scroll offset past which the bar switches to its translucent backdrop.
    pub const SCROLLED_THRESHOLD_PX: f64 = 50.0;
    pub const HEIGHT_PX: f64 = 80.0;

    pub fn new() -> Self {
        Self {
            entry: Entry::default()
                .y(Tween::new(Length::px(-100.0), Length::ZERO, 1.0)
                    .delay(1.0)
                    .ease(Ease::EXPO_OUT))
                .opacity(Tween::new(0.0, 1.0, 1.0).delay(1.0).ease(Ease::EXPO_OUT)),
        }
    }

    pub fn is_scrolled(scroll_y: f64) -> bool {
        scroll_y > Self::SCROLLED_THRESHOLD_PX
    }

    /// Centre items are dropped on narrow viewports.
    pub fn shows_items(ctx: LayoutCtx) -> bool {
        ctx.is_md()
    }

    pub fn visual(&self, elapsed_s: f64, ctx: LayoutCtx) -> Visual {
        self.entry.sample(elapsed_s, ctx, Vec2::ZERO)
    }

    pub fn write_markup(&self, m: &mut Markup, elapsed_s: f64, scroll_y: f64, ctx: LayoutCtx) {
        let v = self.visual(elapsed_s, ctx);
        if v.is_hidden() {
            return;
        }
        let vw = ctx.viewport.width;
        let h = Self::HEIGHT_PX;
        m.open_group(Affine::translate(v.translate), v.opacity);

        if Self::is_scrolled(scroll_y) {
            m.rect(Rect::new(0.0, 0.0, vw, h), "#000000", 0.5);
            m.rect(Rect::new(0.0, h - 1.0, vw, h), WHITE, 0.05);
        }

        let mid = h / 2.0;
        let brand = TextStyle::new(FONT_DISPLAY, ctx.md(20.0, 24.0), WHITE)
            .weight(700)
            .tracking(0.2);
        m.text(&brand, 32.0, mid + brand.size_px * 0.35, "ASTON MARTIN");

        let small = TextStyle::new(FONT_BODY, 14.0, WHITE).tracking(0.2);
        if Self::shows_items(ctx) {
            let item_style = TextStyle {
                fill: "#b3b3b3",
                ..small.clone()
            };
            let gap = 48.0;
            let widths: Vec<f64> = NAV_ITEMS.iter().map(|s| item_style.approx_width(s)).collect();
            let total = widths.iter().sum::<f64>() + gap * (NAV_ITEMS.len() - 1) as f64;
            let mut x = vw / 2.0 - total / 2.0;
            for (item, w) in NAV_ITEMS.iter().zip(&widths) {
                m.text(&item_style, x, mid + 5.0, item);
                x += w + gap;
            }
        }

        let right = vw - 32.0;
        let line_w = 32.0;
        m.rect(Rect::new(right - line_w, mid, right, mid + 1.0), WHITE, 1.0);
        let cta = TextStyle {
            anchor: Anchor::End,
            ..small
        };
        m.text(&cta, right - line_w - 8.0, mid + 5.0, "ENQUIRE");

        m.close_group();
    }
}
