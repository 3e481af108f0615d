use crate::{
    animation::{
        ease::Ease,
        track::Length,
        tween::{Repeat, Tween},
    },
    foundation::core::{Affine, Point, Rect, Vec2},
    overlay::{
        layer::{Entry, LayoutCtx, Visual},
        markup::{
            ASTON_LIME, Anchor, FONT_BODY, FONT_DISPLAY, FONT_SERIF, GRAY_400, GRAY_600, Markup,
            TextStyle, WHITE,
        },
    },
};

const WATERMARK_PATHS: [&str; 5] = [
    "M500 70 L950 70 C950 70 850 150 700 150 C600 150 550 120 500 120 C450 120 400 150 300 150 C150 150 50 70 50 70 L500 70Z",
    "M500 70 L950 70 L950 75 L500 75 Z",
    "M100 70 Q 300 150 500 150 Q 700 150 900 70",
    "M150 70 Q 320 130 500 130 Q 680 130 850 70",
    "M200 70 Q 340 110 500 110 Q 660 110 800 70",
];

/// The splash shown until the readiness gate opens, then faded out once.
#[derive(Clone, Debug)]
pub struct LoaderPresentation {
    watermark_scale: Tween<f64>,
    title: Entry,
    v12: Entry,
    divider: Entry,
    tagline: Entry,
    shimmer: Tween<f64>,
    exit: Tween<f64>,
}

impl Default for LoaderPresentation {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderPresentation {
    pub const EXIT_S: f64 = 1.5;

    pub fn new() -> Self {
        let slide_up = |delay: f64| {
            Entry::default().y(Tween::new(Length::percent(100.0), Length::ZERO, 1.0)
                .delay(delay)
                .ease(Ease::EXPO_OUT))
        };
        Self {
            watermark_scale: Tween::new(0.8, 1.2, 10.0).repeat(Repeat::Mirror),
            title: slide_up(0.2),
            v12: slide_up(0.4),
            divider: Entry::default()
                .scale_x(Tween::new(0.0, 1.0, 1.5).delay(1.0).ease(Ease::CircOut)),
            tagline: Entry::default()
                .opacity(Tween::new(0.0, 1.0, 1.0).delay(1.4).ease(Ease::EASE_OUT))
                .y(Tween::new(Length::px(20.0), Length::ZERO, 1.0)
                    .delay(1.4)
                    .ease(Ease::EASE_OUT)),
            shimmer: Tween::new(0.0, 2.0, 3.0).repeat(Repeat::Loop),
            exit: Tween::new(1.0, 0.0, Self::EXIT_S).ease(Ease::InOut),
        }
    }

    /// Loader opacity. `since_visible_s` is `None` while the gate is closed.
    pub fn opacity(&self, since_visible_s: Option<f64>) -> f64 {
        match since_visible_s {
            None => 1.0,
            Some(t) => self.exit.sample(t).clamp(0.0, 1.0),
        }
    }

    /// Whether the loader has finished its exit and is gone for good.
    pub fn is_removed(&self, since_visible_s: Option<f64>) -> bool {
        since_visible_s.is_some_and(|t| self.exit.is_finished(t))
    }

    pub fn watermark_scale(&self, elapsed_s: f64) -> f64 {
        self.watermark_scale.sample(elapsed_s)
    }

    /// Gradient offset of the title shimmer, in multiples of the title width.
    pub fn shimmer_offset(&self, elapsed_s: f64) -> f64 {
        self.shimmer.sample(elapsed_s)
    }

    pub fn write_markup(
        &self,
        m: &mut Markup,
        elapsed_s: f64,
        since_visible_s: Option<f64>,
        ctx: LayoutCtx,
    ) {
        if self.is_removed(since_visible_s) {
            return;
        }
        let opacity = self.opacity(since_visible_s);
        let (vw, vh) = (ctx.viewport.width, ctx.viewport.height);
        let c = ctx.center();

        m.open_group(Affine::IDENTITY, opacity);
        m.rect(Rect::new(0.0, 0.0, vw, vh), "#000000", 1.0);

        // 1200x600 box over a 1000x300 viewBox: uniform 1.2, content centered.
        let s = self.watermark_scale(elapsed_s);
        let wm = Affine::translate(c.to_vec2())
            * Affine::scale(s)
            * Affine::translate((-600.0, -300.0))
            * Affine::translate((0.0, 120.0))
            * Affine::scale(1.2);
        m.open_group(wm, 0.03);
        for (i, d) in WATERMARK_PATHS.iter().enumerate() {
            if i < 2 {
                m.path(d, WHITE, "none", 0.0);
            } else {
                m.path(d, "none", WHITE, 2.0);
            }
        }
        m.close_group();

        let title_size = ctx.md(72.0, 128.0);
        let v12_size = ctx.md(60.0, 96.0);
        let column_h = title_size + 24.0 + 8.0 + v12_size + 24.0 + 1.0 + 24.0 + 20.0;
        let mut y = c.y - column_h / 2.0;

        let title_style = TextStyle::new(FONT_SERIF, title_size, "")
            .weight(700)
            .anchor(Anchor::Middle)
            .tracking(0.1);
        let title_w = title_style.approx_width("ASTON MARTIN").max(1.0);
        let shift = self.shimmer_offset(elapsed_s) * title_w / 2.0;
        let x0 = c.x - title_w / 2.0 + shift;
        let shimmer = m.linear_gradient(
            (x0, y),
            (x0 + title_w * 2.0, y + title_size),
            &[
                (0.0, "#0b2f2a", 1.0),
                (0.125, "#145a4f", 1.0),
                (0.25, WHITE, 1.0),
                (0.375, "#145a4f", 1.0),
                (0.5, "#0b2f2a", 1.0),
                (0.625, "#145a4f", 1.0),
                (0.75, WHITE, 1.0),
                (0.875, "#145a4f", 1.0),
                (1.0, "#0b2f2a", 1.0),
            ],
            true,
        );
        let title_style = TextStyle {
            fill: &shimmer,
            ..title_style
        };
        slide_line(m, &self.title, elapsed_s, ctx, y, title_size, |m| {
            m.text(&title_style, c.x, y + title_size * 0.85, "ASTON MARTIN");
        });
        y += title_size + 24.0 + 8.0;

        let v12_grad = m.linear_gradient(
            (0.0, y),
            (0.0, y + v12_size),
            &[(0.0, WHITE, 1.0), (1.0, GRAY_600, 1.0)],
            false,
        );
        let v12_style = TextStyle::new(FONT_DISPLAY, v12_size, &v12_grad)
            .weight(700)
            .anchor(Anchor::Middle);
        slide_line(m, &self.v12, elapsed_s, ctx, y, v12_size, |m| {
            m.text(&v12_style, c.x, y + v12_size * 0.85, "V12");
        });
        y += v12_size + 24.0;

        let divider = self.divider.sample(elapsed_s, ctx, Vec2::ZERO);
        if divider.scale.x > 0.0 {
            let half = (vw / 2.0).min(160.0);
            let grad = m.linear_gradient(
                (c.x - half, 0.0),
                (c.x + half, 0.0),
                &[(0.0, ASTON_LIME, 0.0), (0.5, ASTON_LIME, 1.0), (1.0, ASTON_LIME, 0.0)],
                false,
            );
            m.open_group(divider.to_affine(Point::new(c.x, y)), 1.0);
            m.rect(Rect::new(c.x - half, y, c.x + half, y + 1.0), &grad, 1.0);
            m.close_group();
        }
        y += 1.0 + 24.0;

        let tagline = self.tagline.sample(elapsed_s, ctx, Vec2::ZERO);
        if !tagline.is_hidden() {
            let style = TextStyle::new(FONT_BODY, 14.0, GRAY_400)
                .anchor(Anchor::Middle)
                .tracking(0.5);
            m.open_clip(Rect::new(0.0, y, vw, y + 20.0));
            m.open_group(Affine::translate(tagline.translate), tagline.opacity);
            m.text(&style, c.x, y + 15.0, "P U R E   P E R F O R M A N C E");
            m.close_group();
            m.close_group();
        }

        m.close_group();
    }
}

/// A line revealed by sliding up inside its own clip box.
fn slide_line(
    m: &mut Markup,
    entry: &Entry,
    elapsed_s: f64,
    ctx: LayoutCtx,
    top: f64,
    height: f64,
    draw: impl FnOnce(&mut Markup),
) {
    let v: Visual = entry.sample(elapsed_s, ctx, Vec2::new(0.0, height));
    if v.translate.y >= height {
        return;
    }
    m.open_clip(Rect::new(0.0, top, ctx.viewport.width, top + height));
    m.open_group(Affine::translate(v.translate), v.opacity);
    draw(m);
    m.close_group();
    m.close_group();
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/loader.rs"]
mod tests;
