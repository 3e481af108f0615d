use crate::{
    animation::{ease::Ease, track::Length, tween::Tween},
    foundation::core::{Affine, Point, Rect, Vec2},
    foundation::error::ReelResult,
    overlay::{
        layer::{Entry, LayoutCtx, ScrollTracks, Visual},
        markup::{
            ASTON_GREEN, ASTON_LIME, Anchor, FONT_BODY, FONT_DISPLAY, GRAY_300, GRAY_500,
            Markup, TextStyle, WHITE, wrap_words,
        },
    },
};

const DESIGN_COPY: &str = "The DB11 exploits the air flowing over and through its bodywork to generate stability without clutter.";

const SPEC_ROWS: [(&str, &str); 5] = [
    ("Engine", "5.2L TWIN-TURBO"),
    ("Power", "630 HP"),
    ("Torque", "700 NM"),
    ("0-100 KM/H", "3.7 S"),
    ("Top Speed", "334 KM/H"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelId {
    Hero,
    Title,
    Design,
    Engine,
}

impl PanelId {
    pub const ALL: [PanelId; 4] = [Self::Hero, Self::Title, Self::Design, Self::Engine];
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelVisual {
    pub id: PanelId,
    pub visual: Visual,
}

/// The scroll-driven text panels above the canvas.
///
/// Every property is a pure function of scroll progress and, for entry animations, of
/// seconds since mount. The layer holds no per-frame state.
#[derive(Clone, Debug)]
pub struct OverlayLayer {
    hero: ScrollTracks,
    title: ScrollTracks,
    design: ScrollTracks,
    engine: ScrollTracks,
    hero_kicker: Entry,
    hero_divider: Entry,
    hero_tagline: Entry,
    title_text: Entry,
}

impl OverlayLayer {
    pub fn db11() -> ReelResult<Self> {
        Ok(Self {
            hero: ScrollTracks::default()
                .opacity(&[0.0, 0.15], &[1.0, 0.0])?
                .scale(&[0.0, 0.15], &[1.0, 0.8])?,
            title: ScrollTracks::default()
                .y(&[0.0, 0.3], &[Length::percent(0.0), Length::vh(-40.0)])?
                .scale(&[0.0, 0.3], &[1.0, 0.5])?
                .opacity(&[0.0, 0.1, 0.8, 1.0], &[1.0, 0.4, 0.4, 0.0])?,
            design: ScrollTracks::default()
                .opacity(&[0.25, 0.35, 0.55, 0.65], &[0.0, 1.0, 1.0, 0.0])?
                .x(&[0.25, 0.65], &[Length::px(-50.0), Length::ZERO])?,
            engine: ScrollTracks::default()
                .opacity(&[0.75, 0.85], &[0.0, 1.0])?
                .y(&[0.75, 1.0], &[Length::px(50.0), Length::ZERO])?,
            hero_kicker: Entry::default()
                .y(Tween::new(Length::px(20.0), Length::ZERO, 1.0)
                    .delay(1.8)
                    .ease(Ease::EXPO_OUT))
                .opacity(Tween::new(0.0, 1.0, 1.0).delay(1.8).ease(Ease::EXPO_OUT)),
            hero_divider: Entry::default()
                .scale_x(Tween::new(0.0, 1.0, 1.0).delay(2.5).ease(Ease::CircOut)),
            hero_tagline: Entry::default()
                .opacity(Tween::new(0.0, 1.0, 1.0).delay(3.0).ease(Ease::EASE_OUT)),
            title_text: Entry::default()
                .y(Tween::new(Length::px(100.0), Length::ZERO, 1.2)
                    .delay(2.0)
                    .ease(Ease::EXPO_OUT))
                .opacity(Tween::new(0.0, 1.0, 1.2).delay(2.0).ease(Ease::EXPO_OUT)),
        })
    }

    /// Scroll-driven visual of every panel at `progress`.
    pub fn visuals(&self, progress: f64, ctx: LayoutCtx) -> [PanelVisual; 4] {
        PanelId::ALL.map(|id| PanelVisual {
            id,
            visual: self.visual(id, progress, ctx),
        })
    }

    pub fn visual(&self, id: PanelId, progress: f64, ctx: LayoutCtx) -> Visual {
        let tracks = match id {
            PanelId::Hero => &self.hero,
            PanelId::Title => &self.title,
            PanelId::Design => &self.design,
            PanelId::Engine => &self.engine,
        };
        tracks.sample(progress, ctx, self.extent(id, ctx))
    }

    /// Entry state of the hero kicker, divider, tagline and the title text.
    pub fn entries(&self, elapsed_s: f64, ctx: LayoutCtx) -> [(&'static str, Visual); 4] {
        [
            ("hero.kicker", self.hero_kicker.sample(elapsed_s, ctx, Vec2::ZERO)),
            ("hero.divider", self.hero_divider.sample(elapsed_s, ctx, Vec2::ZERO)),
            ("hero.tagline", self.hero_tagline.sample(elapsed_s, ctx, Vec2::ZERO)),
            ("title.text", self.title_text.sample(elapsed_s, ctx, Vec2::ZERO)),
        ]
    }

    /// Approximate panel box, the reference for `%` lengths.
    fn extent(&self, id: PanelId, ctx: LayoutCtx) -> Vec2 {
        match id {
            PanelId::Title => {
                let size = ctx.md(72.0, 160.0);
                Vec2::new(size * 2.4, size * 0.9)
            }
            _ => Vec2::new(ctx.viewport.width, ctx.viewport.height),
        }
    }

    pub fn write_markup(&self, m: &mut Markup, progress: f64, elapsed_s: f64, ctx: LayoutCtx) {
        for id in PanelId::ALL {
            let visual = self.visual(id, progress, ctx);
            if visual.is_hidden() {
                continue;
            }
            match id {
                PanelId::Hero => self.hero_markup(m, visual, elapsed_s, ctx),
                PanelId::Title => self.title_markup(m, visual, elapsed_s, ctx),
                PanelId::Design => design_markup(m, visual, ctx),
                PanelId::Engine => engine_markup(m, visual, ctx),
            }
        }
    }

    fn hero_markup(&self, m: &mut Markup, visual: Visual, elapsed_s: f64, ctx: LayoutCtx) {
        let c = ctx.center();
        let vw = ctx.viewport.width;
        let spacer = ctx.md(160.0, 240.0);
        let kicker_size = ctx.md(14.0, 16.0);
        let tag_size = ctx.md(20.0, 24.0);
        let block_h = spacer + 24.0 + 4.0 + 24.0 + tag_size * 1.4;
        let top = c.y - block_h / 2.0;

        m.open_group(visual.to_affine(c), visual.opacity);

        let kicker_top = top - 128.0;
        let kicker = self.hero_kicker.sample(elapsed_s, ctx, Vec2::ZERO);
        if !kicker.is_hidden() {
            m.open_clip(Rect::new(0.0, kicker_top, vw, kicker_top + kicker_size * 1.5));
            m.open_group(Affine::translate(kicker.translate), kicker.opacity);
            let style = TextStyle::new(FONT_DISPLAY, kicker_size, ASTON_GREEN)
                .weight(700)
                .anchor(Anchor::Middle)
                .tracking(0.3);
            m.text(&style, c.x, kicker_top + kicker_size * 1.1, "THE DEFINITIVE GT");
            m.close_group();
            m.close_group();
        }

        let div_y = top + spacer + 24.0;
        let divider = self.hero_divider.sample(elapsed_s, ctx, Vec2::ZERO);
        if divider.scale.x > 0.0 {
            let grad = m.linear_gradient(
                (c.x - 50.0, 0.0),
                (c.x + 50.0, 0.0),
                &[(0.0, ASTON_LIME, 0.0), (0.5, ASTON_LIME, 1.0), (1.0, ASTON_LIME, 0.0)],
                false,
            );
            m.open_group(divider.to_affine(Point::new(c.x, div_y)), divider.opacity);
            m.rect(Rect::new(c.x - 50.0, div_y, c.x + 50.0, div_y + 4.0), &grad, 1.0);
            m.close_group();
        }

        let tagline = self.hero_tagline.sample(elapsed_s, ctx, Vec2::ZERO);
        if !tagline.is_hidden() {
            let style = TextStyle::new(FONT_BODY, tag_size, GRAY_300)
                .anchor(Anchor::Middle)
                .tracking(0.025);
            m.open_group(Affine::IDENTITY, tagline.opacity);
            m.text(&style, c.x, div_y + 28.0 + tag_size, "A NEW CHAPTER IN HISTORY");
            m.close_group();
        }

        m.close_group();
    }

    fn title_markup(&self, m: &mut Markup, visual: Visual, elapsed_s: f64, ctx: LayoutCtx) {
        let entry = self.title_text.sample(elapsed_s, ctx, Vec2::ZERO);
        let v = visual.then(entry);
        if v.is_hidden() {
            return;
        }
        let c = ctx.center();
        let size = ctx.md(72.0, 160.0);
        m.open_group(v.to_affine(c), v.opacity);
        let style = TextStyle::new(FONT_DISPLAY, size, WHITE)
            .weight(700)
            .anchor(Anchor::Middle)
            .tracking(-0.05);
        m.text(&style, c.x, c.y + size * 0.35, "DB11");
        m.close_group();
    }
}

fn design_markup(m: &mut Markup, visual: Visual, ctx: LayoutCtx) {
    let c = ctx.center();
    let left = ctx.md(32.0, 96.0);
    let max_w = 576.0_f64.min(ctx.viewport.width - left);
    let head = ctx.md(48.0, 72.0);
    let body = ctx.md(20.0, 24.0);
    let body_lh = body * 1.625;
    let max_chars = (((max_w - 28.0) / (body * 0.5)).floor() as usize).max(8);
    let lines = wrap_words(DESIGN_COPY, max_chars);
    let block_h = head * 2.0 + 24.0 + lines.len() as f64 * body_lh;
    let top = c.y - block_h / 2.0;
    let text_x = left + 28.0;

    m.open_group(visual.to_affine(c), visual.opacity);
    m.rect(Rect::new(left, top, left + 4.0, top + block_h), ASTON_LIME, 1.0);

    let head_style = TextStyle::new(FONT_DISPLAY, head, WHITE);
    m.text(&head_style, text_x, top + head * 0.8, "AERODYNAMIC");
    let sculpt_w = head_style.approx_width("SCULPTURE");
    let grad = m.linear_gradient(
        (text_x, 0.0),
        (text_x + sculpt_w, 0.0),
        &[(0.0, ASTON_LIME, 1.0), (1.0, WHITE, 1.0)],
        false,
    );
    let sculpt_style = TextStyle::new(FONT_DISPLAY, head, &grad);
    m.text(&sculpt_style, text_x, top + head * 1.8, "SCULPTURE");

    let body_style = TextStyle::new(FONT_BODY, body, GRAY_300).weight(300);
    let mut y = top + head * 2.0 + 24.0;
    for line in &lines {
        m.text(&body_style, text_x, y + body * 1.1, line);
        y += body_lh;
    }
    m.close_group();
}

fn engine_markup(m: &mut Markup, visual: Visual, ctx: LayoutCtx) {
    let c = ctx.center();
    let right = ctx.viewport.width - ctx.md(32.0, 96.0);
    let head = ctx.md(48.0, 72.0);
    let value_size = ctx.md(36.0, 60.0);
    let block_h = head + 40.0 + SPEC_ROWS.len() as f64 * value_size + 4.0 * 24.0;
    let top = c.y - block_h / 2.0;

    m.open_group(visual.to_affine(c), visual.opacity);

    let head_style = TextStyle::new(FONT_DISPLAY, head, WHITE).anchor(Anchor::End);
    m.text(&head_style, right, top + head * 0.8, "V12 POWERTRAIN");
    let bar_w = head_style.approx_width("V12 POWERTRAIN") / 2.0;
    let bar_y = top + head + 4.0;
    m.rect(Rect::new(right - bar_w, bar_y, right, bar_y + 4.0), ASTON_LIME, 1.0);

    let value_style = TextStyle::new(FONT_BODY, value_size, WHITE).anchor(Anchor::End);
    let label_style = TextStyle::new(FONT_BODY, 14.0, GRAY_500)
        .weight(700)
        .anchor(Anchor::End)
        .tracking(0.1);
    let mut row_top = top + head + 40.0;
    for (label, value) in SPEC_ROWS {
        m.text(&value_style, right, row_top + value_size * 0.8, value);
        let label_x = right - value_style.approx_width(value) - 32.0;
        m.text(
            &label_style,
            label_x,
            row_top + value_size / 2.0 + 5.0,
            &label.to_uppercase(),
        );
        row_top += value_size + 24.0;
    }
    m.close_group();
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/panels.rs"]
mod tests;
