use std::fmt::Write as _;

use crate::{
    assets::svg_raster::escape_xml,
    foundation::core::{Affine, Rect},
};

pub const ASTON_GREEN: &str = "#00a86b";
pub const ASTON_LIME: &str = "#9be15d";
pub const WHITE: &str = "#ffffff";
pub const GRAY_300: &str = "#d1d5db";
pub const GRAY_400: &str = "#9ca3af";
pub const GRAY_500: &str = "#6b7280";
pub const GRAY_600: &str = "#4b5563";

pub const FONT_DISPLAY: &str = "Orbitron, Rajdhani, sans-serif";
pub const FONT_BODY: &str = "Rajdhani, sans-serif";
pub const FONT_SERIF: &str = "Cinzel, serif";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Presentation of one run of text. `fill` is any SVG paint (`#hex` or `url(#id)`).
#[derive(Clone, Debug)]
pub struct TextStyle<'a> {
    pub family: &'a str,
    pub size_px: f64,
    pub weight: u16,
    pub fill: &'a str,
    pub anchor: Anchor,
    /// Tracking in `em`.
    pub letter_spacing_em: f64,
}

impl<'a> TextStyle<'a> {
    pub fn new(family: &'a str, size_px: f64, fill: &'a str) -> Self {
        Self {
            family,
            size_px,
            weight: 400,
            fill,
            anchor: Anchor::Start,
            letter_spacing_em: 0.0,
        }
    }

    pub fn weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn tracking(mut self, em: f64) -> Self {
        self.letter_spacing_em = em;
        self
    }

    /// Rough advance width, for layout that depends on text extent.
    pub fn approx_width(&self, text: &str) -> f64 {
        let n = text.chars().count() as f64;
        n * self.size_px * (0.6 + self.letter_spacing_em)
    }
}

/// One gradient colour stop: offset in `[0, 1]`, colour, opacity.
pub type GradientStop<'a> = (f64, &'a str, f64);

/// Incremental builder for a full-viewport SVG document in logical pixels.
#[derive(Debug, Default)]
pub struct Markup {
    defs: String,
    body: String,
    next_id: u32,
    depth: usize,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a group. Groups with no visible effect are still emitted so callers can
    /// close them unconditionally.
    pub fn open_group(&mut self, transform: Affine, opacity: f64) {
        let c = transform.as_coeffs();
        let _ = write!(
            self.body,
            r#"<g transform="matrix({} {} {} {} {} {})" opacity="{}">"#,
            fmt_num(c[0]),
            fmt_num(c[1]),
            fmt_num(c[2]),
            fmt_num(c[3]),
            fmt_num(c[4]),
            fmt_num(c[5]),
            fmt_num(opacity.clamp(0.0, 1.0))
        );
        self.depth += 1;
    }

    /// Open a group clipped to `clip` (in the current coordinate space).
    pub fn open_clip(&mut self, clip: Rect) {
        let id = self.alloc_id("clip");
        let _ = write!(
            self.defs,
            r#"<clipPath id="{id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
            fmt_num(clip.x0),
            fmt_num(clip.y0),
            fmt_num(clip.width().max(0.0)),
            fmt_num(clip.height().max(0.0))
        );
        let _ = write!(self.body, r#"<g clip-path="url(#{id})">"#);
        self.depth += 1;
    }

    pub fn close_group(&mut self) {
        if self.depth > 0 {
            self.body.push_str("</g>");
            self.depth -= 1;
        }
    }

    pub fn rect(&mut self, r: Rect, fill: &str, opacity: f64) {
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" fill-opacity="{}"/>"#,
            fmt_num(r.x0),
            fmt_num(r.y0),
            fmt_num(r.width().max(0.0)),
            fmt_num(r.height().max(0.0)),
            fmt_num(opacity.clamp(0.0, 1.0))
        );
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) {
        let _ = write!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{fill}"/>"#,
            fmt_num(cx),
            fmt_num(cy),
            fmt_num(r)
        );
    }

    /// A path in the current space. `fill`/`stroke` take SVG paint or `none`.
    pub fn path(&mut self, d: &str, fill: &str, stroke: &str, stroke_width: f64) {
        let _ = write!(
            self.body,
            r#"<path d="{d}" fill="{fill}" stroke="{stroke}" stroke-width="{}"/>"#,
            fmt_num(stroke_width)
        );
    }

    pub fn text(&mut self, style: &TextStyle<'_>, x: f64, baseline_y: f64, content: &str) {
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" fill="{}" text-anchor="{}" letter-spacing="{}">{}</text>"#,
            fmt_num(x),
            fmt_num(baseline_y),
            escape_xml(style.family),
            fmt_num(style.size_px),
            style.weight,
            style.fill,
            style.anchor.as_svg(),
            fmt_num(style.letter_spacing_em * style.size_px),
            escape_xml(content)
        );
    }

    /// Register a user-space linear gradient from `(x1, y1)` to `(x2, y2)` and return
    /// its paint reference, `url(#id)`.
    pub fn linear_gradient(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        stops: &[GradientStop<'_>],
        spread_repeat: bool,
    ) -> String {
        let id = self.alloc_id("grad");
        let _ = write!(
            self.defs,
            r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}" spreadMethod="{}">"#,
            fmt_num(from.0),
            fmt_num(from.1),
            fmt_num(to.0),
            fmt_num(to.1),
            if spread_repeat { "repeat" } else { "pad" }
        );
        for (offset, color, opacity) in stops {
            let _ = write!(
                self.defs,
                r#"<stop offset="{}" stop-color="{color}" stop-opacity="{}"/>"#,
                fmt_num(offset.clamp(0.0, 1.0)),
                fmt_num(opacity.clamp(0.0, 1.0))
            );
        }
        self.defs.push_str("</linearGradient>");
        format!("url(#{id})")
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Close any open groups and wrap everything in an `<svg>` of `width`×`height`.
    pub fn finish(mut self, width: f64, height: f64) -> String {
        while self.depth > 0 {
            self.close_group();
        }
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{}</defs>{}</svg>"#,
            self.defs,
            self.body,
            w = fmt_num(width.max(1.0)),
            h = fmt_num(height.max(1.0)),
        )
    }

    fn alloc_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

/// Greedy word wrap to at most `max_chars` per line.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_owned();
    }
    let r = (v * 1000.0).round() / 1000.0;
    if r == r.trunc() {
        format!("{}", r as i64)
    } else {
        format!("{r}")
    }
}
