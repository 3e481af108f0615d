use std::path::Path;

use crate::{
    assets::svg_raster::SvgRasterizer,
    foundation::error::{ReelError, ReelResult},
    overlay::{
        layer::LayoutCtx, loader::LoaderPresentation, markup::Markup, navbar::Navbar,
        panels::OverlayLayer,
    },
    page::session::Session,
    playback::fit::compute_backing_size,
    render::{
        cpu::over_in_place,
        surface::{FrameRGBA, Surface},
    },
};

/// Flattens a [`Session`] into one picture: page background, canvas, then the SVG
/// overlay stack (panels, navbar, loader, cursor) on top.
#[derive(Debug)]
pub struct Compositor {
    rasterizer: SvgRasterizer,
    overlay: OverlayLayer,
    navbar: Navbar,
    loader: LoaderPresentation,
}

impl Compositor {
    pub fn new(font_dirs: &[&Path]) -> ReelResult<Self> {
        Ok(Self {
            rasterizer: SvgRasterizer::new(font_dirs),
            overlay: OverlayLayer::db11()?,
            navbar: Navbar::new(),
            loader: LoaderPresentation::new(),
        })
    }

    /// Overlay markup for the session's current instant, in logical pixels.
    pub fn markup(&self, session: &Session) -> String {
        let window = session.host().window();
        let ctx = LayoutCtx {
            viewport: window.viewport,
        };
        let elapsed_s = session.elapsed().as_secs_f64();

        let mut m = Markup::new();
        self.overlay
            .write_markup(&mut m, session.progress(), elapsed_s, ctx);
        self.navbar
            .write_markup(&mut m, elapsed_s, window.scroll_y, ctx);
        self.loader
            .write_markup(&mut m, elapsed_s, session.since_visible_s(), ctx);
        if session.config().show_cursor {
            session.cursor().write_markup(&mut m, elapsed_s);
        }
        m.finish(window.viewport.width, window.viewport.height)
    }

    #[tracing::instrument(skip(self, session))]
    pub fn compose(&self, session: &Session) -> ReelResult<FrameRGBA> {
        let window = session.host().window();
        let backing = compute_backing_size(window.viewport, window.device_pixel_ratio);
        if backing.is_empty() {
            return Err(ReelError::render("cannot compose an empty viewport"));
        }

        let mut out = Surface::new(backing)?;
        out.clear(session.config().background.to_rgba8_premul());

        // A canvas still at its previous size is stale until the next animation frame.
        if let Some(canvas) = session.renderer().surface()
            && canvas.size() == backing
        {
            over_in_place(out.data_mut(), canvas.data(), 1.0)?;
        }

        let svg = self.markup(session);
        let tree = self.rasterizer.parse(&svg)?;
        let overlay = self
            .rasterizer
            .rasterize(&tree, backing.width, backing.height)?;
        over_in_place(out.data_mut(), &overlay, 1.0)?;

        tracing::debug!(
            width = backing.width,
            height = backing.height,
            progress = session.progress(),
            "page composed"
        );
        Ok(out.readback())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/compose.rs"]
mod tests;
