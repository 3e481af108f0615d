use std::sync::Arc;

use crate::{
    assets::{decode::Frame, frames::FrameStore},
    foundation::core::{Affine, FrameIndex, Rgba8Premul, Viewport},
    foundation::error::ReelResult,
    playback::fit::{compute_backing_size, fit_rect},
    playback::gate::PlaybackState,
    render::cpu::{CpuPainter, ImagePaint, PaintOp},
    render::surface::Surface,
};

/// Why a draw request did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NotVisible,
    FrameMissing(FrameIndex),
    NoSurface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn { index: FrameIndex, resized: bool },
    Skipped(SkipReason),
}

impl DrawOutcome {
    pub fn is_drawn(self) -> bool {
        matches!(self, Self::Drawn { .. })
    }
}

struct CachedPaint {
    index: FrameIndex,
    pixels: Arc<Vec<u8>>,
    paint: ImagePaint,
}

/// Draws one frame of the sequence into a device-pixel-ratio aware backing store.
///
/// The backing store is only reallocated when its physical size changes. Every draw
/// clears it first, so the output depends on nothing but the frame and the viewport.
pub struct CanvasRenderer {
    surface: Option<Surface>,
    painter: CpuPainter,
    cached: Option<CachedPaint>,
    last_drawn: Option<FrameIndex>,
    resize_count: usize,
}

impl std::fmt::Debug for CanvasRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasRenderer")
            .field("surface", &self.surface)
            .field("last_drawn", &self.last_drawn)
            .field("resize_count", &self.resize_count)
            .finish()
    }
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self {
            surface: None,
            painter: CpuPainter::new(),
            cached: None,
            last_drawn: None,
            resize_count: 0,
        }
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn last_drawn(&self) -> Option<FrameIndex> {
        self.last_drawn
    }

    /// How many times the backing store was (re)allocated.
    pub fn resize_count(&self) -> usize {
        self.resize_count
    }

    pub fn draw(
        &mut self,
        state: PlaybackState,
        store: &FrameStore,
        index: FrameIndex,
        viewport: Viewport,
        device_pixel_ratio: f64,
    ) -> ReelResult<DrawOutcome> {
        if !state.visible {
            return Ok(DrawOutcome::Skipped(SkipReason::NotVisible));
        }
        let backing = compute_backing_size(viewport, device_pixel_ratio);
        if backing.is_empty() {
            return Ok(DrawOutcome::Skipped(SkipReason::NoSurface));
        }
        let Some(frame) = store.get(index) else {
            return Ok(DrawOutcome::Skipped(SkipReason::FrameMissing(index)));
        };

        let resized = match &self.surface {
            Some(s) if s.size() == backing => false,
            _ => {
                self.surface = Some(Surface::new(backing)?);
                self.resize_count += 1;
                true
            }
        };
        let paint = self.paint_for(frame)?;
        let Some(surface) = self.surface.as_mut() else {
            return Ok(DrawOutcome::Skipped(SkipReason::NoSurface));
        };
        surface.clear(Rgba8Premul::transparent());

        let rect = fit_rect(frame.width, frame.height, viewport);
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let transform = Affine::scale(dpr)
            * Affine::translate((rect.x0, rect.y0))
            * Affine::scale_non_uniform(
                rect.width() / f64::from(frame.width),
                rect.height() / f64::from(frame.height),
            );
        self.painter.paint(
            surface,
            &[PaintOp::Image {
                image: &paint,
                transform,
                opacity: 1.0,
            }],
        )?;

        self.last_drawn = Some(index);
        tracing::trace!(index = index.0, resized, "canvas drawn");
        Ok(DrawOutcome::Drawn { index, resized })
    }

    fn paint_for(&mut self, frame: &Frame) -> ReelResult<ImagePaint> {
        if let Some(c) = &self.cached
            && c.index == frame.index
            && Arc::ptr_eq(&c.pixels, &frame.rgba8_premul)
        {
            return Ok(c.paint.clone());
        }
        let paint = ImagePaint::from_premul_bytes(&frame.rgba8_premul, frame.width, frame.height)?;
        self.cached = Some(CachedPaint {
            index: frame.index,
            pixels: frame.rgba8_premul.clone(),
            paint: paint.clone(),
        });
        Ok(paint)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/renderer.rs"]
mod tests;
