use std::sync::Arc;

use crate::{
    foundation::core::{Affine, BackingSize},
    foundation::error::{ReelError, ReelResult},
    foundation::math::mul_div255,
    render::surface::{Surface, surface_dims},
};

/// A raster ready to be used as a `vello_cpu` image paint.
#[derive(Clone)]
pub struct ImagePaint {
    pub paint: vello_cpu::Image,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for ImagePaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePaint")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl ImagePaint {
    pub fn from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> ReelResult<Self> {
        let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width,
            height,
        })
    }
}

/// Reusable `vello_cpu` render context, rebuilt only when the target size changes.
#[derive(Default)]
pub struct CpuPainter {
    ctx: Option<vello_cpu::RenderContext>,
    scratch: Option<vello_cpu::Pixmap>,
}

/// One draw command against a surface.
#[derive(Clone, Debug)]
pub enum PaintOp<'a> {
    /// Draw `image` into its own `0..w, 0..h` box mapped through `transform`.
    Image {
        image: &'a ImagePaint,
        transform: Affine,
        opacity: f32,
    },
}

impl CpuPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint `ops` over the current contents of `surface`, in order.
    pub fn paint(&mut self, surface: &mut Surface, ops: &[PaintOp<'_>]) -> ReelResult<()> {
        let (width, height) = surface_dims(surface.size())?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        for op in ops {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            match op {
                PaintOp::Image {
                    image,
                    transform,
                    opacity,
                } => {
                    if *opacity <= 0.0 {
                        continue;
                    }
                    ctx.set_transform(affine_to_cpu(*transform));
                    ctx.set_paint(image.paint.clone());
                    let (w, h) = (f64::from(image.width), f64::from(image.height));
                    with_opacity(&mut ctx, *opacity, |ctx| {
                        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
                    });
                }
            }
        }

        ctx.flush();
        // vello_cpu renders into a fresh buffer; accumulate through a scratch pixmap.
        let mut scratch = match self.scratch.take() {
            Some(p) if p.width() == width && p.height() == height => p,
            _ => vello_cpu::Pixmap::new(width, height),
        };
        scratch.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut scratch);
        let res = over_in_place(surface.data_mut(), scratch.data_as_u8_slice(), 1.0);
        self.ctx = Some(ctx);
        self.scratch = Some(scratch);
        res
    }
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f32,
    f: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
        f(ctx);
        ctx.pop_layer();
    } else {
        f(ctx);
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(BackingSize { width, height })?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::render("pixmap byte len mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Source-over of one premultiplied pixel onto another with an extra opacity.
pub fn over(dst: [u8; 4], src: [u8; 4], opacity: f32) -> [u8; 4] {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite a whole premultiplied buffer over `dst`. Both buffers must match in size.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    if opacity <= 0.0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
