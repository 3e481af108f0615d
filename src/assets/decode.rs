use std::sync::Arc;

use anyhow::Context;

use crate::{
    foundation::core::{FrameIndex, Rgba8Premul},
    foundation::error::{ReelError, ReelResult},
};

/// One decoded image of the sequence. Immutable once built; clones share pixels.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Position in the sequence this frame was loaded for.
    pub index: FrameIndex,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Frame {
    /// A uniformly coloured frame; used for placeholders and tests.
    pub fn solid(index: FrameIndex, width: u32, height: u32, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let mut bytes = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            bytes.extend_from_slice(&px);
        }
        Self {
            index,
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        }
    }

    /// Natural width over natural height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// Decode encoded image bytes (JPEG, PNG, ...) into a premultiplied [`Frame`].
pub fn decode_frame(bytes: &[u8], index: FrameIndex) -> ReelResult<Frame> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ReelError::asset(format!(
            "frame {} decoded to an empty image",
            index.0
        )));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Frame {
        index,
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
