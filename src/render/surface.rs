use crate::{
    foundation::core::{BackingSize, Rgba8Premul},
    foundation::error::{ReelError, ReelResult},
    foundation::math::Fnv1a64,
};

/// A rendered output frame as RGBA8 pixels.
///
/// Frames are premultiplied unless `premultiplied` says otherwise.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha, as image encoders expect.
    pub fn into_straight(mut self) -> Self {
        if !self.premultiplied {
            return self;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        self.premultiplied = false;
        self
    }

    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.data);
        h.finish()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// A CPU backing store: a `vello_cpu` pixmap of a fixed physical size.
pub struct Surface {
    size: BackingSize,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("size", &self.size).finish()
    }
}

impl Surface {
    pub fn new(size: BackingSize) -> ReelResult<Self> {
        let (w, h) = surface_dims(size)?;
        Ok(Self {
            size,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub fn size(&self) -> BackingSize {
        self.size
    }

    pub fn clear(&mut self, color: Rgba8Premul) {
        let rgba = color.to_array();
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new();
        h.write_u32(self.size.width);
        h.write_u32(self.size.height);
        h.write_bytes(self.data());
        h.finish()
    }

    pub fn readback(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.size.width,
            height: self.size.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }
}

pub(crate) fn surface_dims(size: BackingSize) -> ReelResult<(u16, u16)> {
    if size.is_empty() {
        return Err(ReelError::render("surface width/height must be > 0"));
    }
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| ReelError::render("surface width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| ReelError::render("surface height exceeds u16"))?;
    Ok((w, h))
}
