use crate::foundation::core::{BackingSize, Rect, Viewport};

/// Physical backing-store size for a logical viewport: `round(viewport * dpr)`.
///
/// A non-finite or non-positive ratio is treated as 1.
pub fn compute_backing_size(viewport: Viewport, device_pixel_ratio: f64) -> BackingSize {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let to_px = |v: f64| -> u32 {
        let px = (v * dpr).round();
        if px.is_finite() && px > 0.0 {
            px.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    };
    BackingSize {
        width: to_px(viewport.width),
        height: to_px(viewport.height),
    }
}

/// Aspect-preserving, centered draw rectangle of an image inside the viewport, in
/// logical pixels.
///
/// A viewport wider than the image pillarboxes (full height, bands left and right);
/// otherwise the image letterboxes (full width, bands top and bottom). Returns an empty
/// rect for degenerate inputs.
pub fn fit_rect(image_width: u32, image_height: u32, viewport: Viewport) -> Rect {
    if image_width == 0 || image_height == 0 || viewport.is_empty() {
        return Rect::ZERO;
    }
    let (vw, vh) = (viewport.width, viewport.height);
    let r_img = f64::from(image_width) / f64::from(image_height);
    let r_vp = vw / vh;

    if r_vp > r_img {
        let w = vh * r_img;
        let x = (vw - w) / 2.0;
        Rect::new(x, 0.0, x + w, vh)
    } else {
        let h = vw / r_img;
        let y = (vh - h) / 2.0;
        Rect::new(0.0, y, vw, y + h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/fit.rs"]
mod tests;
