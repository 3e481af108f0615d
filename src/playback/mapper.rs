use crate::foundation::core::FrameIndex;

/// Map scroll progress onto a sequence of `count` frames.
///
/// `index = clamp(floor(p * (count - 1)), 0, count - 1)`. Progress outside `[0, 1]` is
/// clamped first and non-finite progress maps to the first frame. A zero-length
/// sequence also yields index 0; callers never draw from an empty store.
pub fn frame_index(progress: f64, count: usize) -> FrameIndex {
    if count <= 1 || !progress.is_finite() {
        return FrameIndex(0);
    }
    let last = count - 1;
    let p = progress.clamp(0.0, 1.0);
    let raw = (p * last as f64).floor();
    FrameIndex((raw as usize).min(last))
}

#[cfg(test)]
#[path = "../../tests/unit/playback/mapper.rs"]
mod tests;
