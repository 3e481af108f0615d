use std::path::{Path, PathBuf};

use crate::{
    assets::decode::Frame,
    foundation::core::FrameIndex,
    foundation::error::{ReelError, ReelResult},
};

/// A printf-style file name template with a single zero-padded integer directive,
/// e.g. `frame-%03d.jpg`. Sequence numbers are 1-based on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePattern {
    prefix: String,
    width: usize,
    suffix: String,
}

impl Default for FramePattern {
    fn default() -> Self {
        Self {
            prefix: "frame-".to_string(),
            width: 3,
            suffix: ".jpg".to_string(),
        }
    }
}

impl FramePattern {
    pub const DEFAULT: &'static str = "frame-%03d.jpg";

    pub fn parse(pattern: &str) -> ReelResult<Self> {
        let Some(start) = pattern.find('%') else {
            return Err(ReelError::validation(format!(
                "frame pattern '{pattern}' has no %d directive"
            )));
        };
        let rest = &pattern[start + 1..];
        let Some(d_pos) = rest.find('d') else {
            return Err(ReelError::validation(format!(
                "frame pattern '{pattern}' has an unterminated directive"
            )));
        };
        let spec = &rest[..d_pos];
        let width = if spec.is_empty() {
            0
        } else {
            // Only zero padding; `%3d` would space-pad.
            let digits = spec.strip_prefix('0').unwrap_or_default();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ReelError::validation(format!(
                    "frame pattern '{pattern}' has an invalid width '{spec}'"
                )));
            }
            digits
                .parse::<usize>()
                .map_err(|e| ReelError::validation(format!("frame pattern width: {e}")))?
        };

        let prefix = &pattern[..start];
        let suffix = &rest[d_pos + 1..];
        if suffix.contains('%') {
            return Err(ReelError::validation(format!(
                "frame pattern '{pattern}' must contain exactly one directive"
            )));
        }
        for part in [prefix, suffix] {
            if part.contains('/') || part.contains('\\') {
                return Err(ReelError::validation(
                    "frame pattern must be a file name, not a path",
                ));
            }
        }

        Ok(Self {
            prefix: prefix.to_string(),
            width,
            suffix: suffix.to_string(),
        })
    }

    /// File name for the 0-based `index` (written as `index + 1`).
    pub fn file_name(&self, index: FrameIndex) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            index.0 + 1,
            self.suffix,
            width = self.width
        )
    }
}

impl std::fmt::Display for FramePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.width == 0 {
            write!(f, "{}%d{}", self.prefix, self.suffix)
        } else {
            write!(f, "{}%0{}d{}", self.prefix, self.width, self.suffix)
        }
    }
}

/// Where the N frames of a sequence live.
#[derive(Clone, Debug)]
pub struct FrameSource {
    pub count: usize,
    pub base_path: PathBuf,
    pub pattern: FramePattern,
}

impl FrameSource {
    pub fn new(count: usize, base_path: impl Into<PathBuf>, pattern: FramePattern) -> ReelResult<Self> {
        if count == 0 {
            return Err(ReelError::validation("frame count must be >= 1"));
        }
        Ok(Self {
            count,
            base_path: base_path.into(),
            pattern,
        })
    }

    pub fn path_for(&self, index: FrameIndex) -> PathBuf {
        self.base_path.join(self.pattern.file_name(index))
    }

    pub fn indices(&self) -> impl Iterator<Item = FrameIndex> + '_ {
        (0..self.count).map(FrameIndex)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[derive(Clone, Debug)]
enum Slot {
    Pending,
    Loaded(Frame),
    Failed,
}

/// Fixed-length, index-addressed store of the sequence's frames.
///
/// Slot `i` is only ever filled by the completion for index `i`, so arrival order does
/// not matter. Each slot settles once; later completions for a settled slot are ignored.
#[derive(Clone, Debug)]
pub struct FrameStore {
    slots: Vec<Slot>,
    loaded: usize,
    failed: usize,
}

impl FrameStore {
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![Slot::Pending; count],
            loaded: 0,
            failed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Store `frame` in its slot. Returns `false` when the slot had already settled.
    pub fn fill(&mut self, index: FrameIndex, frame: Frame) -> ReelResult<bool> {
        let slot = self.slot_mut(index)?;
        if !matches!(slot, Slot::Pending) {
            return Ok(false);
        }
        *slot = Slot::Loaded(frame);
        self.loaded += 1;
        Ok(true)
    }

    /// Mark the slot as failed. Returns `false` when the slot had already settled.
    pub fn mark_failed(&mut self, index: FrameIndex) -> ReelResult<bool> {
        let slot = self.slot_mut(index)?;
        if !matches!(slot, Slot::Pending) {
            return Ok(false);
        }
        *slot = Slot::Failed;
        self.failed += 1;
        Ok(true)
    }

    /// Replace a failed slot's content with `frame`. Counts stay as they are.
    pub fn substitute(&mut self, index: FrameIndex, frame: Frame) -> ReelResult<()> {
        let slot = self.slot_mut(index)?;
        if !matches!(slot, Slot::Failed) {
            return Err(ReelError::validation(format!(
                "frame {} is not failed and cannot be substituted",
                index.0
            )));
        }
        *slot = Slot::Loaded(frame);
        Ok(())
    }

    pub fn get(&self, index: FrameIndex) -> Option<&Frame> {
        match self.slots.get(index.0) {
            Some(Slot::Loaded(f)) => Some(f),
            _ => None,
        }
    }

    /// First frame that loaded successfully, in sequence order.
    pub fn first_loaded(&self) -> Option<&Frame> {
        self.slots.iter().find_map(|s| match s {
            Slot::Loaded(f) => Some(f),
            _ => None,
        })
    }

    pub fn failed_indices(&self) -> Vec<FrameIndex> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Slot::Failed))
            .map(|(i, _)| FrameIndex(i))
            .collect()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    pub fn pending_count(&self) -> usize {
        self.slots.len() - self.loaded - self.failed
    }

    fn slot_mut(&mut self, index: FrameIndex) -> ReelResult<&mut Slot> {
        let len = self.slots.len();
        self.slots.get_mut(index.0).ok_or_else(|| {
            ReelError::asset(format!(
                "frame index {} out of range for a sequence of {len}",
                index.0
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/frames.rs"]
mod tests;
