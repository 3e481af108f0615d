use std::path::{Component, Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::{
        color::ColorDef,
        frames::{FramePattern, FrameSource},
    },
    foundation::core::Viewport,
    foundation::error::{ReelError, ReelResult},
    playback::gate::FailurePolicy,
};

/// Where the frame sequence lives and how its files are named.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FramesConfig {
    /// Total number of frames, `N`.
    pub count: usize,
    /// Directory holding the frame files. Relative paths resolve against the config
    /// file's directory.
    pub base_path: PathBuf,
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Page configuration, as read from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    pub frames: FramesConfig,
    /// Minimum time the loader stays up, in milliseconds.
    #[serde(default = "default_min_loading_ms")]
    pub min_loading_ms: u64,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Height of the scroll container in viewport heights (`500` = `500vh`).
    #[serde(default = "default_scroll_length_vh")]
    pub scroll_length_vh: f64,
    #[serde(default = "default_background")]
    pub background: ColorDef,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default = "default_dpr")]
    pub device_pixel_ratio: f64,
    /// Decoder threads; `None` lets rayon decide.
    #[serde(default)]
    pub loader_threads: Option<usize>,
    /// Extra font directories for overlay text, on top of system fonts.
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,
    #[serde(default = "default_true")]
    pub show_cursor: bool,
}

fn default_pattern() -> String {
    FramePattern::DEFAULT.to_owned()
}

fn default_min_loading_ms() -> u64 {
    3000
}

fn default_scroll_length_vh() -> f64 {
    500.0
}

fn default_background() -> ColorDef {
    ColorDef::PAGE_BLACK
}

fn default_dpr() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl PageConfig {
    /// A config with every optional field at its default.
    pub fn with_frames(count: usize, base_path: impl Into<PathBuf>) -> Self {
        Self {
            frames: FramesConfig {
                count,
                base_path: base_path.into(),
                pattern: default_pattern(),
            },
            min_loading_ms: default_min_loading_ms(),
            failure_policy: FailurePolicy::default(),
            scroll_length_vh: default_scroll_length_vh(),
            background: default_background(),
            viewport: ViewportConfig::default(),
            device_pixel_ratio: default_dpr(),
            loader_threads: None,
            font_dirs: Vec::new(),
            show_cursor: true,
        }
    }

    pub fn from_json(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ReelError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, validate and anchor relative paths at the file's directory.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read page config '{}'", path.display()))?;
        let mut cfg = Self::from_json(&s)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        cfg.resolve_relative_to(root);
        Ok(cfg)
    }

    pub fn resolve_relative_to(&mut self, root: &Path) {
        if self.frames.base_path.is_relative() {
            self.frames.base_path = root.join(&self.frames.base_path);
        }
        for dir in &mut self.font_dirs {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.frames.count == 0 {
            return Err(ReelError::validation("frames.count must be >= 1"));
        }
        FramePattern::parse(&self.frames.pattern)?;
        if self
            .frames
            .base_path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(ReelError::validation(
                "frames.base_path must not contain '..'",
            ));
        }
        if !self.scroll_length_vh.is_finite() || self.scroll_length_vh < 100.0 {
            return Err(ReelError::validation(
                "scroll_length_vh must be finite and >= 100",
            ));
        }
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(ReelError::validation(
                "device_pixel_ratio must be finite and > 0",
            ));
        }
        Viewport::new(self.viewport.width, self.viewport.height)?;
        if let Some(n) = self.loader_threads
            && n == 0
        {
            return Err(ReelError::validation("loader_threads must be >= 1 when set"));
        }
        Ok(())
    }

    pub fn viewport(&self) -> ReelResult<Viewport> {
        Viewport::new(self.viewport.width, self.viewport.height)
    }

    pub fn frame_source(&self) -> ReelResult<FrameSource> {
        FrameSource::new(
            self.frames.count,
            self.frames.base_path.clone(),
            FramePattern::parse(&self.frames.pattern)?,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/config.rs"]
mod tests;
