use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Parses and rasterizes the SVG markup the overlay, navbar and loader are built from.
///
/// The font database is built once; system fonts plus any `*.ttf`/`*.otf` found in the
/// extra font directories.
#[derive(Clone)]
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl SvgRasterizer {
    pub fn new(font_dirs: &[&Path]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in font_dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "svg font database ready");
        Self {
            fontdb: Arc::new(db),
        }
    }

    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    pub fn parse(&self, markup: &str) -> ReelResult<usvg::Tree> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(markup, &opts).context("parse svg tree")?;
        Ok(tree)
    }

    /// Rasterize `tree` stretched to `width`×`height`, premultiplied RGBA8.
    pub fn rasterize(&self, tree: &usvg::Tree, width: u32, height: u32) -> ReelResult<Vec<u8>> {
        const MAX_DIM: u32 = 16_384;
        if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
            return Err(ReelError::render(format!(
                "svg raster size out of range: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| ReelError::render("failed to allocate svg pixmap"))?;

        let sx = (width as f32) / tree.size().width();
        let sy = (height as f32) / tree.size().height();
        let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

        resvg::render(tree, xform, &mut pixmap.as_mut());
        Ok(pixmap.data().to_vec())
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in rd.flatten() {
        let path = entry.path();
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"));
        if is_font && let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

/// Escape text for inclusion in SVG character data or attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
