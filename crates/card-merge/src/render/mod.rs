//! Card rendering
//!
//! This module turns placed cards into drawing instructions:
//! - `CardCanvas`, the narrow interface a document backend implements
//! - Card rendering (binding resolution, image fitting, list fields)
//! - The printpdf-backed canvas

mod card;
mod pdf;
mod text;

pub use card::{CardOutcome, render_card};
pub use pdf::PdfCanvas;
pub use text::{BULLET, LIST_DELIMITER, bullet_lines, clip_lines, split_list, wrap_text};

use crate::images::probe_dimensions;
use crate::types::{ImageError, MergeError, Result};
use std::path::{Path, PathBuf};

/// Wrapped text placed on a page, in mm from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    pub font_size_pt: f32,
    pub lines: Vec<String>,
}

/// An image drawn at its fitted size, in mm from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDraw {
    pub path: PathBuf,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Full-bleed underlay stamped on every page
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    path: PathBuf,
    width_px: u32,
    height_px: u32,
}

impl Background {
    /// Check that the background is a readable image.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (width_px, height_px) =
            probe_dimensions(path).map_err(|e| MergeError::Background(e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            width_px,
            height_px,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimensions_px(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }
}

/// Drawing surface for paginated cards
pub trait CardCanvas {
    /// Start a new page; later draws land on it
    fn add_page(&mut self, width_mm: f32, height_mm: f32) -> Result<()>;

    /// Stretch the background over the whole current page
    fn stamp_background(&mut self, background: &Background) -> Result<()>;

    fn draw_text(&mut self, block: &TextBlock) -> Result<()>;

    /// Failures only cost this image
    fn draw_image(&mut self, image: &ImageDraw) -> std::result::Result<(), ImageError>;
}
