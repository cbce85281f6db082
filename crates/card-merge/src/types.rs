use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Background error: {0}")]
    Background(String),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, MergeError>;

/// Failures that only cost a single image; the slot still renders its text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("Unreadable image {reference}: {reason}")]
    Unreadable { reference: String, reason: String },
    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },
}

/// One row of the input data set, keyed by header.
pub type Record = HashMap<String, String>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Portrait: height > width
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Supported paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A5,
    A6,
}

impl PaperSize {
    /// Get base dimensions (always portrait)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::A6 => (105.0, 148.0),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Items per page used by grid mode when no override is given
    pub fn default_items_per_page(self, orientation: Orientation) -> usize {
        match (self, orientation) {
            (PaperSize::A4, Orientation::Portrait) => 5,
            (PaperSize::A4, Orientation::Landscape) => 6,
            (PaperSize::A5, Orientation::Portrait) => 3,
            (PaperSize::A5, Orientation::Landscape) => 4,
            (PaperSize::A6, Orientation::Portrait) => 1,
            (PaperSize::A6, Orientation::Landscape) => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
            PaperSize::A6 => "A6",
        }
    }
}

/// Physical page description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub size: PaperSize,
    pub orientation: Orientation,
    pub margin_mm: f32,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margin_mm: 10.0,
        }
    }
}

impl PageSpec {
    pub fn new(size: PaperSize, orientation: Orientation) -> Self {
        Self {
            size,
            orientation,
            ..Default::default()
        }
    }

    /// Full page dimensions (width, height) in mm
    pub fn dimensions_mm(&self) -> (f32, f32) {
        self.size.dimensions_with_orientation(self.orientation)
    }

    /// Page dimensions minus the margin on every edge.
    ///
    /// Fails with `InvalidLayout` when the margins leave no room.
    pub fn usable_area_mm(&self) -> Result<(f32, f32)> {
        let (w, h) = self.dimensions_mm();
        let usable_w = w - 2.0 * self.margin_mm;
        let usable_h = h - 2.0 * self.margin_mm;
        if usable_w <= 0.0 || usable_h <= 0.0 {
            return Err(MergeError::InvalidLayout(format!(
                "{}mm margin leaves no usable area on {} {:?}",
                self.margin_mm,
                self.size.name(),
                self.orientation
            )));
        }
        Ok((usable_w, usable_h))
    }
}
