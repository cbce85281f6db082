use crate::images::{DEFAULT_FETCH_TIMEOUT_SECS, ImageCache};
use crate::layout::{FEATURES_FIELD, GridFields};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings shared by both merge modes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Document title written into the PDF metadata
    pub title: String,
    /// Base font size in points
    pub font_size_pt: f32,
    /// Raster image stretched under every page
    pub background: Option<PathBuf>,
    /// Upper bound for each remote image download
    pub fetch_timeout_secs: u64,
    /// Directory relative image paths are resolved against
    pub base_dir: Option<PathBuf>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            title: "Cards".to_string(),
            font_size_pt: 10.0,
            background: None,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            base_dir: None,
        }
    }
}

impl MergeOptions {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Image cache scoped to one merge
    pub fn image_cache(&self) -> ImageCache {
        ImageCache::new(self.base_dir.clone(), self.fetch_timeout())
    }

    pub fn validate(&self) -> Result<()> {
        if self.font_size_pt <= 0.0 {
            return Err(MergeError::Config(format!(
                "Font size must be positive, got {}",
                self.font_size_pt
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(MergeError::Config(
                "Fetch timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fixed-grid merge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    pub page: PageSpec,
    /// Cards per page, `None` for the paper default
    pub items_per_page: Option<usize>,
    /// Field shown as the card title, first header when unset
    pub title_field: Option<String>,
    /// Field holding an image path or URL
    pub image_field: Option<String>,
    /// Field rendered as a bulleted list when present in the data
    pub features_field: String,
    pub merge: MergeOptions,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            page: PageSpec::default(),
            items_per_page: None,
            title_field: None,
            image_field: None,
            features_field: FEATURES_FIELD.to_string(),
            merge: MergeOptions::default(),
        }
    }
}

impl GridOptions {
    /// Load options from JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| MergeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MergeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.items_per_page == Some(0) {
            return Err(MergeError::InvalidLayout(
                "items per page must be at least 1".to_string(),
            ));
        }
        if self.page.margin_mm < 0.0 {
            return Err(MergeError::Config(format!(
                "Margin cannot be negative, got {}mm",
                self.page.margin_mm
            )));
        }
        self.page.usable_area_mm()?;
        self.merge.validate()
    }

    /// Decide which headers feed which part of the grid card.
    ///
    /// Configured fields that the data does not have are still bound and
    /// simply render empty.
    pub fn fields(&self, headers: &[String]) -> GridFields {
        let title = self.title_field.clone().or_else(|| headers.first().cloned());
        let features = headers
            .iter()
            .find(|h| h.eq_ignore_ascii_case(&self.features_field))
            .cloned();

        let body = headers
            .iter()
            .filter(|h| Some(*h) != title.as_ref())
            .filter(|h| Some(*h) != self.image_field.as_ref())
            .filter(|h| Some(*h) != features.as_ref())
            .cloned()
            .collect();

        GridFields {
            title,
            image: self.image_field.clone(),
            features,
            body,
        }
    }
}
