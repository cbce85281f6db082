//! Image references: local paths and remote URLs
//!
//! Remote images are downloaded once per merge into a temporary directory
//! that is removed when the cache is dropped.

use crate::types::ImageError;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Default bound on a single remote fetch
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Largest remote image accepted
const MAX_REMOTE_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Turns image references into readable local files
pub trait ImageSource {
    /// Local path for a path or URL reference
    fn materialize(&mut self, reference: &str) -> Result<PathBuf, ImageError>;

    /// Pixel dimensions of a local image
    fn probe(&self, path: &Path) -> Result<(u32, u32), ImageError> {
        probe_dimensions(path)
    }
}

/// Read an image's pixel dimensions from its header
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), ImageError> {
    let unreadable = |reason: String| ImageError::Unreadable {
        reference: path.display().to_string(),
        reason,
    };
    let (width, height) = ::image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| unreadable(e.to_string()))?
        .into_dimensions()
        .map_err(|e| unreadable(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(unreadable(format!("image reports {}x{}", width, height)));
    }
    Ok((width, height))
}

pub fn is_remote(reference: &str) -> bool {
    let lower = reference.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Read at most `limit` bytes; a longer body is an error, not a truncation
fn read_capped<R: Read>(reader: R, limit: u64) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| e.to_string())?;
    if bytes.len() as u64 > limit {
        return Err(format!("image exceeds {} bytes", limit));
    }
    Ok(bytes)
}

/// Request-scoped image cache
pub struct ImageCache {
    base_dir: Option<PathBuf>,
    agent: ureq::Agent,
    temp_dir: Option<TempDir>,
    /// Outcome of every remote fetch, failures included
    fetched: HashMap<String, Result<PathBuf, ImageError>>,
}

impl ImageCache {
    /// # Arguments
    /// * `base_dir` - Directory relative paths are resolved against
    /// * `fetch_timeout` - Upper bound for each remote download
    pub fn new(base_dir: Option<PathBuf>, fetch_timeout: Duration) -> Self {
        Self {
            base_dir,
            agent: ureq::AgentBuilder::new().timeout(fetch_timeout).build(),
            temp_dir: None,
            fetched: HashMap::new(),
        }
    }

    /// Number of distinct remote references seen so far
    pub fn remote_count(&self) -> usize {
        self.fetched.len()
    }

    fn resolve_local(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn fetch(&mut self, url: &str) -> Result<PathBuf, ImageError> {
        let failed = |reason: String| ImageError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        if self.temp_dir.is_none() {
            self.temp_dir = Some(TempDir::new().map_err(|e| failed(e.to_string()))?);
        }
        let target = match &self.temp_dir {
            Some(dir) => dir.path().join(format!("remote-{}", self.fetched.len())),
            None => return Err(failed("no temporary directory".to_string())),
        };

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| failed(e.to_string()))?;

        let bytes =
            read_capped(response.into_reader(), MAX_REMOTE_IMAGE_BYTES).map_err(failed)?;
        if bytes.is_empty() {
            return Err(failed("empty response".to_string()));
        }

        std::fs::write(&target, &bytes).map_err(|e| failed(e.to_string()))?;
        log::debug!("Fetched {} ({} bytes)", url, bytes.len());
        Ok(target)
    }
}

impl ImageSource for ImageCache {
    fn materialize(&mut self, reference: &str) -> Result<PathBuf, ImageError> {
        let reference = reference.trim();
        if !is_remote(reference) {
            return Ok(self.resolve_local(reference));
        }

        if let Some(outcome) = self.fetched.get(reference) {
            return outcome.clone();
        }
        let outcome = self.fetch(reference);
        self.fetched.insert(reference.to_string(), outcome.clone());
        outcome
    }
}
