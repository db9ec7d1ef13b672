//! File discovery for finding photos in directories.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::types::PhotoSet;

/// Discovers image files in directories.
pub struct FileDiscovery {
    config: ProcessingConfig,
    skip_suffix: Option<String>,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            config,
            skip_suffix: None,
        }
    }

    /// Skip directory entries whose stem already ends with `suffix`, so a
    /// second run over the same folder does not watermark earlier outputs.
    pub fn skip_suffix(mut self, suffix: &str) -> Self {
        self.skip_suffix = (!suffix.is_empty()).then(|| suffix.to_string());
        self
    }

    /// Discover all supported image files at a path.
    ///
    /// An explicit file is returned as-is so that a bad selection surfaces as
    /// a failed photo instead of disappearing. Directories are walked
    /// recursively and filtered by extension.
    pub fn discover(&self, path: &Path) -> Vec<PathBuf> {
        if path.is_file() || !path.exists() {
            return vec![path.to_path_buf()];
        }

        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| self.is_supported(p) && !self.is_previous_output(p))
            .collect();

        // Sort by path for deterministic ordering
        files.sort();
        files
    }

    /// Discover every input and gather them into a de-duplicated set.
    pub fn collect(&self, inputs: &[PathBuf]) -> PhotoSet {
        let mut set = PhotoSet::new();
        for input in inputs {
            for path in self.discover(input) {
                if !set.add(&path) {
                    tracing::debug!("Skipping duplicate selection {:?}", path);
                }
            }
        }
        set
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }

    fn is_previous_output(&self, path: &Path) -> bool {
        match (&self.skip_suffix, path.file_stem().and_then(|s| s.to_str())) {
            (Some(suffix), Some(stem)) => stem.ends_with(suffix.as_str()),
            _ => false,
        }
    }
}
