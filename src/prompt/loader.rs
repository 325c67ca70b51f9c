//! Prompt loader - load and cache task templates from a directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{RedsiftError, Result};

/// Loads and caches prompt templates from a directory
pub struct PromptLoader {
    /// Base directory containing prompt template files
    templates_dir: PathBuf,
    /// In-memory cache of loaded templates
    cache: RwLock<HashMap<String, String>>,
}

impl PromptLoader {
    /// Create a new PromptLoader with the given templates directory
    pub fn new(templates_dir: impl AsRef<Path>) -> Self {
        Self {
            templates_dir: templates_dir.as_ref().to_path_buf(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Load a template by name (without the .md extension), reading from disk
    /// on first use and from the in-memory cache afterwards.
    pub fn load(&self, name: &str) -> Result<String> {
        {
            let cache = self.cache.read().map_err(|e| {
                RedsiftError::Template(format!("Failed to acquire read lock: {}", e))
            })?;
            if let Some(content) = cache.get(name) {
                return Ok(content.clone());
            }
        }

        let path = self.template_path(name);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            RedsiftError::Template(format!(
                "Failed to load template '{}' from {:?}: {}",
                name, path, e
            ))
        })?;

        {
            let mut cache = self.cache.write().map_err(|e| {
                RedsiftError::Template(format!("Failed to acquire write lock: {}", e))
            })?;
            cache.insert(name.to_string(), content.clone());
        }

        Ok(content)
    }

    /// Check if a template exists on disk
    pub fn exists(&self, name: &str) -> bool {
        self.template_path(name).exists()
    }

    /// Get the full path for a template by name
    fn template_path(&self, name: &str) -> PathBuf {
        self.templates_dir.join(format!("{}.md", name))
    }

    /// List all available templates in the directory
    pub fn list_available(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.templates_dir).map_err(|e| {
            RedsiftError::Template(format!(
                "Failed to read templates directory {:?}: {}",
                self.templates_dir, e
            ))
        })?;

        let mut templates = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md")
                && let Some(stem) = path.file_stem()
                && let Some(name) = stem.to_str()
            {
                templates.push(name.to_string());
            }
        }

        templates.sort();
        Ok(templates)
    }

    /// Get the templates directory path
    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}
