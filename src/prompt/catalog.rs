//! Typed task-to-template catalog.
//!
//! Resolves every pipeline task against its template file exactly once:
//! load, substitute variables, extract sections. Any missing file or
//! unresolved placeholder fails the whole resolution, before the pipeline
//! makes its first network call.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::TaskSpec;
use crate::error::Result;
use crate::prompt::loader::PromptLoader;
use crate::prompt::render::PromptRenderer;
use crate::prompt::sections::{TaskComponents, extract_components};

/// Loads, renders, and sections task templates.
pub struct PromptCatalog {
    loader: PromptLoader,
    renderer: PromptRenderer,
}

impl PromptCatalog {
    pub fn new(templates_dir: impl AsRef<Path>) -> Self {
        Self {
            loader: PromptLoader::new(templates_dir),
            renderer: PromptRenderer::new(),
        }
    }

    /// Resolve the components for every task in the catalog.
    ///
    /// Returned map is keyed by task name. Fails on the first missing
    /// template file or unresolved placeholder.
    pub fn resolve(
        &self,
        tasks: &[TaskSpec],
        variables: &HashMap<String, String>,
    ) -> Result<HashMap<String, TaskComponents>> {
        let mut resolved = HashMap::with_capacity(tasks.len());
        for task in tasks {
            let raw = self.loader.load(task.name)?;
            let rendered = self.renderer.render(&raw, variables)?;
            resolved.insert(task.name.to_string(), extract_components(&rendered));
        }
        Ok(resolved)
    }

    /// Template names present on disk.
    pub fn available(&self) -> Result<Vec<String>> {
        self.loader.list_available()
    }
}
