//! Prompt renderer - substitute context variables with Handlebars.
//!
//! Rendering runs in strict mode: a placeholder with no matching variable is
//! a configuration error, surfaced before any network call ever happens.

use std::collections::HashMap;

use handlebars::Handlebars;

use crate::error::{RedsiftError, Result};

/// Renders prompt templates using Handlebars templating
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // A missing variable is an error, not an empty string
        handlebars.set_strict_mode(true);
        // Prompts are plain text, never HTML-escape
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Render a template string with the given variables.
    pub fn render(&self, template: &str, variables: &HashMap<String, String>) -> Result<String> {
        self.handlebars
            .render_template(template, variables)
            .map_err(|e| RedsiftError::Template(format!("Failed to render template: {}", e)))
    }
}
