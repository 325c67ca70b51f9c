//! Prompt templates - loading, section extraction, and variable rendering
//!
//! Each analysis task has one template file carrying tagged sections
//! (`<role>`, `<task>`, `<context>`, `<requirements>`,
//! `<detailed_analysis_protocol>`, `<output_example>`) and handlebars
//! placeholders. The catalog resolves every task's template up front so
//! configuration problems surface before any network call.

pub mod catalog;
pub mod loader;
pub mod render;
pub mod sections;

pub use catalog::PromptCatalog;
pub use loader::PromptLoader;
pub use render::PromptRenderer;
pub use sections::{TaskComponents, extract_components};
