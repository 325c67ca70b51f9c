//! redsift - Reddit corpus collection and sequential LLM analysis
//!
//! redsift scrapes Reddit posts and comments, selects the top-scoring subset,
//! and drives them through a fixed pipeline of LLM analysis tasks with client-side
//! rate limiting and per-task retry. Task results stream back to the caller
//! through a callback, and one failed task never aborts the rest of the run.

pub mod analysis;
pub mod corpus;
pub mod domain;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod scrape;

pub use error::{RedsiftError, Result};
