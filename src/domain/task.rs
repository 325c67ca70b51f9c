//! The fixed analysis task registry.
//!
//! The pipeline runs a fixed, ordered list of five tasks. Only the terminal
//! correlation task consumes prior task outputs; every other task works from
//! the filtered corpus alone. Tasks are defined once here and never created
//! or destroyed at runtime.

/// One named, numbered stage of the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// Unique key, also the template name and the ResultStore key
    pub name: &'static str,

    /// 1-based execution order, contiguous
    pub number: u32,

    /// Whether this task's prompt includes prior task results instead of the corpus
    pub depends_on_prior: bool,
}

/// The five pipeline tasks, in execution order.
static TASKS: [TaskSpec; 5] = [
    TaskSpec {
        name: "title_and_post_text_analysis",
        number: 1,
        depends_on_prior: false,
    },
    TaskSpec {
        name: "language_feature_extraction",
        number: 2,
        depends_on_prior: false,
    },
    TaskSpec {
        name: "sentiment_color_tracking",
        number: 3,
        depends_on_prior: false,
    },
    TaskSpec {
        name: "trend_analysis",
        number: 4,
        depends_on_prior: false,
    },
    TaskSpec {
        name: "correlation_analysis",
        number: 5,
        depends_on_prior: true,
    },
];

/// The full ordered task catalog.
pub fn task_catalog() -> &'static [TaskSpec] {
    &TASKS
}
