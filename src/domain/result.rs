//! Task results and their run-scoped accumulation.
//!
//! A TaskResult is immutable once constructed: exactly one of `analysis` and
//! `error` is set, and the constructors are the only way to build one. The
//! ResultStore keeps successful results keyed by task name in execution order;
//! it is cleared at the start of every run.

use serde::{Deserialize, Serialize};

use super::task::TaskSpec;

/// Output of one attempted analysis task.
///
/// Serializes to the same shape the callback consumers export: a success
/// carries `analysis`, a failure carries `error`, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_name: String,
    pub task_number: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub posts_analyzed: usize,
}

impl TaskResult {
    /// Build a success result for a completed task.
    pub fn success(task: &TaskSpec, analysis: String, posts_analyzed: usize) -> Self {
        Self {
            task_name: task.name.to_string(),
            task_number: task.number,
            analysis: Some(analysis),
            error: None,
            posts_analyzed,
        }
    }

    /// Build a failure result after retries are exhausted.
    pub fn failure(task: &TaskSpec, error: String) -> Self {
        Self {
            task_name: task.name.to_string(),
            task_number: task.number,
            analysis: None,
            error: Some(error),
            posts_analyzed: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.analysis.is_some()
    }
}

/// Ordered, task-keyed accumulation of completed task outputs.
///
/// Insertion order equals task execution order. At most one entry per task
/// name; re-inserting a name overwrites the earlier entry in place.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: Vec<TaskResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all entries. Called at the start of every run.
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Insert a result, overwriting any earlier entry for the same task name.
    pub fn insert(&mut self, result: TaskResult) {
        if let Some(existing) = self
            .results
            .iter_mut()
            .find(|r| r.task_name == result.task_name)
        {
            *existing = result;
        } else {
            self.results.push(result);
        }
    }

    /// Look up a result by task name.
    pub fn get(&self, task_name: &str) -> Option<&TaskResult> {
        self.results.iter().find(|r| r.task_name == task_name)
    }

    /// Iterate results in insertion (execution) order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::task_catalog;

    fn first_task() -> &'static TaskSpec {
        &task_catalog()[0]
    }

    fn second_task() -> &'static TaskSpec {
        &task_catalog()[1]
    }

    #[test]
    fn test_success_result_fields() {
        let result = TaskResult::success(first_task(), "analysis text".to_string(), 10);

        assert_eq!(result.task_name, "title_and_post_text_analysis");
        assert_eq!(result.task_number, 1);
        assert_eq!(result.analysis.as_deref(), Some("analysis text"));
        assert!(result.error.is_none());
        assert_eq!(result.posts_analyzed, 10);
        assert!(result.is_success());
    }

    #[test]
    fn test_failure_result_fields() {
        let result = TaskResult::failure(first_task(), "boom".to_string());

        assert!(result.analysis.is_none());
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert_eq!(result.posts_analyzed, 0);
        assert!(!result.is_success());
    }

    #[test]
    fn test_success_serialization_omits_error_field() {
        let result = TaskResult::success(first_task(), "text".to_string(), 3);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["analysis"], "text");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_serialization_omits_analysis_field() {
        let result = TaskResult::failure(first_task(), "oops".to_string());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["error"], "oops");
        assert!(json.get("analysis").is_none());
        assert_eq!(json["posts_analyzed"], 0);
    }

    #[test]
    fn test_store_insert_and_get() {
        let mut store = ResultStore::new();
        store.insert(TaskResult::success(first_task(), "a".to_string(), 1));

        assert_eq!(store.len(), 1);
        assert!(store.get("title_and_post_text_analysis").is_some());
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_store_preserves_insertion_order() {
        let mut store = ResultStore::new();
        store.insert(TaskResult::success(first_task(), "a".to_string(), 1));
        store.insert(TaskResult::success(second_task(), "b".to_string(), 1));

        let names: Vec<&str> = store.iter().map(|r| r.task_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["title_and_post_text_analysis", "language_feature_extraction"]
        );
    }

    #[test]
    fn test_store_overwrites_same_task_in_place() {
        let mut store = ResultStore::new();
        store.insert(TaskResult::success(first_task(), "old".to_string(), 1));
        store.insert(TaskResult::success(second_task(), "b".to_string(), 1));
        store.insert(TaskResult::success(first_task(), "new".to_string(), 2));

        assert_eq!(store.len(), 2);
        let entry = store.get("title_and_post_text_analysis").unwrap();
        assert_eq!(entry.analysis.as_deref(), Some("new"));

        // Overwrite keeps the original position
        let names: Vec<&str> = store.iter().map(|r| r.task_name.as_str()).collect();
        assert_eq!(names[0], "title_and_post_text_analysis");
    }

    #[test]
    fn test_store_clear() {
        let mut store = ResultStore::new();
        store.insert(TaskResult::success(first_task(), "a".to_string(), 1));
        assert!(!store.is_empty());

        store.clear();
        assert!(store.is_empty());
    }
}
