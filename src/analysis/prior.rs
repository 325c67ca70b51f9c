//! Prior-result summarization for the terminal correlation task.
//!
//! The correlation task receives a compact excerpt of earlier results, not
//! their full text: for each completed prior task a fixed list of named
//! sections is pulled from its analysis with a first-match regex. Output is
//! deterministic (task order, then section order) to keep prompt size bounded.

use regex::Regex;

use crate::domain::ResultStore;

/// Sections worth carrying into the correlation prompt, per task.
const TASK_SECTIONS: [(&str, &[&str]); 4] = [
    ("title_and_post_text_analysis", &["Purpose"]),
    (
        "language_feature_extraction",
        &[
            "Descriptive adjective",
            "Product needs description phrases",
            "Professional terminology usage",
        ],
    ),
    (
        "sentiment_color_tracking",
        &["Overall_sentiment", "Contextual sentiment interpretation"],
    ),
    (
        "trend_analysis",
        &[
            "Post publication time distribution",
            "Comment peak periods",
            "Discussion activity variations",
            "Trend Prediction",
        ],
    ),
];

/// Extract one named section: from the section heading up to the next blank
/// line (or end of text).
fn extract_section(analysis: &str, section: &str) -> Option<String> {
    let pattern = format!(r"(?s){}.*?(?:\n\n|\z)", regex::escape(section));
    let re = Regex::new(&pattern).ok()?;
    re.find(analysis).map(|m| m.as_str().trim().to_string())
}

/// Build the prior-results summary consumed by the correlation task.
///
/// Tasks missing from the store (failed or not yet run) are silently skipped;
/// the summary is whatever subset completed.
pub fn format_previous_results(store: &ResultStore) -> String {
    let mut formatted = String::from("\nPrevious Analysis Results Summary:\n");

    for (task_name, sections) in TASK_SECTIONS {
        let Some(result) = store.get(task_name) else {
            continue;
        };
        let Some(analysis) = result.analysis.as_deref() else {
            continue;
        };

        formatted.push_str(&format!("\n{}:\n", task_name));

        for section in sections {
            if let Some(content) = extract_section(analysis, section) {
                formatted.push_str(&format!("- {}\n", content));
            }
        }
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskResult, task_catalog};

    fn store_with(task_index: usize, analysis: &str) -> ResultStore {
        let mut store = ResultStore::new();
        store.insert(TaskResult::success(
            &task_catalog()[task_index],
            analysis.to_string(),
            5,
        ));
        store
    }

    #[test]
    fn test_empty_store_yields_header_only() {
        let store = ResultStore::new();
        let summary = format_previous_results(&store);
        assert_eq!(summary, "\nPrevious Analysis Results Summary:\n");
    }

    #[test]
    fn test_extracts_named_section() {
        let store = store_with(0, "Purpose: find buyers\nmore detail\n\nOther: ignored");
        let summary = format_previous_results(&store);

        assert!(summary.contains("title_and_post_text_analysis:"));
        assert!(summary.contains("- Purpose: find buyers\nmore detail"));
        assert!(!summary.contains("Other: ignored"));
    }

    #[test]
    fn test_section_at_end_of_text() {
        let store = store_with(0, "Purpose: reach the end");
        let summary = format_previous_results(&store);
        assert!(summary.contains("- Purpose: reach the end"));
    }

    #[test]
    fn test_missing_section_is_skipped() {
        let store = store_with(0, "Nothing relevant here");
        let summary = format_previous_results(&store);

        assert!(summary.contains("title_and_post_text_analysis:"));
        assert!(!summary.contains("- "));
    }

    #[test]
    fn test_failed_tasks_are_skipped() {
        let mut store = store_with(0, "Purpose: kept");
        store.insert(TaskResult::failure(
            &task_catalog()[3],
            "timeout".to_string(),
        ));

        let summary = format_previous_results(&store);
        assert!(summary.contains("- Purpose: kept"));
        assert!(!summary.contains("trend_analysis:"));
    }

    #[test]
    fn test_tasks_appear_in_fixed_order() {
        let mut store = ResultStore::new();
        // Insert out of order
        store.insert(TaskResult::success(
            &task_catalog()[3],
            "Trend Prediction: up".to_string(),
            5,
        ));
        store.insert(TaskResult::success(
            &task_catalog()[0],
            "Purpose: sell".to_string(),
            5,
        ));

        let summary = format_previous_results(&store);
        let title_pos = summary.find("title_and_post_text_analysis:").unwrap();
        let trend_pos = summary.find("trend_analysis:").unwrap();
        assert!(title_pos < trend_pos);
    }

    #[test]
    fn test_multiple_sections_from_one_task() {
        let analysis = "Overall_sentiment: positive\n\nContextual sentiment interpretation: warm\n\n";
        let store = store_with(2, analysis);

        let summary = format_previous_results(&store);
        assert!(summary.contains("- Overall_sentiment: positive"));
        assert!(summary.contains("- Contextual sentiment interpretation: warm"));
    }

    #[test]
    fn test_correlation_result_never_contributes() {
        let store = store_with(4, "Purpose: should not appear");
        let summary = format_previous_results(&store);
        assert_eq!(summary, "\nPrevious Analysis Results Summary:\n");
    }
}
