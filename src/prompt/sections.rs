//! Tagged-section extraction from rendered templates.
//!
//! Templates carry their parts in XML-style tags. A tag that is absent
//! extracts to the empty string; extraction itself never fails.

use regex::Regex;

/// The named sections of one task template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskComponents {
    pub role: String,
    pub task: String,
    pub context: String,
    pub requirements: String,
    pub protocol: String,
    pub output_format: String,
}

fn extract_tag_content(content: &str, tag: &str) -> String {
    let pattern = format!("(?s)<{tag}>(.*?)</{tag}>");
    match Regex::new(&pattern) {
        Ok(re) => re
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}

/// Pull the named sections out of a rendered template.
pub fn extract_components(content: &str) -> TaskComponents {
    TaskComponents {
        role: extract_tag_content(content, "role"),
        task: extract_tag_content(content, "task"),
        context: extract_tag_content(content, "context"),
        requirements: extract_tag_content(content, "requirements"),
        protocol: extract_tag_content(content, "detailed_analysis_protocol"),
        output_format: extract_tag_content(content, "output_example"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"
<role>You are an analyst.</role>
<task>Analyze the posts.</task>
<context>Reddit marketing research.</context>
<requirements>Be terse.</requirements>
<detailed_analysis_protocol>
Step 1. Read.
Step 2. Write.
</detailed_analysis_protocol>
<output_example>Purpose: example</output_example>
"#;

    #[test]
    fn test_extracts_all_sections() {
        let components = extract_components(TEMPLATE);

        assert_eq!(components.role, "You are an analyst.");
        assert_eq!(components.task, "Analyze the posts.");
        assert_eq!(components.context, "Reddit marketing research.");
        assert_eq!(components.requirements, "Be terse.");
        assert_eq!(components.protocol, "Step 1. Read.\nStep 2. Write.");
        assert_eq!(components.output_format, "Purpose: example");
    }

    #[test]
    fn test_missing_tag_extracts_empty() {
        let components = extract_components("<role>only a role</role>");

        assert_eq!(components.role, "only a role");
        assert_eq!(components.task, "");
        assert_eq!(components.output_format, "");
    }

    #[test]
    fn test_multiline_content_is_trimmed() {
        let content = "<task>\n  do things  \n</task>";
        assert_eq!(extract_tag_content(content, "task"), "do things");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let content = "<task>first</task><task>second</task>";
        assert_eq!(extract_tag_content(content, "task"), "first");
    }

    #[test]
    fn test_empty_input() {
        let components = extract_components("");
        assert_eq!(components, TaskComponents::default());
    }
}
