//! Decides a test case's outcome from its marker children.

use crate::models::TestStatus;

use super::xml::{Element, Node};

const TAG_FAILURE: &str = "failure";
const TAG_ERROR: &str = "error";
const TAG_SKIPPED: &str = "skipped";

/// Classified outcome of one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: TestStatus,
    /// Only set for failed cases.
    pub failure_message: Option<String>,
}

/// Classify a test case from its direct children.
///
/// `failure` wins over `error`, and either wins over `skipped`. A case
/// without any marker passed.
pub fn classify(children: &[Node]) -> Outcome {
    let failure = find_marker(children, TAG_FAILURE).or_else(|| find_marker(children, TAG_ERROR));
    if let Some(node) = failure {
        return Outcome {
            status: TestStatus::Failed,
            failure_message: failure_message(node),
        };
    }

    let status = if find_marker(children, TAG_SKIPPED).is_some() {
        TestStatus::Skipped
    } else {
        TestStatus::Passed
    };

    Outcome {
        status,
        failure_message: None,
    }
}

/// Exact local-name match first, then any child whose raw tag ends with the marker.
fn find_marker<'a>(children: &'a [Node], marker: &str) -> Option<&'a Element> {
    let elements = || children.iter().filter_map(Node::as_element);
    elements()
        .find(|el| el.is(marker))
        .or_else(|| elements().find(|el| el.name().ends_with(marker)))
}

/// `message` attribute and body text, newline-joined, trimmed, `None` when blank.
fn failure_message(node: &Element) -> Option<String> {
    let attr = node.attr("message").unwrap_or("");
    let body = node.text();

    let joined = match (attr.is_empty(), body.is_empty()) {
        (false, false) => format!("{}\n{}", attr, body),
        (false, true) => attr.to_string(),
        (true, _) => body,
    };

    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
