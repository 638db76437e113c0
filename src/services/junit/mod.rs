//! JUnit XML report parsing.

mod classifier;
mod normalizer;
mod xml;

pub use classifier::{Outcome, classify};
pub use normalizer::{JunitDocument, RawCase};
pub use xml::{Element, Node, ParseError, local_name};

use crate::models::NewTestCase;

/// Parse a report and classify every test case in document order.
pub fn extract_testcases(text: &str) -> Result<Vec<NewTestCase>, ParseError> {
    let document = JunitDocument::parse(text)?;
    let cases = document
        .testcases()
        .map(|raw| {
            let outcome = classify(raw.children);
            NewTestCase {
                name: raw.name.to_string(),
                classname: raw.classname.map(String::from),
                status: outcome.status,
                time_s: raw.time_s,
                failure_message: outcome.failure_message,
            }
        })
        .collect();
    Ok(cases)
}
