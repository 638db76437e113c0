//! Flattens JUnit documents of any common shape into raw test cases.
//!
//! Accepted layouts:
//! - a bare `<testsuite>` root
//! - a `<testsuites>` wrapper around one or more suites
//! - suites grouping cases through arbitrary intermediate elements
//!
//! Tag comparisons ignore namespace prefixes.

use super::xml::{Element, Node, ParseError, parse_document};

const TAG_REPORT: &str = "testsuites";
const TAG_TEST_SUITE: &str = "testsuite";
const TAG_TEST_CASE: &str = "testcase";

/// A `<testcase>` element before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCase<'a> {
    pub name: &'a str,
    pub classname: Option<&'a str>,
    /// Seconds. `Some(0.0)` when the attribute is missing, `None` when it is unparsable.
    pub time_s: Option<f64>,
    /// Direct children, where outcome markers live.
    pub children: &'a [Node],
}

impl<'a> RawCase<'a> {
    fn from_element(el: &'a Element) -> Self {
        RawCase {
            name: el.attr("name").unwrap_or(""),
            classname: el.attr("classname"),
            time_s: el.attr("time").map_or(Some(0.0), parse_time),
            children: &el.children,
        }
    }
}

/// Parse a `time` attribute, rejecting values that cannot be a duration.
fn parse_time(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite() && *t >= 0.0)
}

/// A parsed JUnit document.
#[derive(Debug, Clone)]
pub struct JunitDocument {
    root: Element,
}

impl JunitDocument {
    /// Parse well-formed XML text.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_document(text).map(|root| JunitDocument { root })
    }

    /// Suites holding the document's test cases.
    ///
    /// Under a `testsuites` root this is every outermost `testsuite`
    /// descendant. A suite nested in another suite is reached through its
    /// parent, so each case is reported once. Any other root is itself the
    /// only suite.
    fn suites(&self) -> Vec<&Element> {
        if !self.root.name().ends_with(TAG_REPORT) {
            return vec![&self.root];
        }

        let mut suites = Vec::new();
        collect_outermost_suites(&self.root, &mut suites);
        suites
    }

    /// Test cases in document order.
    pub fn testcases(&self) -> impl Iterator<Item = RawCase<'_>> + '_ {
        self.suites().into_iter().flat_map(|suite| {
            suite
                .descendants()
                .filter(|el| el.is(TAG_TEST_CASE))
                .map(RawCase::from_element)
        })
    }
}

fn collect_outermost_suites<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
    for child in el.child_elements() {
        if child.is(TAG_TEST_SUITE) {
            out.push(child);
        } else {
            collect_outermost_suites(child, out);
        }
    }
}
