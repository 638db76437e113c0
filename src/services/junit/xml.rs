//! Minimal XML element tree built from quick-xml events.
//!
//! JUnit reporters disagree on nesting and namespacing, so the normalizer
//! needs random access to descendants rather than a single streaming pass.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// XML well-formedness errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("text content outside the root element")]
    TextOutsideRoot,

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("closing tag </{0}> has no matching start tag")]
    UnexpectedEnd(String),
}

fn malformed(err: impl std::fmt::Display) -> ParseError {
    ParseError::Malformed(err.to_string())
}

/// Strip a namespace prefix (`ns:tag`) or Clark-notation URI (`{uri}tag`).
pub fn local_name(tag: &str) -> &str {
    tag.rsplit([':', '}']).next().unwrap_or(tag)
}

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }
}

/// An XML element with its raw (possibly prefixed) tag name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Raw tag name as written in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag name with any namespace prefix removed.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Whether the local tag name equals `tag`.
    pub fn is(&self, tag: &str) -> bool {
        self.local_name() == tag
    }

    /// Attribute value by exact key, falling back to a prefix-insensitive match.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| self.attributes.iter().find(|(k, _)| local_name(k) == key))
            .map(|(_, v)| v.as_str())
    }

    /// Direct child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// All descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Concatenated text of this element and everything nested inside it.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// Pre-order iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Node::Element(el)) => {
                    self.stack.push(el.children.iter());
                    return Some(el);
                }
                Some(Node::Text(_)) => continue,
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// Parse a document into its root element.
pub fn parse_document(text: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                if open.is_empty() && root.is_some() {
                    return Err(ParseError::MultipleRoots);
                }
                open.push(start_element(&reader, &e)?);
            }
            Event::Empty(e) => {
                let el = start_element(&reader, &e)?;
                close_element(&mut open, &mut root, el)?;
            }
            Event::End(e) => {
                let Some(el) = open.pop() else {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(ParseError::UnexpectedEnd(name));
                };
                close_element(&mut open, &mut root, el)?;
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(malformed)?;
                push_text(&mut open, text)?;
            }
            Event::CData(e) => {
                let text = reader.decoder().decode(&e).map_err(malformed)?;
                push_text(&mut open, text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry nothing the report model needs.
            _ => {}
        }
    }

    if let Some(el) = open.pop() {
        return Err(ParseError::Unclosed(el.name));
    }
    root.ok_or(ParseError::NoRoot)
}

fn start_element(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<Element, ParseError> {
    let decoder = reader.decoder();
    let name = decoder
        .decode(e.name().as_ref())
        .map_err(malformed)?
        .into_owned();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(malformed)?;
        let key = decoder.decode(attr.key.as_ref()).map_err(malformed)?;
        let value = attr.unescape_value().map_err(malformed)?;
        attributes.push((key.into_owned(), value.into_owned()));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn close_element(
    open: &mut [Element],
    root: &mut Option<Element>,
    el: Element,
) -> Result<(), ParseError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Element(el)),
        None if root.is_some() => return Err(ParseError::MultipleRoots),
        None => *root = Some(el),
    }
    Ok(())
}

fn push_text(open: &mut [Element], text: Cow<'_, str>) -> Result<(), ParseError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Text(text.into_owned())),
        None if text.trim().is_empty() => {}
        None => return Err(ParseError::TextOutsideRoot),
    }
    Ok(())
}
