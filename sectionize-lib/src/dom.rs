//! A small owned DOM tree, just deep enough for section matching: tag names,
//! attributes in source order, children, and serialization back to markup.

use html5ever::QualName;
use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

/// Void (self-closing) elements, serialized without an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "meta", "img", "br", "hr", "input", "link", "area", "base", "col", "embed", "param", "source",
    "track", "wbr",
];

#[derive(Debug, Clone)]
pub enum Node {
    DocumentRoot(DocumentRootNode),
    Element(ElementNode),
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub struct DocumentRootNode {
    pub children: Vec<Rc<RefCell<Node>>>,
}

#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: String,
    pub qual_name: QualName,
    /// Attributes in source order. Order matters: serialization must be
    /// deterministic so identical inputs produce identical section markup.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Rc<RefCell<Node>>>,
}

#[derive(Debug)]
pub struct Document {
    pub root: Rc<RefCell<Node>>,
}

impl ElementNode {
    pub fn new(tag: String, qual_name: QualName) -> Self {
        ElementNode {
            tag,
            qual_name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// First attribute with the given name, if any.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whitespace-split class tokens, empty tokens discarded.
    pub fn class_names(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// True for elements treated as a unit of decomposition: any `section`
    /// tag, or a `div` carrying an `id` attribute.
    pub fn is_section_candidate(&self) -> bool {
        if self.tag.eq_ignore_ascii_case("section") {
            return true;
        }
        self.tag.eq_ignore_ascii_case("div") && self.attr("id").is_some()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            root: Rc::new(RefCell::new(Node::DocumentRoot(DocumentRootNode::default()))),
        }
    }

    /// Collects section candidates in document (pre-order) order. Candidates
    /// nested inside other candidates are collected as well, matching the
    /// `querySelectorAll("section, div[id]")` shape this replaces.
    pub fn query_sections(&self) -> Vec<Rc<RefCell<Node>>> {
        let mut found = Vec::new();
        collect_sections(&self.root, &mut found);
        found
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_sections(node: &Rc<RefCell<Node>>, found: &mut Vec<Rc<RefCell<Node>>>) {
    let children = match &*node.borrow() {
        Node::DocumentRoot(root) => root.children.clone(),
        Node::Element(elem) => {
            if elem.is_section_candidate() {
                found.push(Rc::clone(node));
            }
            elem.children.clone()
        }
        Node::Text(_) => return,
    };
    for child in &children {
        collect_sections(child, found);
    }
}

/// Serializes a node back to markup, `outerHTML`-style.
pub fn outer_html(node: &Rc<RefCell<Node>>) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &Rc<RefCell<Node>>, out: &mut String) {
    match &*node.borrow() {
        Node::DocumentRoot(root) => {
            for child in &root.children {
                write_node(child, out);
            }
        }
        Node::Element(elem) => {
            let _ = write!(out, "<{}", elem.tag);
            for (name, value) in &elem.attributes {
                let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                return;
            }
            for child in &elem.children {
                write_node(child, out);
            }
            let _ = write!(out, "</{}>", elem.tag);
        }
        Node::Text(text) => out.push_str(&escape_text(text)),
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
