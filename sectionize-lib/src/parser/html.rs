//! HTML parsing front end: feeds html5ever into the owned DOM tree defined in
//! `crate::dom`.

use crate::dom::{Document, ElementNode, Node};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, NodeOrText, QuirksMode, TreeSink},
    LocalName, Namespace, QualName,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Parses an HTML string into a [`Document`]. html5ever recovers from
/// malformed markup on its own, so this never fails; pathological input just
/// yields a sparse tree.
pub fn parse_html(html: &str) -> Document {
    let sink = SectionSink::new();
    html5ever::parse_document(sink, Default::default()).one(html.to_string())
}

/// TreeSink building the section DOM. Only the structure the matcher needs is
/// kept: elements with ordered attributes, text, and child links.
pub struct SectionSink {
    document: Document,
    quirks_mode: RefCell<QuirksMode>,
}

impl SectionSink {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }
}

impl Default for SectionSink {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct SectionElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for SectionElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

impl TreeSink for SectionSink {
    type Handle = Rc<RefCell<Node>>;
    type Output = Document;
    type ElemName<'a>
        = SectionElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        log::debug!("html parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        if let Node::Element(ref elem) = *target.borrow() {
            SectionElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            }
        } else {
            panic!("elem_name called on non-element node")
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: html5ever::interface::ElementFlags,
    ) -> Self::Handle {
        let mut element = ElementNode::new(name.local.to_string(), name);
        element.attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        Rc::new(RefCell::new(Node::Element(element)))
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        // Comments carry no selector information; an empty text node keeps
        // the tree shape without affecting serialization.
        Rc::new(RefCell::new(Node::Text(String::new())))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        Rc::new(RefCell::new(Node::Text(format!("{} {}", target, data))))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let child_node = match child {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => Rc::new(RefCell::new(Node::Text(text.to_string()))),
        };
        match &mut *parent.borrow_mut() {
            Node::DocumentRoot(root) => root.children.push(child_node),
            Node::Element(element) => element.children.push(child_node),
            Node::Text(_) => {}
        }
    }

    fn append_based_on_parent_node(
        &self,
        _element: &Self::Handle,
        _prev_element: &Self::Handle,
        _child: NodeOrText<Self::Handle>,
    ) {
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctype never reaches a section's serialization.
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, _sibling: &Self::Handle, _child: NodeOrText<Self::Handle>) {}

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        if let Node::Element(elem) = &mut *target.borrow_mut() {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if elem.attr(&key).is_none() {
                    elem.attributes.push((key, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, _target: &Self::Handle) {}

    fn reparent_children(&self, _node: &Self::Handle, _new_parent: &Self::Handle) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn find_tag(node: &Rc<RefCell<Node>>, tag: &str) -> Option<Rc<RefCell<Node>>> {
        let children = match &*node.borrow() {
            Node::DocumentRoot(root) => root.children.clone(),
            Node::Element(elem) => {
                if elem.tag == tag {
                    return Some(Rc::clone(node));
                }
                elem.children.clone()
            }
            Node::Text(_) => return None,
        };
        children.iter().find_map(|c| find_tag(c, tag))
    }

    #[test]
    fn builds_tree_with_attributes() {
        let document = parse_html(r#"<section id="hero" class="big">Hi</section>"#);
        let section = find_tag(&document.root, "section").expect("section not parsed");
        match &*section.borrow() {
            Node::Element(elem) => {
                assert_eq!(elem.attr("id"), Some("hero"));
                assert_eq!(elem.attr("class"), Some("big"));
            }
            _ => panic!("expected element"),
        };
    }

    #[test]
    fn recovers_from_malformed_markup() {
        let document = parse_html("<div id=\"a\"><p>unclosed");
        let div = find_tag(&document.root, "div").expect("div not parsed");
        match &*div.borrow() {
            Node::Element(elem) => assert_eq!(elem.attr("id"), Some("a")),
            _ => panic!("expected element"),
        };
    }

    #[test]
    fn fragment_input_gains_document_wrappers() {
        // html5ever wraps bare fragments in html/head/body; candidates are
        // still reachable through the wrappers.
        let document = parse_html(r#"<div id="x"></div>"#);
        assert!(find_tag(&document.root, "body").is_some());
        assert!(find_tag(&document.root, "div").is_some());
    }

    #[test]
    fn comments_become_empty_text() {
        let document = parse_html(r#"<section><!-- note --></section>"#);
        let section = find_tag(&document.root, "section").expect("section not parsed");
        assert_eq!(dom::outer_html(&section), "<section></section>");
    }
}
