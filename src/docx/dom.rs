//! Structural queries over a WordprocessingML tree.
//!
//! The queries only need a handful of node capabilities, captured by
//! [`DomNode`], so they work over any DOM-like tree. `roxmltree` nodes
//! implement it out of the box.

use crate::model::ParagraphInfo;

use super::{MC_NS, WML_NS};

pub trait DomNode: Copy {
    fn is_element(&self) -> bool;
    fn local_name(&self) -> &str;
    fn namespace(&self) -> Option<&str>;
    fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&str>;
    fn parent(&self) -> Option<Self>;
    fn previous_sibling(&self) -> Option<Self>;
    fn child_nodes(&self) -> impl Iterator<Item = Self>;
    /// Text content of a text node, or of the first text child of an element.
    fn text(&self) -> Option<&str>;
}

impl<'a, 'input: 'a> DomNode for roxmltree::Node<'a, 'input> {
    fn is_element(&self) -> bool {
        roxmltree::Node::is_element(self)
    }

    fn local_name(&self) -> &str {
        self.tag_name().name()
    }

    fn namespace(&self) -> Option<&str> {
        self.tag_name().namespace()
    }

    fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        match namespace {
            Some(ns) => roxmltree::Node::attribute(self, (ns, name)),
            None => roxmltree::Node::attribute(self, name),
        }
    }

    fn parent(&self) -> Option<Self> {
        roxmltree::Node::parent(self)
    }

    fn previous_sibling(&self) -> Option<Self> {
        self.prev_sibling()
    }

    fn child_nodes(&self) -> impl Iterator<Item = Self> {
        roxmltree::Node::children(self)
    }

    fn text(&self) -> Option<&str> {
        roxmltree::Node::text(self)
    }
}

pub(crate) fn is_wml<N: DomNode>(node: N, name: &str) -> bool {
    node.is_element() && node.local_name() == name && node.namespace() == Some(WML_NS)
}

pub(crate) fn wml_child<N: DomNode>(node: N, name: &str) -> Option<N> {
    node.child_nodes().find(|n| is_wml(*n, name))
}

/// `node` itself or its nearest ancestor with local name `name`, in any namespace.
pub fn closest<N: DomNode>(node: N, name: &str) -> Option<N> {
    let mut current = Some(node);
    while let Some(n) = current {
        if n.is_element() && n.local_name() == name {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

pub fn find_enclosing_paragraph<N: DomNode>(node: N) -> Option<N> {
    let mut current = Some(node);
    while let Some(n) = current {
        if is_wml(n, "p") {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// The body-level paragraph a (possibly deeply nested) node belongs to.
///
/// Walks up to the ancestor whose parent is `w:body`. If that ancestor is a
/// paragraph it is the answer; otherwise (a table, say) the nearest
/// paragraph before it in the body is.
pub fn find_outermost_related_paragraph<N: DomNode>(node: Option<N>) -> Option<N> {
    let mut node = node?;
    loop {
        let parent = node.parent().filter(|p| p.is_element())?;
        if is_wml(parent, "body") {
            let mut current = Some(node);
            while let Some(n) = current {
                if is_wml(n, "p") {
                    return Some(n);
                }
                current = n.previous_sibling();
            }
        }
        node = parent;
    }
}

/// `w:pPr/w:pStyle/@w:val` of a paragraph.
pub fn paragraph_style<N: DomNode>(paragraph: N) -> Option<String> {
    let style = wml_child(paragraph, "pPr").and_then(|ppr| wml_child(ppr, "pStyle"))?;
    style
        .attribute(Some(WML_NS), "val")
        .filter(|v| !v.is_empty())
        .map(String::from)
}

pub fn is_heading<N: DomNode>(node: N) -> bool {
    is_wml(node, "p") && paragraph_style(node).is_some_and(|s| s.starts_with("Heading"))
}

/// Nearest heading paragraph before the paragraph enclosing `node`.
/// A paragraph passed directly is its own enclosing paragraph.
pub fn find_previous_heading<N: DomNode>(node: N) -> Option<N> {
    let paragraph = find_enclosing_paragraph(node)?;
    let mut current = paragraph.previous_sibling();
    while let Some(n) = current {
        if is_heading(n) {
            return Some(n);
        }
        current = n.previous_sibling();
    }
    None
}

pub fn in_fallback<N: DomNode>(node: N) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        if n.is_element() && n.local_name() == "Fallback" && n.namespace() == Some(MC_NS) {
            return true;
        }
        current = n.parent();
    }
    false
}

/// Concatenated `w:t` text of the runs below `node`.
pub fn paragraph_text<N: DomNode>(node: N) -> String {
    fn collect<N: DomNode>(node: N, out: &mut String) {
        for child in node.child_nodes() {
            if is_wml(child, "t") {
                if let Some(t) = child.text() {
                    out.push_str(t);
                }
            } else if child.is_element() {
                collect(child, out);
            }
        }
    }
    let mut text = String::new();
    collect(node, &mut text);
    text
}

pub fn paragraph_info<N: DomNode>(paragraph: N) -> ParagraphInfo {
    ParagraphInfo {
        style: paragraph_style(paragraph),
        text: paragraph_text(paragraph),
    }
}
