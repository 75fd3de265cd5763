//! Markup serialization with contextual escaping.
//!
//! Text is escaped for element content, attribute values for double-quoted
//! attributes. Nothing written through [`crate::ElementBuilder`] or
//! [`Document::set_attr`] can break out of its context.

use crate::document::Document;
use crate::error::DomError;
use crate::types::{Id, Node, is_raw_text_element, is_void_element};

pub fn to_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, false, &mut out);
    out
}

fn write_node(node: &Node, raw_text: bool, out: &mut String) {
    match node {
        Node::Document {
            doctype, children, ..
        } => {
            if let Some(doctype) = doctype {
                out.push_str("<!DOCTYPE ");
                out.push_str(doctype);
                out.push('>');
            }
            for c in children {
                write_node(c, false, out);
            }
        }
        Node::Element {
            name,
            attributes,
            children,
            ..
        } => {
            out.push('<');
            out.push_str(name);
            for (k, v) in attributes {
                out.push(' ');
                out.push_str(k);
                if let Some(v) = v {
                    out.push_str("=\"");
                    escape_attr(v, out);
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(name) {
                return;
            }
            let raw = is_raw_text_element(name);
            for c in children {
                write_node(c, raw, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Text { text, .. } => {
            if raw_text {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        Node::Comment { text, .. } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

pub fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

pub fn escape_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

impl Document {
    /// Markup of the node itself and its subtree.
    pub fn outer_html(&self, id: Id) -> Result<String, DomError> {
        Ok(to_html(&self.materialize(id)?))
    }

    /// Markup of the node's children.
    pub fn inner_html(&self, id: Id) -> Result<String, DomError> {
        let node = self.materialize(id)?;
        let raw = node.element_name().is_some_and(is_raw_text_element);
        let mut out = String::new();
        for c in node.children() {
            write_node(c, raw, &mut out);
        }
        Ok(out)
    }

    /// Indented one-line-per-node sketch of the subtree, capped at `cap` lines.
    pub fn outline(&self, id: Id, cap: usize) -> Vec<String> {
        match self.materialize(id) {
            Ok(node) => outline(&node, cap),
            Err(_) => Vec::new(),
        }
    }
}

/// Indented one-line-per-node sketch, for logs and test failure output.
pub fn outline(root: &Node, cap: usize) -> Vec<String> {
    fn clip(text: &str) -> String {
        let t = text.replace('\n', " ");
        let t = t.trim();
        match t.char_indices().nth(40) {
            Some((cut, _)) => format!("{}…", &t[..cut]),
            None => t.to_string(),
        }
    }

    fn walk(node: &Node, depth: usize, out: &mut Vec<String>, left: &mut usize) {
        if *left == 0 {
            return;
        }
        *left -= 1;
        let indent = "  ".repeat(depth);
        match node {
            Node::Document { doctype, .. } => match doctype {
                Some(dt) => out.push(format!("{indent}<!DOCTYPE {dt}>")),
                None => out.push(format!("{indent}#document")),
            },
            Node::Element { name, .. } => {
                let mut line = format!("{indent}<{name}");
                for key in ["id", "class", "name"] {
                    if let Some(value) = node.attr(key).filter(|v| !v.is_empty()) {
                        line.push_str(&format!(r#" {key}="{value}""#));
                    }
                }
                line.push('>');
                out.push(line);
            }
            Node::Text { text, .. } => {
                let shown = clip(text);
                if shown.is_empty() {
                    // Whitespace-only text is layout noise in an outline.
                    *left += 1;
                    return;
                }
                out.push(format!("{indent}\"{shown}\""));
            }
            Node::Comment { text, .. } => out.push(format!("{indent}<!-- {} -->", clip(text))),
        }
        for c in node.children() {
            walk(c, depth + 1, out, left);
        }
    }

    let mut out = Vec::new();
    let mut left = cap;
    walk(root, 0, &mut out, &mut left);
    out
}
