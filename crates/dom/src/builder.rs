use crate::types::{Attribute, Id, Node};
use std::sync::Arc;

/// Structured element construction.
///
/// Values are stored as plain strings and only escaped when serialized, so
/// callers never splice user data into markup.
///
/// ```
/// use dom::ElementBuilder;
///
/// let input = ElementBuilder::new("input")
///     .attr("type", "hidden")
///     .attr("name", "parent_id")
///     .attr("value", "42")
///     .build();
/// assert_eq!(input.attr("value"), Some("42"));
/// ```
#[derive(Clone, Debug)]
pub struct ElementBuilder {
    name: Arc<str>,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl ElementBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an earlier one with the same name.
    pub fn attr(self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, Some(value.into()))
    }

    /// Set a valueless (boolean) attribute such as `required`.
    pub fn flag(self, name: &str) -> Self {
        self.set(name, None)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    fn set(mut self, name: &str, value: Option<String>) -> Self {
        let name = name.to_ascii_lowercase();
        match self.attributes.iter_mut().find(|(k, _)| **k == *name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((Arc::from(name), value)),
        }
        self
    }

    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text {
            id: Id::ROOT,
            text: text.into(),
        });
        self
    }

    /// The finished tree. Ids are placeholders until the tree is imported
    /// into a [`Document`](crate::Document).
    pub fn build(self) -> Node {
        Node::Element {
            id: Id::ROOT,
            name: self.name,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

impl From<ElementBuilder> for Node {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_attr_replaces_earlier_one() {
        let node = ElementBuilder::new("FORM")
            .attr("method", "get")
            .attr("Method", "post")
            .build();
        assert_eq!(node.element_name(), Some("form"));
        assert_eq!(node.attr("method"), Some("post"));
        let Node::Element { attributes, .. } = &node else {
            panic!("expected element");
        };
        assert_eq!(attributes.len(), 1);
    }

    #[test]
    fn children_keep_insertion_order() {
        let node = ElementBuilder::new("form")
            .child(ElementBuilder::new("input").build())
            .text("between")
            .child(ElementBuilder::new("button").into())
            .build();
        let names: Vec<Option<&str>> = node.children().iter().map(Node::element_name).collect();
        assert_eq!(names, vec![Some("input"), None, Some("button")]);
    }
}
