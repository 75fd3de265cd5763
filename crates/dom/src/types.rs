use std::sync::Arc;

pub type NodeId = u32;

/// Stable node identity inside one [`Document`](crate::Document).
///
/// Ids are never reused: a removed node keeps its id retired for the lifetime
/// of the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

impl Id {
    /// The document node itself.
    pub const ROOT: Id = Id(0);
}

/// Attribute name/value pair. `None` is a valueless attribute (`required`).
pub type Attribute = (Arc<str>, Option<String>);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: Arc<str>,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(Arc<str>),
    Comment(String),
    Text(String),
}

/// Owned snapshot of a subtree.
///
/// Used for fragments that are not yet mounted (server responses, generated
/// forms) and for materialized views of a [`Document`](crate::Document).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Document {
        id: Id,
        doctype: Option<String>,
        children: Vec<Node>,
    },
    Element {
        id: Id,
        name: Arc<str>,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
    Text {
        id: Id,
        text: String,
    },
    Comment {
        id: Id,
        text: String,
    },
}

impl Node {
    pub fn id(&self) -> Id {
        match self {
            Node::Document { id, .. } => *id,
            Node::Element { id, .. } => *id,
            Node::Text { id, .. } => *id,
            Node::Comment { id, .. } => *id,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn element_name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// First attribute with this name (ASCII case-insensitive).
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is kept verbatim by both the tokenizer and the serializer.
pub(crate) fn is_raw_text_element(name: &str) -> bool {
    matches!(name, "script" | "style")
}
