use crate::types::Id;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    /// The id was never allocated or its node has been removed.
    MissingNode(Id),
    NotAnElement(Id),
    InvalidParent(Id),
    CycleDetected { parent: Id, child: Id },
    RootRemoval,
    /// A `Node::Document` cannot be imported below another node.
    UnexpectedDocument,
    /// Every node id has been allocated; retired ids are not reused.
    CapacityExceeded,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::MissingNode(id) => write!(f, "node {} does not exist", id.0),
            DomError::NotAnElement(id) => write!(f, "node {} is not an element", id.0),
            DomError::InvalidParent(id) => write!(f, "node {} cannot take this child", id.0),
            DomError::CycleDetected { parent, child } => write!(
                f,
                "appending node {} under node {} would create a cycle",
                child.0, parent.0
            ),
            DomError::RootRemoval => f.write_str("the document node cannot be removed"),
            DomError::UnexpectedDocument => {
                f.write_str("a document node cannot be imported as a child")
            }
            DomError::CapacityExceeded => f.write_str("document has no node ids left"),
        }
    }
}

impl std::error::Error for DomError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    UnexpectedChar { position: usize, found: char },
    EmptyName { position: usize },
    UnterminatedAttribute { position: usize },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::Empty => f.write_str("empty selector"),
            SelectorError::UnexpectedChar { position, found } => {
                write!(f, "unexpected {found:?} at byte {position}")
            }
            SelectorError::EmptyName { position } => {
                write!(f, "expected a name at byte {position}")
            }
            SelectorError::UnterminatedAttribute { position } => {
                write!(f, "attribute selector opened at byte {position} is not closed")
            }
        }
    }
}

impl std::error::Error for SelectorError {}
