//! # dom
//!
//! Owned document model for pages rendered by a server.
//!
//! - [`Document`]: mutable arena tree with stable [`Id`]s and form-control values
//! - [`Node`]: owned snapshot used for fragments and materialized subtrees
//! - [`Selector`]: compound selectors (`li`, `.grid`, `#comments`, `input[name="x"]`)
//! - [`ElementBuilder`]: structured element construction; escaping happens on serialization
//! - [`parse_fragment`] / [`Document::parse`]: markup loading for pages and responses

mod builder;
mod document;
mod entities;
mod error;
mod query;
mod serialize;
mod tokenizer;
mod tree_builder;
mod types;

pub use builder::ElementBuilder;
pub use document::{Ancestors, Descendants, Document};
pub use error::{DomError, SelectorError};
pub use query::Selector;
pub use serialize::{escape_attr, escape_text, outline, to_html};
pub use tokenizer::tokenize;
pub use tree_builder::{parse_document, parse_fragment};
pub use types::{Attribute, Id, Node, NodeId, Token};
