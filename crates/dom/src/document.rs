//! Mutable arena document.
//!
//! Invariants:
//! - `Id(n)` indexes `nodes[n]`; ids are allocated monotonically and never reused.
//! - `Id::ROOT` is the document node and is always live.
//! - A live node appears in at most one parent's `children`, and only live nodes do.
//! - Removing a node retires its whole subtree. Retired records stay in the
//!   arena, so `nodes` grows with every allocation for the life of the
//!   document while `len()` counts only live nodes. Long-lived pages that
//!   mount and remove subtrees repeatedly pay one record per node each time.
//! - Allocation fails with `DomError::CapacityExceeded` once `u32` ids run out.
//! - Element and attribute names are stored ASCII-lowercase.

use crate::error::DomError;
use crate::types::{Attribute, Id, Node};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<NodeRecord>,
    doctype: Option<String>,
}

#[derive(Clone, Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<Id>,
    children: Vec<Id>,
    live: bool,
}

impl NodeRecord {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            live: true,
        }
    }

    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element { .. })
    }
}

#[derive(Clone, Debug)]
enum NodeKind {
    Document,
    Element {
        name: Arc<str>,
        attributes: Vec<Attribute>,
        /// Current form-control value; `None` falls back to the default.
        value: Option<String>,
    },
    Text(String),
    Comment(String),
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord::new(NodeKind::Document)],
            doctype: None,
        }
    }

    /// Parse server-rendered markup into a document.
    pub fn parse(html: &str) -> Self {
        crate::tree_builder::parse_document(html)
    }

    pub fn root(&self) -> Id {
        Id::ROOT
    }

    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    pub(crate) fn set_doctype(&mut self, doctype: String) {
        self.doctype = Some(doctype);
    }

    /// Whether `id` refers to a live node (attached or not).
    pub fn contains(&self, id: Id) -> bool {
        self.nodes.get(id.0 as usize).is_some_and(|n| n.live)
    }

    /// Whether `id` is live and reachable from the document node.
    pub fn is_connected(&self, id: Id) -> bool {
        self.contains(id) && self.ancestors(id).any(|a| a == Id::ROOT)
    }

    /// Number of live nodes besides the document node, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.iter().skip(1).filter(|n| n.live).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, id: Id) -> Result<&NodeRecord, DomError> {
        match self.nodes.get(id.0 as usize) {
            Some(record) if record.live => Ok(record),
            _ => Err(DomError::MissingNode(id)),
        }
    }

    fn record_mut(&mut self, id: Id) -> Result<&mut NodeRecord, DomError> {
        match self.nodes.get_mut(id.0 as usize) {
            Some(record) if record.live => Ok(record),
            _ => Err(DomError::MissingNode(id)),
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> Result<Id, DomError> {
        let id = next_id(self.nodes.len())?;
        self.nodes.push(NodeRecord::new(kind));
        Ok(id)
    }

    // Tree-builder entry points. The parent is always a live open element or the
    // document node; only id allocation can fail.

    pub(crate) fn push_element(
        &mut self,
        parent: Id,
        name: Arc<str>,
        attributes: Vec<Attribute>,
    ) -> Result<Id, DomError> {
        let id = self.alloc(NodeKind::Element {
            name,
            attributes,
            value: None,
        })?;
        self.link(parent, id);
        Ok(id)
    }

    /// Appends text, merging into a trailing text sibling.
    pub(crate) fn push_text(&mut self, parent: Id, text: String) -> Result<(), DomError> {
        let last = self.nodes[parent.0 as usize].children.last().copied();
        if let Some(last) = last {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0 as usize].kind {
                existing.push_str(&text);
                return Ok(());
            }
        }
        let id = self.alloc(NodeKind::Text(text))?;
        self.link(parent, id);
        Ok(())
    }

    pub(crate) fn push_comment(&mut self, parent: Id, text: String) -> Result<(), DomError> {
        let id = self.alloc(NodeKind::Comment(text))?;
        self.link(parent, id);
        Ok(())
    }

    fn link(&mut self, parent: Id, child: Id) {
        self.nodes[parent.0 as usize].children.push(child);
        self.nodes[child.0 as usize].parent = Some(parent);
    }

    /// Create a detached element. The name is lowercased.
    pub fn create_element(
        &mut self,
        name: &str,
        attributes: Vec<Attribute>,
    ) -> Result<Id, DomError> {
        self.alloc(NodeKind::Element {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes,
            value: None,
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> Result<Id, DomError> {
        self.alloc(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> Result<Id, DomError> {
        self.alloc(NodeKind::Comment(text.into()))
    }

    /// Copy an owned tree into the arena as a detached subtree and return its root.
    ///
    /// Ids carried by `node` are ignored; fresh ids are allocated.
    pub fn import(&mut self, node: &Node) -> Result<Id, DomError> {
        let id = match node {
            Node::Document { .. } => return Err(DomError::UnexpectedDocument),
            Node::Element {
                name, attributes, ..
            } => self.alloc(NodeKind::Element {
                name: Arc::clone(name),
                attributes: attributes.clone(),
                value: None,
            })?,
            Node::Text { text, .. } => self.create_text(text.clone())?,
            Node::Comment { text, .. } => self.create_comment(text.clone())?,
        };
        for child in node.children() {
            let child_id = self.import(child)?;
            self.link(id, child_id);
        }
        Ok(id)
    }

    /// Append `child` as the last child of `parent`, detaching it first if it
    /// already has a parent.
    pub fn append_child(&mut self, parent: Id, child: Id) -> Result<(), DomError> {
        self.check_insertion(parent, child)?;
        self.detach(child);
        self.link(parent, child);
        Ok(())
    }

    /// Insert `child` into `parent` right before the existing child `before`.
    pub fn insert_before(&mut self, parent: Id, child: Id, before: Id) -> Result<(), DomError> {
        self.check_insertion(parent, child)?;
        if self.record(before)?.parent != Some(parent) || before == child {
            return Err(DomError::InvalidParent(parent));
        }
        self.detach(child);
        let siblings = &mut self.nodes[parent.0 as usize].children;
        let pos = siblings
            .iter()
            .position(|k| *k == before)
            .ok_or(DomError::InvalidParent(parent))?;
        siblings.insert(pos, child);
        self.nodes[child.0 as usize].parent = Some(parent);
        Ok(())
    }

    fn check_insertion(&self, parent: Id, child: Id) -> Result<(), DomError> {
        if !self.record(parent)?.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        self.record(child)?;
        if child == Id::ROOT {
            return Err(DomError::InvalidParent(child));
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::CycleDetected { parent, child });
        }
        Ok(())
    }

    fn detach(&mut self, id: Id) {
        if let Some(parent) = self.nodes[id.0 as usize].parent.take() {
            self.nodes[parent.0 as usize].children.retain(|k| *k != id);
        }
    }

    /// Remove a node and its entire subtree from the document.
    pub fn remove(&mut self, id: Id) -> Result<(), DomError> {
        if id == Id::ROOT {
            return Err(DomError::RootRemoval);
        }
        self.record(id)?;
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let record = &mut self.nodes[current.0 as usize];
            record.live = false;
            record.parent = None;
            stack.append(&mut record.children);
        }
        Ok(())
    }

    /// Remove every child of `id`.
    pub fn clear_children(&mut self, id: Id) -> Result<(), DomError> {
        let children = self.record(id)?.children.clone();
        for child in children {
            self.remove(child)?;
        }
        Ok(())
    }

    pub fn parent(&self, id: Id) -> Option<Id> {
        self.record(id).ok().and_then(|r| r.parent)
    }

    pub fn children(&self, id: Id) -> &[Id] {
        self.record(id).map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    pub fn next_sibling(&self, id: Id) -> Option<Id> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|k| *k == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Inclusive ancestor chain, starting at `id` and ending at the subtree root.
    pub fn ancestors(&self, id: Id) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// Preorder walk over the descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: Id) -> Descendants<'_> {
        let mut stack: Vec<Id> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    pub fn is_element(&self, id: Id) -> bool {
        self.tag_name(id).is_some()
    }

    pub fn tag_name(&self, id: Id) -> Option<&str> {
        match &self.record(id).ok()?.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attributes(&self, id: Id) -> &[Attribute] {
        match self.record(id).map(|r| &r.kind) {
            Ok(NodeKind::Element { attributes, .. }) => attributes.as_slice(),
            _ => &[],
        }
    }

    pub fn attr(&self, id: Id, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn has_attr(&self, id: Id, name: &str) -> bool {
        self.attributes(id)
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    fn element_attributes_mut(&mut self, id: Id) -> Result<&mut Vec<Attribute>, DomError> {
        match &mut self.record_mut(id)?.kind {
            NodeKind::Element { attributes, .. } => Ok(attributes),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// Set (or replace the first occurrence of) an attribute.
    pub fn set_attr(&mut self, id: Id, name: &str, value: Option<&str>) -> Result<(), DomError> {
        let attributes = self.element_attributes_mut(id)?;
        let value = value.map(str::to_string);
        match attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => attributes.push((Arc::from(name.to_ascii_lowercase()), value)),
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, id: Id, name: &str) -> Result<(), DomError> {
        self.element_attributes_mut(id)?
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        Ok(())
    }

    /// Text of a text or comment node.
    pub fn text(&self, id: Id) -> Option<&str> {
        match &self.record(id).ok()?.kind {
            NodeKind::Text(text) | NodeKind::Comment(text) => Some(text),
            _ => None,
        }
    }

    /// Concatenated descendant text, comments excluded.
    pub fn text_content(&self, id: Id) -> String {
        let mut out = String::new();
        if let Ok(NodeKind::Text(text)) = self.record(id).map(|r| &r.kind) {
            out.push_str(text);
            return out;
        }
        for d in self.descendants(id) {
            if let NodeKind::Text(text) = &self.nodes[d.0 as usize].kind {
                out.push_str(text);
            }
        }
        out
    }

    /// Current value of a form control.
    ///
    /// Falls back to the default value: the `value` attribute, or the text
    /// content for `<textarea>`.
    pub fn value(&self, id: Id) -> String {
        match self.record(id).map(|r| &r.kind) {
            Ok(NodeKind::Element {
                value: Some(value), ..
            }) => value.clone(),
            Ok(NodeKind::Element { .. }) => self.default_value(id),
            _ => String::new(),
        }
    }

    pub fn default_value(&self, id: Id) -> String {
        if self.tag_name(id) == Some("textarea") {
            return self.text_content(id);
        }
        self.attr(id, "value").unwrap_or_default().to_string()
    }

    pub fn set_value(&mut self, id: Id, new_value: impl Into<String>) -> Result<(), DomError> {
        match &mut self.record_mut(id)?.kind {
            NodeKind::Element { value, .. } => {
                *value = Some(new_value.into());
                Ok(())
            }
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// Drop the current value so the control shows its default again.
    pub fn reset_value(&mut self, id: Id) -> Result<(), DomError> {
        match &mut self.record_mut(id)?.kind {
            NodeKind::Element { value, .. } => {
                *value = None;
                Ok(())
            }
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// Owned snapshot of the subtree rooted at `id`, carrying arena ids.
    pub fn materialize(&self, id: Id) -> Result<Node, DomError> {
        self.record(id)?;
        Ok(self.materialize_node(id))
    }

    fn materialize_node(&self, id: Id) -> Node {
        let record = &self.nodes[id.0 as usize];
        let children = record
            .children
            .iter()
            .map(|child| self.materialize_node(*child))
            .collect::<Vec<_>>();
        match &record.kind {
            NodeKind::Document => Node::Document {
                id,
                doctype: self.doctype.clone(),
                children,
            },
            NodeKind::Element {
                name, attributes, ..
            } => Node::Element {
                id,
                name: Arc::clone(name),
                attributes: attributes.clone(),
                children,
            },
            NodeKind::Text(text) => Node::Text {
                id,
                text: text.clone(),
            },
            NodeKind::Comment(text) => Node::Comment {
                id,
                text: text.clone(),
            },
        }
    }
}

/// The id for the record stored at `index`, or an error once `u32` ids run out.
fn next_id(index: usize) -> Result<Id, DomError> {
    u32::try_from(index)
        .map(Id)
        .map_err(|_| DomError::CapacityExceeded)
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<Id>,
}

impl Iterator for Ancestors<'_> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let current = self.next?;
        self.next = self.doc.nodes[current.0 as usize].parent;
        Some(current)
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<Id>,
}

impl Iterator for Descendants<'_> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let current = self.stack.pop()?;
        let children = &self.doc.nodes[current.0 as usize].children;
        self.stack.extend(children.iter().rev().copied());
        Some(current)
    }
}
