use crate::protocol::SwapMode;
use dom::{Document, DomError, Id, parse_fragment};

/// Apply a response fragment to `target` and return the ids of the inserted
/// top-level nodes in source order.
pub fn swap(
    doc: &mut Document,
    target: Id,
    mode: SwapMode,
    fragment: &str,
) -> Result<Vec<Id>, DomError> {
    if !doc.contains(target) {
        return Err(DomError::MissingNode(target));
    }
    match mode {
        SwapMode::None => return Ok(Vec::new()),
        SwapMode::Delete => {
            doc.remove(target)?;
            return Ok(Vec::new());
        }
        _ => {}
    }

    let mut inserted = Vec::new();
    for node in parse_fragment(fragment) {
        inserted.push(doc.import(&node)?);
    }

    match mode {
        SwapMode::InnerHtml => {
            doc.clear_children(target)?;
            append_all(doc, target, &inserted)?;
        }
        SwapMode::OuterHtml => {
            let parent = doc.parent(target).ok_or(DomError::InvalidParent(target))?;
            insert_all_before(doc, parent, target, &inserted)?;
            doc.remove(target)?;
        }
        SwapMode::BeforeBegin => {
            let parent = doc.parent(target).ok_or(DomError::InvalidParent(target))?;
            insert_all_before(doc, parent, target, &inserted)?;
        }
        SwapMode::AfterBegin => match doc.children(target).first().copied() {
            Some(first) => insert_all_before(doc, target, first, &inserted)?,
            None => append_all(doc, target, &inserted)?,
        },
        SwapMode::BeforeEnd => append_all(doc, target, &inserted)?,
        SwapMode::AfterEnd => {
            let parent = doc.parent(target).ok_or(DomError::InvalidParent(target))?;
            match doc.next_sibling(target) {
                Some(next) => insert_all_before(doc, parent, next, &inserted)?,
                None => append_all(doc, parent, &inserted)?,
            }
        }
        SwapMode::Delete | SwapMode::None => {}
    }

    log::debug!(
        target: "reply_form.swap",
        "swapped {} node(s) into {} ({mode})",
        inserted.len(),
        target.0
    );
    Ok(inserted)
}

fn append_all(doc: &mut Document, parent: Id, nodes: &[Id]) -> Result<(), DomError> {
    for node in nodes {
        doc.append_child(parent, *node)?;
    }
    Ok(())
}

fn insert_all_before(
    doc: &mut Document,
    parent: Id,
    before: Id,
    nodes: &[Id],
) -> Result<(), DomError> {
    for node in nodes {
        doc.insert_before(parent, *node, before)?;
    }
    Ok(())
}
