use crate::document::Document;
use crate::tokenizer::tokenize;
use crate::types::{Id, Node, Token, is_void_element};

/// Parse a full page into a document.
pub fn parse_document(html: &str) -> Document {
    let tokens = tokenize(html);
    let mut doc = Document::new();
    build_into(&mut doc, tokens);
    log::debug!(target: "dom.tree_builder", "parsed document with {} nodes", doc.len());
    doc
}

/// Parse a response fragment into detached owned trees, in source order.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let doc = parse_document(html);
    doc.children(Id::ROOT)
        .iter()
        .filter_map(|child| doc.materialize(*child).ok())
        .collect()
}

fn build_into(doc: &mut Document, tokens: Vec<Token>) {
    // Open elements; index 0 is the document node and is never popped.
    let mut stack: Vec<Id> = vec![Id::ROOT];

    for token in tokens {
        let built = match token {
            Token::Doctype(doctype) => {
                doc.set_doctype(doctype);
                Ok(())
            }
            Token::Comment(text) => doc.push_comment(current(&stack), text),
            Token::Text(text) => doc.push_text(current(&stack), text),
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                close_implied(doc, &mut stack, &name);
                doc.push_element(current(&stack), name.clone(), attributes)
                    .map(|id| {
                        if !self_closing && !is_void_element(&name) {
                            stack.push(id);
                        }
                    })
            }
            Token::EndTag(name) => {
                let open = stack
                    .iter()
                    .skip(1)
                    .rposition(|id| doc.tag_name(*id) == Some(&*name));
                match open {
                    Some(pos) => stack.truncate(pos + 1),
                    None => log::trace!(
                        target: "dom.tree_builder",
                        "ignoring end tag </{name}> with no open element"
                    ),
                }
                Ok(())
            }
        };
        if let Err(err) = built {
            log::warn!(
                target: "dom.tree_builder",
                "stopped building document, remaining input dropped: {err}"
            );
            break;
        }
    }
}

fn current(stack: &[Id]) -> Id {
    stack.last().copied().unwrap_or(Id::ROOT)
}

/// Elements a new start tag closes implicitly.
fn close_implied(doc: &Document, stack: &mut Vec<Id>, name: &str) {
    match name {
        "li" => close_open(doc, stack, "li", &["ul", "ol"]),
        "p" | "div" | "ul" | "ol" | "form" | "table" | "h1" | "h2" | "h3" | "section"
        | "article" => close_open(doc, stack, "p", &["div", "li", "section", "article"]),
        "option" => close_open(doc, stack, "option", &["select"]),
        _ => {}
    }
}

/// Pop back to (and including) the nearest open `target`, unless a `boundary`
/// element is open above it.
fn close_open(doc: &Document, stack: &mut Vec<Id>, target: &str, boundaries: &[&str]) {
    for pos in (1..stack.len()).rev() {
        let Some(tag) = doc.tag_name(stack[pos]) else {
            continue;
        };
        if tag == target {
            stack.truncate(pos);
            return;
        }
        if boundaries.contains(&tag) {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::to_html;

    fn body_html(doc: &Document) -> String {
        doc.children(Id::ROOT)
            .iter()
            .filter_map(|id| doc.materialize(*id).ok())
            .map(|n| to_html(&n))
            .collect()
    }

    #[test]
    fn nests_elements_and_skips_void_end_tags() {
        let doc = parse_document(r#"<div class="grid"><input name="a"><span>x</span></div>"#);
        assert_eq!(
            body_html(&doc),
            r#"<div class="grid"><input name="a"><span>x</span></div>"#
        );
    }

    #[test]
    fn unclosed_list_items_close_on_the_next_item() {
        let doc = parse_document("<ul><li>one<li>two</ul><p>after");
        assert_eq!(
            body_html(&doc),
            "<ul><li>one</li><li>two</li></ul><p>after</p>"
        );
    }

    #[test]
    fn nested_lists_keep_their_own_items() {
        let doc = parse_document("<ul><li>a<ul><li>a.1<li>a.2</ul><li>b</ul>");
        assert_eq!(
            body_html(&doc),
            "<ul><li>a<ul><li>a.1</li><li>a.2</li></ul></li><li>b</li></ul>"
        );
    }

    #[test]
    fn stray_end_tags_are_ignored() {
        let doc = parse_document("<div>a</span>b</div></div>c");
        assert_eq!(body_html(&doc), "<div>ab</div>c");
    }

    #[test]
    fn keeps_doctype_and_comments() {
        let doc = parse_document("<!doctype html><!-- c --><p>x</p>");
        assert_eq!(doc.doctype(), Some("html"));
        assert_eq!(body_html(&doc), "<!-- c --><p>x</p>");
    }

    #[test]
    fn fragments_come_back_in_source_order() {
        let nodes = parse_fragment(r#"<div id="comments"></div><p>tail</p>"#);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].attr("id"), Some("comments"));
        assert_eq!(nodes[1].element_name(), Some("p"));
    }
}
