use crate::config::ReplyFormConfig;
use crate::csrf::CsrfToken;
use crate::protocol::PartialUpdate;
use dom::{Document, ElementBuilder, Id, Node};

/// Field carrying the id of the comment being answered.
pub const PARENT_FIELD: &str = "parent_id";
/// Field carrying the reply body.
pub const TEXT_FIELD: &str = "text";

/// What a reply form needs to know about the comment it answers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplyTarget {
    pub parent_id: String,
    pub url: String,
}

impl ReplyTarget {
    /// Read the comment's id and reply endpoint. Missing attributes (or a
    /// missing comment) yield empty strings.
    pub fn read(doc: &Document, comment: Option<Id>, config: &ReplyFormConfig) -> Self {
        let Some(comment) = comment else {
            return Self::default();
        };
        let parent_id = doc
            .attr(comment, &config.comment_id_attr)
            .unwrap_or_default()
            .to_string();
        let url = doc
            .attr(comment, &config.reply_url_attr)
            .unwrap_or_default()
            .to_string();
        if url.is_empty() {
            log::debug!(
                target: "reply_form.form",
                "comment {parent_id:?} has no `{}`; reply form will post nowhere",
                config.reply_url_attr
            );
        }
        Self { parent_id, url }
    }
}

/// Build the reply form for `target`.
///
/// The form posts normally without the partial-update client, and declares a
/// partial update for when the client is present.
pub fn build_reply_form(target: &ReplyTarget, csrf: &CsrfToken, config: &ReplyFormConfig) -> Node {
    let update = PartialUpdate::reply(&target.url, &config.swap_target);
    let mut form = ElementBuilder::new("form")
        .class(&config.form_class)
        .attr("method", "post")
        .attr("action", target.url.as_str());
    for (name, value) in update.attributes() {
        form = form.attr(name, value);
    }

    form.child(hidden(&config.csrf_field, csrf.as_str()))
        .child(hidden(PARENT_FIELD, &target.parent_id))
        .child(
            ElementBuilder::new("input")
                .attr("type", "text")
                .attr("name", TEXT_FIELD)
                .attr("placeholder", config.locale.placeholder())
                .flag("required")
                .attr("style", format!("min-width:{}", config.text_min_width))
                .build(),
        )
        .child(
            ElementBuilder::new("button")
                .attr("type", "submit")
                .text(config.locale.submit_label())
                .build(),
        )
        .build()
}

fn hidden(name: &str, value: &str) -> Node {
    ElementBuilder::new("input")
        .attr("type", "hidden")
        .attr("name", name)
        .attr("value", value)
        .build()
}
