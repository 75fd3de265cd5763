#![allow(dead_code)]

use dom::{Document, Id, Selector};
use reply_form::{ClickEvent, ClickOutcome, ReplyFormController, Request, Response};
use std::path::PathBuf;

pub const PAGE_TOKEN: &str = "k3Yp9QeZ-page-token";

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {err}", path.display()))
}

pub fn comments_page() -> Document {
    Document::parse(&fixture("comments_page.html"))
}

pub fn comment(doc: &Document, id: &str) -> Id {
    doc.query_selector(&Selector::tag("li").with_attr_eq("data-comment-id", id))
        .unwrap_or_else(|| panic!("no comment {id}"))
}

/// The reply trigger belonging to the comment itself, not to a nested reply.
pub fn reply_trigger(doc: &Document, comment_id: &str) -> Id {
    let li = comment(doc, comment_id);
    let grid = doc
        .children(li)
        .iter()
        .copied()
        .find(|c| doc.has_class(*c, "grid"))
        .unwrap_or_else(|| panic!("comment {comment_id} has no control group"));
    doc.query_selector_from(grid, &Selector::class("reply-btn"))
        .unwrap_or_else(|| panic!("comment {comment_id} has no reply trigger"))
}

pub fn click(ctl: &ReplyFormController, doc: &mut Document, target: Id) -> ClickOutcome {
    let mut event = ClickEvent::new(target);
    let outcome = ctl.handle(doc, &mut event);
    assert!(event.default_prevented(), "trigger click must not navigate");
    outcome
}

pub fn open_reply(ctl: &ReplyFormController, doc: &mut Document, comment_id: &str) -> Id {
    let trigger = reply_trigger(doc, comment_id);
    match click(ctl, doc, trigger) {
        ClickOutcome::Opened { form, .. } => form,
        other => panic!("expected comment {comment_id} to open a reply form, got {other:?}"),
    }
}

pub fn control(doc: &Document, form: Id, name: &str) -> Id {
    doc.query_selector_from(form, &Selector::any().with_attr_eq("name", name))
        .unwrap_or_else(|| panic!("form has no `{name}` control"))
}

pub fn reply_forms(doc: &Document) -> Vec<Id> {
    doc.query_selector_all(&Selector::class("reply-form"))
}

pub fn comment_ids(doc: &Document) -> Vec<String> {
    doc.query_selector_all(&Selector::tag("li").with_attr("data-comment-id"))
        .into_iter()
        .filter_map(|li| doc.attr(li, "data-comment-id").map(str::to_string))
        .collect()
}

/// A comment endpoint in the shape of the server view: it accepts the reply
/// fields and answers partial requests with the re-rendered thread.
#[derive(Default)]
pub struct CommentEndpoint {
    pub requests: Vec<Request>,
    pub status: Option<u16>,
}

impl CommentEndpoint {
    pub fn failing(status: u16) -> Self {
        Self {
            requests: Vec::new(),
            status: Some(status),
        }
    }
}

impl reply_form::Responder for CommentEndpoint {
    fn respond(&mut self, request: &Request) -> Response {
        self.requests.push(request.clone());
        if let Some(status) = self.status {
            return Response::with_status(status, "<p>error</p>");
        }

        let posted: Vec<(String, String)> = url::form_urlencoded::parse(request.body.as_bytes())
            .into_owned()
            .collect();
        let field = |name: &str| {
            posted
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .unwrap_or_default()
        };
        let mut text = String::new();
        dom::escape_text(field("text"), &mut text);
        Response::ok(format!(
            r##"<ul id="comments">
  <li data-comment-id="11" data-add-comment-url="/comment/7/">
    <div class="grid"><a href="#" class="reply-btn">Ответить</a><div class="reply-form-container"></div></div>
    <ul class="replies">
      <li data-comment-id="99" data-parent-id="{parent}" data-add-comment-url="/comment/7/">
        <p>{text}</p>
        <div class="grid"><a href="#" class="reply-btn">Ответить</a><div class="reply-form-container"></div></div>
      </li>
    </ul>
  </li>
</ul>"##,
            parent = field("parent_id"),
        ))
    }
}
