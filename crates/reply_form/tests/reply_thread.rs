mod common;

use common::*;
use dom::Selector;
use reply_form::{ClickOutcome, ReplyFormConfig, ReplyFormController, SubmitError, exchange};

#[test]
fn reply_posts_exactly_the_server_fields_and_replaces_the_thread() {
    let mut doc = comments_page();
    let ctl = ReplyFormController::attach(&doc, ReplyFormConfig::default());
    assert_eq!(ctl.csrf().as_str(), PAGE_TOKEN);

    let form = open_reply(&ctl, &mut doc, "13");
    let text = control(&doc, form, "text");
    doc.set_value(text, "Не соглашусь & поспорю").unwrap();

    let mut server = CommentEndpoint::default();
    let outcome = exchange(&mut doc, form, &mut server).unwrap();

    assert_eq!(server.requests.len(), 1);
    let request = &server.requests[0];
    assert_eq!(request.url, "/comment/7/");
    assert_eq!(request.header("HX-Request"), Some("true"));
    assert_eq!(
        request.fields,
        vec![
            ("csrfmiddlewaretoken".to_string(), PAGE_TOKEN.to_string()),
            ("parent_id".to_string(), "13".to_string()),
            ("text".to_string(), "Не соглашусь & поспорю".to_string()),
        ]
    );
    assert!(outcome.reset);

    let comments = doc.element_by_id("comments").unwrap();
    assert_eq!(outcome.swapped, vec![comments]);
    assert_eq!(comment_ids(&doc), vec!["11", "99"]);
    let reply = comment(&doc, "99");
    assert_eq!(doc.attr(reply, "data-parent-id"), Some("13"));
    assert!(doc.text_content(reply).contains("Не соглашусь & поспорю"));

    assert!(!doc.is_connected(form));
    assert!(reply_forms(&doc).is_empty());
}

#[test]
fn thread_is_interactive_after_the_swap() {
    let mut doc = comments_page();
    let ctl = ReplyFormController::attach(&doc, ReplyFormConfig::default());
    let form = open_reply(&ctl, &mut doc, "11");
    let text = control(&doc, form, "text");
    doc.set_value(text, "ещё").unwrap();
    exchange(&mut doc, form, &mut CommentEndpoint::default()).unwrap();

    let form = open_reply(&ctl, &mut doc, "99");
    assert_eq!(doc.value(control(&doc, form, "parent_id")), "99");
    assert_eq!(
        doc.value(control(&doc, form, "csrfmiddlewaretoken")),
        PAGE_TOKEN
    );
}

#[test]
fn empty_reply_is_blocked_before_the_request() {
    let mut doc = comments_page();
    let ctl = ReplyFormController::attach(&doc, ReplyFormConfig::default());
    let form = open_reply(&ctl, &mut doc, "11");
    let before = doc.outer_html(doc.root()).unwrap();

    let mut server = CommentEndpoint::default();
    assert_eq!(
        exchange(&mut doc, form, &mut server),
        Err(SubmitError::MissingRequired {
            name: "text".to_string()
        })
    );
    assert!(server.requests.is_empty());
    assert_eq!(doc.outer_html(doc.root()).unwrap(), before);
}

#[test]
fn rejected_reply_keeps_the_thread_and_clears_the_input() {
    let mut doc = comments_page();
    let ctl = ReplyFormController::attach(&doc, ReplyFormConfig::default());
    let form = open_reply(&ctl, &mut doc, "12");
    let text = control(&doc, form, "text");
    doc.set_value(text, "ответ").unwrap();

    let mut server = CommentEndpoint::failing(403);
    let outcome = exchange(&mut doc, form, &mut server).unwrap();

    assert_eq!(outcome.status, 403);
    assert!(outcome.swapped.is_empty());
    assert!(doc.is_connected(form));
    assert_eq!(doc.value(text), "");
    assert_eq!(comment_ids(&doc), vec!["11", "12", "13"]);
}

#[test]
fn nested_reply_opens_under_its_own_comment() {
    let mut doc = comments_page();
    let ctl = ReplyFormController::attach(&doc, ReplyFormConfig::default());

    let nested = open_reply(&ctl, &mut doc, "12");
    let nested_li = comment(&doc, "12");
    assert!(doc.ancestors(nested).any(|a| a == nested_li));
    assert_eq!(doc.value(control(&doc, nested, "parent_id")), "12");

    let outer = open_reply(&ctl, &mut doc, "11");
    assert_eq!(doc.value(control(&doc, outer, "parent_id")), "11");
    assert_eq!(reply_forms(&doc).len(), 2);
    assert!(doc.contains(nested));
}

#[test]
fn toggling_every_comment_twice_restores_the_page() {
    let mut doc = comments_page();
    let ctl = ReplyFormController::attach(&doc, ReplyFormConfig::default());
    let before = doc.outer_html(doc.root()).unwrap();

    for id in ["11", "12", "13"] {
        let trigger = reply_trigger(&doc, id);
        assert!(matches!(
            click(&ctl, &mut doc, trigger),
            ClickOutcome::Opened { .. }
        ));
    }
    assert_eq!(reply_forms(&doc).len(), 3);

    for id in ["13", "11", "12"] {
        let trigger = reply_trigger(&doc, id);
        assert!(matches!(
            click(&ctl, &mut doc, trigger),
            ClickOutcome::Closed { .. }
        ));
    }
    assert_eq!(doc.outer_html(doc.root()).unwrap(), before);
}

#[test]
fn hostile_comment_attributes_stay_inert() {
    let mut doc = dom::Document::parse(
        r#"<ul id="comments"><li data-comment-id="1&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;" data-add-comment-url="/comment/7/?next=&quot;x">
             <div class="grid"><a class="reply-btn">r</a><div class="reply-form-container"></div></div>
           </li></ul>"#,
    );
    let ctl = ReplyFormController::new(
        ReplyFormConfig::default(),
        reply_form::CsrfToken::new("\"><b>t</b>"),
    );
    let trigger = doc.query_selector(&Selector::class("reply-btn")).unwrap();
    let ClickOutcome::Opened { form, .. } = click(&ctl, &mut doc, trigger) else {
        panic!("expected an open form");
    };

    let html = doc.outer_html(form).unwrap();
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<b>"));

    let reparsed = dom::Document::parse(&html);
    assert!(reparsed.query_selector(&Selector::tag("script")).is_none());
    let form = reparsed.query_selector(&Selector::tag("form")).unwrap();
    let parent = control(&reparsed, form, "parent_id");
    assert_eq!(reparsed.value(parent), r#"1"><script>alert(1)</script>"#);
    assert_eq!(reparsed.attr(form, "hx-post"), Some(r#"/comment/7/?next="x"#));
}
