mod common;

use common::fixture;
use dom::{Document, Selector};
use reply_form::{ClickEvent, ClickOutcome, Locale, ReplyFormConfig, ReplyFormController};

#[test]
fn file_config_overrides_only_what_it_names() {
    let config = ReplyFormConfig::from_toml_str(&fixture("reply_form.toml")).unwrap();
    assert_eq!(config.trigger_class, "answer-link");
    assert_eq!(config.container_class, "answer-slot");
    assert_eq!(config.swap_target, "#thread");
    assert_eq!(config.locale, Locale::En);

    let defaults = ReplyFormConfig::default();
    assert_eq!(config.control_group_class, defaults.control_group_class);
    assert_eq!(config.comment_id_attr, defaults.comment_id_attr);
    assert_eq!(config.csrf_field, defaults.csrf_field);
}

#[test]
fn file_config_drives_the_controller() {
    let config = ReplyFormConfig::from_toml_str(&fixture("reply_form.toml")).unwrap();
    let mut doc = Document::parse(
        r##"<input type="hidden" name="csrfmiddlewaretoken" value="tok">
           <ul id="thread">
             <li data-comment-id="5" data-add-comment-url="/comment/2/">
               <div class="grid">
                 <a href="#" class="reply-btn">old style</a>
                 <a href="#" class="answer-link">Reply</a>
                 <div class="answer-slot"></div>
               </div>
             </li>
           </ul>"##,
    );
    let ctl = ReplyFormController::attach(&doc, config);

    let legacy = doc.query_selector(&Selector::class("reply-btn")).unwrap();
    let mut event = ClickEvent::new(legacy);
    assert_eq!(ctl.handle(&mut doc, &mut event), ClickOutcome::Ignored);

    let trigger = doc.query_selector(&Selector::class("answer-link")).unwrap();
    let mut event = ClickEvent::new(trigger);
    let ClickOutcome::Opened { form, container } = ctl.handle(&mut doc, &mut event) else {
        panic!("configured trigger should open a form");
    };
    assert!(doc.has_class(container, "answer-slot"));
    assert_eq!(doc.attr(form, "hx-target"), Some("#thread"));
    let text = doc
        .query_selector_from(form, &Selector::tag("input").with_attr_eq("name", "text"))
        .unwrap();
    assert_eq!(doc.attr(text, "placeholder"), Some("Write your reply..."));
}

#[test]
fn config_errors_are_reported_not_defaulted() {
    let err = ReplyFormConfig::from_toml_str("swap_target = 3").unwrap_err();
    assert!(err.to_string().starts_with("invalid reply form config"));
    assert!(std::error::Error::source(&err).is_some());

    let err = ReplyFormConfig::from_toml_str("trigger_class = \"\"").unwrap_err();
    assert_eq!(err.to_string(), "config key `trigger_class` must not be empty");
}
