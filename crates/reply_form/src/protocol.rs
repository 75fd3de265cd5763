//! Declarative partial-update attributes (`hx-*`).
//!
//! The controller only writes these; the exchange model in [`crate::exchange`]
//! reads them back the way the front-end library does.

use dom::{Document, Id};
use std::fmt;

pub const HX_POST: &str = "hx-post";
pub const HX_TARGET: &str = "hx-target";
pub const HX_SWAP: &str = "hx-swap";
pub const HX_AFTER_REQUEST: &str = "hx-on::after-request";

const RESET_HOOK: &str = "this.reset()";

/// How the response fragment lands relative to the target element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwapMode {
    #[default]
    InnerHtml,
    /// Replace the target element itself.
    OuterHtml,
    BeforeBegin,
    AfterBegin,
    BeforeEnd,
    AfterEnd,
    Delete,
    None,
}

impl SwapMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SwapMode::InnerHtml => "innerHTML",
            SwapMode::OuterHtml => "outerHTML",
            SwapMode::BeforeBegin => "beforebegin",
            SwapMode::AfterBegin => "afterbegin",
            SwapMode::BeforeEnd => "beforeend",
            SwapMode::AfterEnd => "afterend",
            SwapMode::Delete => "delete",
            SwapMode::None => "none",
        }
    }

    /// Parse an `hx-swap` value. Modifiers after the first word (`swap:1s`,
    /// `scroll:top`) are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let mode = value.split_ascii_whitespace().next()?;
        let mode = [
            SwapMode::InnerHtml,
            SwapMode::OuterHtml,
            SwapMode::BeforeBegin,
            SwapMode::AfterBegin,
            SwapMode::BeforeEnd,
            SwapMode::AfterEnd,
            SwapMode::Delete,
            SwapMode::None,
        ]
        .into_iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(mode))?;
        Some(mode)
    }
}

impl fmt::Display for SwapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post-completion hook, run whether the exchange succeeded or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AfterRequest {
    ResetForm,
    /// Any other inline handler; kept verbatim and not executed.
    Script(String),
}

impl AfterRequest {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim().trim_end_matches(';').trim();
        if trimmed == RESET_HOOK {
            AfterRequest::ResetForm
        } else {
            AfterRequest::Script(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AfterRequest::ResetForm => RESET_HOOK,
            AfterRequest::Script(script) => script,
        }
    }
}

/// The partial-update instructions carried by one element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialUpdate {
    pub post_url: String,
    /// Raw `hx-target` value: a selector or `this`.
    pub target: String,
    pub swap: SwapMode,
    pub after_request: Option<AfterRequest>,
}

impl PartialUpdate {
    /// Instructions for a reply form: post to `url`, replace the whole `target`
    /// with the response and reset the form afterwards.
    pub fn reply(url: &str, target: &str) -> Self {
        Self {
            post_url: url.to_string(),
            target: target.to_string(),
            swap: SwapMode::OuterHtml,
            after_request: Some(AfterRequest::ResetForm),
        }
    }

    /// Attributes to put on the element, in a stable order.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            (HX_POST, self.post_url.clone()),
            (HX_TARGET, self.target.clone()),
            (HX_SWAP, self.swap.as_str().to_string()),
        ];
        if let Some(hook) = &self.after_request {
            attrs.push((HX_AFTER_REQUEST, hook.as_str().to_string()));
        }
        attrs
    }

    /// Read the instructions back from an element. `None` when it has no
    /// `hx-post`. A missing `hx-target` means the element itself.
    pub fn from_element(doc: &Document, id: Id) -> Option<Self> {
        let post_url = doc.attr(id, HX_POST)?.to_string();
        let target = doc.attr(id, HX_TARGET).unwrap_or("this").to_string();
        let swap = match doc.attr(id, HX_SWAP) {
            Some(value) => SwapMode::parse(value).unwrap_or_else(|| {
                log::warn!(target: "reply_form.protocol", "unknown hx-swap {value:?}, using innerHTML");
                SwapMode::default()
            }),
            None => SwapMode::default(),
        };
        let after_request = doc.attr(id, HX_AFTER_REQUEST).map(AfterRequest::parse);
        Some(Self {
            post_url,
            target,
            swap,
            after_request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_modes_parse_case_insensitively_and_ignore_modifiers() {
        assert_eq!(SwapMode::parse("outerHTML"), Some(SwapMode::OuterHtml));
        assert_eq!(SwapMode::parse("outerhtml swap:1s"), Some(SwapMode::OuterHtml));
        assert_eq!(SwapMode::parse("beforeend"), Some(SwapMode::BeforeEnd));
        assert_eq!(SwapMode::parse("sideways"), None);
        assert_eq!(SwapMode::parse("   "), None);
    }

    #[test]
    fn reset_hook_is_recognised() {
        assert_eq!(AfterRequest::parse("this.reset()"), AfterRequest::ResetForm);
        assert_eq!(AfterRequest::parse(" this.reset(); "), AfterRequest::ResetForm);
        assert_eq!(
            AfterRequest::parse("alert(1)"),
            AfterRequest::Script("alert(1)".to_string())
        );
    }

    #[test]
    fn reply_instructions_round_trip_through_markup() {
        let update = PartialUpdate::reply("/comment/42/", "#comments");
        let mut doc = Document::new();
        let form = doc.create_element("form", Vec::new()).unwrap();
        doc.append_child(doc.root(), form).unwrap();
        for (name, value) in update.attributes() {
            doc.set_attr(form, name, Some(&value)).unwrap();
        }

        assert_eq!(doc.attr(form, HX_SWAP), Some("outerHTML"));
        assert_eq!(doc.attr(form, HX_AFTER_REQUEST), Some("this.reset()"));
        assert_eq!(PartialUpdate::from_element(&doc, form), Some(update));
    }

    #[test]
    fn defaults_apply_when_attributes_are_missing() {
        let doc = Document::parse(r#"<form hx-post="/x" hx-swap="wobble"></form><form></form>"#);
        let forms = doc.children(doc.root()).to_vec();
        let update = PartialUpdate::from_element(&doc, forms[0]).unwrap();
        assert_eq!(update.target, "this");
        assert_eq!(update.swap, SwapMode::InnerHtml);
        assert_eq!(update.after_request, None);
        assert_eq!(PartialUpdate::from_element(&doc, forms[1]), None);
    }
}
