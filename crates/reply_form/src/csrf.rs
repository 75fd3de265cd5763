use dom::{Document, Selector};

/// Page-wide CSRF token, read once when the controller is bound to a page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Value of the first `input[name=<field>]` anywhere in the document, or an
    /// empty token when the page has none.
    pub fn from_document(doc: &Document, field: &str) -> Self {
        let selector = Selector::tag("input").with_attr_eq("name", field);
        match doc.query_selector(&selector) {
            Some(input) => Self(doc.value(input)),
            None => {
                log::debug!(target: "reply_form.csrf", "no `{field}` field on the page");
                Self::default()
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_the_first_matching_field() {
        let doc = Document::parse(
            r#"<form><input type="hidden" name="csrfmiddlewaretoken" value="tok-abc"></form>
               <form><input type="hidden" name="csrfmiddlewaretoken" value="second"></form>"#,
        );
        let token = CsrfToken::from_document(&doc, "csrfmiddlewaretoken");
        assert_eq!(token.as_str(), "tok-abc");
    }

    #[test]
    fn missing_field_gives_an_empty_token() {
        let doc = Document::parse(r#"<input name="other" value="x">"#);
        let token = CsrfToken::from_document(&doc, "csrfmiddlewaretoken");
        assert!(token.is_empty());
        assert_eq!(token, CsrfToken::default());
    }

    #[test]
    fn field_without_value_is_empty() {
        let doc = Document::parse(r#"<input type="hidden" name="csrfmiddlewaretoken">"#);
        assert!(CsrfToken::from_document(&doc, "csrfmiddlewaretoken").is_empty());
    }
}
