use crate::error::SubmitError;
use dom::{Document, Id};

/// The data a form would send, in tree order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSubmission {
    /// Lowercased `method`; `get` when absent.
    pub method: String,
    pub action: String,
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    /// Gather the successful controls of `form`: named, enabled `input` and
    /// `textarea` elements. Buttons are never submitted.
    pub fn collect(doc: &Document, form: Id) -> Result<Self, SubmitError> {
        ensure_form(doc, form)?;
        let method = doc
            .attr(form, "method")
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "get".to_string());
        let action = doc.attr(form, "action").unwrap_or_default().to_string();

        let fields = controls(doc, form)
            .filter(|id| is_successful(doc, *id))
            .filter_map(|id| {
                let name = doc.attr(id, "name")?;
                Some((name.to_string(), doc.value(id)))
            })
            .collect();

        Ok(Self {
            method,
            action,
            fields,
        })
    }

    /// Value of the first field called `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.fields)
            .finish()
    }
}

/// Constraint validation: the first enabled `required` control left empty
/// blocks submission.
pub fn check_required(doc: &Document, form: Id) -> Result<(), SubmitError> {
    ensure_form(doc, form)?;
    for id in controls(doc, form) {
        if !doc.has_attr(id, "required") || doc.has_attr(id, "disabled") {
            continue;
        }
        if input_type(doc, id).is_some_and(|t| t == "hidden") {
            continue;
        }
        if doc.value(id).is_empty() {
            let name = doc.attr(id, "name").unwrap_or_default().to_string();
            log::debug!(target: "reply_form.submission", "required field {name:?} is empty");
            return Err(SubmitError::MissingRequired { name });
        }
    }
    Ok(())
}

/// Return every control of `form` to its default value.
pub fn reset_form(doc: &mut Document, form: Id) -> Result<(), SubmitError> {
    ensure_form(doc, form)?;
    let ids: Vec<Id> = controls(doc, form).collect();
    for id in ids {
        doc.reset_value(id)?;
    }
    log::trace!(target: "reply_form.submission", "reset form {}", form.0);
    Ok(())
}

fn ensure_form(doc: &Document, form: Id) -> Result<(), SubmitError> {
    if !doc.contains(form) {
        return Err(SubmitError::Dom(dom::DomError::MissingNode(form)));
    }
    if doc.tag_name(form) != Some("form") {
        return Err(SubmitError::NotAForm(form));
    }
    Ok(())
}

fn controls(doc: &Document, form: Id) -> impl Iterator<Item = Id> + '_ {
    doc.descendants(form)
        .filter(|id| matches!(doc.tag_name(*id), Some("input" | "textarea")))
}

fn input_type(doc: &Document, id: Id) -> Option<String> {
    if doc.tag_name(id) != Some("input") {
        return None;
    }
    Some(
        doc.attr(id, "type")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("text")
            .to_ascii_lowercase(),
    )
}

fn is_successful(doc: &Document, id: Id) -> bool {
    if doc.has_attr(id, "disabled") || doc.attr(id, "name").is_none_or(str::is_empty) {
        return false;
    }
    match input_type(doc, id).as_deref() {
        Some("submit" | "button" | "reset" | "image" | "file") => false,
        Some("checkbox" | "radio") => doc.has_attr(id, "checked"),
        _ => true,
    }
}
