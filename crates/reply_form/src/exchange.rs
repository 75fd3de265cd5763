//! The request/response cycle a partial-update client runs for a form.
//!
//! The server is abstracted as a [`Responder`], so a page can be driven end
//! to end without a network. Order of effects:
//!
//! 1. constraint validation (`required` fields)
//! 2. target resolution and request construction
//! 3. the responder is called
//! 4. the after-request hook runs, whatever the status
//! 5. on a success status, the response body is swapped into the target
//!
//! Steps 4 and 5 run in the opposite order from htmx, whose `afterRequest`
//! event fires after the swap. Here the form is reset first, so a form that
//! lives inside the swap target is reset while it is still in the document
//! and the swap then retires it.

use crate::error::SubmitError;
use crate::protocol::{AfterRequest, PartialUpdate};
use crate::submission::{FormSubmission, check_required, reset_form};
use crate::swap::swap;
use dom::{Document, Id, Selector};

pub const HX_REQUEST_HEADER: &str = "HX-Request";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    /// Submitted fields in tree order; `body` is their encoding.
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl Request {
    fn from_submission(url: &str, submission: FormSubmission) -> Self {
        let body = submission.encode();
        Self {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: vec![
                (HX_REQUEST_HEADER, "true".to_string()),
                ("Content-Type", FORM_CONTENT_TYPE.to_string()),
            ],
            fields: submission.fields,
            body,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the body should be swapped in. `204 No Content` never is.
    pub fn is_swappable(&self) -> bool {
        (200..300).contains(&self.status) && self.status != 204
    }
}

/// Stands in for the server endpoint.
pub trait Responder {
    fn respond(&mut self, request: &Request) -> Response;
}

impl<F> Responder for F
where
    F: FnMut(&Request) -> Response,
{
    fn respond(&mut self, request: &Request) -> Response {
        self(request)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub request: Request,
    pub status: u16,
    /// Whether the after-request hook reset the form.
    pub reset: bool,
    /// Top-level nodes inserted by the swap; empty when nothing was swapped.
    pub swapped: Vec<Id>,
}

/// Submit `form` through the partial-update protocol.
pub fn exchange<R>(
    doc: &mut Document,
    form: Id,
    responder: &mut R,
) -> Result<ExchangeOutcome, SubmitError>
where
    R: Responder + ?Sized,
{
    check_required(doc, form)?;
    let update = PartialUpdate::from_element(doc, form).ok_or(SubmitError::NotPartial(form))?;
    let target = resolve_target(doc, form, &update.target)?;
    let request = Request::from_submission(&update.post_url, FormSubmission::collect(doc, form)?);

    log::debug!(
        target: "reply_form.exchange",
        "POST {} ({} field(s))",
        request.url,
        request.fields.len()
    );
    let response = responder.respond(&request);
    log::debug!(
        target: "reply_form.exchange",
        "{} answered {} with {} byte(s)",
        request.url,
        response.status,
        response.body.len()
    );

    let reset = match &update.after_request {
        Some(AfterRequest::ResetForm) => {
            reset_form(doc, form)?;
            true
        }
        Some(AfterRequest::Script(script)) => {
            log::trace!(target: "reply_form.exchange", "skipping inline handler {script:?}");
            false
        }
        None => false,
    };

    let swapped = if response.is_swappable() {
        swap(doc, target, update.swap, &response.body)?
    } else {
        log::warn!(
            target: "reply_form.exchange",
            "{} answered {}; page left as is",
            request.url,
            response.status
        );
        Vec::new()
    };

    Ok(ExchangeOutcome {
        request,
        status: response.status,
        reset,
        swapped,
    })
}

fn resolve_target(doc: &Document, form: Id, target: &str) -> Result<Id, SubmitError> {
    if target.trim() == "this" {
        return Ok(form);
    }
    let selector = Selector::parse(target)?;
    doc.query_selector(&selector)
        .ok_or_else(|| SubmitError::MissingTarget(target.to_string()))
}
