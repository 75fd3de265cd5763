//! Inline reply forms for server-rendered comment threads.
//!
//! [`ReplyFormController`] is a delegated click handler: clicking a comment's
//! reply trigger mounts a form under that comment, clicking it again removes
//! the form. The form carries declarative partial-update attributes so the
//! reply posts in place and the server's re-rendered thread replaces the old
//! one. [`exchange`] runs that cycle against a [`Responder`].
//!
//! ```
//! use dom::{Document, Selector};
//! use reply_form::{ClickEvent, ClickOutcome, ReplyFormConfig, ReplyFormController};
//!
//! let mut doc = Document::parse(
//!     r##"<input type="hidden" name="csrfmiddlewaretoken" value="tok">
//!        <ul id="comments">
//!          <li data-comment-id="42" data-add-comment-url="/comment/7/">
//!            <div class="grid">
//!              <a href="#" class="reply-btn">Reply</a>
//!              <div class="reply-form-container"></div>
//!            </div>
//!          </li>
//!        </ul>"##,
//! );
//! let controller = ReplyFormController::attach(&doc, ReplyFormConfig::default());
//! let trigger = doc.query_selector(&Selector::class("reply-btn")).unwrap();
//!
//! let mut click = ClickEvent::new(trigger);
//! assert!(matches!(
//!     controller.handle(&mut doc, &mut click),
//!     ClickOutcome::Opened { .. }
//! ));
//! assert!(click.default_prevented());
//! ```

mod config;
mod controller;
mod csrf;
mod error;
mod exchange;
mod form;
mod protocol;
mod submission;
mod swap;

pub use config::{Locale, ReplyFormConfig};
pub use controller::{AbortReason, ClickEvent, ClickOutcome, ReplyFormController, TriggerRole};
pub use csrf::CsrfToken;
pub use error::{ConfigError, SubmitError};
pub use exchange::{
    ExchangeOutcome, FORM_CONTENT_TYPE, HX_REQUEST_HEADER, Request, Responder, Response, exchange,
};
pub use form::{PARENT_FIELD, ReplyTarget, TEXT_FIELD, build_reply_form};
pub use protocol::{
    AfterRequest, HX_AFTER_REQUEST, HX_POST, HX_SWAP, HX_TARGET, PartialUpdate, SwapMode,
};
pub use submission::{FormSubmission, check_required, reset_form};
pub use swap::swap;
