//! Comment-thread reply forms over a server-rendered page.
//!
//! [`dom`] holds the page, [`reply_form`] toggles and submits the forms.

pub use dom;
pub use reply_form;

pub use reply_form::{
    ClickEvent, ClickOutcome, CsrfToken, ReplyFormConfig, ReplyFormController, exchange,
};
