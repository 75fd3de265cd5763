use crate::config::ReplyFormConfig;
use crate::csrf::CsrfToken;
use crate::form::{ReplyTarget, build_reply_form};
use dom::{Document, DomError, Id, Selector};
use std::fmt;

/// A click delivered to the page, as seen by a delegated listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickEvent {
    target: Id,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn new(target: Id) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }

    pub fn target(&self) -> Id {
        self.target
    }

    /// Suppress the host's default navigation for this click.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Roles a clicked element can play for the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerRole {
    /// Opens or closes the reply form of its comment.
    Reply,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// The trigger sits outside any control group.
    NoControlGroup,
    Dom(DomError),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NoControlGroup => f.write_str("trigger is not inside a control group"),
            AbortReason::Dom(err) => write!(f, "{err}"),
        }
    }
}

/// What a click did to the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not a trigger; the event was left untouched.
    Ignored,
    Aborted(AbortReason),
    /// An open reply form was removed. The id is no longer live.
    Closed { form: Id },
    Opened { form: Id, container: Id },
    /// A form was built but the comment offers nowhere to mount it.
    Unmounted,
}

#[derive(Clone, Debug)]
struct Selectors {
    control_group: Selector,
    form: Selector,
    comment: Selector,
    container: Selector,
}

impl Selectors {
    fn new(config: &ReplyFormConfig) -> Self {
        Self {
            control_group: Selector::class(&config.control_group_class),
            form: Selector::class(&config.form_class),
            comment: Selector::tag(&config.comment_tag),
            container: Selector::class(&config.container_class),
        }
    }
}

/// Delegated click handler that toggles inline reply forms under comments.
///
/// One controller serves the whole page. It holds no per-comment state: whether
/// a comment's form is open is read from the document on every click.
#[derive(Clone, Debug)]
pub struct ReplyFormController {
    config: ReplyFormConfig,
    csrf: CsrfToken,
    selectors: Selectors,
    triggers: Vec<(Selector, TriggerRole)>,
}

impl ReplyFormController {
    pub fn new(config: ReplyFormConfig, csrf: CsrfToken) -> Self {
        let selectors = Selectors::new(&config);
        let triggers = vec![(Selector::class(&config.trigger_class), TriggerRole::Reply)];
        Self {
            config,
            csrf,
            selectors,
            triggers,
        }
    }

    /// Bind to a loaded page, reading its CSRF token once.
    pub fn attach(doc: &Document, config: ReplyFormConfig) -> Self {
        let csrf = CsrfToken::from_document(doc, &config.csrf_field);
        if csrf.is_empty() {
            log::warn!(
                target: "reply_form.controller",
                "page has no `{}` value; replies will be rejected by the server",
                config.csrf_field
            );
        }
        Self::new(config, csrf)
    }

    pub fn config(&self) -> &ReplyFormConfig {
        &self.config
    }

    pub fn csrf(&self) -> &CsrfToken {
        &self.csrf
    }

    /// The role of the clicked element itself; ancestors are not consulted.
    pub fn role_of(&self, doc: &Document, target: Id) -> Option<TriggerRole> {
        self.triggers
            .iter()
            .find(|(selector, _)| doc.matches(target, selector))
            .map(|(_, role)| *role)
    }

    pub fn handle(&self, doc: &mut Document, event: &mut ClickEvent) -> ClickOutcome {
        let Some(role) = self.role_of(doc, event.target()) else {
            return ClickOutcome::Ignored;
        };
        match role {
            TriggerRole::Reply => self.toggle_reply(doc, event),
        }
    }

    fn toggle_reply(&self, doc: &mut Document, event: &mut ClickEvent) -> ClickOutcome {
        event.prevent_default();
        let trigger = event.target();

        let Some(group) = doc.closest(trigger, &self.selectors.control_group) else {
            log::debug!(target: "reply_form.controller", "trigger {} has no control group", trigger.0);
            return ClickOutcome::Aborted(AbortReason::NoControlGroup);
        };

        if let Some(form) = doc.query_selector_from(group, &self.selectors.form) {
            if let Err(err) = doc.remove(form) {
                log::warn!(target: "reply_form.controller", "failed to close reply form: {err}");
                return ClickOutcome::Aborted(AbortReason::Dom(err));
            }
            log::debug!(target: "reply_form.controller", "closed reply form {}", form.0);
            return ClickOutcome::Closed { form };
        }

        let comment = doc.closest(trigger, &self.selectors.comment);
        let target = ReplyTarget::read(doc, comment, &self.config);
        let form = build_reply_form(&target, &self.csrf, &self.config);

        let Some(container) =
            comment.and_then(|c| doc.query_selector_from(c, &self.selectors.container))
        else {
            log::debug!(
                target: "reply_form.controller",
                "comment {:?} has no reply container",
                target.parent_id
            );
            return ClickOutcome::Unmounted;
        };

        match self.mount(doc, container, &form) {
            Ok(form) => {
                log::debug!(
                    target: "reply_form.controller",
                    "opened reply form for comment {:?}",
                    target.parent_id
                );
                if log::log_enabled!(target: "reply_form.controller", log::Level::Trace) {
                    for line in doc.outline(form, 16) {
                        log::trace!(target: "reply_form.controller", "{line}");
                    }
                }
                ClickOutcome::Opened { form, container }
            }
            Err(err) => {
                log::warn!(target: "reply_form.controller", "failed to mount reply form: {err}");
                ClickOutcome::Aborted(AbortReason::Dom(err))
            }
        }
    }

    fn mount(&self, doc: &mut Document, container: Id, form: &dom::Node) -> Result<Id, DomError> {
        doc.clear_children(container)?;
        let form = doc.import(form)?;
        doc.append_child(container, form)?;
        Ok(form)
    }
}
