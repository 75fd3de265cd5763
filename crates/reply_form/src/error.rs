use dom::{DomError, Id, SelectorError};
use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    Parse(toml::de::Error),
    /// A required setting is blank.
    Empty(&'static str),
    /// A class or tag setting contains whitespace and could never match.
    Whitespace(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "invalid reply form config: {err}"),
            ConfigError::Empty(key) => write!(f, "config key `{key}` must not be empty"),
            ConfigError::Whitespace(key) => {
                write!(f, "config key `{key}` must be a single name")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Why a form could not go through a partial-update exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitError {
    NotAForm(Id),
    /// The form carries no `hx-post`.
    NotPartial(Id),
    /// A `required` control is empty; the browser would block submission.
    MissingRequired { name: String },
    /// `hx-target` does not resolve to an element on the page.
    MissingTarget(String),
    InvalidTarget(SelectorError),
    Dom(DomError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::NotAForm(id) => write!(f, "node {} is not a form", id.0),
            SubmitError::NotPartial(id) => {
                write!(f, "form {} has no partial-update request target", id.0)
            }
            SubmitError::MissingRequired { name } => {
                write!(f, "required field `{name}` is empty")
            }
            SubmitError::MissingTarget(target) => {
                write!(f, "swap target `{target}` is not on the page")
            }
            SubmitError::InvalidTarget(err) => write!(f, "invalid swap target: {err}"),
            SubmitError::Dom(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::InvalidTarget(err) => Some(err),
            SubmitError::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for SubmitError {
    fn from(err: DomError) -> Self {
        SubmitError::Dom(err)
    }
}

impl From<SelectorError> for SubmitError {
    fn from(err: SelectorError) -> Self {
        SubmitError::InvalidTarget(err)
    }
}
