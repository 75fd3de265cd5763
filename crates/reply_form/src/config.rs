use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Markup contract between the comment templates and the controller.
///
/// Defaults match the templates the comment server renders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplyFormConfig {
    /// Class marking the control that opens and closes a reply form.
    pub trigger_class: String,
    /// Class of the per-comment row of action buttons; the toggle scope.
    pub control_group_class: String,
    /// Class given to generated reply forms.
    pub form_class: String,
    /// Class of the mount point inside each comment.
    pub container_class: String,
    /// Tag of the element representing one comment.
    pub comment_tag: String,
    pub comment_id_attr: String,
    pub reply_url_attr: String,
    /// Name of the hidden CSRF field, both on the page and in generated forms.
    pub csrf_field: String,
    /// `hx-target` of generated forms.
    pub swap_target: String,
    pub text_min_width: String,
    pub locale: Locale,
}

impl Default for ReplyFormConfig {
    fn default() -> Self {
        Self {
            trigger_class: "reply-btn".to_string(),
            control_group_class: "grid".to_string(),
            form_class: "reply-form".to_string(),
            container_class: "reply-form-container".to_string(),
            comment_tag: "li".to_string(),
            comment_id_attr: "data-comment-id".to_string(),
            reply_url_attr: "data-add-comment-url".to_string(),
            csrf_field: "csrfmiddlewaretoken".to_string(),
            swap_target: "#comments".to_string(),
            text_min_width: "150px".to_string(),
            locale: Locale::default(),
        }
    }
}

impl ReplyFormConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("trigger_class", &self.trigger_class),
            ("control_group_class", &self.control_group_class),
            ("form_class", &self.form_class),
            ("container_class", &self.container_class),
            ("comment_tag", &self.comment_tag),
            ("csrf_field", &self.csrf_field),
            ("swap_target", &self.swap_target),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(key));
            }
            if value.chars().any(char::is_whitespace) {
                return Err(ConfigError::Whitespace(key));
            }
        }
        Ok(())
    }
}

/// Language of the visible strings in generated forms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    pub fn placeholder(self) -> &'static str {
        match self {
            Locale::Ru => "Напишите ваш ответ...",
            Locale::En => "Write your reply...",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Locale::Ru => "Отправить",
            Locale::En => "Send",
        }
    }
}
