//! Compound selectors and the lookups built on them.
//!
//! Supported grammar (no combinators, no selector lists):
//! `tag`, `.class`, `#id`, `[attr]`, `[attr=value]`, `[attr="value"]`, `[attr='value']`,
//! in any combination such as `input[name="csrfmiddlewaretoken"]` or `li.comment`.

use crate::document::Document;
use crate::error::SelectorError;
use crate::types::Id;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrMatch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

impl Selector {
    /// Matches every element.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn tag(name: &str) -> Self {
        Self::any().with_tag(name)
    }

    pub fn class(name: &str) -> Self {
        Self::any().with_class(name)
    }

    pub fn id(value: &str) -> Self {
        Self {
            id: Some(value.to_string()),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, name: &str) -> Self {
        self.tag = Some(name.to_ascii_lowercase());
        self
    }

    pub fn with_class(mut self, name: &str) -> Self {
        self.classes.push(name.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str) -> Self {
        self.attributes.push(AttrMatch {
            name: name.to_ascii_lowercase(),
            value: None,
        });
        self
    }

    pub fn with_attr_eq(mut self, name: &str, value: &str) -> Self {
        self.attributes.push(AttrMatch {
            name: name.to_ascii_lowercase(),
            value: Some(value.to_string()),
        });
        self
    }

    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input).parse()
    }

    pub fn matches(&self, doc: &Document, id: Id) -> bool {
        let Some(name) = doc.tag_name(id) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if tag != "*" && !name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(expected) = &self.id {
            if doc.attr(id, "id") != Some(expected.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| doc.has_class(id, c)) {
            return false;
        }
        self.attributes.iter().all(|m| match &m.value {
            None => doc.has_attr(id, &m.name),
            Some(value) => doc.attr(id, &m.name) == Some(value.as_str()),
        })
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => f.write_str(tag)?,
            None if self.id.is_none() && self.classes.is_empty() && self.attributes.is_empty() => {
                f.write_str("*")?
            }
            None => {}
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for m in &self.attributes {
            match &m.value {
                Some(value) => write!(f, "[{}={value:?}]", m.name)?,
                None => write!(f, "[{}]", m.name)?,
            }
        }
        Ok(())
    }
}

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn parse(mut self) -> Result<Selector, SelectorError> {
        self.input = self.input.trim();
        if self.input.is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut selector = Selector::any();
        if self.peek() == Some('*') {
            self.pos += 1;
        } else if self.peek().is_some_and(is_name_char) {
            let tag = self.name()?;
            selector = selector.with_tag(tag);
        }
        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.pos += 1;
                    let class = self.name()?;
                    selector = selector.with_class(class);
                }
                '#' => {
                    self.pos += 1;
                    selector.id = Some(self.name()?.to_string());
                }
                '[' => {
                    let open = self.pos;
                    self.pos += 1;
                    let name = self.name()?;
                    match self.peek() {
                        Some(']') => {
                            self.pos += 1;
                            selector = selector.with_attr(name);
                        }
                        Some('=') => {
                            self.pos += 1;
                            let value = self.attr_value(open)?;
                            if self.peek() != Some(']') {
                                return Err(SelectorError::UnterminatedAttribute { position: open });
                            }
                            self.pos += 1;
                            selector = selector.with_attr_eq(name, value);
                        }
                        Some(found) => {
                            return Err(SelectorError::UnexpectedChar {
                                position: self.pos,
                                found,
                            });
                        }
                        None => {
                            return Err(SelectorError::UnterminatedAttribute { position: open });
                        }
                    }
                }
                found => {
                    return Err(SelectorError::UnexpectedChar {
                        position: self.pos,
                        found,
                    });
                }
            }
        }
        Ok(selector)
    }

    fn name(&mut self) -> Result<&'a str, SelectorError> {
        let start = self.pos;
        let rest = &self.input[start..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !is_name_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(SelectorError::EmptyName { position: start });
        }
        self.pos += len;
        Ok(&self.input[start..start + len])
    }

    fn attr_value(&mut self, open: usize) -> Result<&'a str, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let start = self.pos + 1;
                let Some(len) = self.input[start..].find(quote) else {
                    return Err(SelectorError::UnterminatedAttribute { position: open });
                };
                self.pos = start + len + 1;
                Ok(&self.input[start..start + len])
            }
            _ => self.name(),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

impl Document {
    /// Whether the element's `class` attribute contains `class` as a whole token.
    pub fn has_class(&self, id: Id, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn matches(&self, id: Id, selector: &Selector) -> bool {
        selector.matches(self, id)
    }

    /// First matching element in document order.
    pub fn query_selector(&self, selector: &Selector) -> Option<Id> {
        self.query_selector_from(self.root(), selector)
    }

    /// First matching descendant of `scope`; `scope` itself is not considered.
    pub fn query_selector_from(&self, scope: Id, selector: &Selector) -> Option<Id> {
        self.descendants(scope).find(|id| selector.matches(self, *id))
    }

    pub fn query_selector_all(&self, selector: &Selector) -> Vec<Id> {
        self.query_selector_all_from(self.root(), selector)
    }

    pub fn query_selector_all_from(&self, scope: Id, selector: &Selector) -> Vec<Id> {
        self.descendants(scope)
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    /// Nearest inclusive ancestor of `id` matching `selector`.
    pub fn closest(&self, id: Id, selector: &Selector) -> Option<Id> {
        self.ancestors(id).find(|a| selector.matches(self, *a))
    }

    pub fn element_by_id(&self, value: &str) -> Option<Id> {
        self.query_selector(&Selector::id(value))
    }
}
