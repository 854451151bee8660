//! Placeholder substitution
//!
//! Rendering is two passes over the text:
//! 1. every known variable that has a value replaces all of its `{{key}}`
//!    tokens, in [`TemplateVariable::ALL`] order, repeated until the text
//!    settles so that values holding known placeholders are filled too;
//! 2. any `{{...}}` left whose key is not a known variable becomes
//!    `[Not set: ...]`.
//!
//! A known variable without a value survives both passes as its literal
//! `{{key}}` token.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::variables::{TemplateVariable, VariableData};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid"));

/// Render `text` against `data`
pub fn render(text: &str, data: &VariableData) -> String {
    let substituted = substitute_known(text, data);
    fill_unknown(&substituted)
}

/// Pass 1: replace known variables that have a value
///
/// Runs at most one round per known variable; a value that keeps
/// reintroducing placeholders stops there.
fn substitute_known(text: &str, data: &VariableData) -> String {
    let mut result = text.to_string();
    for _ in 0..TemplateVariable::ALL.len() {
        let next = substitute_round(&result, data);
        if next == result {
            break;
        }
        result = next;
    }
    result
}

fn substitute_round(text: &str, data: &VariableData) -> String {
    let mut result = text.to_string();
    for variable in TemplateVariable::ALL {
        if let Some(value) = data.get(variable) {
            result = result.replace(&variable.placeholder(), value);
        }
    }
    result
}

/// Pass 2: mark every remaining unknown placeholder
fn fill_unknown(text: &str) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            let key = &caps[1];
            if TemplateVariable::from_key(key).is_some() {
                caps[0].to_string()
            } else {
                format!("[Not set: {}]", key)
            }
        })
        .into_owned()
}

/// Keys of every `{{...}}` token in `text`, in order of appearance
pub fn placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Placeholder keys in `text` that `render` would not fill from `data`
pub fn unresolved(text: &str, data: &VariableData) -> Vec<String> {
    placeholders(text)
        .into_iter()
        .filter(|key| match TemplateVariable::from_key(key) {
            Some(variable) => data.get(variable).is_none(),
            None => true,
        })
        .collect()
}

/// A rendered subject and body pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

impl RenderedEmail {
    pub fn render(subject: &str, body: &str, data: &VariableData) -> Self {
        Self {
            subject: render(subject, data),
            body: render(body, data),
        }
    }
}
