//! Core record types for stringsheet.
//! Readers decode into these; writers serialize these.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One translatable unit: a `<string name="...">text</string>` element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StringItem {
    /// Unique key within a locale.
    pub name: String,

    /// Text content.
    pub text: String,
}

impl StringItem {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl Display for StringItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.text)
    }
}

/// All strings of one language variant (one `values-<code>/strings.xml`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Locale {
    /// Locale code, matched verbatim against `values-<code>` directory suffixes.
    pub code: String,

    /// Items in document order.
    #[serde(default)]
    pub items: Vec<StringItem>,
}

impl Locale {
    pub fn new(code: impl Into<String>, items: Vec<StringItem>) -> Self {
        Self {
            code: code.into(),
            items,
        }
    }

    pub fn find_item(&self, name: &str) -> Option<&StringItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.find_item(name).map(|item| item.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Finds a locale by code. The first match wins when codes repeat.
pub fn find_locale<'a>(locales: &'a [Locale], code: &str) -> Option<&'a Locale> {
    locales.iter().find(|locale| locale.code == code)
}
