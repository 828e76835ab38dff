//! Attribute names and the closed set of attribute kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::{CLASS_ATTRIBUTE, TEXT_ATTRIBUTE};

/// Name of an attribute declared on an element, including its prefix
/// (e.g. `data-class`).
///
/// Attribute names are opaque apart from being non-empty and free of
/// whitespace. They may contain `.` since only the first separator in a
/// state key splits owner from attribute.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeName(String);

impl AttributeName {
    /// Create an attribute name, rejecting empty or whitespace-bearing input.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::InvalidAttributeName {
                name,
                reason: "attribute name must not be empty".into(),
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidAttributeName {
                name,
                reason: "attribute name must not contain whitespace".into(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The kind used to pick apply behavior for this attribute.
    pub fn kind(&self) -> AttributeKind {
        AttributeKind::classify(&self.0)
    }

    /// Returns `true` if the name starts with `prefix` (e.g. `data-`).
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Debug for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeName({})", self.0)
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AttributeName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AttributeName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AttributeName> for String {
    fn from(name: AttributeName) -> Self {
        name.0
    }
}

/// Recognized attribute kinds.
///
/// Each kind selects a handler in the binding layer. Anything that is not
/// specifically recognized is [`AttributeKind::Generic`] and is written back
/// to the host as a plain named attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeKind {
    /// `data-text`: sets the element's visible text content.
    Text,
    /// `data-class`: replaces the element's class tokens.
    ClassList,
    /// Any other attribute.
    Generic,
}

impl AttributeKind {
    /// Classify a raw attribute name.
    pub fn classify(name: &str) -> Self {
        match name {
            TEXT_ATTRIBUTE => Self::Text,
            CLASS_ATTRIBUTE => Self::ClassList,
            _ => Self::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::ClassList => "class-list",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
