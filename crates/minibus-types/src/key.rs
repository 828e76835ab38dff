//! Element identifiers and composite state keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeName;
use crate::error::TypeError;
use crate::KEY_SEPARATOR;

/// Unique identifier of an element in the host tree.
///
/// Element ids double as requester identities: the element that asks for a
/// state change is named by its id. An id can never contain the key
/// separator, so the owner part of a [`StateKey`] is always unambiguous.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ElementId(String);

impl ElementId {
    /// Create an element id, rejecting empty ids and ids containing the
    /// key separator or whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::InvalidElementId {
                id,
                reason: "element id must not be empty".into(),
            });
        }
        if id.contains(KEY_SEPARATOR) {
            return Err(TypeError::InvalidElementId {
                id,
                reason: format!("element id must not contain {KEY_SEPARATOR:?}"),
            });
        }
        if id.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidElementId {
                id,
                reason: "element id must not contain whitespace".into(),
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ElementId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ElementId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ElementId> for String {
    fn from(id: ElementId) -> Self {
        id.0
    }
}

/// Composite identifier of one state entry: `owner.attribute`.
///
/// The owner is the element whose declared attribute produced the entry.
/// Ownership is fixed by the key's syntax and never reassigned.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateKey {
    owner: ElementId,
    attribute: AttributeName,
}

impl StateKey {
    pub fn new(owner: ElementId, attribute: AttributeName) -> Self {
        Self { owner, attribute }
    }

    /// Parse a serialized `owner.attribute` key.
    ///
    /// The key is split at the first separator; everything after it is the
    /// attribute name.
    ///
    /// # Examples
    ///
    /// ```
    /// use minibus_types::StateKey;
    ///
    /// let key = StateKey::parse("toggle.data-class").unwrap();
    /// assert_eq!(key.owner().as_str(), "toggle");
    /// assert_eq!(key.attribute().as_str(), "data-class");
    /// assert!(StateKey::parse("no-separator").is_err());
    /// ```
    pub fn parse(key: &str) -> Result<Self, TypeError> {
        let Some((owner, attribute)) = key.split_once(KEY_SEPARATOR) else {
            return Err(TypeError::InvalidStateKey {
                key: key.to_string(),
                reason: format!("missing {KEY_SEPARATOR:?} separator"),
            });
        };
        let owner = ElementId::new(owner).map_err(|e| TypeError::InvalidStateKey {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        let attribute = AttributeName::new(attribute).map_err(|e| TypeError::InvalidStateKey {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { owner, attribute })
    }

    /// The element that owns this state entry.
    pub fn owner(&self) -> &ElementId {
        &self.owner
    }

    pub fn attribute(&self) -> &AttributeName {
        &self.attribute
    }

    /// Returns `true` if `requester` owns this key. An owner may always
    /// mutate its own declared state.
    pub fn is_owned_by(&self, requester: &ElementId) -> bool {
        self.owner == *requester
    }
}

impl fmt::Debug for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateKey({self})")
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.owner, self.attribute)
    }
}

impl FromStr for StateKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StateKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.to_string()
    }
}
