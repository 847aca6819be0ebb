//! Identifier types for cart lines and storage contexts.
//!
//! Catalog data uses both integer and string ids, so [`ItemId`] accepts
//! either JSON form and keeps it unchanged on the way back out.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a purchasable item.
///
/// Serialized untagged, so `1` and `"sku-1"` are both valid ids in the
/// persisted cart. Structural equality distinguishes `1` from `"1"`; use
/// [`ItemId::matches_str`] for the looser string-form comparison used by
/// catalog lookups.
///
/// # Examples
///
/// ```
/// use storefront_core::ItemId;
///
/// let id: ItemId = "42".parse().unwrap();
/// assert_eq!(id, ItemId::Number(42));
///
/// let id: ItemId = "mug-blue".parse().unwrap();
/// assert_eq!(id, ItemId::Text("mug-blue".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Integer id.
    Number(i64),
    /// String id.
    Text(String),
}

impl ItemId {
    /// Compare against a string form, the way route parameters are matched.
    #[must_use]
    pub fn matches_str(&self, other: &str) -> bool {
        match self {
            Self::Number(n) => other.parse::<i64>().is_ok_and(|o| o == *n),
            Self::Text(s) => s == other,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => fmt::Display::fmt(n, f),
            Self::Text(s) => f.pad(s),
        }
    }
}

impl FromStr for ItemId {
    type Err = core::convert::Infallible;

    /// Integers become [`ItemId::Number`], everything else [`ItemId::Text`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Number))
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<i32> for ItemId {
    fn from(id: i32) -> Self {
        Self::Number(i64::from(id))
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Identity of one execution context (a browser tab, a CLI invocation)
/// sharing a storage area.
///
/// Storage-changed events are tagged with the writer's context so the
/// writer can ignore its own changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Create a fresh random context id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_json_forms() {
        let number: ItemId = serde_json::from_str("7").unwrap();
        assert_eq!(number, ItemId::Number(7));
        assert_eq!(serde_json::to_string(&number).unwrap(), "7");

        let text: ItemId = serde_json::from_str("\"sku-7\"").unwrap();
        assert_eq!(text, ItemId::Text("sku-7".to_string()));
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"sku-7\"");
    }

    #[test]
    fn test_item_id_string_form_matching() {
        assert!(ItemId::Number(12).matches_str("12"));
        assert!(!ItemId::Number(12).matches_str("012x"));
        assert!(ItemId::Text("12".to_string()).matches_str("12"));
        assert_ne!(ItemId::Number(12), ItemId::Text("12".to_string()));
    }

    #[test]
    fn test_item_id_display() {
        assert_eq!(ItemId::Number(3).to_string(), "3");
        assert_eq!(ItemId::from("pen").to_string(), "pen");
    }

    #[test]
    fn test_context_ids_are_unique() {
        assert_ne!(ContextId::new(), ContextId::new());
    }
}
