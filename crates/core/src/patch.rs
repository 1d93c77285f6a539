//! Tri-state field updates for partial-update (PATCH) bodies.
//!
//! A nullable column can be left alone, cleared, or set. JSON expresses the
//! three cases as an omitted key, an explicit `null`, and a value. [`Patch`]
//! keeps them distinct on both the sending and the receiving side:
//!
//! ```text
//! {}                        -> Patch::Unchanged
//! { "icon": null }          -> Patch::Clear
//! { "icon": "https://.." }  -> Patch::Set("https://..")
//! ```
//!
//! Struct fields of this type must carry
//! `#[serde(default, skip_serializing_if = "Patch::is_unchanged")]` so that
//! a missing key deserializes to `Unchanged` and `Unchanged` is never written.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Update instruction for one nullable field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the stored value as it is.
    #[default]
    Unchanged,
    /// Store NULL.
    Clear,
    /// Store the given value.
    Set(T),
}

impl<T> Patch<T> {
    /// Build a patch from the desired new value: `None` clears, `Some` sets.
    pub fn from_value(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Set(v),
            None => Self::Clear,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// `true` for `Clear` and `Set`: the field was named in the request.
    pub fn is_present(&self) -> bool {
        !self.is_unchanged()
    }

    /// The value to store when present (`None` for both `Clear` and `Unchanged`).
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(v) => v.serialize(serializer),
            Self::Clear | Self::Unchanged => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Only reached when the key is present; a missing key falls back to
        // `Default` through `#[serde(default)]`.
        Option::<T>::deserialize(deserializer).map(Self::from_value)
    }
}
