//! Field comparison rules for working/baseline snapshots.
//!
//! Optional text fields treat `None` and `Some("")` as the same value so
//! that an untouched empty input never registers as an edit.

use crate::patch::Patch;

/// Collapse the empty string into `None`.
pub fn normalize_text(value: &Option<String>) -> Option<&str> {
    match value.as_deref() {
        Some("") | None => None,
        Some(v) => Some(v),
    }
}

/// Equality for optional text under null/empty equivalence.
pub fn text_eq(a: &Option<String>, b: &Option<String>) -> bool {
    normalize_text(a) == normalize_text(b)
}

/// Patch for an optional text field.
///
/// Returns `Unchanged` when the normalized values match. Otherwise the
/// working value is carried as-is: `Some("")` is sent as `""` (an explicit
/// clear request) and `None` as `null`.
pub fn text_patch(working: &Option<String>, baseline: &Option<String>) -> Patch<String> {
    if text_eq(working, baseline) {
        Patch::Unchanged
    } else {
        Patch::from_value(working.clone())
    }
}

/// Patch entry for a non-nullable field: `Some(working)` iff it differs.
pub fn value_patch<T: PartialEq + Clone>(working: &T, baseline: &T) -> Option<T> {
    (working != baseline).then(|| working.clone())
}
