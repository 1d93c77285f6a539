//! Per-project changelog and feedback configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::diff::{text_eq, text_patch, value_patch};
use crate::error::CoreError;
use crate::patch::Patch;

/// Maximum length of an X/Twitter handle, without the leading `@`.
pub const MAX_TWITTER_HANDLE_LENGTH: usize = 15;

static TWITTER_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// PreviewStyle
// ---------------------------------------------------------------------------

/// What the public changelog list shows for each entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewStyle {
    #[default]
    Summary,
    Content,
}

impl PreviewStyle {
    pub const ALL: [PreviewStyle; 2] = [Self::Summary, Self::Content];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for PreviewStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreviewStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown preview style '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Settings snapshot
// ---------------------------------------------------------------------------

/// The editable slice of a project configuration record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfigSettings {
    pub changelog_twitter_handle: Option<String>,
    #[serde(default)]
    pub changelog_preview_style: PreviewStyle,
    #[serde(default)]
    pub feedback_allow_anon_upvoting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    ChangelogTwitterHandle,
    ChangelogPreviewStyle,
    FeedbackAllowAnonUpvoting,
}

impl ConfigField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChangelogTwitterHandle => "changelog_twitter_handle",
            Self::ChangelogPreviewStyle => "changelog_preview_style",
            Self::FeedbackAllowAnonUpvoting => "feedback_allow_anon_upvoting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEdit {
    ChangelogTwitterHandle(Option<String>),
    ChangelogPreviewStyle(PreviewStyle),
    FeedbackAllowAnonUpvoting(bool),
}

impl ProjectConfigSettings {
    pub fn apply(&mut self, edit: ConfigEdit) {
        match edit {
            ConfigEdit::ChangelogTwitterHandle(v) => self.changelog_twitter_handle = v,
            ConfigEdit::ChangelogPreviewStyle(v) => self.changelog_preview_style = v,
            ConfigEdit::FeedbackAllowAnonUpvoting(v) => self.feedback_allow_anon_upvoting = v,
        }
    }

    pub fn dirty_fields(&self, baseline: &Self) -> Vec<ConfigField> {
        let mut fields = Vec::new();
        if !text_eq(
            &self.changelog_twitter_handle,
            &baseline.changelog_twitter_handle,
        ) {
            fields.push(ConfigField::ChangelogTwitterHandle);
        }
        if self.changelog_preview_style != baseline.changelog_preview_style {
            fields.push(ConfigField::ChangelogPreviewStyle);
        }
        if self.feedback_allow_anon_upvoting != baseline.feedback_allow_anon_upvoting {
            fields.push(ConfigField::FeedbackAllowAnonUpvoting);
        }
        fields
    }

    pub fn diff(&self, baseline: &Self) -> ProjectConfigPatch {
        ProjectConfigPatch {
            changelog_twitter_handle: text_patch(
                &self.changelog_twitter_handle,
                &baseline.changelog_twitter_handle,
            ),
            changelog_preview_style: value_patch(
                &self.changelog_preview_style,
                &baseline.changelog_preview_style,
            ),
            feedback_allow_anon_upvoting: value_patch(
                &self.feedback_allow_anon_upvoting,
                &baseline.feedback_allow_anon_upvoting,
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Body of `PATCH /projects/{slug}/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfigPatch {
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub changelog_twitter_handle: Patch<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog_preview_style: Option<PreviewStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_allow_anon_upvoting: Option<bool>,
}

impl ProjectConfigPatch {
    pub fn is_empty(&self) -> bool {
        self.changelog_twitter_handle.is_unchanged()
            && self.changelog_preview_style.is_none()
            && self.feedback_allow_anon_upvoting.is_none()
    }

    /// Validate the handle and store a blank one as NULL.
    pub fn normalized(self) -> Result<Self, CoreError> {
        let changelog_twitter_handle = match self.changelog_twitter_handle {
            Patch::Set(handle) => Patch::from_value(normalize_twitter_handle(&handle)?),
            other => other,
        };
        Ok(Self {
            changelog_twitter_handle,
            ..self
        })
    }
}

/// Strip a leading `@` and validate an X/Twitter handle.
///
/// A blank handle means "disable the link" and yields `Ok(None)`.
pub fn normalize_twitter_handle(handle: &str) -> Result<Option<String>, CoreError> {
    let trimmed = handle.trim();
    let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.len() > MAX_TWITTER_HANDLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Twitter handle exceeds maximum length of {MAX_TWITTER_HANDLE_LENGTH} characters"
        )));
    }
    if !TWITTER_HANDLE_RE.is_match(trimmed) {
        return Err(CoreError::Validation(
            "Twitter handle may only contain letters, digits, and underscores".to_string(),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn baseline() -> ProjectConfigSettings {
        ProjectConfigSettings {
            changelog_twitter_handle: Some("alice".into()),
            changelog_preview_style: PreviewStyle::Summary,
            feedback_allow_anon_upvoting: false,
        }
    }

    #[test]
    fn clearing_handle_sends_empty_string() {
        let b = baseline();
        let mut w = b.clone();
        w.apply(ConfigEdit::ChangelogTwitterHandle(Some(String::new())));

        assert_eq!(
            w.dirty_fields(&b),
            vec![ConfigField::ChangelogTwitterHandle]
        );
        let json = serde_json::to_value(w.diff(&b)).unwrap();
        assert_eq!(json, serde_json::json!({ "changelog_twitter_handle": "" }));
    }

    #[test]
    fn reverting_an_edit_clears_dirty_state() {
        let b = baseline();
        let mut w = b.clone();
        w.apply(ConfigEdit::FeedbackAllowAnonUpvoting(true));
        assert_eq!(w.dirty_fields(&b).len(), 1);

        w.apply(ConfigEdit::FeedbackAllowAnonUpvoting(false));
        assert!(w.dirty_fields(&b).is_empty());
        assert!(w.diff(&b).is_empty());
    }

    #[test]
    fn missing_flags_deserialize_to_defaults() {
        let s: ProjectConfigSettings =
            serde_json::from_str(r#"{"changelog_twitter_handle":null}"#).unwrap();
        assert_eq!(s.changelog_preview_style, PreviewStyle::Summary);
        assert!(!s.feedback_allow_anon_upvoting);
    }

    #[test]
    fn patch_deserializes_missing_and_null_distinctly() {
        let p: ProjectConfigPatch =
            serde_json::from_str(r#"{"changelog_preview_style":"content"}"#).unwrap();
        assert_eq!(p.changelog_twitter_handle, Patch::Unchanged);
        assert_eq!(p.changelog_preview_style, Some(PreviewStyle::Content));

        let p: ProjectConfigPatch =
            serde_json::from_str(r#"{"changelog_twitter_handle":null}"#).unwrap();
        assert_eq!(p.changelog_twitter_handle, Patch::Clear);
    }

    #[test]
    fn unknown_preview_style_is_rejected_by_serde() {
        let result: Result<ProjectConfigPatch, _> =
            serde_json::from_str(r#"{"changelog_preview_style":"full"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn handle_normalization() {
        assert_eq!(normalize_twitter_handle("@alice").unwrap().as_deref(), Some("alice"));
        assert_eq!(normalize_twitter_handle("  ").unwrap(), None);
        assert_eq!(normalize_twitter_handle("@").unwrap(), None);
        assert_matches!(
            normalize_twitter_handle("this_handle_is_too_long"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            normalize_twitter_handle("bad handle"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn normalized_patch_stores_blank_handle_as_clear() {
        let patch = ProjectConfigPatch {
            changelog_twitter_handle: Patch::Set(String::new()),
            ..Default::default()
        };
        assert_eq!(
            patch.normalized().unwrap().changelog_twitter_handle,
            Patch::Clear
        );
    }
}
