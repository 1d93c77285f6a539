//! Project branding settings: logo, logo radius, and OG image.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diff::{text_eq, text_patch, value_patch};
use crate::error::CoreError;
use crate::patch::Patch;
use crate::upload::validate_image_reference;

// ---------------------------------------------------------------------------
// IconRadius
// ---------------------------------------------------------------------------

/// Corner style applied to the project logo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconRadius {
    /// Rounded corners.
    #[default]
    #[serde(rename = "rounded-md")]
    Rounded,
    /// Square corners.
    #[serde(rename = "rounded-none")]
    Square,
    /// Full circle.
    #[serde(rename = "rounded-full")]
    Circle,
}

impl IconRadius {
    pub const ALL: [IconRadius; 3] = [Self::Rounded, Self::Square, Self::Circle];

    /// Style token as stored in the `projects.icon_radius` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rounded => "rounded-md",
            Self::Square => "rounded-none",
            Self::Circle => "rounded-full",
        }
    }
}

impl fmt::Display for IconRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconRadius {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown icon radius '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Settings snapshot
// ---------------------------------------------------------------------------

/// The editable slice of a project record.
///
/// Deserializes from the full project record returned by the API; the
/// remaining columns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub icon: Option<String>,
    #[serde(default)]
    pub icon_radius: IconRadius,
    pub og_image: Option<String>,
}

/// Editable project fields, used to report which ones are dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectField {
    Icon,
    IconRadius,
    OgImage,
}

impl ProjectField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Icon => "icon",
            Self::IconRadius => "icon_radius",
            Self::OgImage => "og_image",
        }
    }
}

/// A single local edit to a project field, typed per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectEdit {
    Icon(Option<String>),
    IconRadius(IconRadius),
    OgImage(Option<String>),
}

impl ProjectEdit {
    pub fn field(&self) -> ProjectField {
        match self {
            Self::Icon(_) => ProjectField::Icon,
            Self::IconRadius(_) => ProjectField::IconRadius,
            Self::OgImage(_) => ProjectField::OgImage,
        }
    }
}

impl ProjectSettings {
    /// Overwrite the one field named by `edit`.
    pub fn apply(&mut self, edit: ProjectEdit) {
        match edit {
            ProjectEdit::Icon(v) => self.icon = v,
            ProjectEdit::IconRadius(v) => self.icon_radius = v,
            ProjectEdit::OgImage(v) => self.og_image = v,
        }
    }

    /// Fields whose value differs from `baseline`, in declaration order.
    pub fn dirty_fields(&self, baseline: &Self) -> Vec<ProjectField> {
        let mut fields = Vec::new();
        if !text_eq(&self.icon, &baseline.icon) {
            fields.push(ProjectField::Icon);
        }
        if self.icon_radius != baseline.icon_radius {
            fields.push(ProjectField::IconRadius);
        }
        if !text_eq(&self.og_image, &baseline.og_image) {
            fields.push(ProjectField::OgImage);
        }
        fields
    }

    /// Partial update carrying only the fields that differ from `baseline`.
    pub fn diff(&self, baseline: &Self) -> ProjectPatch {
        ProjectPatch {
            icon: text_patch(&self.icon, &baseline.icon),
            icon_radius: value_patch(&self.icon_radius, &baseline.icon_radius),
            og_image: text_patch(&self.og_image, &baseline.og_image),
        }
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Body of `PATCH /projects/{slug}`.
///
/// `icon_radius` has no NULL state; an omitted key or `null` both leave it
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub icon: Patch<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_radius: Option<IconRadius>,
    #[serde(default, skip_serializing_if = "Patch::is_unchanged")]
    pub og_image: Patch<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.icon.is_unchanged() && self.icon_radius.is_none() && self.og_image.is_unchanged()
    }

    /// Validate image references and fold empty strings into `Clear`.
    pub fn normalized(self) -> Result<Self, CoreError> {
        Ok(Self {
            icon: normalize_image_patch("icon", self.icon)?,
            icon_radius: self.icon_radius,
            og_image: normalize_image_patch("og_image", self.og_image)?,
        })
    }
}

fn normalize_image_patch(field: &str, patch: Patch<String>) -> Result<Patch<String>, CoreError> {
    match patch {
        Patch::Set(v) if v.trim().is_empty() => Ok(Patch::Clear),
        Patch::Set(v) => {
            validate_image_reference(&v)
                .map_err(|e| CoreError::Validation(format!("{field}: {e}")))?;
            Ok(Patch::Set(v))
        }
        other => Ok(other),
    }
}
