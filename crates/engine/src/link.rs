use serde::{Deserialize, Serialize};

use crate::icons::Icon;

/// A bookmark entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
}

impl Link {
    /// Icon to render; unknown or missing names fall back to [`Icon::DEFAULT`].
    pub fn icon(&self) -> Icon {
        Icon::resolve(self.icon_type.as_deref())
    }
}

/// User-entered fields for creating or editing a link.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkDraft {
    pub name: String,
    pub url: String,
    pub alias: Option<String>,
    pub category_id: String,
    pub favicon: Option<String>,
    pub icon_type: Option<String>,
}

impl LinkDraft {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            category_id: category_id.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn icon_type(mut self, icon_type: impl Into<String>) -> Self {
        self.icon_type = Some(icon_type.into());
        self
    }
}

/// Sparse update of a category: only `Some`, non-empty fields are applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

/// Sparse update of a link: only `Some`, non-empty fields are applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub alias: Option<String>,
    pub category_id: Option<String>,
    pub favicon: Option<String>,
    pub icon_type: Option<String>,
}

pub(crate) fn apply_sparse(target: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        *target = value;
    }
}

pub(crate) fn apply_sparse_opt(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        *target = Some(value);
    }
}
