use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{
    Category, ProjectTitle, Subcategory, Tag, TypeConstraintError,
};

/// Domain-typed project fields extracted from a validated form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPayload {
    pub title: ProjectTitle,
    pub description: String,
    pub category: Option<Category>,
    pub subcategory: Option<Subcategory>,
    pub tags: Vec<Tag>,
}

/// Create/edit project form as submitted by the browser.
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Empty string means "no category".
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    /// Comma-separated tag list.
    #[serde(default)]
    pub tags: String,
}

impl TryFrom<ProjectForm> for ProjectPayload {
    type Error = TypeConstraintError;

    fn try_from(form: ProjectForm) -> Result<Self, Self::Error> {
        let category = match form.category.trim() {
            "" => None,
            value => Some(value.parse::<Category>()?),
        };
        let subcategory = match form.subcategory.trim() {
            "" => None,
            value => Some(Subcategory::new(value)?),
        };
        let tags = form
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Tag::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            title: ProjectTitle::new(form.title)?,
            description: form.description,
            category,
            subcategory,
            tags,
        })
    }
}
