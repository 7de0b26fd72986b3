use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::project::{NewProject as DomainNewProject, Project as DomainProject};
use crate::domain::types::{
    Category, ProjectId, ProjectTitle, Subcategory, Tag, TypeConstraintError, UserId,
};

/// Diesel model representing a row in the `projects` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::projects)]
pub struct Project {
    pub id: i32,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// JSON-encoded array of tag strings.
    pub tags: String,
    pub is_hidden: bool,
    pub is_best: bool,
    pub views: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Project`] used for creating new rows.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProject<'a> {
    pub owner_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub category: Option<&'a str>,
    pub subcategory: Option<&'a str>,
    pub tags: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub(crate) fn encode_tags(tags: &[Tag]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

fn decode_tags(raw: &str) -> Result<Vec<Tag>, TypeConstraintError> {
    let values: Vec<String> = serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("tags column: {e}")))?;
    values.into_iter().map(Tag::new).collect()
}

impl TryFrom<Project> for DomainProject {
    type Error = TypeConstraintError;

    fn try_from(project: Project) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProjectId::new(project.id)?,
            owner_id: UserId::new(project.owner_id)?,
            title: ProjectTitle::new(project.title)?,
            description: project.description,
            category: project.category.as_deref().map(str::parse).transpose()?,
            subcategory: project.subcategory.map(Subcategory::new).transpose()?,
            tags: decode_tags(&project.tags)?,
            is_hidden: project.is_hidden,
            is_best: project.is_best,
            views: project.views,
            created_at: project.created_at,
            updated_at: project.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewProject> for NewProject<'a> {
    fn from(project: &'a DomainNewProject) -> Self {
        Self {
            owner_id: project.owner_id.as_str(),
            title: project.title.as_str(),
            description: &project.description,
            category: project.category.map(Category::as_str),
            subcategory: project.subcategory.as_ref().map(Subcategory::as_str),
            tags: encode_tags(&project.tags),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}
