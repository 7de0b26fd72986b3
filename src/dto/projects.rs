use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::listing::ProjectCard;

/// JSON representation of a listing card for the public API.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub author_name: Option<String>,
    pub comment_count: usize,
    pub like_count: usize,
    pub views: i32,
    pub is_best: bool,
    pub created_at: NaiveDateTime,
}

impl From<ProjectCard> for ProjectDto {
    fn from(card: ProjectCard) -> Self {
        let project = card.project;
        Self {
            id: project.id.get(),
            title: project.title.into_inner(),
            description: project.description,
            category: project.category.map(|c| c.to_string()),
            subcategory: project.subcategory.map(|s| s.into_inner()),
            tags: project.tags.into_iter().map(|t| t.into_inner()).collect(),
            author_name: card.author_name,
            comment_count: card.comment_count,
            like_count: card.like_count,
            views: project.views,
            is_best: project.is_best,
            created_at: project.created_at,
        }
    }
}
