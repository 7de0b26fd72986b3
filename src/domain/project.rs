use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Category, ProjectId, ProjectTitle, Subcategory, Tag, UserId};

/// A student project shown in the gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub title: ProjectTitle,
    /// Rich-text (HTML) description. May be empty.
    pub description: String,
    pub category: Option<Category>,
    pub subcategory: Option<Subcategory>,
    pub tags: Vec<Tag>,
    /// Hidden projects are shown only to their owner and admins.
    pub is_hidden: bool,
    /// Promoted projects sort before all others in listings.
    pub is_best: bool,
    pub views: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to create a new [`Project`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProject {
    pub owner_id: UserId,
    pub title: ProjectTitle,
    pub description: String,
    pub category: Option<Category>,
    pub subcategory: Option<Subcategory>,
    pub tags: Vec<Tag>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields editable through the project form. Flags and ownership are
/// toggled through dedicated operations, never through the edit form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateProject {
    pub title: ProjectTitle,
    pub description: String,
    pub category: Option<Category>,
    pub subcategory: Option<Subcategory>,
    pub tags: Vec<Tag>,
}
