use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CommentBody, CommentId, ProjectId, UserId};

/// A comment on a project. `parent_id` forms a tree over the flat comment
/// set; the stored tree is unbounded while rendering flattens it to one
/// reply level (see [`crate::domain::threading`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub project_id: ProjectId,
    pub parent_id: Option<CommentId>,
    pub author_id: UserId,
    pub body: CommentBody,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to create a new [`Comment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub project_id: ProjectId,
    pub parent_id: Option<CommentId>,
    pub author_id: UserId,
    pub body: CommentBody,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
