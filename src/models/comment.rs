use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comment::{Comment as DomainComment, NewComment as DomainNewComment};
use crate::domain::types::{CommentBody, CommentId, ProjectId, TypeConstraintError, UserId};

/// Diesel model representing a row in the `comments` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::comments)]
pub struct Comment {
    pub id: i32,
    pub project_id: i32,
    pub parent_id: Option<i32>,
    pub author_id: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Comment`] used for creating new rows.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment<'a> {
    pub project_id: i32,
    pub parent_id: Option<i32>,
    pub author_id: &'a str,
    pub body: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Comment> for DomainComment {
    type Error = TypeConstraintError;

    fn try_from(comment: Comment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommentId::new(comment.id)?,
            project_id: ProjectId::new(comment.project_id)?,
            parent_id: comment.parent_id.map(CommentId::new).transpose()?,
            author_id: UserId::new(comment.author_id)?,
            body: CommentBody::new(comment.body)?,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewComment> for NewComment<'a> {
    fn from(comment: &'a DomainNewComment) -> Self {
        Self {
            project_id: comment.project_id.get(),
            parent_id: comment.parent_id.map(CommentId::get),
            author_id: comment.author_id.as_str(),
            body: comment.body.as_str(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
