use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{CommentBody, CommentId, TypeConstraintError};

/// Comment/reply form. A missing or zero `parent_id` submits a root
/// comment.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentForm {
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
    pub parent_id: Option<i32>,
}

impl AddCommentForm {
    pub fn body(&self) -> Result<CommentBody, TypeConstraintError> {
        CommentBody::new(self.body.as_str())
    }

    pub fn parent(&self) -> Result<Option<CommentId>, TypeConstraintError> {
        match self.parent_id {
            None | Some(0) => Ok(None),
            Some(id) => Ok(Some(CommentId::new(id)?)),
        }
    }
}

/// Content edit form, author-only. Carries the project id so the handler
/// can redirect back to the detail page.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentForm {
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
    pub project_id: i32,
}

impl UpdateCommentForm {
    pub fn body(&self) -> Result<CommentBody, TypeConstraintError> {
        CommentBody::new(self.body.as_str())
    }
}

/// Deletion form; `project_id` is only used for the redirect target.
#[derive(Debug, Deserialize)]
pub struct DeleteCommentForm {
    pub project_id: i32,
}

/// Like-toggle form; `project_id` is only used for the redirect target.
#[derive(Debug, Deserialize)]
pub struct LikeCommentForm {
    pub project_id: i32,
}
