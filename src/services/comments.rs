use chrono::Utc;

use crate::domain::auth::ViewerContext;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::{CommentBody, CommentId, ProjectId};
use crate::repository::{CommentReader, CommentWriter, LikeWriter, ProjectReader};

use super::{ServiceError, ServiceResult};

/// Submit a comment or reply.
///
/// The parent, when given, must belong to the same project. A parent id
/// that no longer exists is accepted: the thread builder promotes such
/// comments to root level at render time, so a reply to a just-deleted
/// comment is not lost.
pub fn add_comment<R>(
    project_id: ProjectId,
    parent_id: Option<CommentId>,
    body: CommentBody,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<Comment>
where
    R: ProjectReader + CommentReader + CommentWriter,
{
    let author_id = viewer
        .user_id
        .clone()
        .ok_or(ServiceError::Unauthorized)?;

    let project = match repo.get_project_by_id(project_id) {
        Ok(Some(project)) => project,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get project: {e}");
            return Err(ServiceError::Internal);
        }
    };
    if !viewer.can_view(&project) {
        return Err(ServiceError::NotFound);
    }

    if let Some(parent_id) = parent_id {
        match repo.get_comment_by_id(parent_id) {
            Ok(Some(parent)) if parent.project_id != project_id => {
                return Err(ServiceError::Form(
                    "Комментарий относится к другому проекту".to_string(),
                ));
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to get parent comment: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    let now = Utc::now().naive_utc();
    let new_comment = NewComment {
        project_id,
        parent_id,
        author_id,
        body,
        created_at: now,
        updated_at: now,
    };

    repo.create_comment(&new_comment).map_err(|e| {
        log::error!("Failed to create comment: {e}");
        ServiceError::Internal
    })
}

/// Replace a comment's body. Author only; admins may delete but not edit
/// other people's words.
pub fn update_comment<R>(
    id: CommentId,
    body: CommentBody,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CommentReader + CommentWriter,
{
    let comment = get_existing(id, repo)?;
    if !viewer.is_author(&comment.author_id) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.update_comment(id, &body) {
        Ok(affected) => Ok(affected > 0),
        Err(e) => {
            log::error!("Failed to update comment: {e}");
            Ok(false)
        }
    }
}

/// Delete a comment. Author or admin.
pub fn delete_comment<R>(id: CommentId, viewer: &ViewerContext, repo: &R) -> ServiceResult<bool>
where
    R: CommentReader + CommentWriter,
{
    let comment = get_existing(id, repo)?;
    if !viewer.can_delete_comment(&comment.author_id) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.delete_comment(id) {
        Ok(affected) => Ok(affected > 0),
        Err(e) => {
            log::error!("Failed to delete comment: {e}");
            Ok(false)
        }
    }
}

/// Toggle the viewer's like on a comment, returning the resulting state.
pub fn toggle_comment_like<R>(
    id: CommentId,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CommentReader + LikeWriter,
{
    let user_id = viewer
        .user_id
        .clone()
        .ok_or(ServiceError::Unauthorized)?;
    get_existing(id, repo)?;

    repo.toggle_comment_like(id, &user_id).map_err(|e| {
        log::error!("Failed to toggle comment like: {e}");
        ServiceError::Internal
    })
}

fn get_existing<R: CommentReader>(id: CommentId, repo: &R) -> ServiceResult<Comment> {
    match repo.get_comment_by_id(id) {
        Ok(Some(comment)) => Ok(comment),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get comment: {e}");
            Err(ServiceError::Internal)
        }
    }
}
