use std::collections::HashMap;

use crate::db::{DbConnection, DbPool};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::course::CourseProject;
use crate::domain::like::LikeMeta;
use crate::domain::listing::CategoryFilter;
use crate::domain::profile::{NewProfile, Profile};
use crate::domain::project::{NewProject, Project, UpdateProject};
use crate::domain::types::{CommentBody, CommentId, CourseSlug, ProjectId, UserId};

pub mod comment;
pub mod course;
pub mod errors;
pub mod like;
pub mod profile;
pub mod project;
#[cfg(test)]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};

/// Maximum number of projects pulled per coarse query. The listing pipeline
/// filters and paginates in memory over this bounded set.
pub const PROJECT_FETCH_CEILING: usize = 1000;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used for the coarse project fetch. The fine-grained
/// filtering happens afterwards in [`crate::domain::listing`].
#[derive(Debug, Clone)]
pub struct ProjectListQuery {
    /// Coarse category scope (`All`, `Best` or a concrete category).
    pub scope: CategoryFilter,
    /// Restrict to projects owned by a specific user.
    pub owner: Option<UserId>,
    /// Fetch ceiling; defaults to [`PROJECT_FETCH_CEILING`].
    pub ceiling: usize,
}

impl Default for ProjectListQuery {
    fn default() -> Self {
        Self {
            scope: CategoryFilter::All,
            owner: None,
            ceiling: PROJECT_FETCH_CEILING,
        }
    }
}

impl ProjectListQuery {
    pub fn scope(mut self, scope: CategoryFilter) -> Self {
        self.scope = scope;
        self
    }
    pub fn owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }
    pub fn ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling;
        self
    }
}

/// Read-only operations for project entities.
pub trait ProjectReader {
    /// List projects matching the coarse query, newest first, capped at the
    /// query ceiling.
    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<Vec<Project>>;
    /// Retrieve a project by its identifier.
    fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<Project>>;
    /// Retrieve several projects at once; missing ids are skipped.
    fn get_projects_by_ids(&self, ids: &[ProjectId]) -> RepositoryResult<Vec<Project>>;
}

/// Write operations for project entities.
pub trait ProjectWriter {
    /// Persist a new project, returning the stored entity.
    fn create_project(&self, project: &NewProject) -> RepositoryResult<Project>;
    /// Update the form-editable fields of a project.
    fn update_project(&self, id: ProjectId, update: &UpdateProject) -> RepositoryResult<usize>;
    /// Delete a project; comments, likes and course links cascade.
    fn delete_project(&self, id: ProjectId) -> RepositoryResult<usize>;
    /// Set the hidden flag.
    fn set_project_hidden(&self, id: ProjectId, hidden: bool) -> RepositoryResult<usize>;
    /// Set the promotion flag.
    fn set_project_best(&self, id: ProjectId, best: bool) -> RepositoryResult<usize>;
    /// Atomically bump the view counter.
    fn increment_project_views(&self, id: ProjectId) -> RepositoryResult<usize>;
}

/// Read-only operations for comment entities.
pub trait CommentReader {
    /// All comments of a project in insertion order.
    fn list_comments(&self, project_id: ProjectId) -> RepositoryResult<Vec<Comment>>;
    /// Retrieve a comment by its identifier.
    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>>;
    /// Recompute per-project comment counts from the comments table.
    fn count_comments(
        &self,
        project_ids: &[ProjectId],
    ) -> RepositoryResult<HashMap<ProjectId, usize>>;
}

/// Write operations for comment entities.
pub trait CommentWriter {
    /// Persist a new comment, returning the stored entity.
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment>;
    /// Replace the body of a comment.
    fn update_comment(&self, id: CommentId, body: &CommentBody) -> RepositoryResult<usize>;
    /// Delete a comment; its likes cascade.
    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize>;
}

/// Read-only operations over the like tables. Counts are always derived
/// from the authoritative rows, never cached.
pub trait LikeReader {
    /// Recompute per-project like counts.
    fn count_project_likes(
        &self,
        project_ids: &[ProjectId],
    ) -> RepositoryResult<HashMap<ProjectId, usize>>;
    /// Whether the given user has liked the project.
    fn project_liked_by(&self, project_id: ProjectId, user_id: &UserId) -> RepositoryResult<bool>;
    /// Per-comment like counts plus the viewer's own like state.
    fn comment_like_meta(
        &self,
        comment_ids: &[CommentId],
        viewer: Option<&UserId>,
    ) -> RepositoryResult<HashMap<CommentId, LikeMeta>>;
}

/// Write operations over the like tables.
pub trait LikeWriter {
    /// Toggle a project like; returns the resulting liked state.
    fn toggle_project_like(
        &self,
        project_id: ProjectId,
        user_id: &UserId,
    ) -> RepositoryResult<bool>;
    /// Toggle a comment like; returns the resulting liked state.
    fn toggle_comment_like(
        &self,
        comment_id: CommentId,
        user_id: &UserId,
    ) -> RepositoryResult<bool>;
}

/// Read-only operations for profile entities.
pub trait ProfileReader {
    /// Retrieve a profile by user id.
    fn get_profile(&self, user_id: &UserId) -> RepositoryResult<Option<Profile>>;
    /// Retrieve profiles for a set of users; missing profiles are skipped.
    fn list_profiles(&self, user_ids: &[UserId]) -> RepositoryResult<HashMap<UserId, Profile>>;
}

/// Write operations for profile entities.
pub trait ProfileWriter {
    /// Insert or refresh a profile row.
    fn upsert_profile(&self, profile: &NewProfile) -> RepositoryResult<usize>;
}

/// Read-only operations for course/project associations.
pub trait CourseReader {
    /// Links of a course ordered by their persisted position.
    fn list_course_projects(&self, course: &CourseSlug) -> RepositoryResult<Vec<CourseProject>>;
}

/// Write operations for course/project associations.
pub trait CourseWriter {
    /// Associate a project with a course at the given position.
    fn attach_project(
        &self,
        course: &CourseSlug,
        project_id: ProjectId,
        position: i32,
    ) -> RepositoryResult<usize>;
    /// Remove an association.
    fn detach_project(&self, course: &CourseSlug, project_id: ProjectId)
    -> RepositoryResult<usize>;
    /// Persist fresh ordinals for every link of a course in one transaction.
    fn set_positions(
        &self,
        course: &CourseSlug,
        positions: &[(ProjectId, i32)],
    ) -> RepositoryResult<usize>;
}
