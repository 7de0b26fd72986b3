use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

use crate::domain::auth::ViewerContext;
use crate::domain::listing::{self, ListingFilters, ListingPage, ProjectCard};
use crate::domain::project::{NewProject, Project, UpdateProject};
use crate::domain::threading::{self, CommentSort, CommentThread};
use crate::domain::types::{CommentId, ProjectId, UserId};
use crate::forms::projects::{ProjectForm, ProjectPayload};
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{
    CommentReader, LikeReader, LikeWriter, ProfileReader, ProjectListQuery, ProjectReader,
    ProjectWriter,
};

use super::{ServiceError, ServiceResult};

/// Core business logic for the portfolio listing page.
///
/// Fetches the coarse candidate set (bounded by the repository fetch
/// ceiling), enriches it into cards and runs the pure listing pipeline. The
/// count queries are issued only after the id list of the primary batch is
/// known. A repository failure surfaces as `Internal`, never as an empty
/// page.
pub fn show_projects<R>(
    filters: &ListingFilters,
    viewer: &ViewerContext,
    page: usize,
    repo: &R,
) -> ServiceResult<ListingPage>
where
    R: ProjectReader + CommentReader + LikeReader + ProfileReader,
{
    let projects = repo
        .list_projects(ProjectListQuery::default().scope(filters.category))
        .map_err(|e| {
            log::error!("Failed to list projects: {e}");
            ServiceError::Internal
        })?;

    let cards = build_cards(projects, repo)?;

    Ok(listing::paginate_projects(
        cards,
        filters,
        viewer,
        page,
        DEFAULT_ITEMS_PER_PAGE,
    ))
}

/// Enrich raw projects into display cards: author profile data plus
/// comment/like counts recomputed from the authoritative tables. Preserves
/// input order.
pub(crate) fn build_cards<R>(projects: Vec<Project>, repo: &R) -> ServiceResult<Vec<ProjectCard>>
where
    R: CommentReader + LikeReader + ProfileReader,
{
    let ids: Vec<ProjectId> = projects.iter().map(|p| p.id).collect();

    let comment_counts = repo.count_comments(&ids).map_err(|e| {
        log::error!("Failed to count comments: {e}");
        ServiceError::Internal
    })?;
    let like_counts = repo.count_project_likes(&ids).map_err(|e| {
        log::error!("Failed to count likes: {e}");
        ServiceError::Internal
    })?;

    let mut owner_ids: Vec<UserId> = projects.iter().map(|p| p.owner_id.clone()).collect();
    owner_ids.sort();
    owner_ids.dedup();
    let profiles = repo.list_profiles(&owner_ids).map_err(|e| {
        log::error!("Failed to list profiles: {e}");
        ServiceError::Internal
    })?;

    Ok(projects
        .into_iter()
        .map(|project| {
            let id = project.id;
            let author = profiles.get(&project.owner_id);
            let mut card = ProjectCard::new(project, author);
            card.comment_count = comment_counts.get(&id).copied().unwrap_or(0);
            card.like_count = like_counts.get(&id).copied().unwrap_or(0);
            card
        })
        .collect())
}

/// Fully assembled project detail page data.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub card: ProjectCard,
    pub viewer_liked: bool,
    /// Threads inside the visible-root window, in render order.
    pub threads: Vec<CommentThread>,
    /// Display names of comment authors keyed by user id; authors without
    /// a profile are simply absent.
    pub author_names: HashMap<String, String>,
    pub total_roots: usize,
    pub has_more: bool,
    /// `visible` value for the "show more" link.
    pub next_visible: usize,
}

/// Core business logic for the project detail page.
///
/// Hidden projects are reported as `NotFound` to viewers without access.
/// The view counter is bumped atomically and the project is re-read
/// afterwards, so the page always renders authoritative state.
pub fn show_project<R>(
    id: ProjectId,
    sort: CommentSort,
    visible: usize,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<ProjectView>
where
    R: ProjectReader + ProjectWriter + CommentReader + LikeReader + ProfileReader,
{
    let project = get_existing(id, repo)?;
    if !viewer.can_view(&project) {
        return Err(ServiceError::NotFound);
    }

    repo.increment_project_views(id).map_err(|e| {
        log::error!("Failed to increment views: {e}");
        ServiceError::Internal
    })?;
    let project = get_existing(id, repo)?;

    let comments = repo.list_comments(id).map_err(|e| {
        log::error!("Failed to list comments: {e}");
        ServiceError::Internal
    })?;
    let comment_ids: Vec<CommentId> = comments.iter().map(|c| c.id).collect();
    let like_meta = repo
        .comment_like_meta(&comment_ids, viewer.user_id.as_ref())
        .map_err(|e| {
            log::error!("Failed to load comment likes: {e}");
            ServiceError::Internal
        })?;

    let threads = threading::build_threads(comments, &like_meta, sort);
    let (shown, has_more) = threading::visible_window(&threads, visible);
    let shown = shown.to_vec();

    let mut author_ids: Vec<UserId> = shown
        .iter()
        .flat_map(|t| {
            std::iter::once(t.root.comment.author_id.clone())
                .chain(t.replies.iter().map(|r| r.comment.author_id.clone()))
        })
        .collect();
    author_ids.sort();
    author_ids.dedup();
    let author_names: HashMap<String, String> = repo
        .list_profiles(&author_ids)
        .map_err(|e| {
            log::error!("Failed to list comment author profiles: {e}");
            ServiceError::Internal
        })?
        .into_iter()
        .map(|(user_id, profile)| (user_id.into_inner(), profile.display_name.into_inner()))
        .collect();

    let viewer_liked = match &viewer.user_id {
        Some(user_id) => repo.project_liked_by(id, user_id).map_err(|e| {
            log::error!("Failed to check project like: {e}");
            ServiceError::Internal
        })?,
        None => false,
    };

    let card = build_cards(vec![project], repo)?
        .pop()
        .ok_or(ServiceError::Internal)?;

    Ok(ProjectView {
        card,
        viewer_liked,
        author_names,
        total_roots: threads.len(),
        has_more,
        next_visible: shown.len() + threading::VISIBLE_ROOTS_STEP,
        threads: shown,
    })
}

/// Create a project owned by the current viewer. Domain conversion of the
/// submitted form happens here, after the authentication check and before
/// any write.
pub fn create_project<R>(
    form: ProjectForm,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<Project>
where
    R: ProjectWriter,
{
    let owner_id = viewer
        .user_id
        .clone()
        .ok_or(ServiceError::Unauthorized)?;
    let payload = ProjectPayload::try_from(form)?;

    let now = Utc::now().naive_utc();
    let new_project = NewProject {
        owner_id,
        title: payload.title,
        description: payload.description,
        category: payload.category,
        subcategory: payload.subcategory,
        tags: payload.tags,
        created_at: now,
        updated_at: now,
    };

    repo.create_project(&new_project).map_err(|e| {
        log::error!("Failed to create project: {e}");
        ServiceError::Internal
    })
}

/// Update a project's form-editable fields. Owner or admin only.
pub fn update_project<R>(
    id: ProjectId,
    form: ProjectForm,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ProjectReader + ProjectWriter,
{
    let project = get_existing(id, repo)?;
    if !viewer.can_edit(&project) {
        return Err(ServiceError::Unauthorized);
    }
    let payload = ProjectPayload::try_from(form)?;

    let update = UpdateProject {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        subcategory: payload.subcategory,
        tags: payload.tags,
    };

    match repo.update_project(id, &update) {
        Ok(affected) => Ok(affected > 0),
        Err(e) => {
            log::error!("Failed to update project: {e}");
            Ok(false)
        }
    }
}

/// Hard-delete a project. Owner or admin only; comments, likes and course
/// links cascade at the persistence layer.
pub fn delete_project<R>(id: ProjectId, viewer: &ViewerContext, repo: &R) -> ServiceResult<bool>
where
    R: ProjectReader + ProjectWriter,
{
    let project = get_existing(id, repo)?;
    if !viewer.can_edit(&project) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.delete_project(id) {
        Ok(affected) => Ok(affected > 0),
        Err(e) => {
            log::error!("Failed to delete project: {e}");
            Ok(false)
        }
    }
}

/// Toggle the hidden flag, returning the new state. Owner or admin only.
pub fn toggle_hidden<R>(id: ProjectId, viewer: &ViewerContext, repo: &R) -> ServiceResult<bool>
where
    R: ProjectReader + ProjectWriter,
{
    let project = get_existing(id, repo)?;
    if !viewer.can_edit(&project) {
        return Err(ServiceError::Unauthorized);
    }

    let hidden = !project.is_hidden;
    repo.set_project_hidden(id, hidden).map_err(|e| {
        log::error!("Failed to toggle hidden flag: {e}");
        ServiceError::Internal
    })?;
    Ok(hidden)
}

/// Toggle the promotion flag, returning the new state. Admin only.
/// Promotion does not touch the category: the flags are independent.
pub fn toggle_best<R>(id: ProjectId, viewer: &ViewerContext, repo: &R) -> ServiceResult<bool>
where
    R: ProjectReader + ProjectWriter,
{
    if !viewer.is_admin {
        return Err(ServiceError::Unauthorized);
    }
    let project = get_existing(id, repo)?;

    let best = !project.is_best;
    repo.set_project_best(id, best).map_err(|e| {
        log::error!("Failed to toggle promotion flag: {e}");
        ServiceError::Internal
    })?;
    Ok(best)
}

/// Toggle the viewer's like on a project, returning the resulting state.
pub fn toggle_project_like<R>(
    id: ProjectId,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ProjectReader + LikeWriter,
{
    let user_id = viewer
        .user_id
        .clone()
        .ok_or(ServiceError::Unauthorized)?;
    let project = get_existing(id, repo)?;
    if !viewer.can_view(&project) {
        return Err(ServiceError::NotFound);
    }

    repo.toggle_project_like(id, &user_id).map_err(|e| {
        log::error!("Failed to toggle project like: {e}");
        ServiceError::Internal
    })
}

fn get_existing<R: ProjectReader>(id: ProjectId, repo: &R) -> ServiceResult<Project> {
    match repo.get_project_by_id(id) {
        Ok(Some(project)) => Ok(project),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get project: {e}");
            Err(ServiceError::Internal)
        }
    }
}
