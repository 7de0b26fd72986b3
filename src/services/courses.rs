use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::auth::ViewerContext;
use crate::domain::course::{CourseProject, move_item};
use crate::domain::listing::ProjectCard;
use crate::domain::types::{CourseSlug, ProjectId};
use crate::repository::{
    CommentReader, CourseReader, CourseWriter, LikeReader, ProfileReader, ProjectReader,
};
use crate::services::projects::build_cards;

use super::{ServiceError, ServiceResult};

/// Serializes curriculum reorder requests. A second reorder arriving while
/// one is in flight is ignored, not queued.
#[derive(Debug, Default)]
pub struct ReorderGuard(AtomicBool);

impl ReorderGuard {
    pub fn try_acquire(&self) -> Option<ReorderPermit<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ReorderPermit(&self.0))
    }
}

/// Releases the guard on drop, including on error paths.
pub struct ReorderPermit<'a>(&'a AtomicBool);

impl Drop for ReorderPermit<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Project cards associated with a course page, in persisted order.
/// Hidden projects are dropped for viewers without access; ordering of the
/// remaining cards is untouched.
pub fn show_course<R>(
    course: &CourseSlug,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<Vec<ProjectCard>>
where
    R: CourseReader + ProjectReader + CommentReader + LikeReader + ProfileReader,
{
    let links = list_links(course, repo)?;
    let ids: Vec<ProjectId> = links.iter().map(|l| l.project_id).collect();

    let mut projects = repo.get_projects_by_ids(&ids).map_err(|e| {
        log::error!("Failed to load course projects: {e}");
        ServiceError::Internal
    })?;
    // The batch fetch does not preserve link order; restore it.
    projects.sort_by_key(|p| ids.iter().position(|id| *id == p.id).unwrap_or(usize::MAX));
    projects.retain(|p| viewer.can_view(p));

    build_cards(projects, repo)
}

/// Associate a project with a course, appending at the end of the
/// ordering. Admin only.
pub fn attach_project<R>(
    course: &CourseSlug,
    project_id: ProjectId,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CourseReader + CourseWriter + ProjectReader,
{
    if !viewer.is_admin {
        return Err(ServiceError::Unauthorized);
    }

    match repo.get_project_by_id(project_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get project: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let links = list_links(course, repo)?;
    match repo.attach_project(course, project_id, links.len() as i32) {
        Ok(affected) => Ok(affected > 0),
        Err(e) => {
            log::error!("Failed to attach project: {e}");
            Ok(false)
        }
    }
}

/// Remove a project association and renumber the remaining links so that
/// ordinals stay contiguous. Admin only.
pub fn detach_project<R>(
    course: &CourseSlug,
    project_id: ProjectId,
    viewer: &ViewerContext,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CourseReader + CourseWriter,
{
    if !viewer.is_admin {
        return Err(ServiceError::Unauthorized);
    }

    let affected = repo.detach_project(course, project_id).map_err(|e| {
        log::error!("Failed to detach project: {e}");
        ServiceError::Internal
    })?;
    if affected == 0 {
        return Err(ServiceError::NotFound);
    }

    let links = list_links(course, repo)?;
    persist_positions(course, &links, repo)?;
    Ok(true)
}

/// Move the link at `from` to `to` and persist fresh 0-based ordinals for
/// every link of the course. Admin only. Returns `Ok(false)` without doing
/// anything when another reorder is already in flight.
pub fn reorder_projects<R>(
    course: &CourseSlug,
    from: usize,
    to: usize,
    viewer: &ViewerContext,
    guard: &ReorderGuard,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CourseReader + CourseWriter,
{
    if !viewer.is_admin {
        return Err(ServiceError::Unauthorized);
    }

    let Some(_permit) = guard.try_acquire() else {
        return Ok(false);
    };

    let mut links = list_links(course, repo)?;
    if !move_item(&mut links, from, to) {
        return Err(ServiceError::Form(
            "Недопустимая позиция для перемещения".to_string(),
        ));
    }

    persist_positions(course, &links, repo)?;
    Ok(true)
}

fn list_links<R: CourseReader>(
    course: &CourseSlug,
    repo: &R,
) -> ServiceResult<Vec<CourseProject>> {
    repo.list_course_projects(course).map_err(|e| {
        log::error!("Failed to list course projects: {e}");
        ServiceError::Internal
    })
}

fn persist_positions<R: CourseWriter>(
    course: &CourseSlug,
    links: &[CourseProject],
    repo: &R,
) -> ServiceResult<()> {
    let positions: Vec<(ProjectId, i32)> = links
        .iter()
        .enumerate()
        .map(|(position, link)| (link.project_id, position as i32))
        .collect();

    repo.set_positions(course, &positions).map_err(|e| {
        log::error!("Failed to persist course ordering: {e}");
        ServiceError::Internal
    })?;
    Ok(())
}
