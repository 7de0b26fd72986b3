use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::course::CourseProject;
use crate::domain::like::LikeMeta;
use crate::domain::listing::CategoryFilter;
use crate::domain::profile::{NewProfile, Profile};
use crate::domain::project::{NewProject, Project, UpdateProject};
use crate::domain::types::{CommentBody, CommentId, CourseSlug, ProjectId, UserId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CommentReader, CommentWriter, CourseReader, CourseWriter, LikeReader, LikeWriter,
    ProfileReader, ProfileWriter, ProjectListQuery, ProjectReader, ProjectWriter,
};

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    comments: Vec<Comment>,
    profiles: Vec<Profile>,
    project_likes: Vec<(ProjectId, UserId)>,
    comment_likes: Vec<(CommentId, UserId)>,
    course_projects: Vec<CourseProject>,
}

impl TestRepository {
    pub fn new(projects: Vec<Project>, comments: Vec<Comment>) -> Self {
        let repo = Self::default();
        {
            let mut state = repo.state.lock().unwrap();
            state.projects = projects;
            state.comments = comments;
        }
        repo
    }

    pub fn with_profiles(self, profiles: Vec<Profile>) -> Self {
        self.state.lock().unwrap().profiles = profiles;
        self
    }

    pub fn with_comment_likes(self, likes: Vec<(CommentId, UserId)>) -> Self {
        self.state.lock().unwrap().comment_likes = likes;
        self
    }

    pub fn with_project_likes(self, likes: Vec<(ProjectId, UserId)>) -> Self {
        self.state.lock().unwrap().project_likes = likes;
        self
    }

    pub fn with_course_links(self, links: Vec<CourseProject>) -> Self {
        self.state.lock().unwrap().course_projects = links;
        self
    }

    fn next_project_id(state: &State) -> i32 {
        state.projects.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1
    }

    fn next_comment_id(state: &State) -> i32 {
        state.comments.iter().map(|c| c.id.get()).max().unwrap_or(0) + 1
    }
}

impl ProjectReader for TestRepository {
    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<Vec<Project>> {
        let state = self.state.lock().unwrap();
        let mut items: Vec<Project> = state.projects.clone();
        match query.scope {
            CategoryFilter::All => {}
            CategoryFilter::Best => items.retain(|p| p.is_best),
            CategoryFilter::Only(category) => {
                items.retain(|p| p.category == Some(category));
            }
        }
        if let Some(owner) = &query.owner {
            items.retain(|p| &p.owner_id == owner);
        }
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(query.ceiling);
        Ok(items)
    }

    fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<Project>> {
        let state = self.state.lock().unwrap();
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    fn get_projects_by_ids(&self, ids: &[ProjectId]) -> RepositoryResult<Vec<Project>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .projects
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

impl ProjectWriter for TestRepository {
    fn create_project(&self, project: &NewProject) -> RepositoryResult<Project> {
        let mut state = self.state.lock().unwrap();
        let id = ProjectId::new(Self::next_project_id(&state)).expect("positive id");
        let created = Project {
            id,
            owner_id: project.owner_id.clone(),
            title: project.title.clone(),
            description: project.description.clone(),
            category: project.category,
            subcategory: project.subcategory.clone(),
            tags: project.tags.clone(),
            is_hidden: false,
            is_best: false,
            views: 0,
            created_at: project.created_at,
            updated_at: project.updated_at,
        };
        state.projects.push(created.clone());
        Ok(created)
    }

    fn update_project(&self, id: ProjectId, update: &UpdateProject) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        match state.projects.iter_mut().find(|p| p.id == id) {
            Some(project) => {
                project.title = update.title.clone();
                project.description = update.description.clone();
                project.category = update.category;
                project.subcategory = update.subcategory.clone();
                project.tags = update.tags.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_project(&self, id: ProjectId) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.projects.len();
        state.projects.retain(|p| p.id != id);
        state.comments.retain(|c| c.project_id != id);
        state.project_likes.retain(|(pid, _)| *pid != id);
        state.course_projects.retain(|l| l.project_id != id);
        Ok(before - state.projects.len())
    }

    fn set_project_hidden(&self, id: ProjectId, hidden: bool) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        match state.projects.iter_mut().find(|p| p.id == id) {
            Some(project) => {
                project.is_hidden = hidden;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn set_project_best(&self, id: ProjectId, best: bool) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        match state.projects.iter_mut().find(|p| p.id == id) {
            Some(project) => {
                project.is_best = best;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn increment_project_views(&self, id: ProjectId) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        match state.projects.iter_mut().find(|p| p.id == id) {
            Some(project) => {
                project.views += 1;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl CommentReader for TestRepository {
    fn list_comments(&self, project_id: ProjectId) -> RepositoryResult<Vec<Comment>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .comments
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect())
    }

    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        let state = self.state.lock().unwrap();
        Ok(state.comments.iter().find(|c| c.id == id).cloned())
    }

    fn count_comments(
        &self,
        project_ids: &[ProjectId],
    ) -> RepositoryResult<HashMap<ProjectId, usize>> {
        let state = self.state.lock().unwrap();
        let mut counts = HashMap::new();
        for comment in &state.comments {
            if project_ids.contains(&comment.project_id) {
                *counts.entry(comment.project_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

impl CommentWriter for TestRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        let mut state = self.state.lock().unwrap();
        let id = CommentId::new(Self::next_comment_id(&state)).expect("positive id");
        let created = Comment {
            id,
            project_id: comment.project_id,
            parent_id: comment.parent_id,
            author_id: comment.author_id.clone(),
            body: comment.body.clone(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        };
        state.comments.push(created.clone());
        Ok(created)
    }

    fn update_comment(&self, id: CommentId, body: &CommentBody) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        match state.comments.iter_mut().find(|c| c.id == id) {
            Some(comment) => {
                comment.body = body.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        state.comment_likes.retain(|(cid, _)| *cid != id);
        Ok(before - state.comments.len())
    }
}

impl LikeReader for TestRepository {
    fn count_project_likes(
        &self,
        project_ids: &[ProjectId],
    ) -> RepositoryResult<HashMap<ProjectId, usize>> {
        let state = self.state.lock().unwrap();
        let mut counts = HashMap::new();
        for (project_id, _) in &state.project_likes {
            if project_ids.contains(project_id) {
                *counts.entry(*project_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    fn project_liked_by(&self, project_id: ProjectId, user_id: &UserId) -> RepositoryResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state
            .project_likes
            .iter()
            .any(|(pid, uid)| *pid == project_id && uid == user_id))
    }

    fn comment_like_meta(
        &self,
        comment_ids: &[CommentId],
        viewer: Option<&UserId>,
    ) -> RepositoryResult<HashMap<CommentId, LikeMeta>> {
        let state = self.state.lock().unwrap();
        let mut meta: HashMap<CommentId, LikeMeta> = HashMap::new();
        for (comment_id, user_id) in &state.comment_likes {
            if !comment_ids.contains(comment_id) {
                continue;
            }
            let entry = meta.entry(*comment_id).or_default();
            entry.count += 1;
            if viewer.is_some_and(|v| v == user_id) {
                entry.liked_by_viewer = true;
            }
        }
        Ok(meta)
    }
}

impl LikeWriter for TestRepository {
    fn toggle_project_like(
        &self,
        project_id: ProjectId,
        user_id: &UserId,
    ) -> RepositoryResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.project_likes.len();
        state
            .project_likes
            .retain(|(pid, uid)| !(*pid == project_id && uid == user_id));
        if state.project_likes.len() < before {
            return Ok(false);
        }
        state.project_likes.push((project_id, user_id.clone()));
        Ok(true)
    }

    fn toggle_comment_like(
        &self,
        comment_id: CommentId,
        user_id: &UserId,
    ) -> RepositoryResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.comment_likes.len();
        state
            .comment_likes
            .retain(|(cid, uid)| !(*cid == comment_id && uid == user_id));
        if state.comment_likes.len() < before {
            return Ok(false);
        }
        state.comment_likes.push((comment_id, user_id.clone()));
        Ok(true)
    }
}

impl ProfileReader for TestRepository {
    fn get_profile(&self, user_id: &UserId) -> RepositoryResult<Option<Profile>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .profiles
            .iter()
            .find(|p| &p.user_id == user_id)
            .cloned())
    }

    fn list_profiles(&self, user_ids: &[UserId]) -> RepositoryResult<HashMap<UserId, Profile>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .profiles
            .iter()
            .filter(|p| user_ids.contains(&p.user_id))
            .map(|p| (p.user_id.clone(), p.clone()))
            .collect())
    }
}

impl ProfileWriter for TestRepository {
    fn upsert_profile(&self, profile: &NewProfile) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state
            .profiles
            .iter_mut()
            .find(|p| p.user_id == profile.user_id)
        {
            existing.display_name = profile.display_name.clone();
            existing.subcategory = profile.subcategory.clone();
        } else {
            state.profiles.push(Profile {
                user_id: profile.user_id.clone(),
                display_name: profile.display_name.clone(),
                subcategory: profile.subcategory.clone(),
                created_at: profile.created_at,
            });
        }
        Ok(1)
    }
}

impl CourseReader for TestRepository {
    fn list_course_projects(&self, course: &CourseSlug) -> RepositoryResult<Vec<CourseProject>> {
        let state = self.state.lock().unwrap();
        let mut links: Vec<CourseProject> = state
            .course_projects
            .iter()
            .filter(|l| &l.course_slug == course)
            .cloned()
            .collect();
        links.sort_by_key(|l| l.position);
        Ok(links)
    }
}

impl CourseWriter for TestRepository {
    fn attach_project(
        &self,
        course: &CourseSlug,
        project_id: ProjectId,
        position: i32,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        if state
            .course_projects
            .iter()
            .any(|l| &l.course_slug == course && l.project_id == project_id)
        {
            return Ok(0);
        }
        state.course_projects.push(CourseProject {
            course_slug: course.clone(),
            project_id,
            position,
        });
        Ok(1)
    }

    fn detach_project(
        &self,
        course: &CourseSlug,
        project_id: ProjectId,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.course_projects.len();
        state
            .course_projects
            .retain(|l| !(&l.course_slug == course && l.project_id == project_id));
        Ok(before - state.course_projects.len())
    }

    fn set_positions(
        &self,
        course: &CourseSlug,
        positions: &[(ProjectId, i32)],
    ) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        let mut affected = 0;
        for (project_id, position) in positions {
            if let Some(link) = state
                .course_projects
                .iter_mut()
                .find(|l| &l.course_slug == course && l.project_id == *project_id)
            {
                link.position = *position;
                affected += 1;
            }
        }
        Ok(affected)
    }
}
