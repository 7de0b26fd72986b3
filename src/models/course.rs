use diesel::prelude::*;

use crate::domain::course::CourseProject as DomainCourseProject;
use crate::domain::types::{CourseSlug, ProjectId, TypeConstraintError};

/// Diesel model representing a row in the `course_projects` table.
#[derive(Debug, Clone, Queryable)]
pub struct CourseProject {
    pub course_slug: String,
    pub project_id: i32,
    pub position: i32,
}

/// Insertable form of [`CourseProject`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::course_projects)]
pub struct NewCourseProject<'a> {
    pub course_slug: &'a str,
    pub project_id: i32,
    pub position: i32,
}

impl TryFrom<CourseProject> for DomainCourseProject {
    type Error = TypeConstraintError;

    fn try_from(link: CourseProject) -> Result<Self, Self::Error> {
        Ok(Self {
            course_slug: CourseSlug::new(link.course_slug)?,
            project_id: ProjectId::new(link.project_id)?,
            position: link.position,
        })
    }
}
