use diesel::prelude::*;

use crate::domain::course::CourseProject;
use crate::domain::types::{CourseSlug, ProjectId};
use crate::models::course::{CourseProject as DbCourseProject, NewCourseProject};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CourseReader, CourseWriter, DieselRepository};

impl CourseReader for DieselRepository {
    fn list_course_projects(&self, course: &CourseSlug) -> RepositoryResult<Vec<CourseProject>> {
        use crate::schema::course_projects;

        let mut conn = self.conn()?;

        let items = course_projects::table
            .filter(course_projects::course_slug.eq(course.as_str()))
            .order(course_projects::position.asc())
            .load::<DbCourseProject>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<CourseProject>, _>>()?;

        Ok(items)
    }
}

impl CourseWriter for DieselRepository {
    fn attach_project(
        &self,
        course: &CourseSlug,
        project_id: ProjectId,
        position: i32,
    ) -> RepositoryResult<usize> {
        use crate::schema::course_projects;

        let mut conn = self.conn()?;

        let affected = diesel::insert_into(course_projects::table)
            .values(NewCourseProject {
                course_slug: course.as_str(),
                project_id: project_id.get(),
                position,
            })
            .on_conflict((course_projects::course_slug, course_projects::project_id))
            .do_nothing()
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn detach_project(
        &self,
        course: &CourseSlug,
        project_id: ProjectId,
    ) -> RepositoryResult<usize> {
        use crate::schema::course_projects;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            course_projects::table
                .filter(course_projects::course_slug.eq(course.as_str()))
                .filter(course_projects::project_id.eq(project_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_positions(
        &self,
        course: &CourseSlug,
        positions: &[(ProjectId, i32)],
    ) -> RepositoryResult<usize> {
        use crate::schema::course_projects;

        let mut conn = self.conn()?;

        // Downstream consumers sort strictly by the persisted ordinal, so
        // every affected row is rewritten in one transaction.
        let affected = conn.transaction(|conn| {
            let mut affected = 0;
            for (project_id, position) in positions {
                affected += diesel::update(
                    course_projects::table
                        .filter(course_projects::course_slug.eq(course.as_str()))
                        .filter(course_projects::project_id.eq(project_id.get())),
                )
                .set(course_projects::position.eq(*position))
                .execute(conn)?;
            }
            Ok::<usize, diesel::result::Error>(affected)
        })?;

        Ok(affected)
    }
}
