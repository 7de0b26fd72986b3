use diesel::prelude::*;

use crate::domain::listing::CategoryFilter;
use crate::domain::project::{NewProject, Project, UpdateProject};
use crate::domain::types::ProjectId;
use crate::models::project::{NewProject as DbNewProject, Project as DbProject, encode_tags};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProjectListQuery, ProjectReader, ProjectWriter};

impl ProjectReader for DieselRepository {
    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<Vec<Project>> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let mut items = projects::table.into_boxed::<diesel::sqlite::Sqlite>();

        match query.scope {
            CategoryFilter::All => {}
            CategoryFilter::Best => items = items.filter(projects::is_best.eq(true)),
            CategoryFilter::Only(category) => {
                items = items.filter(projects::category.eq(category.as_str()));
            }
        }

        if let Some(owner) = &query.owner {
            items = items.filter(projects::owner_id.eq(owner.as_str()));
        }

        let items = items
            .order(projects::created_at.desc())
            .limit(query.ceiling as i64)
            .load::<DbProject>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Project>, _>>()?;

        Ok(items)
    }

    fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<Project>> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let project = projects::table
            .filter(projects::id.eq(id.get()))
            .first::<DbProject>(&mut conn)
            .optional()?;

        Ok(project.map(TryInto::try_into).transpose()?)
    }

    fn get_projects_by_ids(&self, ids: &[ProjectId]) -> RepositoryResult<Vec<Project>> {
        use crate::schema::projects;

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let items = projects::table
            .filter(projects::id.eq_any(raw_ids))
            .load::<DbProject>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Project>, _>>()?;

        Ok(items)
    }
}

impl ProjectWriter for DieselRepository {
    fn create_project(&self, project: &NewProject) -> RepositoryResult<Project> {
        use crate::schema::projects;

        let mut conn = self.conn()?;
        let db_project: DbNewProject = project.into();

        let created = diesel::insert_into(projects::table)
            .values(db_project)
            .get_result::<DbProject>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_project(&self, id: ProjectId, update: &UpdateProject) -> RepositoryResult<usize> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let affected = diesel::update(projects::table.filter(projects::id.eq(id.get())))
            .set((
                projects::title.eq(update.title.as_str()),
                projects::description.eq(&update.description),
                projects::category.eq(update.category.map(|c| c.as_str())),
                projects::subcategory.eq(update.subcategory.as_ref().map(|s| s.as_str())),
                projects::tags.eq(encode_tags(&update.tags)),
                projects::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_project(&self, id: ProjectId) -> RepositoryResult<usize> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let affected = diesel::delete(projects::table.filter(projects::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_project_hidden(&self, id: ProjectId, hidden: bool) -> RepositoryResult<usize> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let affected = diesel::update(projects::table.filter(projects::id.eq(id.get())))
            .set(projects::is_hidden.eq(hidden))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_project_best(&self, id: ProjectId, best: bool) -> RepositoryResult<usize> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let affected = diesel::update(projects::table.filter(projects::id.eq(id.get())))
            .set(projects::is_best.eq(best))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn increment_project_views(&self, id: ProjectId) -> RepositoryResult<usize> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let affected = diesel::update(projects::table.filter(projects::id.eq(id.get())))
            .set(projects::views.eq(projects::views + 1))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
