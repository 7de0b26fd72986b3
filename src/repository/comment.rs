use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::{CommentBody, CommentId, ProjectId};
use crate::models::comment::{Comment as DbComment, NewComment as DbNewComment};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CommentReader, CommentWriter, DieselRepository};

impl CommentReader for DieselRepository {
    fn list_comments(&self, project_id: ProjectId) -> RepositoryResult<Vec<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let items = comments::table
            .filter(comments::project_id.eq(project_id.get()))
            .order(comments::id.asc())
            .load::<DbComment>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Comment>, _>>()?;

        Ok(items)
    }

    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let comment = comments::table
            .filter(comments::id.eq(id.get()))
            .first::<DbComment>(&mut conn)
            .optional()?;

        Ok(comment.map(TryInto::try_into).transpose()?)
    }

    fn count_comments(
        &self,
        project_ids: &[ProjectId],
    ) -> RepositoryResult<HashMap<ProjectId, usize>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = project_ids.iter().map(|id| id.get()).collect();

        let rows: Vec<(i32, i64)> = comments::table
            .filter(comments::project_id.eq_any(raw_ids))
            .group_by(comments::project_id)
            .select((comments::project_id, diesel::dsl::count_star()))
            .load(&mut conn)?;

        rows.into_iter()
            .map(|(id, count)| Ok((ProjectId::new(id)?, count as usize)))
            .collect()
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        use crate::schema::comments;

        let mut conn = self.conn()?;
        let db_comment: DbNewComment = comment.into();

        let created = diesel::insert_into(comments::table)
            .values(db_comment)
            .get_result::<DbComment>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_comment(&self, id: CommentId, body: &CommentBody) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected = diesel::update(comments::table.filter(comments::id.eq(id.get())))
            .set((
                comments::body.eq(body.as_str()),
                comments::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected = diesel::delete(comments::table.filter(comments::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
