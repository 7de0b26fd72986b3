use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::like::LikeMeta;
use crate::domain::types::{CommentId, ProjectId, UserId};
use crate::models::like::{NewCommentLike, NewProjectLike};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, LikeReader, LikeWriter};

impl LikeReader for DieselRepository {
    fn count_project_likes(
        &self,
        project_ids: &[ProjectId],
    ) -> RepositoryResult<HashMap<ProjectId, usize>> {
        use crate::schema::project_likes;

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = project_ids.iter().map(|id| id.get()).collect();

        let rows: Vec<(i32, i64)> = project_likes::table
            .filter(project_likes::project_id.eq_any(raw_ids))
            .group_by(project_likes::project_id)
            .select((project_likes::project_id, diesel::dsl::count_star()))
            .load(&mut conn)?;

        rows.into_iter()
            .map(|(id, count)| Ok((ProjectId::new(id)?, count as usize)))
            .collect()
    }

    fn project_liked_by(&self, project_id: ProjectId, user_id: &UserId) -> RepositoryResult<bool> {
        use crate::schema::project_likes;

        let mut conn = self.conn()?;

        let count: i64 = project_likes::table
            .filter(project_likes::project_id.eq(project_id.get()))
            .filter(project_likes::user_id.eq(user_id.as_str()))
            .count()
            .get_result(&mut conn)?;

        Ok(count > 0)
    }

    fn comment_like_meta(
        &self,
        comment_ids: &[CommentId],
        viewer: Option<&UserId>,
    ) -> RepositoryResult<HashMap<CommentId, LikeMeta>> {
        use crate::schema::comment_likes;

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = comment_ids.iter().map(|id| id.get()).collect();

        let rows: Vec<(i32, String)> = comment_likes::table
            .filter(comment_likes::comment_id.eq_any(raw_ids))
            .select((comment_likes::comment_id, comment_likes::user_id))
            .load(&mut conn)?;

        let mut meta: HashMap<CommentId, LikeMeta> = HashMap::new();
        for (comment_id, user_id) in rows {
            let comment_id = CommentId::new(comment_id)?;
            let entry = meta.entry(comment_id).or_default();
            entry.count += 1;
            if viewer.is_some_and(|v| v.as_str() == user_id) {
                entry.liked_by_viewer = true;
            }
        }

        Ok(meta)
    }
}

impl LikeWriter for DieselRepository {
    fn toggle_project_like(
        &self,
        project_id: ProjectId,
        user_id: &UserId,
    ) -> RepositoryResult<bool> {
        use crate::schema::project_likes;

        let mut conn = self.conn()?;

        let liked = conn.transaction(|conn| {
            let deleted = diesel::delete(
                project_likes::table
                    .filter(project_likes::project_id.eq(project_id.get()))
                    .filter(project_likes::user_id.eq(user_id.as_str())),
            )
            .execute(conn)?;

            if deleted > 0 {
                return Ok::<bool, diesel::result::Error>(false);
            }

            diesel::insert_into(project_likes::table)
                .values(NewProjectLike {
                    project_id: project_id.get(),
                    user_id: user_id.as_str(),
                })
                .execute(conn)?;
            Ok(true)
        })?;

        Ok(liked)
    }

    fn toggle_comment_like(
        &self,
        comment_id: CommentId,
        user_id: &UserId,
    ) -> RepositoryResult<bool> {
        use crate::schema::comment_likes;

        let mut conn = self.conn()?;

        let liked = conn.transaction(|conn| {
            let deleted = diesel::delete(
                comment_likes::table
                    .filter(comment_likes::comment_id.eq(comment_id.get()))
                    .filter(comment_likes::user_id.eq(user_id.as_str())),
            )
            .execute(conn)?;

            if deleted > 0 {
                return Ok::<bool, diesel::result::Error>(false);
            }

            diesel::insert_into(comment_likes::table)
                .values(NewCommentLike {
                    comment_id: comment_id.get(),
                    user_id: user_id.as_str(),
                })
                .execute(conn)?;
            Ok(true)
        })?;

        Ok(liked)
    }
}
