use diesel::prelude::*;

/// Insertable row for a project like.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::project_likes)]
pub struct NewProjectLike<'a> {
    pub project_id: i32,
    pub user_id: &'a str,
}

/// Insertable row for a comment like.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::comment_likes)]
pub struct NewCommentLike<'a> {
    pub comment_id: i32,
    pub user_id: &'a str,
}
