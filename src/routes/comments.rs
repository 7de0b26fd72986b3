use actix_web::{HttpResponse, Responder, post, web};
use actix_web_flash_messages::FlashMessage;
use validator::Validate;

use crate::domain::types::{CommentId, ProjectId};
use crate::forms::comments::{AddCommentForm, DeleteCommentForm, LikeCommentForm, UpdateCommentForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{redirect, viewer_context};
use crate::services::ServiceError;
use crate::services::comments::{
    add_comment as add_comment_service, delete_comment as delete_comment_service,
    toggle_comment_like as toggle_comment_like_service, update_comment as update_comment_service,
};

#[post("/project/{project_id}/comments/add")]
pub async fn add_comment(
    project_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<AddCommentForm>,
) -> impl Responder {
    let raw_id = project_id.into_inner();
    let Ok(project_id) = ProjectId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };
    let detail_url = format!("/project/{raw_id}");

    if let Err(e) = form.validate() {
        FlashMessage::error(e.to_string()).send();
        return redirect(&detail_url);
    }
    let (body, parent_id) = match (form.body(), form.parent()) {
        (Ok(body), Ok(parent_id)) => (body, parent_id),
        _ => {
            FlashMessage::error("Комментарий не может быть пустым").send();
            return redirect(&detail_url);
        }
    };

    let viewer = viewer_context(Some(&user), &server_config);
    match add_comment_service(project_id, parent_id, body, &viewer, repo.get_ref()) {
        Ok(_) => redirect(&detail_url),
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Проект не существует").send();
            redirect("/projects")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&detail_url)
        }
        Err(err) => {
            log::error!("Failed to add comment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/comment/{comment_id}/update")]
pub async fn update_comment(
    comment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<UpdateCommentForm>,
) -> impl Responder {
    let Ok(comment_id) = CommentId::new(comment_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let detail_url = format!("/project/{}", form.project_id);

    if let Err(e) = form.validate() {
        FlashMessage::error(e.to_string()).send();
        return redirect(&detail_url);
    }
    let body = match form.body() {
        Ok(body) => body,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&detail_url);
        }
    };

    let viewer = viewer_context(Some(&user), &server_config);
    match update_comment_service(comment_id, body, &viewer, repo.get_ref()) {
        Ok(true) => redirect(&detail_url),
        Ok(false) => {
            FlashMessage::error("Не удалось изменить комментарий.").send();
            redirect(&detail_url)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Комментарий не существует").send();
            redirect(&detail_url)
        }
        Err(err) => {
            log::error!("Failed to update comment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/comment/{comment_id}/delete")]
pub async fn delete_comment(
    comment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<DeleteCommentForm>,
) -> impl Responder {
    let Ok(comment_id) = CommentId::new(comment_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let detail_url = format!("/project/{}", form.project_id);

    let viewer = viewer_context(Some(&user), &server_config);
    match delete_comment_service(comment_id, &viewer, repo.get_ref()) {
        Ok(true) => redirect(&detail_url),
        Ok(false) => {
            FlashMessage::error("Не удалось удалить комментарий.").send();
            redirect(&detail_url)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Комментарий не существует").send();
            redirect(&detail_url)
        }
        Err(err) => {
            log::error!("Failed to delete comment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/comment/{comment_id}/like")]
pub async fn toggle_comment_like(
    comment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<LikeCommentForm>,
) -> impl Responder {
    let Ok(comment_id) = CommentId::new(comment_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let detail_url = format!("/project/{}", form.project_id);

    let viewer = viewer_context(Some(&user), &server_config);
    match toggle_comment_like_service(comment_id, &viewer, repo.get_ref()) {
        Ok(_) => redirect(&detail_url),
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Комментарий не существует").send();
            redirect(&detail_url)
        }
        Err(err) => {
            log::error!("Failed to toggle comment like: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
