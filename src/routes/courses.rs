use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;
use validator::Validate;

use crate::domain::types::{CourseSlug, ProjectId};
use crate::forms::courses::{AttachProjectForm, DetachProjectForm, ReorderForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, viewer_context};
use crate::services::ServiceError;
use crate::services::courses::{
    ReorderGuard, attach_project as attach_project_service,
    detach_project as detach_project_service, reorder_projects as reorder_projects_service,
    show_course as show_course_service,
};

#[get("/course/{slug}")]
pub async fn show_course(
    slug: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(course) = CourseSlug::new(slug.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let viewer = viewer_context(user.as_ref(), &server_config);

    match show_course_service(&course, &viewer, repo.get_ref()) {
        Ok(cards) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "courses",
                &server_config.auth_service_url,
            );
            context.insert("course", course.as_str());
            context.insert("projects", &cards);
            context.insert("is_admin", &viewer.is_admin);
            render_template(&tera, "courses/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render course page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/course/{slug}/attach")]
pub async fn attach_project(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<AttachProjectForm>,
) -> impl Responder {
    let raw_slug = slug.into_inner();
    let Ok(course) = CourseSlug::new(raw_slug.as_str()) else {
        return HttpResponse::NotFound().finish();
    };
    let course_url = format!("/course/{raw_slug}");

    if form.validate().is_err() {
        FlashMessage::error("Неверный идентификатор проекта").send();
        return redirect(&course_url);
    }
    let Ok(project_id) = ProjectId::new(form.project_id) else {
        return HttpResponse::NotFound().finish();
    };

    let viewer = viewer_context(Some(&user), &server_config);
    match attach_project_service(&course, project_id, &viewer, repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("Проект добавлен к курсу").send();
            redirect(&course_url)
        }
        Ok(false) => {
            FlashMessage::error("Проект уже привязан к курсу.").send();
            redirect(&course_url)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Проект не существует").send();
            redirect(&course_url)
        }
        Err(err) => {
            log::error!("Failed to attach project: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/course/{slug}/detach")]
pub async fn detach_project(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<DetachProjectForm>,
) -> impl Responder {
    let raw_slug = slug.into_inner();
    let Ok(course) = CourseSlug::new(raw_slug.as_str()) else {
        return HttpResponse::NotFound().finish();
    };
    let course_url = format!("/course/{raw_slug}");

    let Ok(project_id) = ProjectId::new(form.project_id) else {
        return HttpResponse::NotFound().finish();
    };

    let viewer = viewer_context(Some(&user), &server_config);
    match detach_project_service(&course, project_id, &viewer, repo.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Проект отвязан от курса").send();
            redirect(&course_url)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Проект не привязан к курсу").send();
            redirect(&course_url)
        }
        Err(err) => {
            log::error!("Failed to detach project: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/course/{slug}/reorder")]
pub async fn reorder_projects(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    reorder_guard: web::Data<ReorderGuard>,
    web::Form(form): web::Form<ReorderForm>,
) -> impl Responder {
    let raw_slug = slug.into_inner();
    let Ok(course) = CourseSlug::new(raw_slug.as_str()) else {
        return HttpResponse::NotFound().finish();
    };
    let course_url = format!("/course/{raw_slug}");

    let viewer = viewer_context(Some(&user), &server_config);
    match reorder_projects_service(
        &course,
        form.from,
        form.to,
        &viewer,
        reorder_guard.get_ref(),
        repo.get_ref(),
    ) {
        Ok(true) => redirect(&course_url),
        // Another reorder is in flight; this request is ignored, not queued.
        Ok(false) => redirect(&course_url),
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&course_url)
        }
        Err(err) => {
            log::error!("Failed to reorder course projects: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
