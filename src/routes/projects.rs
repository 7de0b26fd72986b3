use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;
use validator::Validate;

use crate::domain::listing::{CategoryFilter, ListingFilters};
use crate::domain::threading::{CommentSort, VISIBLE_ROOTS_STEP};
use crate::domain::types::{Category, ProjectId, Subcategory};
use crate::forms::projects::ProjectForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{DieselRepository, ProjectReader};
use crate::routes::{base_context, redirect, render_template, viewer_context};
use crate::services::ServiceError;
use crate::services::projects::{
    create_project as create_project_service, delete_project as delete_project_service,
    show_project as show_project_service, show_projects as show_projects_service,
    toggle_best as toggle_best_service, toggle_hidden as toggle_hidden_service,
    toggle_project_like as toggle_project_like_service, update_project as update_project_service,
};

#[derive(Debug, Deserialize)]
struct ListingQueryParams {
    category: Option<String>,
    subcategory: Option<String>,
    /// Course landing pages deep-link here with `section`, an alias for
    /// `subcategory`.
    section: Option<String>,
    q: Option<String>,
    /// Tag deep links behave as a prefilled search.
    tag: Option<String>,
    page: Option<usize>,
}

impl ListingQueryParams {
    fn filters(&self) -> ListingFilters {
        let category = self
            .category
            .as_deref()
            .map(CategoryFilter::parse)
            .unwrap_or_default();
        let subcategory = self
            .subcategory
            .as_deref()
            .or(self.section.as_deref())
            .filter(|s| !s.trim().is_empty() && !s.trim().eq_ignore_ascii_case("all"))
            .and_then(|s| Subcategory::new(s).ok());
        let search = self
            .q
            .clone()
            .or_else(|| self.tag.clone())
            .filter(|s| !s.trim().is_empty());
        ListingFilters {
            category,
            subcategory,
            search,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailQueryParams {
    sort: Option<String>,
    visible: Option<usize>,
}

#[get("/projects")]
pub async fn show_projects(
    params: web::Query<ListingQueryParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let filters = params.filters();
    let viewer = viewer_context(user.as_ref(), &server_config);
    let page = params.page.unwrap_or(1);

    match show_projects_service(&filters, &viewer, page, repo.get_ref()) {
        Ok(listing) => {
            let pages = listing.total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
            let paginated = Paginated::new(listing.items, page, pages);

            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "projects",
                &server_config.auth_service_url,
            );
            context.insert("projects", &paginated);
            context.insert("total", &listing.total);
            context.insert("categories", &Category::ALL);
            context.insert(
                "current_category",
                &params.category.clone().unwrap_or_else(|| "all".to_string()),
            );
            context.insert(
                "current_subcategory",
                &params.subcategory.clone().unwrap_or_default(),
            );
            context.insert("search_query", &params.q.clone().unwrap_or_default());
            render_template(&tera, "projects/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render project listing: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/project/{project_id}")]
pub async fn show_project(
    project_id: web::Path<i32>,
    params: web::Query<DetailQueryParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(project_id) = ProjectId::new(project_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let viewer = viewer_context(user.as_ref(), &server_config);
    let sort = params
        .sort
        .as_deref()
        .map(CommentSort::parse)
        .unwrap_or_default();
    let visible = params.visible.unwrap_or(VISIBLE_ROOTS_STEP);

    match show_project_service(project_id, sort, visible, &viewer, repo.get_ref()) {
        Ok(view) => {
            let mut context = base_context(
                &flash_messages,
                user.as_ref(),
                "projects",
                &server_config.auth_service_url,
            );
            context.insert("view", &view);
            context.insert("sort", sort.as_str());
            context.insert("can_edit", &viewer.can_edit(&view.card.project));
            context.insert("is_admin", &viewer.is_admin);
            render_template(&tera, "projects/detail.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Проект не существует").send();
            redirect("/projects")
        }
        Err(err) => {
            log::error!("Failed to render project detail: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/projects/add")]
pub async fn add_project_page(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        Some(&user),
        "projects",
        &server_config.auth_service_url,
    );
    context.insert("project", &None::<crate::domain::project::Project>);
    context.insert("categories", &Category::ALL);
    render_template(&tera, "projects/edit.html", &context)
}

#[get("/project/{project_id}/edit")]
pub async fn edit_project_page(
    project_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(project_id) = ProjectId::new(project_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let viewer = viewer_context(Some(&user), &server_config);

    let project = match repo.get_project_by_id(project_id) {
        Ok(Some(project)) => project,
        Ok(None) => {
            FlashMessage::error("Проект не существует").send();
            return redirect("/projects");
        }
        Err(e) => {
            log::error!("Failed to get project: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    if !viewer.can_edit(&project) {
        return redirect("/na");
    }

    let mut context = base_context(
        &flash_messages,
        Some(&user),
        "projects",
        &server_config.auth_service_url,
    );
    context.insert("project", &project);
    context.insert("categories", &Category::ALL);
    render_template(&tera, "projects/edit.html", &context)
}

#[post("/projects/add")]
pub async fn add_project(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ProjectForm>,
) -> impl Responder {
    if let Err(e) = form.validate() {
        FlashMessage::error(e.to_string()).send();
        return redirect("/projects/add");
    }

    let viewer = viewer_context(Some(&user), &server_config);
    match create_project_service(form, &viewer, repo.get_ref()) {
        Ok(project) => {
            FlashMessage::success("Проект создан").send();
            redirect(&format!("/project/{}", project.id))
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::Form(message) | ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect("/projects/add")
        }
        Err(err) => {
            log::error!("Failed to create project: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/project/{project_id}/update")]
pub async fn update_project(
    project_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ProjectForm>,
) -> impl Responder {
    let raw_id = project_id.into_inner();
    let Ok(project_id) = ProjectId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };
    if let Err(e) = form.validate() {
        FlashMessage::error(e.to_string()).send();
        return redirect(&format!("/project/{raw_id}/edit"));
    }

    let viewer = viewer_context(Some(&user), &server_config);
    match update_project_service(project_id, form, &viewer, repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("Проект обновлён").send();
            redirect(&format!("/project/{raw_id}"))
        }
        Ok(false) => {
            FlashMessage::error("Не удалось обновить проект.").send();
            redirect(&format!("/project/{raw_id}/edit"))
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Проект не существует").send();
            redirect("/projects")
        }
        Err(ServiceError::Form(message) | ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/project/{raw_id}/edit"))
        }
        Err(err) => {
            log::error!("Failed to update project: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/project/{project_id}/delete")]
pub async fn delete_project(
    project_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let Ok(project_id) = ProjectId::new(project_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let viewer = viewer_context(Some(&user), &server_config);

    match delete_project_service(project_id, &viewer, repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("Проект удалён").send();
            redirect("/projects")
        }
        Ok(false) => {
            FlashMessage::error("Не удалось удалить проект.").send();
            redirect("/projects")
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Проект не существует").send();
            redirect("/projects")
        }
        Err(err) => {
            log::error!("Failed to delete project: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/project/{project_id}/hidden")]
pub async fn toggle_hidden(
    project_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let raw_id = project_id.into_inner();
    let Ok(project_id) = ProjectId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };
    let viewer = viewer_context(Some(&user), &server_config);

    match toggle_hidden_service(project_id, &viewer, repo.get_ref()) {
        Ok(hidden) => {
            let message = if hidden {
                "Проект скрыт"
            } else {
                "Проект снова виден"
            };
            FlashMessage::success(message).send();
            redirect(&format!("/project/{raw_id}"))
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Проект не существует").send();
            redirect("/projects")
        }
        Err(err) => {
            log::error!("Failed to toggle hidden flag: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/project/{project_id}/best")]
pub async fn toggle_best(
    project_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let raw_id = project_id.into_inner();
    let Ok(project_id) = ProjectId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };
    let viewer = viewer_context(Some(&user), &server_config);

    match toggle_best_service(project_id, &viewer, repo.get_ref()) {
        Ok(best) => {
            let message = if best {
                "Проект отмечен как лучший"
            } else {
                "Отметка снята"
            };
            FlashMessage::success(message).send();
            redirect(&format!("/project/{raw_id}"))
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Проект не существует").send();
            redirect("/projects")
        }
        Err(err) => {
            log::error!("Failed to toggle promotion flag: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/project/{project_id}/like")]
pub async fn toggle_like(
    project_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let raw_id = project_id.into_inner();
    let Ok(project_id) = ProjectId::new(raw_id) else {
        return HttpResponse::NotFound().finish();
    };
    let viewer = viewer_context(Some(&user), &server_config);

    match toggle_project_like_service(project_id, &viewer, repo.get_ref()) {
        Ok(_) => redirect(&format!("/project/{raw_id}")),
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Проект не существует").send();
            redirect("/projects")
        }
        Err(err) => {
            log::error!("Failed to toggle project like: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
