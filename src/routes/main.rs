use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::listing::{CategoryFilter, ListingFilters};
use crate::domain::types::Category;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template, viewer_context};
use crate::services::projects::show_projects as show_projects_service;

#[get("/")]
pub async fn index(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let viewer = viewer_context(user.as_ref(), &server_config);
    let filters = ListingFilters {
        category: CategoryFilter::Best,
        ..Default::default()
    };

    let best = match show_projects_service(&filters, &viewer, 1, repo.get_ref()) {
        Ok(listing) => listing,
        Err(e) => {
            log::error!("Failed to load promoted projects: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(
        &flash_messages,
        user.as_ref(),
        "index",
        &server_config.auth_service_url,
    );
    context.insert("best_projects", &best.items);
    context.insert("categories", &Category::ALL);
    render_template(&tera, "main/index.html", &context)
}

#[get("/na")]
pub async fn not_assigned(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        user.as_ref(),
        "index",
        &server_config.auth_service_url,
    );
    render_template(&tera, "main/not_assigned.html", &context)
}
