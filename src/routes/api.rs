use actix_web::{HttpResponse, Responder, get, web};
use serde::{Deserialize, Serialize};

use crate::domain::listing::{CategoryFilter, ListingFilters};
use crate::dto::projects::ProjectDto;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::viewer_context;
use crate::services::projects::show_projects as show_projects_service;

#[derive(Deserialize, Debug)]
struct ApiV1ProjectsQueryParams {
    category: Option<String>,
    query: Option<String>,
    page: Option<usize>,
}

#[derive(Serialize)]
struct ApiV1ProjectsResponse {
    items: Vec<ProjectDto>,
    total: usize,
}

#[get("/v1/projects")]
pub async fn api_v1_projects(
    params: web::Query<ApiV1ProjectsQueryParams>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let viewer = viewer_context(user.as_ref(), &server_config);
    let filters = ListingFilters {
        category: params
            .category
            .as_deref()
            .map(CategoryFilter::parse)
            .unwrap_or_default(),
        subcategory: None,
        search: params.query.clone().filter(|q| !q.trim().is_empty()),
    };
    let page = params.page.unwrap_or(1);

    match show_projects_service(&filters, &viewer, page, repo.get_ref()) {
        Ok(listing) => HttpResponse::Ok().json(ApiV1ProjectsResponse {
            total: listing.total,
            items: listing.items.into_iter().map(ProjectDto::from).collect(),
        }),
        Err(e) => {
            log::error!("Failed to list projects for API: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
