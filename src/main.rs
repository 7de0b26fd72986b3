use std::io;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;

use academy_showcase::db::establish_connection_pool;
use academy_showcase::models::config::ServerConfig;
use academy_showcase::repository::DieselRepository;
use academy_showcase::routes::{api, comments, courses, main as pages, profile, projects};
use academy_showcase::services::courses::ReorderGuard;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ServerConfig::load().map_err(io::Error::other)?;
    let pool = establish_connection_pool(&config.database_url).map_err(io::Error::other)?;
    let tera = Tera::new("templates/**/*.html").map_err(io::Error::other)?;

    let secret_key = Key::derive_from(config.secret.as_bytes());
    let bind_address = (config.bind_address.clone(), config.port);

    let repo = web::Data::new(DieselRepository::new(pool));
    let server_config = web::Data::new(config);
    let tera = web::Data::new(tera);
    // One guard instance for the whole server; reorders are serialized
    // across workers.
    let reorder_guard = web::Data::new(ReorderGuard::default());

    log::info!("Starting server on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();
        let session_middleware =
            SessionMiddleware::new(CookieSessionStore::default(), secret_key.clone());

        App::new()
            .app_data(repo.clone())
            .app_data(server_config.clone())
            .app_data(tera.clone())
            .app_data(reorder_guard.clone())
            .wrap(message_framework)
            .wrap(IdentityMiddleware::default())
            .wrap(session_middleware)
            .wrap(middleware::Logger::default())
            .service(pages::index)
            .service(pages::not_assigned)
            .service(profile::show_profile)
            .service(profile::update_profile)
            .service(projects::show_projects)
            .service(projects::add_project_page)
            .service(projects::add_project)
            .service(projects::show_project)
            .service(projects::edit_project_page)
            .service(projects::update_project)
            .service(projects::delete_project)
            .service(projects::toggle_hidden)
            .service(projects::toggle_best)
            .service(projects::toggle_like)
            .service(comments::add_comment)
            .service(comments::update_comment)
            .service(comments::delete_comment)
            .service(comments::toggle_comment_like)
            .service(courses::show_course)
            .service(courses::attach_project)
            .service(courses::detach_project)
            .service(courses::reorder_projects)
            .service(web::scope("/api").service(api::api_v1_projects))
            .service(Files::new("/assets", "./assets"))
    })
    .bind(bind_address)?
    .run()
    .await
}
