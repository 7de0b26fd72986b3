use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;
use validator::Validate;

use crate::forms::profile::ProfileForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, viewer_context};
use crate::services::ServiceError;
use crate::services::profiles::{
    show_profile as show_profile_service, update_profile as update_profile_service,
};

#[get("/profile")]
pub async fn show_profile(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let viewer = viewer_context(Some(&user), &server_config);

    match show_profile_service(&viewer, repo.get_ref()) {
        Ok(profile) => {
            let mut context = base_context(
                &flash_messages,
                Some(&user),
                "profile",
                &server_config.auth_service_url,
            );
            context.insert("profile", &profile);
            render_template(&tera, "profiles/edit.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render profile page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/profile")]
pub async fn update_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ProfileForm>,
) -> impl Responder {
    if let Err(e) = form.validate() {
        FlashMessage::error(e.to_string()).send();
        return redirect("/profile");
    }
    let user_id = match user.user_id() {
        Ok(user_id) => user_id,
        Err(_) => return redirect("/na"),
    };
    let profile = match form.into_new_profile(user_id) {
        Ok(profile) => profile,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/profile");
        }
    };

    let viewer = viewer_context(Some(&user), &server_config);
    match update_profile_service(&profile, &viewer, repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("Профиль сохранён").send();
            redirect("/profile")
        }
        Ok(false) => {
            FlashMessage::error("Не удалось сохранить профиль.").send();
            redirect("/profile")
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to update profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
