use actix_web::{Responder, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::backend::AdminBackend;
use crate::domain::user::AuthenticatedUser;
use crate::routes::{base_context, render_template};
use crate::services::{ServiceError, auth_users as auth_users_service};

/// `GET /app`.
pub async fn show_dashboard(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, Some(&user), "dashboard");
    render_template(&tera, "dashboard/index.html", &context)
}

/// `GET /admin`: admin home listing every auth user.
pub async fn show_admin(
    user: AuthenticatedUser,
    admin: web::Data<AdminBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, Some(&user), "admin");

    match auth_users_service::list_auth_users(admin.get_ref(), &user).await {
        Ok(users) => context.insert("auth_users", &users),
        Err(ServiceError::Backend(err)) => context.insert("load_error", &err.message()),
        Err(err) => context.insert("load_error", &err.to_string()),
    }

    render_template(&tera, "admin/index.html", &context)
}
