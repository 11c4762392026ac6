use actix_web::{HttpResponse, Responder, web};

use crate::backend::AdminBackend;
use crate::domain::user::AuthenticatedUser;
use crate::dto::api::ApiError;
use crate::services::{ServiceError, auth_users as auth_users_service};

/// `GET /api/auth-users`: auth users joined with their profiles.
pub async fn auth_users(user: AuthenticatedUser, admin: web::Data<AdminBackend>) -> impl Responder {
    match auth_users_service::list_auth_users(admin.get_ref(), &user).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Forbidden().json(ApiError::new("admin access required"))
        }
        Err(ServiceError::Backend(err)) => {
            HttpResponse::InternalServerError().json(ApiError::new(err.message()))
        }
        Err(err) => HttpResponse::InternalServerError().json(ApiError::new(err.to_string())),
    }
}
