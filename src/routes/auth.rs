use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::PUBLIC_ENTRY;
use crate::backend::RestBackend;
use crate::forms::auth::SignInForm;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, session as session_service};

/// `GET /`: the sign-in page.
pub async fn show_signin(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, None, "signin");
    render_template(&tera, "auth/signin.html", &context)
}

pub async fn signin(
    request: HttpRequest,
    backend: web::Data<RestBackend>,
    web::Form(form): web::Form<SignInForm>,
) -> impl Responder {
    match session_service::sign_in(backend.get_ref(), form).await {
        Ok(signed_in) => {
            if let Err(err) = Identity::login(&request.extensions(), signed_in.access_token) {
                log::error!("Failed to store identity: {err}");
                return HttpResponse::InternalServerError().finish();
            }
            redirect(signed_in.user.role.home_path())
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(PUBLIC_ENTRY)
        }
        Err(err) => {
            log::error!("Failed to sign in: {err}");
            FlashMessage::error("Sign-in is unavailable right now.").send();
            redirect(PUBLIC_ENTRY)
        }
    }
}

pub async fn signout(identity: Identity, backend: web::Data<RestBackend>) -> impl Responder {
    if let Ok(access_token) = identity.id() {
        // Revocation failures are logged by the service.
        let _ = session_service::sign_out(backend.get_ref(), &access_token).await;
    }
    identity.logout();
    redirect(PUBLIC_ENTRY)
}
