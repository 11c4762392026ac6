//! Session loading and route-tree guards.
//!
//! [`load_session`] resolves the signed-in user at most once per request and
//! stores the resulting [`SessionState`] in the request extensions. The `guard_*`
//! functions wrap a route subtree and apply [`guard::evaluate`] to it.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::middleware::Next;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, web};

use crate::backend::RestBackend;
use crate::domain::user::AuthenticatedUser;
use crate::dto::api::ApiError;
use crate::services::session as session_service;
use crate::state::guard::{self, GuardDecision, GuardScope};
use crate::state::session::SessionState;

const LOADING_PLACEHOLDER: &str = "<!doctype html><html><head>\
<meta http-equiv=\"refresh\" content=\"1\"><title>Loading</title></head>\
<body><p class=\"text-muted\">Loading…</p></body></html>";

/// Resolves the session from the identity cookie's access token.
///
/// A state already present in the request extensions is kept as is.
pub async fn load_session(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if req.extensions().contains::<SessionState>() {
        return next.call(req).await;
    }

    let access_token = req.get_identity().ok().and_then(|identity| identity.id().ok());

    let state = match (&access_token, req.app_data::<web::Data<RestBackend>>()) {
        (None, _) => SessionState::Unauthenticated,
        (Some(token), Some(backend)) => {
            session_service::resolve_session(backend.get_ref(), Some(token.as_str())).await
        }
        (Some(_), None) => {
            log::error!("No backend client registered; treating request as signed out");
            SessionState::Unauthenticated
        }
    };

    req.extensions_mut().insert(state);
    next.call(req).await
}

pub async fn guard_public(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    enforce(GuardScope::Public, req, next).await
}

pub async fn guard_authenticated(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    enforce(GuardScope::Authenticated, req, next).await
}

pub async fn guard_dashboard(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    enforce(GuardScope::Dashboard, req, next).await
}

pub async fn guard_admin(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    enforce(GuardScope::Admin, req, next).await
}

async fn enforce<B: MessageBody + 'static>(
    scope: GuardScope,
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let decision = {
        let extensions = req.extensions();
        let state = extensions.get::<SessionState>().cloned().unwrap_or_default();
        guard::evaluate(scope, &state)
    };

    match decision {
        GuardDecision::Render => next.call(req).await.map(ServiceResponse::map_into_left_body),
        GuardDecision::Loading => {
            let response = HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(LOADING_PLACEHOLDER);
            Ok(req.into_response(response).map_into_right_body())
        }
        GuardDecision::Redirect(location) => {
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish();
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

/// Returned when a handler needs a user but the request has none.
#[derive(Debug, thiserror::Error)]
#[error("authentication required")]
pub struct AuthRequired;

impl ResponseError for AuthRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized().json(ApiError::new(self.to_string()))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<SessionState>()
                .and_then(SessionState::user)
                .cloned()
                .ok_or(AuthRequired),
        )
    }
}
