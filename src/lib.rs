#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::backend::{AdminBackend, RestBackend};
#[cfg(feature = "server")]
use crate::domain::role::Area;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;

pub mod domain;
pub mod state;

#[cfg(feature = "server")]
pub mod backend;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod pagination;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Public route tree: the sign-in page.
pub const PUBLIC_ENTRY: &str = "/";
/// Dashboard of regular users.
pub const DASHBOARD_ENTRY: &str = "/app";
/// Area of admins and super admins.
pub const ADMIN_ENTRY: &str = "/admin";

/// Registers every route of the application.
///
/// Handlers expect `Tera`, [`RestBackend`] and [`AdminBackend`] app data.
/// Only the trees that read the [`state::session::SessionState`] are wrapped
/// in [`middleware::load_session`], so sign-in posts and unknown paths never
/// look the user up.
#[cfg(feature = "server")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    use crate::middleware::{
        guard_admin, guard_authenticated, guard_dashboard, guard_public, load_session,
    };
    use crate::routes::{api, auth, dashboard, records};
    use actix_web::middleware::from_fn;

    cfg.service(
        web::scope("/api")
            .wrap(from_fn(load_session))
            .route("/auth-users", web::get().to(api::auth_users)),
    )
    .service(web::resource("/auth/signin").route(web::post().to(auth::signin)))
    .service(
        web::resource("/auth/signout")
            .wrap(from_fn(guard_authenticated))
            .wrap(from_fn(load_session))
            .route(web::post().to(auth::signout)),
    )
    .service(
        web::scope(DASHBOARD_ENTRY)
            .wrap(from_fn(guard_dashboard))
            .wrap(from_fn(load_session))
            .app_data(web::Data::new(Area::Dashboard))
            .route("", web::get().to(dashboard::show_dashboard))
            .configure(records::dashboard_entities),
    )
    .service(
        web::scope(ADMIN_ENTRY)
            .wrap(from_fn(guard_admin))
            .wrap(from_fn(load_session))
            .app_data(web::Data::new(Area::Admin))
            .route("", web::get().to(dashboard::show_admin))
            .configure(records::admin_entities),
    )
    .service(
        web::resource(PUBLIC_ENTRY)
            .wrap(from_fn(guard_public))
            .wrap(from_fn(load_session))
            .route(web::get().to(auth::show_signin)),
    );
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let user_backend = RestBackend::new(
        &server_config.backend_url,
        &server_config.backend_anon_key,
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;

    let admin_backend = AdminBackend::new(
        &server_config.backend_url,
        &server_config.backend_service_role_key,
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build admin client: {e}")))?;

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        server_config.backend_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .configure(configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(user_backend.clone()))
            .app_data(web::Data::new(admin_backend.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
