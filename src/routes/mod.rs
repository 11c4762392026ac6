//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::entity::EntityKind;
use crate::domain::role::Area;
use crate::domain::user::AuthenticatedUser;

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod records;

/// Maps a flash message level to the CSS alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Entry of the navigation menu.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub url: String,
}

/// Entity pages mounted under `area`; users are managed from the admin area only.
pub fn area_entities(area: Area) -> impl Iterator<Item = EntityKind> {
    EntityKind::ALL
        .into_iter()
        .filter(move |kind| *kind != EntityKind::User || area == Area::Admin)
}

pub fn entity_url(area: Area, kind: EntityKind) -> String {
    format!("{}/{}", area.entry(), kind.slug())
}

pub fn navigation(area: Area) -> Vec<NavLink> {
    area_entities(area)
        .map(|kind| NavLink {
            label: kind.label(),
            url: entity_url(area, kind),
        })
        .collect()
}

/// Context shared by every page: alerts, the signed-in user and the menu.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    if let Some(user) = user {
        let area = user.role.home_area();
        context.insert("current_user", user);
        context.insert("home_url", area.entry());
        context.insert("navigation", &navigation(area));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_page_is_admin_only() {
        let dashboard: Vec<_> = area_entities(Area::Dashboard).collect();
        assert_eq!(dashboard.len(), 8);
        assert!(!dashboard.contains(&EntityKind::User));
        assert!(area_entities(Area::Admin).any(|kind| kind == EntityKind::User));
    }

    #[test]
    fn builds_entity_urls() {
        assert_eq!(
            entity_url(Area::Dashboard, EntityKind::SalesOrder),
            "/app/sales-orders"
        );
        assert_eq!(
            navigation(Area::Admin).last(),
            Some(&NavLink {
                label: "Users",
                url: "/admin/users".into(),
            })
        );
    }
}
