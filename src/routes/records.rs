//! Entity list pages and their Add/Edit/Delete dialogs.
//!
//! Handlers are generic over the entity and mounted once per kind under each
//! area scope; the scope provides the [`Area`] as app data.

use actix_web::{HttpResponse, Responder, Scope, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::backend::RestBackend;
use crate::domain::client::Client;
use crate::domain::entity::Entity;
use crate::domain::expense::Expense;
use crate::domain::lead::Lead;
use crate::domain::quote::Quote;
use crate::domain::requirement::Requirement;
use crate::domain::role::Area;
use crate::domain::sales_order::SalesOrder;
use crate::domain::user::{AuthenticatedUser, User};
use crate::domain::vendor::Vendor;
use crate::domain::vendor_quote::VendorQuote;
use crate::dto::records::ListPageQuery;
use crate::forms::records::parse_row_id;
use crate::routes::{base_context, entity_url, redirect, render_template};
use crate::services::dialogs::{self, DialogOutcome, DialogSubmission};
use crate::services::{ServiceError, ServiceResult, records as records_service};
use crate::state::dialog::DialogVariant;

/// Routes of one entity kind: the list page and the three dialog actions.
pub fn entity_scope<E: Entity>() -> Scope {
    web::scope(&format!("/{}", E::KIND.slug()))
        .route("", web::get().to(show_records::<E>))
        .route("/add", web::post().to(add_record::<E>))
        .route("/{id}/edit", web::post().to(edit_record::<E>))
        .route("/{id}/delete", web::post().to(delete_record::<E>))
}

/// Entity pages of the `/app` dashboard.
pub fn dashboard_entities(cfg: &mut web::ServiceConfig) {
    cfg.service(entity_scope::<Client>())
        .service(entity_scope::<Lead>())
        .service(entity_scope::<Quote>())
        .service(entity_scope::<Vendor>())
        .service(entity_scope::<SalesOrder>())
        .service(entity_scope::<Requirement>())
        .service(entity_scope::<VendorQuote>())
        .service(entity_scope::<Expense>());
}

/// Entity pages of the `/admin` area.
pub fn admin_entities(cfg: &mut web::ServiceConfig) {
    dashboard_entities(cfg);
    cfg.service(entity_scope::<User>());
}

fn list_url<E: Entity>(area: Area) -> String {
    entity_url(area, E::KIND)
}

/// List URL that opens `variant` again, e.g. after a rejected submission.
fn dialog_url<E: Entity>(area: Area, variant: DialogVariant, row: Option<E::Id>) -> String {
    match row {
        Some(id) => format!("{}?dialog={variant}&row={id}", list_url::<E>(area)),
        None => format!("{}?dialog={variant}", list_url::<E>(area)),
    }
}

pub async fn show_records<E: Entity>(
    params: web::Query<ListPageQuery>,
    user: AuthenticatedUser,
    area: web::Data<Area>,
    backend: web::Data<RestBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let area = **area;
    let backend = backend.for_user(&user);

    match records_service::load_list_page::<E, _>(&backend, &user, area, params.into_inner()).await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), E::KIND.slug());
            context.insert("entity", &E::KIND);
            context.insert("entity_name", E::KIND.name());
            context.insert("entity_label", E::KIND.label());
            context.insert("list_url", &list_url::<E>(area));
            context.insert("columns", E::COLUMNS);
            context.insert("form_fields", E::FORM_FIELDS);
            context.insert("rows", &data.rows);
            context.insert("search_query", &data.search_query);
            context.insert("dialog", &data.dialog);
            context.insert("dialog_name", &data.dialog_name);
            context.insert("draft", &data.draft);
            context.insert("can_add", &data.can_add);
            context.insert("can_write", &data.can_write);

            render_template(&tera, "records/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient rights.").send();
            redirect(user.role.home_path())
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Record not found.").send();
            redirect(&list_url::<E>(area))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&list_url::<E>(area))
        }
        Err(err) => {
            log::error!("Failed to list {}: {err}", E::KIND.table());
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub async fn add_record<E: Entity>(
    user: AuthenticatedUser,
    area: web::Data<Area>,
    backend: web::Data<RestBackend>,
    web::Form(draft): web::Form<E::Draft>,
) -> impl Responder {
    let backend = backend.for_user(&user);
    let result = run_dialog::<E>(
        &backend,
        &user,
        **area,
        None,
        DialogSubmission::Add(draft),
    )
    .await;
    respond::<E>(result, &user, **area, DialogVariant::Add, None)
}

pub async fn edit_record<E: Entity>(
    id: web::Path<String>,
    user: AuthenticatedUser,
    area: web::Data<Area>,
    backend: web::Data<RestBackend>,
    web::Form(draft): web::Form<E::Draft>,
) -> impl Responder {
    let id = match parse_row_id::<E>(&id) {
        Ok(id) => id,
        Err(err) => return respond::<E>(Err(err.into()), &user, **area, DialogVariant::Edit, None),
    };
    let backend = backend.for_user(&user);
    let result = run_dialog::<E>(
        &backend,
        &user,
        **area,
        Some(id),
        DialogSubmission::Edit(id, draft),
    )
    .await;
    respond::<E>(result, &user, **area, DialogVariant::Edit, Some(id))
}

pub async fn delete_record<E: Entity>(
    id: web::Path<String>,
    user: AuthenticatedUser,
    area: web::Data<Area>,
    backend: web::Data<RestBackend>,
) -> impl Responder {
    let id = match parse_row_id::<E>(&id) {
        Ok(id) => id,
        Err(err) => {
            return respond::<E>(Err(err.into()), &user, **area, DialogVariant::Delete, None);
        }
    };
    let backend = backend.for_user(&user);
    let result = run_dialog::<E>(
        &backend,
        &user,
        **area,
        Some(id),
        DialogSubmission::Delete(id),
    )
    .await;
    respond::<E>(result, &user, **area, DialogVariant::Delete, Some(id))
}

/// Reopens the dialog the form was posted from and submits it.
async fn run_dialog<E: Entity>(
    backend: &RestBackend,
    user: &AuthenticatedUser,
    area: Area,
    row_id: Option<E::Id>,
    submission: DialogSubmission<E>,
) -> ServiceResult<DialogOutcome<E>> {
    dialogs::ensure_area_access(user, area)?;
    let mut store = dialogs::open_dialog::<E, _>(backend, user, submission.variant(), row_id).await?;
    dialogs::submit_dialog(backend, user, area, &mut store, submission).await
}

fn respond<E: Entity>(
    result: ServiceResult<DialogOutcome<E>>,
    user: &AuthenticatedUser,
    area: Area,
    variant: DialogVariant,
    row: Option<E::Id>,
) -> HttpResponse {
    match result {
        Ok(outcome) => {
            let message = match outcome {
                DialogOutcome::Created(_) => "Record created.",
                DialogOutcome::Updated(_) => "Record updated.",
                DialogOutcome::Deleted(_) => "Record deleted.",
            };
            FlashMessage::success(message).send();
            redirect(&list_url::<E>(area))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient rights.").send();
            redirect(user.role.home_path())
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Record not found.").send();
            redirect(&list_url::<E>(area))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&dialog_url::<E>(area, variant, row))
        }
        Err(err) => {
            log::error!(
                "Failed to submit {}: {err}",
                variant.dialog_name(E::KIND)
            );
            let message = match &err {
                ServiceError::Backend(backend_err) => backend_err.message(),
                other => other.to_string(),
            };
            FlashMessage::error(format!("Operation failed: {message}")).send();
            redirect(&dialog_url::<E>(area, variant, row))
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::types::ClientId;

    #[test]
    fn dialog_urls_reopen_the_dialog() {
        let id = ClientId::new(Uuid::nil());
        assert_eq!(
            dialog_url::<Client>(Area::Dashboard, DialogVariant::Edit, Some(id)),
            "/app/clients?dialog=edit&row=00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            dialog_url::<Client>(Area::Admin, DialogVariant::Add, None),
            "/admin/clients?dialog=add"
        );
    }
}
