//! Add/Edit/Delete dialogs of an entity list.
//!
//! The dialog store is rebuilt per request from the link or form that opened
//! the dialog. A submission is only accepted for the variant that is open;
//! it is validated, sent to the backend and, on success, closes the dialog.
//! On failure the store is left untouched so the dialog stays open.

use log::error;

use crate::backend::{RecordReader, RecordWriter};
use crate::domain::entity::{Entity, EntityDraft};
use crate::domain::role::Area;
use crate::domain::user::AuthenticatedUser;
use crate::services::{ServiceError, ServiceResult};
use crate::state::dialog::{DialogStore, DialogVariant};

/// A confirmed dialog together with its payload.
#[derive(Debug, Clone)]
pub enum DialogSubmission<E: Entity> {
    Add(E::Draft),
    Edit(E::Id, E::Draft),
    Delete(E::Id),
}

impl<E: Entity> DialogSubmission<E> {
    pub fn variant(&self) -> DialogVariant {
        match self {
            DialogSubmission::Add(_) => DialogVariant::Add,
            DialogSubmission::Edit(..) => DialogVariant::Edit,
            DialogSubmission::Delete(_) => DialogVariant::Delete,
        }
    }

    fn row_id(&self) -> Option<E::Id> {
        match self {
            DialogSubmission::Add(_) => None,
            DialogSubmission::Edit(id, _) | DialogSubmission::Delete(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome<E: Entity> {
    Created(E),
    Updated(E),
    Deleted(E::Id),
}

pub fn ensure_area_access(user: &AuthenticatedUser, area: Area) -> ServiceResult<()> {
    if user.can(area.capability()) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Whether the user may open the mutating dialogs of `E`.
pub fn can_write<E: Entity>(user: &AuthenticatedUser) -> bool {
    E::WRITE_CAPABILITY.is_none_or(|capability| user.can(capability))
}

/// Rebuilds the dialog store for the dialog a request asks for.
///
/// Edit and Delete load their row from the backend first.
pub async fn open_dialog<E, R>(
    backend: &R,
    user: &AuthenticatedUser,
    variant: DialogVariant,
    row_id: Option<E::Id>,
) -> ServiceResult<DialogStore<E>>
where
    E: Entity,
    R: RecordReader + ?Sized,
{
    if !can_write::<E>(user) {
        return Err(ServiceError::Unauthorized);
    }

    let mut store = DialogStore::new();

    if variant.targets_row() {
        let id = row_id.ok_or(ServiceError::NotFound)?;
        let row = backend
            .get_record::<E>(id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        store.set_current_row(Some(row));
    } else if !E::CAN_ADD {
        return Err(ServiceError::Form(format!(
            "{} cannot be created here",
            E::KIND.label()
        )));
    }

    store.set_open_dialog(Some(variant));
    Ok(store)
}

/// Validates and performs the open dialog's backend call.
pub async fn submit_dialog<E, R>(
    backend: &R,
    user: &AuthenticatedUser,
    area: Area,
    store: &mut DialogStore<E>,
    submission: DialogSubmission<E>,
) -> ServiceResult<DialogOutcome<E>>
where
    E: Entity,
    R: RecordWriter + ?Sized,
{
    ensure_area_access(user, area)?;
    if !can_write::<E>(user) {
        return Err(ServiceError::Unauthorized);
    }

    let variant = submission.variant();
    if store.open_dialog() != Some(variant) {
        return Err(ServiceError::Form(format!(
            "{} is not open",
            variant.dialog_name(E::KIND)
        )));
    }
    if store.current_row().map(Entity::id) != submission.row_id() {
        return Err(ServiceError::Form(format!(
            "{} targets a different row",
            variant.dialog_name(E::KIND)
        )));
    }

    let outcome = match submission {
        DialogSubmission::Add(draft) => {
            let draft = checked_draft(draft)?;
            DialogOutcome::Created(backend.insert_record::<E>(&draft).await.map_err(|err| {
                error!("Failed to insert into {}: {err}", E::KIND.table());
                err
            })?)
        }
        DialogSubmission::Edit(id, draft) => {
            let draft = checked_draft(draft)?;
            DialogOutcome::Updated(backend.update_record::<E>(id, &draft).await.map_err(|err| {
                error!("Failed to update {} {id}: {err}", E::KIND.table());
                err
            })?)
        }
        DialogSubmission::Delete(id) => {
            backend.delete_record::<E>(id).await.map_err(|err| {
                error!("Failed to delete {} {id}: {err}", E::KIND.table());
                err
            })?;
            DialogOutcome::Deleted(id)
        }
    };

    store.close();
    store.close_transition_complete();
    Ok(outcome)
}

fn checked_draft<D: EntityDraft>(draft: D) -> ServiceResult<D> {
    let draft = draft.normalized();
    draft.validate()?;
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::domain::client::{Client, ClientDraft, ClientStatus};
    use crate::domain::role::Role;
    use crate::domain::types::{ClientId, RequirementId, UserId, VendorId};
    use crate::domain::user::{User, UserDraft};
    use crate::domain::vendor_quote::{VendorQuote, VendorQuoteDraft, VendorQuoteStatus};

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(Uuid::new_v4()),
            email: "rep@example.com".into(),
            name: None,
            role,
            access_token: "token".into(),
        }
    }

    fn client(name: &str) -> Client {
        Client {
            id: ClientId::new(Uuid::new_v4()),
            name: name.into(),
            email: None,
            phone: None,
            company: None,
            address: None,
            status: ClientStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn draft(name: &str) -> ClientDraft {
        ClientDraft {
            name: name.into(),
            email: Some(" Buyer@Example.com ".into()),
            phone: None,
            company: Some("  ".into()),
            address: None,
            status: ClientStatus::Active,
        }
    }

    #[actix_web::test]
    async fn add_creates_record_and_closes_dialog() {
        let backend = MemoryBackend::new();
        let user = user(Role::User);
        let mut store = open_dialog::<Client, _>(&backend, &user, DialogVariant::Add, None)
            .await
            .unwrap();

        let outcome = submit_dialog(
            &backend,
            &user,
            Area::Dashboard,
            &mut store,
            DialogSubmission::Add(draft("  Acme  ")),
        )
        .await
        .unwrap();

        let DialogOutcome::Created(created) = outcome else {
            panic!("expected a created record");
        };
        assert_eq!(created.name, "Acme");
        assert_eq!(created.email.as_deref(), Some("buyer@example.com"));
        assert_eq!(created.company, None);
        assert_eq!(backend.rows::<Client>(), vec![created]);
        assert_eq!(store.open_dialog(), None);
        assert!(store.current_row().is_none());
    }

    #[actix_web::test]
    async fn invalid_draft_never_reaches_backend() {
        let backend = MemoryBackend::new();
        let user = user(Role::User);
        let mut store = open_dialog::<Client, _>(&backend, &user, DialogVariant::Add, None)
            .await
            .unwrap();

        let result = submit_dialog(
            &backend,
            &user,
            Area::Dashboard,
            &mut store,
            DialogSubmission::Add(draft("   ")),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(backend.calls().is_empty());
        assert_eq!(store.open_dialog(), Some(DialogVariant::Add));
    }

    #[actix_web::test]
    async fn refuses_submission_for_another_variant() {
        let backend = MemoryBackend::new();
        let existing = client("Acme");
        backend.seed(&[existing.clone()]);
        let user = user(Role::User);
        let mut store =
            open_dialog::<Client, _>(&backend, &user, DialogVariant::Edit, Some(existing.id))
                .await
                .unwrap();

        let result = submit_dialog(
            &backend,
            &user,
            Area::Dashboard,
            &mut store,
            DialogSubmission::Delete(existing.id),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert_eq!(backend.rows::<Client>().len(), 1);
        assert_eq!(store.current_row(), Some(&existing));
    }

    #[actix_web::test]
    async fn edit_updates_targeted_row() {
        let backend = MemoryBackend::new();
        let existing = client("Acme");
        backend.seed(&[existing.clone()]);
        let user = user(Role::User);
        let mut store =
            open_dialog::<Client, _>(&backend, &user, DialogVariant::Edit, Some(existing.id))
                .await
                .unwrap();

        let mut changes = existing.to_draft();
        changes.status = ClientStatus::Inactive;
        let outcome = submit_dialog(
            &backend,
            &user,
            Area::Dashboard,
            &mut store,
            DialogSubmission::Edit(existing.id, changes),
        )
        .await
        .unwrap();

        let DialogOutcome::Updated(updated) = outcome else {
            panic!("expected an updated record");
        };
        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.status, ClientStatus::Inactive);
        assert_eq!(store.open_dialog(), None);
        assert!(store.current_row().is_none());
    }

    #[actix_web::test]
    async fn failed_delete_keeps_dialog_open() {
        let backend = MemoryBackend::new();
        let existing = client("Acme");
        backend.seed(&[existing.clone()]);
        let user = user(Role::User);
        let mut store =
            open_dialog::<Client, _>(&backend, &user, DialogVariant::Delete, Some(existing.id))
                .await
                .unwrap();
        backend.fail_with("permission denied for table clients");

        let result = submit_dialog(
            &backend,
            &user,
            Area::Dashboard,
            &mut store,
            DialogSubmission::Delete(existing.id),
        )
        .await;

        match result {
            Err(ServiceError::Backend(err)) => {
                assert_eq!(err.message(), "permission denied for table clients")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(store.open_dialog(), Some(DialogVariant::Delete));
        assert_eq!(store.current_row(), Some(&existing));
    }

    #[actix_web::test]
    async fn missing_row_cannot_be_opened() {
        let backend = MemoryBackend::new();
        let result = open_dialog::<Client, _>(
            &backend,
            &user(Role::User),
            DialogVariant::Delete,
            Some(ClientId::new(Uuid::new_v4())),
        )
        .await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[actix_web::test]
    async fn users_are_not_created_and_only_super_admins_edit_them() {
        let backend = MemoryBackend::new();

        let add = open_dialog::<User, _>(
            &backend,
            &user(Role::SuperAdmin),
            DialogVariant::Add,
            None,
        )
        .await;
        assert!(matches!(add, Err(ServiceError::Form(_))));

        let edit = open_dialog::<User, _>(
            &backend,
            &user(Role::Admin),
            DialogVariant::Edit,
            Some(UserId::new(Uuid::new_v4())),
        )
        .await;
        assert!(matches!(edit, Err(ServiceError::Unauthorized)));

        let mut store = DialogStore::<User>::new();
        store.set_open_dialog(Some(DialogVariant::Edit));
        let submit = submit_dialog(
            &backend,
            &user(Role::Admin),
            Area::Admin,
            &mut store,
            DialogSubmission::Edit(
                UserId::new(Uuid::new_v4()),
                UserDraft {
                    full_name: None,
                    role: Role::Admin,
                },
            ),
        )
        .await;
        assert!(matches!(submit, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn dashboard_dialogs_are_refused_to_admins() {
        let backend = MemoryBackend::new();
        let mut store = DialogStore::<Client>::new();
        store.set_open_dialog(Some(DialogVariant::Add));

        let result = submit_dialog(
            &backend,
            &user(Role::Admin),
            Area::Dashboard,
            &mut store,
            DialogSubmission::Add(draft("Acme")),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
        assert!(backend.calls().is_empty());
    }

    #[actix_web::test]
    async fn vendor_quote_total_comes_from_backend() {
        let backend = MemoryBackend::new();
        let user = user(Role::Admin);
        let mut store = open_dialog::<VendorQuote, _>(&backend, &user, DialogVariant::Add, None)
            .await
            .unwrap();

        let draft = VendorQuoteDraft {
            requirement_id: RequirementId::new(Uuid::new_v4()),
            requirement_item_id: None,
            vendor_id: VendorId::new(Uuid::new_v4()),
            currency_code: "usd".into(),
            base_cost: 100.0,
            additional_costs: Some(15.5),
            vendor_quote_ref: None,
            valid_till: NaiveDate::from_ymd_opt(2025, 1, 31),
            status: VendorQuoteStatus::Received,
            notes: None,
        };
        let outcome = submit_dialog(
            &backend,
            &user,
            Area::Admin,
            &mut store,
            DialogSubmission::Add(draft),
        )
        .await
        .unwrap();

        let DialogOutcome::Created(quote) = outcome else {
            panic!("expected a created record");
        };
        assert_eq!(quote.currency_code, "USD");
        assert_eq!(quote.total_cost, 115.5);
    }

    #[actix_web::test]
    async fn non_finite_costs_never_reach_backend() {
        let backend = MemoryBackend::new();
        let user = user(Role::User);

        for (base_cost, additional_costs) in [(f64::NAN, None), (10.0, Some(f64::INFINITY))] {
            let mut store =
                open_dialog::<VendorQuote, _>(&backend, &user, DialogVariant::Add, None)
                    .await
                    .unwrap();
            let draft = VendorQuoteDraft {
                requirement_id: RequirementId::new(Uuid::new_v4()),
                requirement_item_id: None,
                vendor_id: VendorId::new(Uuid::new_v4()),
                currency_code: "usd".into(),
                base_cost,
                additional_costs,
                vendor_quote_ref: None,
                valid_till: None,
                status: VendorQuoteStatus::Received,
                notes: None,
            };

            let result = submit_dialog(
                &backend,
                &user,
                Area::Dashboard,
                &mut store,
                DialogSubmission::Add(draft),
            )
            .await;

            assert!(matches!(result, Err(ServiceError::Form(_))));
        }
        assert!(backend.calls().is_empty());
    }
}
