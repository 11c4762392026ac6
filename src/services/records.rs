use log::warn;

use crate::backend::{ListQuery, RecordReader};
use crate::domain::entity::Entity;
use crate::domain::role::Area;
use crate::domain::user::AuthenticatedUser;
use crate::dto::records::{ListPageData, ListPageQuery};
use crate::forms::records::parse_row_id;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::services::{ServiceError, ServiceResult};
use crate::services::dialogs::{can_write, ensure_area_access, open_dialog};
use crate::state::dialog::{DialogStore, DialogVariant};

/// Loads one page of `E` rows and the dialog the request asks for.
pub async fn load_list_page<E, R>(
    backend: &R,
    user: &AuthenticatedUser,
    area: Area,
    query: ListPageQuery,
) -> ServiceResult<ListPageData<E>>
where
    E: Entity,
    R: RecordReader + ?Sized,
{
    ensure_area_access(user, area)?;

    let page = query.page.unwrap_or(1).max(1);
    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut list_query = ListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, rows) = backend.list_records::<E>(list_query).await?;
    let rows = Paginated::new(rows, page, total, DEFAULT_ITEMS_PER_PAGE);

    let variant = query
        .dialog
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| match raw.parse::<DialogVariant>() {
            Ok(variant) => Some(variant),
            Err(err) => {
                warn!("Ignoring dialog parameter: {err}");
                None
            }
        });

    let store = match variant {
        Some(variant) => {
            let row_id = query
                .row
                .as_deref()
                .map(parse_row_id::<E>)
                .transpose()
                .map_err(ServiceError::from)?;
            open_dialog::<E, R>(backend, user, variant, row_id).await?
        }
        None => DialogStore::new(),
    };

    let can_write = can_write::<E>(user);

    Ok(ListPageData {
        rows,
        search_query,
        dialog_name: store.dialog_name(),
        draft: match store.open_dialog() {
            Some(DialogVariant::Edit) => store.current_row().map(Entity::to_draft),
            _ => None,
        },
        dialog: store.snapshot(),
        can_add: can_write && E::CAN_ADD,
        can_write,
    })
}
