//! Query and page data of the entity list pages.

use serde::Deserialize;

use crate::domain::entity::Entity;
use crate::pagination::Paginated;
use crate::state::dialog::DialogState;

/// Query string of `GET /{area}/{slug}`.
///
/// `dialog` and `row` restore the dialog store: the toolbar "Add" action links
/// to `?dialog=add`, row actions to `?dialog=edit&row={id}`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListPageQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub dialog: Option<String>,
    pub row: Option<String>,
}

/// Data required to render an entity list with its dialog.
#[derive(Debug)]
pub struct ListPageData<E: Entity> {
    pub rows: Paginated<E>,
    /// Search query echoed back to the template when present.
    pub search_query: Option<String>,
    pub dialog: DialogState<E>,
    /// E.g. `EditClient`.
    pub dialog_name: Option<String>,
    /// Values prefilled into the Edit dialog.
    pub draft: Option<E::Draft>,
    pub can_add: bool,
    pub can_write: bool,
}
