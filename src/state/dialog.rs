//! Per-entity dialog/selection store.
//!
//! One [`DialogStore`] is instantiated per entity kind and answers "which
//! modal is open, and on which record". Writes are plain replacements (last
//! write wins) and every change is pushed synchronously to subscribers.
//!
//! Closing a dialog hides it at once but keeps the targeted row readable so
//! the closing modal can still render its content; the row is dropped when
//! the presentation layer reports the close transition as finished.

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::entity::{Entity, EntityKind};
use crate::domain::types::TypeConstraintError;

/// Which modal of an entity kind is visible.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DialogVariant {
    Add,
    Edit,
    Delete,
}

impl DialogVariant {
    pub const fn as_str(self) -> &'static str {
        match self {
            DialogVariant::Add => "add",
            DialogVariant::Edit => "edit",
            DialogVariant::Delete => "delete",
        }
    }

    /// Variants that operate on an existing row.
    pub const fn targets_row(self) -> bool {
        matches!(self, DialogVariant::Edit | DialogVariant::Delete)
    }

    /// Identifier scoped to an entity kind, e.g. `EditClient`.
    pub fn dialog_name(self, kind: EntityKind) -> String {
        let verb = match self {
            DialogVariant::Add => "Add",
            DialogVariant::Edit => "Edit",
            DialogVariant::Delete => "Delete",
        };
        format!("{verb}{kind}")
    }
}

impl Display for DialogVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialogVariant {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(DialogVariant::Add),
            "edit" => Ok(DialogVariant::Edit),
            "delete" => Ok(DialogVariant::Delete),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Observable state of a [`DialogStore`].
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DialogState<E> {
    pub current_row: Option<E>,
    pub open_dialog: Option<DialogVariant>,
}

impl<E> Default for DialogState<E> {
    fn default() -> Self {
        Self {
            current_row: None,
            open_dialog: None,
        }
    }
}

/// Handle returned by [`DialogStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(usize);

type Listener<E> = Box<dyn Fn(&DialogState<E>) + Send + Sync>;

pub struct DialogStore<E: Entity> {
    state: DialogState<E>,
    close_pending: bool,
    listeners: Vec<(ListenerId, Listener<E>)>,
    next_listener: usize,
}

impl<E: Entity> DialogStore<E> {
    pub fn new() -> Self {
        Self {
            state: DialogState::default(),
            close_pending: false,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn state(&self) -> &DialogState<E> {
        &self.state
    }

    pub fn snapshot(&self) -> DialogState<E> {
        self.state.clone()
    }

    pub fn current_row(&self) -> Option<&E> {
        self.state.current_row.as_ref()
    }

    pub fn open_dialog(&self) -> Option<DialogVariant> {
        self.state.open_dialog
    }

    /// Identifier of the open dialog, e.g. `DeleteVendor`.
    pub fn dialog_name(&self) -> Option<String> {
        self.state.open_dialog.map(|v| v.dialog_name(E::KIND))
    }

    /// A close was requested and the row is still held for the transition.
    pub fn is_closing(&self) -> bool {
        self.close_pending
    }

    /// Shows the given dialog, or hides the current one when `None`.
    ///
    /// Opening `Add` drops any targeted row. Hiding keeps the row until
    /// [`Self::close_transition_complete`] is called.
    pub fn set_open_dialog(&mut self, variant: Option<DialogVariant>) {
        let before = self.state.clone();

        match variant {
            Some(DialogVariant::Add) => {
                self.state.current_row = None;
                self.close_pending = false;
            }
            Some(_) => self.close_pending = false,
            None => {
                if self.state.open_dialog.is_some() {
                    self.close_pending = true;
                }
            }
        }
        self.state.open_dialog = variant;

        if self.state != before {
            self.notify();
        }
    }

    /// Replaces the row targeted by the Edit or Delete dialog.
    pub fn set_current_row(&mut self, row: Option<E>) {
        if self.state.current_row == row {
            return;
        }
        self.state.current_row = row;
        self.notify();
    }

    /// Hides the open dialog.
    pub fn close(&mut self) {
        self.set_open_dialog(None);
    }

    /// Drops the held row once the close transition has finished.
    ///
    /// A dialog opened again before the transition finished keeps its row.
    pub fn close_transition_complete(&mut self) {
        if !self.close_pending {
            return;
        }
        self.close_pending = false;
        if self.state.open_dialog.is_none() && self.state.current_row.is_some() {
            self.state.current_row = None;
            self.notify();
        }
    }

    /// Registers a listener called synchronously after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&DialogState<E>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}

impl<E: Entity> Default for DialogStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Debug for DialogStore<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogStore")
            .field("kind", &E::KIND)
            .field("state", &self.state)
            .field("close_pending", &self.close_pending)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::client::{Client, ClientStatus};
    use crate::domain::types::{ClientId, VendorId};
    use crate::domain::vendor::{Vendor, VendorStatus};

    fn client(name: &str) -> Client {
        Client {
            id: ClientId::new(Uuid::new_v4()),
            name: name.to_string(),
            email: None,
            phone: None,
            company: None,
            address: None,
            status: ClientStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn vendor() -> Vendor {
        Vendor {
            id: VendorId::new(Uuid::new_v4()),
            name: "Parts Co".into(),
            contact_person: None,
            email: None,
            phone: None,
            address: None,
            status: VendorStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn edit_after_selecting_row_exposes_both() {
        let mut store = DialogStore::<Client>::new();
        let row = client("Acme");

        store.set_current_row(Some(row.clone()));
        store.set_open_dialog(Some(DialogVariant::Edit));

        assert_eq!(
            store.snapshot(),
            DialogState {
                current_row: Some(row),
                open_dialog: Some(DialogVariant::Edit),
            }
        );
        assert_eq!(store.dialog_name().as_deref(), Some("EditClient"));
    }

    #[test]
    fn same_shape_holds_for_other_entity_kinds() {
        let mut store = DialogStore::<Vendor>::new();
        let row = vendor();

        store.set_current_row(Some(row.clone()));
        store.set_open_dialog(Some(DialogVariant::Delete));

        assert_eq!(store.current_row(), Some(&row));
        assert_eq!(store.dialog_name().as_deref(), Some("DeleteVendor"));
    }

    #[test]
    fn closing_keeps_row_until_transition_completes() {
        let mut store = DialogStore::<Client>::new();
        let row = client("Acme");
        store.set_current_row(Some(row.clone()));
        store.set_open_dialog(Some(DialogVariant::Delete));

        store.set_open_dialog(None);

        assert_eq!(store.open_dialog(), None);
        assert_eq!(store.current_row(), Some(&row));
        assert!(store.is_closing());

        store.close_transition_complete();

        assert_eq!(store.current_row(), None);
        assert!(!store.is_closing());
    }

    #[test]
    fn reopening_before_transition_keeps_row() {
        let mut store = DialogStore::<Client>::new();
        let row = client("Acme");
        store.set_current_row(Some(row.clone()));
        store.set_open_dialog(Some(DialogVariant::Edit));

        store.close();
        store.set_open_dialog(Some(DialogVariant::Delete));
        store.close_transition_complete();

        assert_eq!(store.current_row(), Some(&row));
        assert_eq!(store.open_dialog(), Some(DialogVariant::Delete));
    }

    #[test]
    fn opening_add_drops_targeted_row() {
        let mut store = DialogStore::<Client>::new();
        store.set_current_row(Some(client("Acme")));

        store.set_open_dialog(Some(DialogVariant::Add));

        assert_eq!(store.current_row(), None);
        assert_eq!(store.dialog_name().as_deref(), Some("AddClient"));
    }

    #[test]
    fn clearing_row_twice_is_idempotent() {
        let mut store = DialogStore::<Client>::new();
        let calls = Arc::new(Mutex::new(0));
        let seen = Arc::clone(&calls);
        store.subscribe(move |_| *seen.lock().unwrap() += 1);
        store.set_current_row(Some(client("Acme")));

        store.set_current_row(None);
        let after_first = store.snapshot();
        store.set_current_row(None);

        assert_eq!(store.snapshot(), after_first);
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn subscribers_observe_changes_synchronously_in_order() {
        let mut store = DialogStore::<Client>::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&log);
        let first_id = store.subscribe(move |state| {
            first.lock().unwrap().push(("first", state.open_dialog));
        });
        let second = Arc::clone(&log);
        store.subscribe(move |state| {
            second.lock().unwrap().push(("second", state.open_dialog));
        });

        store.set_open_dialog(Some(DialogVariant::Add));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ("first", Some(DialogVariant::Add)),
                ("second", Some(DialogVariant::Add)),
            ]
        );

        assert!(store.unsubscribe(first_id));
        assert!(!store.unsubscribe(first_id));
        store.close();
        assert_eq!(log.lock().unwrap().last(), Some(&("second", None)));
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[test]
    fn last_write_wins() {
        let mut store = DialogStore::<Client>::new();
        let a = client("A");
        let b = client("B");

        store.set_current_row(Some(a));
        store.set_current_row(Some(b.clone()));
        store.set_open_dialog(Some(DialogVariant::Delete));
        store.set_open_dialog(Some(DialogVariant::Edit));

        assert_eq!(store.current_row(), Some(&b));
        assert_eq!(store.open_dialog(), Some(DialogVariant::Edit));
    }

    #[test]
    fn parses_variants_from_query_values() {
        assert_eq!("Edit".parse::<DialogVariant>(), Ok(DialogVariant::Edit));
        assert_eq!(" delete ".parse::<DialogVariant>(), Ok(DialogVariant::Delete));
        assert!("remove".parse::<DialogVariant>().is_err());
        assert!(DialogVariant::Edit.targets_row());
        assert!(!DialogVariant::Add.targets_row());
    }
}
