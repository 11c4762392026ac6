//! Application users: profile rows and the joined auth listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entity::{Column, Entity, EntityDraft, EntityKind, FormField, InputKind};
use crate::domain::role::{Capability, Role};
use crate::domain::types::{UserId, empty_as_none, normalize_text};

/// Profile row keyed by the auth user's id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct UserDraft {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
    pub role: Role,
}

/// Row returned by the `get_auth_users` procedure: a profile joined with
/// its auth record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// The signed-in user as resolved from the backend for one request.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    /// Bearer token for user-scoped backend calls.
    #[serde(skip_serializing)]
    pub access_token: String,
}

impl AuthenticatedUser {
    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }
}

impl EntityDraft for UserDraft {
    fn normalized(self) -> Self {
        Self {
            full_name: normalize_text(self.full_name),
            role: self.role,
        }
    }
}

impl Entity for User {
    type Id = UserId;
    type Draft = UserDraft;

    const KIND: EntityKind = EntityKind::User;
    const COLUMNS: &'static [Column] = &[
        Column::new("email", "Email"),
        Column::new("full_name", "Name"),
        Column::new("role", "Role"),
        Column::new("created_at", "Created"),
    ];
    const FORM_FIELDS: &'static [FormField] = &[
        FormField::optional("full_name", "Full name", InputKind::Text),
        FormField::required("role", "Role", InputKind::Select(Role::OPTIONS)),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["email", "full_name"];
    const CAN_ADD: bool = false;
    const WRITE_CAPABILITY: Option<Capability> = Some(Capability::ManageUsers);

    fn id(&self) -> UserId {
        self.id
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            full_name: self.full_name.clone(),
            role: self.role,
        }
    }
}
