//! Strongly-typed value objects used by domain entities.
//!
//! Identifiers wrap the backend's UUID primary keys so a quote id can never be
//! passed where a client id is expected. Status enumerations mirror the
//! string values stored by the backend.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationError;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Provided uuid failed format validation.
    #[error("invalid uuid value")]
    InvalidUuid,
    /// Currency code is not three ASCII letters.
    #[error("invalid currency code")]
    InvalidCurrencyCode,
}

/// Macro to generate lightweight newtypes for UUID record identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            pub const fn new(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the raw UUID backing this identifier.
            pub const fn get(self) -> Uuid {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| TypeConstraintError::InvalidUuid)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ClientId, "Unique identifier for a client.");
id_newtype!(LeadId, "Unique identifier for a lead.");
id_newtype!(QuoteId, "Unique identifier for a quote sent to a client.");
id_newtype!(VendorId, "Unique identifier for a vendor.");
id_newtype!(SalesOrderId, "Unique identifier for a sales order.");
id_newtype!(RequirementId, "Unique identifier for a client requirement.");
id_newtype!(
    RequirementItemId,
    "Unique identifier for a line item of a requirement."
);
id_newtype!(VendorQuoteId, "Unique identifier for a vendor quote.");
id_newtype!(ExpenseId, "Unique identifier for an expense.");
id_newtype!(UserId, "Unique identifier for an auth user and its profile.");

/// Generates a status enumeration stored as a lowercase string by the backend.
macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, ::serde::Serialize, ::serde::Deserialize, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Stored values in declaration order, used to populate select inputs.
            pub const OPTIONS: &'static [&'static str] = &[$($value),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::types::TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($value => Ok(Self::$variant),)+
                    other => Err($crate::domain::types::TypeConstraintError::InvalidValue(
                        other.to_string(),
                    )),
                }
            }
        }
    };
}

pub(crate) use status_enum;

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Trims an optional text value, dropping it entirely when nothing remains.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Trims and lower-cases an optional email address.
pub fn normalize_email(value: Option<String>) -> Option<String> {
    normalize_text(value).map(|s| s.to_lowercase())
}

/// Upper-cases a currency code after trimming.
pub fn normalize_currency_code(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Checks that the trimmed value is a three-letter ISO 4217 style code.
pub fn parse_currency_code(value: &str) -> Result<String, TypeConstraintError> {
    let code = normalize_currency_code(value);
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(TypeConstraintError::InvalidCurrencyCode)
    }
}

/// `validator` hook for currency code fields.
pub fn validate_currency_code(value: &str) -> Result<(), ValidationError> {
    parse_currency_code(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("currency_code"))
}

/// `validator` hook for monetary amounts: finite and not negative.
///
/// `range` alone lets `NaN` through, and a non-finite amount would be sent
/// to the backend as `null`.
pub fn validate_amount<T: std::borrow::Borrow<f64>>(value: T) -> Result<(), ValidationError> {
    let value = *value.borrow();
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("amount"))
    }
}

/// Deserializes optional form inputs, treating blank strings as absent.
///
/// HTML forms submit every input, so an untouched optional number or date
/// arrives as `""` rather than being omitted.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}
