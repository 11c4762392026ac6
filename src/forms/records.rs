use uuid::Uuid;

use crate::domain::entity::Entity;
use crate::forms::FormError;

/// Parses a row id taken from a path segment or the `row` query parameter.
pub fn parse_row_id<E: Entity>(raw: &str) -> Result<E::Id, FormError> {
    Uuid::parse_str(raw.trim())
        .map(E::Id::from)
        .map_err(|_| FormError::InvalidRowId)
}
