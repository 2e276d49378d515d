use super::ApiError;
use crate::domain::EntityKind;

pub fn validate_id(kind: EntityKind, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            kind, id
        )));
    }
    Ok(id)
}
