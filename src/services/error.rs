//! Errors raised by the catalog services.

use crate::assets::AssetError;
use crate::catalog::FieldViolation;
use crate::domain::EntityKind;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i32 },

    #[error("Unknown {kind} ids: {ids:?}")]
    InvalidReference { kind: EntityKind, ids: Vec<i32> },

    #[error("Validation failed ({} violations)", .0.len())]
    ValidationFailed(Vec<FieldViolation>),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl CatalogError {
    #[must_use]
    pub const fn not_found(kind: EntityKind, id: i32) -> Self {
        Self::NotFound { kind, id }
    }

    /// `Ok(())` for an empty violation list.
    pub fn check(violations: Vec<FieldViolation>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self::ValidationFailed(violations))
        }
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<AssetError> for CatalogError {
    fn from(err: AssetError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Ids from `requested` that are absent from `found`, in request order and
/// each reported once.
#[must_use]
pub fn missing_ids(requested: &[i32], found: &[i32]) -> Vec<i32> {
    let found: HashSet<i32> = found.iter().copied().collect();
    let mut reported = HashSet::new();
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id) && reported.insert(*id))
        .collect()
}
