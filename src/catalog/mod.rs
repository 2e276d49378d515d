//! Query composition and relation management for the movie catalog.
//!
//! Everything in here is free of I/O except [`pagination::fetch_page`], which
//! runs an already-composed query. Services combine these pieces into the
//! create/update/patch flows.

pub mod associations;
pub mod filter;
pub mod pagination;
pub mod params;
pub mod patch;
pub mod validation;

pub use associations::{CastMember, CastPlan, CastSubmission, GenrePlan};
pub use filter::MovieFilter;
pub use pagination::{Page, PageRequest, PageWindow};
pub use patch::{PatchOperation, Patchable};
pub use validation::FieldViolation;
