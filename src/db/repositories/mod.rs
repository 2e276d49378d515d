pub mod actor;
pub mod genre;
pub mod movie;
