//! Field constraints shared by the create, update and patch paths.

use super::associations::{CastSubmission, duplicate_actor_ids};
use serde::Serialize;

pub const GENRE_NAME_MAX_CHARS: usize = 40;
pub const ACTOR_NAME_MAX_CHARS: usize = 120;
pub const MOVIE_TITLE_MAX_CHARS: usize = 300;
pub const CHARACTER_MAX_CHARS: usize = 100;

pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A single violated constraint, reported back to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn required_text(field: &str, value: &str, max_chars: usize, out: &mut Vec<FieldViolation>) {
    if value.trim().is_empty() {
        out.push(FieldViolation::new(field, format!("{field} is required")));
    } else if value.chars().count() > max_chars {
        out.push(FieldViolation::new(
            field,
            format!("{field} must be {max_chars} characters or less"),
        ));
    }
}

#[must_use]
pub fn genre_name(name: &str) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    required_text("name", name, GENRE_NAME_MAX_CHARS, &mut violations);

    if name.trim().chars().next().is_some_and(char::is_lowercase) {
        violations.push(FieldViolation::new(
            "name",
            "name must start with an uppercase letter",
        ));
    }

    violations
}

#[must_use]
pub fn actor_name(name: &str) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    required_text("name", name, ACTOR_NAME_MAX_CHARS, &mut violations);
    violations
}

#[must_use]
pub fn movie_title(title: &str) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    required_text("title", title, MOVIE_TITLE_MAX_CHARS, &mut violations);
    violations
}

#[must_use]
pub fn cast(submitted: &[CastSubmission]) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = duplicate_actor_ids(submitted)
        .into_iter()
        .map(|actor_id| {
            FieldViolation::new("actors", format!("actor {actor_id} is listed more than once"))
        })
        .collect();

    for (position, entry) in submitted.iter().enumerate() {
        if entry.character.chars().count() > CHARACTER_MAX_CHARS {
            violations.push(FieldViolation::new(
                format!("actors[{position}].character"),
                format!("character must be {CHARACTER_MAX_CHARS} characters or less"),
            ));
        }
    }

    violations
}

#[must_use]
pub fn image_upload(
    field: &str,
    content_type: &str,
    size: usize,
    max_bytes: usize,
) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if size == 0 {
        violations.push(FieldViolation::new(field, format!("{field} is empty")));
    } else if size > max_bytes {
        violations.push(FieldViolation::new(
            field,
            format!("{field} must not exceed {max_bytes} bytes"),
        ));
    }

    if !ACCEPTED_IMAGE_TYPES.contains(&content_type) {
        violations.push(FieldViolation::new(
            field,
            format!(
                "{field} must be one of: {}",
                ACCEPTED_IMAGE_TYPES.join(", ")
            ),
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_name_rules() {
        assert!(genre_name("Drama").is_empty());
        assert_eq!(genre_name("").len(), 1);
        assert_eq!(genre_name("drama").len(), 1);
        assert!(!genre_name(&"A".repeat(41)).is_empty());
        assert!(genre_name("3D").is_empty());
    }

    #[test]
    fn actor_and_title_rules() {
        assert!(actor_name("Ana de Armas").is_empty());
        assert_eq!(actor_name("   ")[0].field, "name");
        assert!(movie_title("Heat").is_empty());
        assert!(!movie_title(&"t".repeat(301)).is_empty());
    }

    #[test]
    fn cast_rejects_duplicates_and_long_characters() {
        let submitted = vec![
            CastSubmission::new(1, "A"),
            CastSubmission::new(1, "B"),
            CastSubmission::new(2, "x".repeat(101)),
        ];
        let violations = cast(&submitted);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[1].field, "actors[2].character");
    }

    #[test]
    fn image_upload_rules() {
        assert!(image_upload("poster", "image/png", 10, 100).is_empty());
        assert_eq!(image_upload("poster", "image/png", 0, 100).len(), 1);
        assert_eq!(image_upload("poster", "image/png", 101, 100).len(), 1);
        assert_eq!(image_upload("poster", "text/plain", 10, 100).len(), 1);
    }
}
