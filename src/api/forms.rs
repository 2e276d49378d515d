//! Multipart bodies of the movie and actor write endpoints.

use axum::extract::Multipart;
use chrono::NaiveDate;
use std::collections::HashMap;

use super::ApiError;
use crate::assets::AssetUpload;
use crate::catalog::{CastSubmission, FieldViolation};
use crate::constants::fields;
use crate::models::actor::ActorInput;
use crate::models::movie::MovieInput;

/// Text fields and files of one multipart body, keyed by field name.
#[derive(Debug, Default)]
struct FormParts {
    text: HashMap<String, String>,
    files: HashMap<String, AssetUpload>,
}

impl FormParts {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut parts = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read {name}: {e}")))?;

                // Browsers send an empty, unnamed part for an untouched file input.
                if content.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
                    continue;
                }

                parts.files.insert(
                    name,
                    AssetUpload::from_file(
                        content.to_vec(),
                        file_name.as_deref(),
                        content_type.as_deref(),
                    ),
                );
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read {name}: {e}")))?;
                parts.text.insert(name, value);
            }
        }

        Ok(parts)
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.text.get(field).map(String::as_str)
    }

    fn required(&self, field: &str, violations: &mut Vec<FieldViolation>) -> Option<&str> {
        let value = self.text(field);
        if value.is_none() {
            violations.push(FieldViolation::new(field, format!("{field} is required")));
        }
        value
    }

    fn take_file(&mut self, field: &str) -> Option<AssetUpload> {
        self.files.remove(field)
    }
}

fn parse_date(field: &str, raw: &str, violations: &mut Vec<FieldViolation>) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            violations.push(FieldViolation::new(
                field,
                format!("{field} must be a date in YYYY-MM-DD format"),
            ));
            None
        }
    }
}

fn parse_bool(field: &str, raw: &str, violations: &mut Vec<FieldViolation>) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => true,
        "false" | "off" | "0" | "" => false,
        _ => {
            violations.push(FieldViolation::new(field, format!("{field} must be true or false")));
            false
        }
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(
    field: &str,
    raw: Option<&str>,
    violations: &mut Vec<FieldViolation>,
) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            violations.push(FieldViolation::new(field, format!("{field} is not valid JSON: {e}")));
            None
        }
    }
}

fn rejected(violations: Vec<FieldViolation>) -> ApiError {
    ApiError::ValidationError {
        message: "Request failed validation".to_string(),
        violations,
    }
}

/// Reads a movie create/update body. `genre_ids` and `actors` stay `None`
/// when the field is not sent at all.
pub async fn movie_form(
    multipart: Multipart,
) -> Result<(MovieInput, Option<AssetUpload>), ApiError> {
    let mut parts = FormParts::read(multipart).await?;
    let mut violations = Vec::new();

    let title = parts.required("title", &mut violations).map(str::to_string);
    let release_date = parts
        .required("release_date", &mut violations)
        .and_then(|raw| parse_date("release_date", raw, &mut violations));
    let in_theaters = parts
        .text("in_theaters")
        .is_some_and(|raw| parse_bool("in_theaters", raw, &mut violations));
    let genre_ids: Option<Vec<i32>> =
        parse_json("genre_ids", parts.text("genre_ids"), &mut violations);
    let cast: Option<Vec<CastSubmission>> =
        parse_json("actors", parts.text("actors"), &mut violations);

    let (Some(title), Some(release_date)) = (title, release_date) else {
        return Err(rejected(violations));
    };
    if !violations.is_empty() {
        return Err(rejected(violations));
    }

    let poster = parts.take_file(fields::POSTER);

    Ok((
        MovieInput {
            title,
            in_theaters,
            release_date,
            cast,
            genre_ids,
        },
        poster,
    ))
}

pub async fn actor_form(
    multipart: Multipart,
) -> Result<(ActorInput, Option<AssetUpload>), ApiError> {
    let mut parts = FormParts::read(multipart).await?;
    let mut violations = Vec::new();

    let name = parts.required("name", &mut violations).map(str::to_string);
    let birth_date = parts
        .required("birth_date", &mut violations)
        .and_then(|raw| parse_date("birth_date", raw, &mut violations));

    let (Some(name), Some(birth_date)) = (name, birth_date) else {
        return Err(rejected(violations));
    };

    let photo = parts.take_file(fields::PHOTO);

    Ok((ActorInput { name, birth_date }, photo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_must_be_iso() {
        let mut violations = Vec::new();
        assert_eq!(
            parse_date("release_date", "2024-02-29", &mut violations),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_date("release_date", "29/02/2024", &mut violations).is_none());
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn bools_accept_form_spellings() {
        let mut violations = Vec::new();
        assert!(parse_bool("in_theaters", "on", &mut violations));
        assert!(!parse_bool("in_theaters", "False", &mut violations));
        assert!(!parse_bool("in_theaters", "maybe", &mut violations));
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn absent_json_list_is_none_not_empty() {
        let mut violations = Vec::new();
        let absent: Option<Vec<i32>> = parse_json("genre_ids", None, &mut violations);
        assert!(absent.is_none());

        let empty: Option<Vec<i32>> = parse_json("genre_ids", Some("[]"), &mut violations);
        assert_eq!(empty, Some(Vec::new()));

        let cast: Option<Vec<CastSubmission>> = parse_json(
            "actors",
            Some(r#"[{"actor_id": 2, "character": "Bob"}, {"actor_id": 1}]"#),
            &mut violations,
        );
        assert_eq!(
            cast,
            Some(vec![CastSubmission::new(2, "Bob"), CastSubmission::new(1, "")])
        );
        assert!(violations.is_empty());
    }
}
