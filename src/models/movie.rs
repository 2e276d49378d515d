use crate::catalog::associations::{CastMember, CastSubmission};
use crate::catalog::patch::{Patchable, decode_field, unknown_field};
use crate::catalog::validation::{self, FieldViolation};
use crate::entities::movies;
use crate::models::genre::Genre;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    pub poster: Option<String>,
}

impl From<movies::Model> for Movie {
    fn from(model: movies::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            in_theaters: model.in_theaters,
            release_date: model.release_date,
            poster: model.poster,
        }
    }
}

/// A movie together with its stored associations, as loaded for an update.
#[derive(Debug, Clone)]
pub struct MovieAggregate {
    pub movie: Movie,
    /// Sorted by cast order.
    pub cast: Vec<CastMember>,
    pub genre_ids: Vec<i32>,
}

/// Cast row joined with the actor it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastCredit {
    pub actor_id: i32,
    pub name: String,
    pub photo: Option<String>,
    pub character: String,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieDetails {
    pub movie: Movie,
    pub cast: Vec<CastCredit>,
    pub genres: Vec<Genre>,
}

/// Landing page sections.
#[derive(Debug, Clone, Serialize)]
pub struct MovieIndex {
    pub upcoming_releases: Vec<Movie>,
    pub in_theaters: Vec<Movie>,
}

/// Fields supplied on create and full update.
///
/// `cast` and `genre_ids` distinguish "not submitted" (`None`, keep what is
/// stored) from "submitted empty" (`Some(vec![])`, clear everything).
#[derive(Debug, Clone)]
pub struct MovieInput {
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    pub cast: Option<Vec<CastSubmission>>,
    pub genre_ids: Option<Vec<i32>>,
}

impl MovieInput {
    #[must_use]
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = validation::movie_title(&self.title);
        if let Some(cast) = &self.cast {
            violations.extend(validation::cast(cast));
        }
        violations
    }

    pub(crate) fn apply_to(&self, movie: &mut Movie) {
        movie.title.clone_from(&self.title);
        movie.in_theaters = self.in_theaters;
        movie.release_date = self.release_date;
    }
}

/// Patchable projection of a movie. Associations and the poster are not
/// reachable through a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePatch {
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
}

impl From<&Movie> for MoviePatch {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            in_theaters: movie.in_theaters,
            release_date: movie.release_date,
        }
    }
}

impl MoviePatch {
    pub(crate) fn merge_into(self, movie: &mut Movie) {
        movie.title = self.title;
        movie.in_theaters = self.in_theaters;
        movie.release_date = self.release_date;
    }
}

impl Patchable for MoviePatch {
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), FieldViolation> {
        match field {
            "title" => self.title = decode_field(field, value)?,
            "in_theaters" => self.in_theaters = decode_field(field, value)?,
            "release_date" => self.release_date = decode_field(field, value)?,
            _ => return Err(unknown_field(field)),
        }
        Ok(())
    }

    fn validate(&self) -> Vec<FieldViolation> {
        validation::movie_title(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::patch::{PatchOperation, materialize};
    use serde_json::json;

    fn movie() -> Movie {
        Movie {
            id: 1,
            title: "Heat".to_string(),
            in_theaters: false,
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15).unwrap(),
            poster: Some("/assets/movies/heat.png".to_string()),
        }
    }

    #[test]
    fn patch_then_merge_keeps_untouched_fields() {
        let mut stored = movie();
        let patched = materialize(
            MoviePatch::from(&stored),
            &[
                PatchOperation::replace("/in_theaters", json!(true)),
                PatchOperation::replace("/release_date", json!("2025-01-31")),
            ],
        )
        .unwrap();
        patched.merge_into(&mut stored);

        assert!(stored.in_theaters);
        assert_eq!(stored.release_date, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(stored.title, "Heat");
        assert_eq!(stored.poster.as_deref(), Some("/assets/movies/heat.png"));
    }

    #[test]
    fn poster_and_cast_are_not_patchable() {
        let stored = movie();
        let errors = materialize(
            MoviePatch::from(&stored),
            &[
                PatchOperation::replace("/poster", json!("x")),
                PatchOperation::replace("/actors", json!([])),
            ],
        )
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn invalid_patch_leaves_stored_entity_alone() {
        let stored = movie();
        let result = materialize(
            MoviePatch::from(&stored),
            &[PatchOperation::replace("/title", json!(""))],
        );
        assert!(result.is_err());
        assert_eq!(stored.title, "Heat");
    }

    #[test]
    fn input_validation_covers_cast() {
        let input = MovieInput {
            title: String::new(),
            in_theaters: true,
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            cast: Some(vec![CastSubmission::new(1, "A"), CastSubmission::new(1, "B")]),
            genre_ids: None,
        };
        let fields: Vec<String> = input.validate().into_iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["title".to_string(), "actors".to_string()]);
    }
}
