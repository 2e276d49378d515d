use super::params::{lenient, lenient_flag};
use crate::entities::{movie_genres, movies};
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, LikeExpr, Query, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};
use serde::Deserialize;

/// Optional movie search criteria. Every present criterion narrows the
/// result; absent ones impose nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieFilter {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Only `Some(true)` narrows.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub in_theaters: Option<bool>,
    /// Only `Some(true)` narrows, to releases strictly after `today`.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub upcoming_only: Option<bool>,
    /// `0` means no constraint.
    #[serde(default, deserialize_with = "lenient")]
    pub genre_id: Option<i32>,
}

impl MovieFilter {
    /// One predicate per present criterion, in no meaningful order.
    #[must_use]
    pub fn predicates(&self, today: NaiveDate) -> Vec<SimpleExpr> {
        let mut predicates = Vec::new();

        if let Some(pattern) = self.title_pattern() {
            predicates.push(
                Expr::col(movies::Column::TitleSearch)
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        if self.in_theaters == Some(true) {
            predicates.push(movies::Column::InTheaters.eq(true));
        }

        if self.upcoming_only == Some(true) {
            predicates.push(movies::Column::ReleaseDate.gt(today));
        }

        if let Some(genre_id) = self.genre_id.filter(|id| *id != 0) {
            predicates.push(
                movies::Column::Id.in_subquery(
                    Query::select()
                        .column(movie_genres::Column::MovieId)
                        .from(movie_genres::Entity)
                        .and_where(movie_genres::Column::GenreId.eq(genre_id))
                        .to_owned(),
                ),
            );
        }

        predicates
    }

    /// Conjunction of [`Self::predicates`]. Does not touch the database.
    #[must_use]
    pub fn condition(&self, today: NaiveDate) -> Condition {
        self.predicates(today)
            .into_iter()
            .fold(Condition::all(), |condition, predicate| condition.add(predicate))
    }

    fn title_pattern(&self) -> Option<String> {
        let needle = self.title.as_deref()?.trim();
        if needle.is_empty() {
            return None;
        }
        Some(format!("%{}%", escape_like(&search_key(needle))))
    }
}

/// The form a title is stored and searched in. SQLite's `lower()` and `LIKE`
/// only fold ASCII, so folding happens here for both sides of the match.
#[must_use]
pub fn search_key(text: &str) -> String {
    text.to_lowercase()
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn sql(filter: &MovieFilter) -> String {
        movies::Entity::find()
            .filter(filter.condition(today()))
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let filter = MovieFilter::default();
        assert!(filter.predicates(today()).is_empty());
        assert!(!sql(&filter).contains("WHERE"));
    }

    #[test]
    fn false_flags_and_zero_genre_impose_nothing() {
        let filter = MovieFilter {
            title: Some("   ".to_string()),
            in_theaters: Some(false),
            upcoming_only: Some(false),
            genre_id: Some(0),
        };
        assert!(filter.predicates(today()).is_empty());
    }

    #[test]
    fn each_criterion_contributes_one_predicate() {
        let filter = MovieFilter {
            title: Some("Matrix".to_string()),
            in_theaters: Some(true),
            upcoming_only: Some(true),
            genre_id: Some(3),
        };
        assert_eq!(filter.predicates(today()).len(), 4);

        let rendered = sql(&filter);
        assert!(rendered.contains("LIKE '%matrix%'"));
        assert!(rendered.contains("\"in_theaters\""));
        assert!(rendered.contains("\"release_date\" > '2025-06-01'"));
        assert!(rendered.contains("\"genre_id\" = 3"));
        assert!(rendered.contains(" AND "));
    }

    #[test]
    fn like_wildcards_in_title_are_escaped() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");

        let filter = MovieFilter {
            title: Some("50% Off".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.title_pattern().as_deref(), Some("%50\\% off%"));
    }

    #[test]
    fn title_search_folds_non_ascii() {
        assert_eq!(search_key("Élite Squad"), "élite squad");

        let filter = MovieFilter {
            title: Some("ÉLITE".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.title_pattern().as_deref(), Some("%élite%"));
        assert!(sql(&filter).contains("\"title_search\" LIKE"));
    }

    #[test]
    fn predicate_order_does_not_change_the_rows_matched() {
        let filter = MovieFilter {
            title: Some("heat".to_string()),
            in_theaters: Some(true),
            genre_id: Some(2),
            ..Default::default()
        };
        let forward = filter.predicates(today());
        let mut reversed = forward.clone();
        reversed.reverse();

        let render = |predicates: Vec<SimpleExpr>| {
            let condition = predicates
                .into_iter()
                .fold(Condition::all(), |condition, predicate| condition.add(predicate));
            let rendered = movies::Entity::find()
                .filter(condition)
                .build(DbBackend::Sqlite)
                .to_string();
            let (_, clause) = rendered.split_once(" WHERE ").unwrap_or_default();
            let mut terms: Vec<String> = clause.split(" AND ").map(str::to_string).collect();
            terms.sort();
            terms
        };

        assert_eq!(render(forward), render(reversed));
    }
}
