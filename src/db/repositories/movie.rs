use crate::catalog::associations::{CastMember, CastPlan, GenrePlan, assign_cast_order};
use crate::catalog::filter::{MovieFilter, search_key};
use crate::catalog::pagination::{Page, PageWindow, fetch_page};
use crate::catalog::CastSubmission;
use crate::entities::{genres, movie_actors, movie_genres, movies, prelude::*};
use crate::models::genre::Genre;
use crate::models::movie::{CastCredit, Movie, MovieAggregate, MovieDetails, MovieIndex};
use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// Repository for movies and the associations they own
pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Upcoming releases (soonest first) and movies in theaters, each capped
    /// at `limit`.
    pub async fn index(&self, today: NaiveDate, limit: u64) -> Result<MovieIndex> {
        let upcoming = Movies::find()
            .filter(movies::Column::ReleaseDate.gt(today))
            .order_by_asc(movies::Column::ReleaseDate)
            .order_by_asc(movies::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        let in_theaters = Movies::find()
            .filter(movies::Column::InTheaters.eq(true))
            .order_by_asc(movies::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(MovieIndex {
            upcoming_releases: upcoming.into_iter().map(Movie::from).collect(),
            in_theaters: in_theaters.into_iter().map(Movie::from).collect(),
        })
    }

    pub async fn filter(
        &self,
        filter: &MovieFilter,
        today: NaiveDate,
        window: PageWindow,
    ) -> Result<Page<Movie>> {
        let query = Movies::find()
            .filter(filter.condition(today))
            .order_by_asc(movies::Column::Id);

        let page = fetch_page(query, window, &self.conn).await?;
        Ok(page.map(Movie::from))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let row = Movies::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Movie::from))
    }

    /// The movie with its cast (by order) and genre ids, as needed to plan an
    /// update.
    pub async fn get_aggregate(&self, id: i32) -> Result<Option<MovieAggregate>> {
        let Some(movie) = Movies::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let cast = MovieActors::find()
            .filter(movie_actors::Column::MovieId.eq(id))
            .order_by_asc(movie_actors::Column::CastOrder)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|row| CastMember {
                actor_id: row.actor_id,
                character: row.character,
                order: row.cast_order,
            })
            .collect();

        let genre_ids: Vec<i32> = MovieGenres::find()
            .select_only()
            .column(movie_genres::Column::GenreId)
            .filter(movie_genres::Column::MovieId.eq(id))
            .order_by_asc(movie_genres::Column::GenreId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(Some(MovieAggregate {
            movie: Movie::from(movie),
            cast,
            genre_ids,
        }))
    }

    /// The movie with its cast resolved to actors and its genres resolved to
    /// names.
    pub async fn details(&self, id: i32) -> Result<Option<MovieDetails>> {
        let Some(movie) = Movies::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let cast = MovieActors::find()
            .filter(movie_actors::Column::MovieId.eq(id))
            .order_by_asc(movie_actors::Column::CastOrder)
            .find_also_related(Actors)
            .all(&self.conn)
            .await?
            .into_iter()
            .filter_map(|(row, actor)| {
                actor.map(|actor| CastCredit {
                    actor_id: actor.id,
                    name: actor.name,
                    photo: actor.photo,
                    character: row.character,
                    order: row.cast_order,
                })
            })
            .collect();

        let genres = movie
            .find_related(Genres)
            .order_by_asc(genres::Column::Name)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(Genre::from)
            .collect();

        Ok(Some(MovieDetails {
            movie: Movie::from(movie),
            cast,
            genres,
        }))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Inserts the movie and its associations in one transaction. Cast order
    /// is taken from the position in `cast`.
    pub async fn create(
        &self,
        movie: &Movie,
        cast: &[CastSubmission],
        genre_ids: &[i32],
    ) -> Result<Movie> {
        let txn = self.conn.begin().await?;

        let model = movies::ActiveModel {
            title: Set(movie.title.clone()),
            title_search: Set(search_key(&movie.title)),
            in_theaters: Set(movie.in_theaters),
            release_date: Set(movie.release_date),
            poster: Set(movie.poster.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_cast(&txn, model.id, &assign_cast_order(cast)).await?;
        insert_genres(&txn, model.id, genre_ids).await?;

        txn.commit().await?;
        Ok(Movie::from(model))
    }

    /// Writes the scalar fields of `movie` and applies whichever association
    /// plans are given, all in one transaction. Returns `false` when the
    /// movie no longer exists.
    pub async fn update(
        &self,
        movie: &Movie,
        cast: Option<&CastPlan>,
        genres: Option<&GenrePlan>,
    ) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let result = Movies::update_many()
            .col_expr(movies::Column::Title, movie.title.clone().into())
            .col_expr(movies::Column::TitleSearch, search_key(&movie.title).into())
            .col_expr(movies::Column::InTheaters, movie.in_theaters.into())
            .col_expr(movies::Column::ReleaseDate, movie.release_date.into())
            .col_expr(movies::Column::Poster, movie.poster.clone().into())
            .filter(movies::Column::Id.eq(movie.id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        if let Some(plan) = cast {
            apply_cast_plan(&txn, movie.id, plan).await?;
        }

        if let Some(plan) = genres {
            apply_genre_plan(&txn, movie.id, plan).await?;
        }

        txn.commit().await?;
        Ok(true)
    }

    /// Removes the movie and its associations. Returns the deleted movie so
    /// the caller can release its poster.
    pub async fn delete(&self, id: i32) -> Result<Option<Movie>> {
        let txn = self.conn.begin().await?;

        let Some(movie) = Movies::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        MovieActors::delete_many()
            .filter(movie_actors::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;

        MovieGenres::delete_many()
            .filter(movie_genres::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;

        Movies::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(Some(Movie::from(movie)))
    }
}

// ============================================================================
// Association helpers
// ============================================================================

async fn insert_cast<C: ConnectionTrait>(conn: &C, movie_id: i32, cast: &[CastMember]) -> Result<()> {
    if cast.is_empty() {
        return Ok(());
    }

    let rows: Vec<movie_actors::ActiveModel> = cast
        .iter()
        .map(|member| movie_actors::ActiveModel {
            movie_id: Set(movie_id),
            actor_id: Set(member.actor_id),
            character: Set(member.character.clone()),
            cast_order: Set(member.order),
        })
        .collect();

    MovieActors::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn insert_genres<C: ConnectionTrait>(conn: &C, movie_id: i32, genre_ids: &[i32]) -> Result<()> {
    if genre_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<movie_genres::ActiveModel> = genre_ids
        .iter()
        .map(|genre_id| movie_genres::ActiveModel {
            movie_id: Set(movie_id),
            genre_id: Set(*genre_id),
        })
        .collect();

    MovieGenres::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn apply_cast_plan<C: ConnectionTrait>(conn: &C, movie_id: i32, plan: &CastPlan) -> Result<()> {
    if !plan.remove.is_empty() {
        MovieActors::delete_many()
            .filter(movie_actors::Column::MovieId.eq(movie_id))
            .filter(movie_actors::Column::ActorId.is_in(plan.remove.iter().copied()))
            .exec(conn)
            .await?;
    }

    for member in &plan.retain {
        MovieActors::update_many()
            .col_expr(movie_actors::Column::Character, member.character.clone().into())
            .col_expr(movie_actors::Column::CastOrder, member.order.into())
            .filter(movie_actors::Column::MovieId.eq(movie_id))
            .filter(movie_actors::Column::ActorId.eq(member.actor_id))
            .exec(conn)
            .await?;
    }

    insert_cast(conn, movie_id, &plan.insert).await
}

async fn apply_genre_plan<C: ConnectionTrait>(
    conn: &C,
    movie_id: i32,
    plan: &GenrePlan,
) -> Result<()> {
    if !plan.remove.is_empty() {
        MovieGenres::delete_many()
            .filter(movie_genres::Column::MovieId.eq(movie_id))
            .filter(movie_genres::Column::GenreId.is_in(plan.remove.iter().copied()))
            .exec(conn)
            .await?;
    }

    insert_genres(conn, movie_id, &plan.insert).await
}
