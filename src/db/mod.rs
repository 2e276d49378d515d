use crate::catalog::associations::{CastPlan, GenrePlan};
use crate::catalog::filter::MovieFilter;
use crate::catalog::pagination::{Page, PageWindow};
use crate::catalog::CastSubmission;
use crate::models::actor::{Actor, ActorInput};
use crate::models::genre::Genre;
use crate::models::movie::{Movie, MovieAggregate, MovieDetails, MovieIndex};
use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

fn is_in_memory(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// Connects and brings the schema up to date.
    ///
    /// An in-memory database lives and dies with its connection, so it is
    /// always opened with a single connection that never expires.
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = is_in_memory(db_url);

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn genre_repo(&self) -> repositories::genre::GenreRepository {
        repositories::genre::GenreRepository::new(self.conn.clone())
    }

    fn actor_repo(&self) -> repositories::actor::ActorRepository {
        repositories::actor::ActorRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    // Genres

    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.genre_repo().list_all().await
    }

    pub async fn get_genre(&self, id: i32) -> Result<Option<Genre>> {
        self.genre_repo().get(id).await
    }

    pub async fn add_genre(&self, name: &str) -> Result<Genre> {
        self.genre_repo().create(name).await
    }

    pub async fn rename_genre(&self, id: i32, name: &str) -> Result<bool> {
        self.genre_repo().update(id, name).await
    }

    pub async fn remove_genre(&self, id: i32) -> Result<bool> {
        self.genre_repo().delete(id).await
    }

    pub async fn existing_genre_ids(&self, ids: &[i32]) -> Result<Vec<i32>> {
        self.genre_repo().existing_ids(ids).await
    }

    // Actors

    pub async fn list_actors(&self, window: PageWindow) -> Result<Page<Actor>> {
        self.actor_repo().list_page(window).await
    }

    pub async fn get_actor(&self, id: i32) -> Result<Option<Actor>> {
        self.actor_repo().get(id).await
    }

    pub async fn add_actor(&self, input: &ActorInput, photo: Option<String>) -> Result<Actor> {
        self.actor_repo().create(input, photo).await
    }

    pub async fn save_actor(&self, actor: &Actor) -> Result<bool> {
        self.actor_repo().update(actor).await
    }

    pub async fn remove_actor(&self, id: i32) -> Result<Option<Actor>> {
        self.actor_repo().delete(id).await
    }

    pub async fn existing_actor_ids(&self, ids: &[i32]) -> Result<Vec<i32>> {
        self.actor_repo().existing_ids(ids).await
    }

    // Movies

    pub async fn movie_index(&self, today: NaiveDate, limit: u64) -> Result<MovieIndex> {
        self.movie_repo().index(today, limit).await
    }

    pub async fn filter_movies(
        &self,
        filter: &MovieFilter,
        today: NaiveDate,
        window: PageWindow,
    ) -> Result<Page<Movie>> {
        self.movie_repo().filter(filter, today, window).await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn get_movie_aggregate(&self, id: i32) -> Result<Option<MovieAggregate>> {
        self.movie_repo().get_aggregate(id).await
    }

    pub async fn get_movie_details(&self, id: i32) -> Result<Option<MovieDetails>> {
        self.movie_repo().details(id).await
    }

    pub async fn add_movie(
        &self,
        movie: &Movie,
        cast: &[CastSubmission],
        genre_ids: &[i32],
    ) -> Result<Movie> {
        self.movie_repo().create(movie, cast, genre_ids).await
    }

    pub async fn save_movie(
        &self,
        movie: &Movie,
        cast: Option<&CastPlan>,
        genres: Option<&GenrePlan>,
    ) -> Result<bool> {
        self.movie_repo().update(movie, cast, genres).await
    }

    pub async fn remove_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PageRequest;
    use crate::catalog::associations::{is_dense, reconcile_cast, reconcile_genres};
    use crate::config::PaginationConfig;

    async fn store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn movie(title: &str, in_theaters: bool, release_date: NaiveDate) -> Movie {
        Movie {
            id: 0,
            title: title.to_string(),
            in_theaters,
            release_date,
            poster: None,
        }
    }

    async fn actor(store: &Store, name: &str) -> Actor {
        store
            .add_actor(
                &ActorInput {
                    name: name.to_string(),
                    birth_date: date(1980, 1, 1),
                },
                None,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn genre_crud_and_existing_ids() {
        let store = store().await;
        let drama = store.add_genre("Drama").await.unwrap();
        let comedy = store.add_genre("Comedy").await.unwrap();

        let names: Vec<String> = store
            .list_genres()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Comedy", "Drama"]);

        assert!(store.rename_genre(drama.id, "Thriller").await.unwrap());
        assert!(!store.rename_genre(999, "Nope").await.unwrap());

        let mut found = store
            .existing_genre_ids(&[drama.id, comedy.id, 999])
            .await
            .unwrap();
        found.sort_unstable();
        assert_eq!(found, vec![drama.id, comedy.id]);

        assert!(store.remove_genre(comedy.id).await.unwrap());
        assert!(!store.remove_genre(comedy.id).await.unwrap());
    }

    #[tokio::test]
    async fn create_stores_cast_in_submission_order() {
        let store = store().await;
        let ana = actor(&store, "Ana").await;
        let bob = actor(&store, "Bob").await;
        let drama = store.add_genre("Drama").await.unwrap();

        let created = store
            .add_movie(
                &movie("Heat", true, date(1995, 12, 15)),
                &[
                    CastSubmission::new(bob.id, "Bob's part"),
                    CastSubmission::new(ana.id, "Ana's part"),
                ],
                &[drama.id],
            )
            .await
            .unwrap();

        let details = store.get_movie_details(created.id).await.unwrap().unwrap();
        let names: Vec<&str> = details.cast.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ana"]);
        assert_eq!(details.cast[1].order, 1);
        assert_eq!(details.genres[0].name, "Drama");
    }

    #[tokio::test]
    async fn update_applies_association_plans() {
        let store = store().await;
        let a = actor(&store, "A").await;
        let b = actor(&store, "B").await;
        let c = actor(&store, "C").await;
        let g1 = store.add_genre("Action").await.unwrap();
        let g2 = store.add_genre("Drama").await.unwrap();

        let created = store
            .add_movie(
                &movie("Ronin", false, date(1998, 9, 25)),
                &[
                    CastSubmission::new(a.id, "a"),
                    CastSubmission::new(b.id, "b"),
                    CastSubmission::new(c.id, "c"),
                ],
                &[g1.id],
            )
            .await
            .unwrap();

        let aggregate = store.get_movie_aggregate(created.id).await.unwrap().unwrap();
        let cast_plan = reconcile_cast(
            &aggregate.cast,
            &[CastSubmission::new(c.id, "c2"), CastSubmission::new(a.id, "a")],
        );
        let genre_plan = reconcile_genres(&aggregate.genre_ids, &[g2.id]);

        assert!(
            store
                .save_movie(&aggregate.movie, Some(&cast_plan), Some(&genre_plan))
                .await
                .unwrap()
        );

        let after = store.get_movie_aggregate(created.id).await.unwrap().unwrap();
        let order: Vec<(i32, i32)> = after.cast.iter().map(|m| (m.actor_id, m.order)).collect();
        assert_eq!(order, vec![(c.id, 0), (a.id, 1)]);
        assert_eq!(after.cast[0].character, "c2");
        assert_eq!(after.genre_ids, vec![g2.id]);
        assert!(is_dense(&after.cast));
    }

    #[tokio::test]
    async fn deleting_actor_compacts_casts() {
        let store = store().await;
        let a = actor(&store, "A").await;
        let b = actor(&store, "B").await;
        let c = actor(&store, "C").await;

        let created = store
            .add_movie(
                &movie("Collateral", false, date(2004, 8, 6)),
                &[
                    CastSubmission::new(a.id, ""),
                    CastSubmission::new(b.id, ""),
                    CastSubmission::new(c.id, ""),
                ],
                &[],
            )
            .await
            .unwrap();

        let removed = store.remove_actor(b.id).await.unwrap();
        assert_eq!(removed.map(|actor| actor.id), Some(b.id));

        let after = store.get_movie_aggregate(created.id).await.unwrap().unwrap();
        let order: Vec<(i32, i32)> = after.cast.iter().map(|m| (m.actor_id, m.order)).collect();
        assert_eq!(order, vec![(a.id, 0), (c.id, 1)]);

        assert!(store.remove_actor(b.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn index_and_filter_queries() {
        let store = store().await;
        let today = date(2025, 6, 1);

        for day in 1..=7 {
            store
                .add_movie(&movie(&format!("Soon {day}"), false, date(2025, 7, day)), &[], &[])
                .await
                .unwrap();
        }
        store
            .add_movie(&movie("Playing", true, date(2025, 5, 1)), &[], &[])
            .await
            .unwrap();

        let index = store.movie_index(today, 5).await.unwrap();
        assert_eq!(index.upcoming_releases.len(), 5);
        assert_eq!(index.upcoming_releases[0].title, "Soon 1");
        assert_eq!(index.in_theaters.len(), 1);

        let filter = MovieFilter {
            upcoming_only: Some(true),
            ..Default::default()
        };
        let window = PageWindow::normalize(
            PageRequest {
                page: Some(2),
                records_per_page: Some(3),
            },
            &PaginationConfig::default(),
        );
        let page = store.filter_movies(&filter, today, window).await.unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].title, "Soon 4");
    }

    #[tokio::test]
    async fn delete_movie_returns_poster_and_removes_rows() {
        let store = store().await;
        let a = actor(&store, "A").await;
        let mut m = movie("Thief", false, date(1981, 3, 27));
        m.poster = Some("/assets/movies/p.png".to_string());

        let created = store
            .add_movie(&m, &[CastSubmission::new(a.id, "Frank")], &[])
            .await
            .unwrap();

        let removed = store.remove_movie(created.id).await.unwrap().unwrap();
        assert_eq!(removed.poster.as_deref(), Some("/assets/movies/p.png"));
        assert!(store.get_movie(created.id).await.unwrap().is_none());
        assert!(store.remove_movie(created.id).await.unwrap().is_none());
        assert!(store.get_actor(a.id).await.unwrap().is_some());
    }
}
