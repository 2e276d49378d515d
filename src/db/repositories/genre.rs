use crate::entities::{genres, movie_genres, prelude::*};
use crate::models::genre::Genre;
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

/// Repository for the genre lookup table
pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Genre>> {
        let rows = Genres::find()
            .order_by_asc(genres::Column::Name)
            .order_by_asc(genres::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Genre::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Genre>> {
        let row = Genres::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Genre::from))
    }

    pub async fn create(&self, name: &str) -> Result<Genre> {
        let model = genres::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(Genre::from(model))
    }

    /// Returns `false` when no genre has this id.
    pub async fn update(&self, id: i32, name: &str) -> Result<bool> {
        let result = Genres::update_many()
            .col_expr(genres::Column::Name, name.into())
            .filter(genres::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Removes the genre together with its movie memberships. Returns
    /// `false` when no genre has this id.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        MovieGenres::delete_many()
            .filter(movie_genres::Column::GenreId.eq(id))
            .exec(&txn)
            .await?;

        let result = Genres::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    /// The subset of `ids` that exist.
    pub async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<i32> = Genres::find()
            .select_only()
            .column(genres::Column::Id)
            .filter(genres::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(found)
    }
}
