use crate::catalog::associations::{CastMember, compact_cast};
use crate::catalog::pagination::{Page, PageWindow, fetch_page};
use crate::entities::{actors, movie_actors, prelude::*};
use crate::models::actor::{Actor, ActorInput};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::BTreeSet;

/// Repository for actors and their side of the cast relation
pub struct ActorRepository {
    conn: DatabaseConnection,
}

impl ActorRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_page(&self, window: PageWindow) -> Result<Page<Actor>> {
        let query = Actors::find()
            .order_by_asc(actors::Column::Name)
            .order_by_asc(actors::Column::Id);

        let page = fetch_page(query, window, &self.conn).await?;
        Ok(page.map(Actor::from))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Actor>> {
        let row = Actors::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Actor::from))
    }

    pub async fn create(&self, input: &ActorInput, photo: Option<String>) -> Result<Actor> {
        let model = actors::ActiveModel {
            name: Set(input.name.clone()),
            birth_date: Set(input.birth_date),
            photo: Set(photo),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(Actor::from(model))
    }

    /// Writes every scalar field of `actor`, including the photo reference.
    pub async fn update(&self, actor: &Actor) -> Result<bool> {
        let result = Actors::update_many()
            .col_expr(actors::Column::Name, actor.name.clone().into())
            .col_expr(actors::Column::BirthDate, actor.birth_date.into())
            .col_expr(actors::Column::Photo, actor.photo.clone().into())
            .filter(actors::Column::Id.eq(actor.id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes the actor and its cast rows, then renumbers the remaining cast
    /// of every movie the actor appeared in.
    ///
    /// Returns the deleted actor so the caller can release its photo, or
    /// `None` when no actor has this id.
    pub async fn delete(&self, id: i32) -> Result<Option<Actor>> {
        let txn = self.conn.begin().await?;

        let Some(actor) = Actors::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let affected: BTreeSet<i32> = MovieActors::find()
            .select_only()
            .column(movie_actors::Column::MovieId)
            .filter(movie_actors::Column::ActorId.eq(id))
            .into_tuple::<i32>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        MovieActors::delete_many()
            .filter(movie_actors::Column::ActorId.eq(id))
            .exec(&txn)
            .await?;

        for movie_id in affected {
            compact_movie_cast(&txn, movie_id).await?;
        }

        Actors::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(Some(Actor::from(actor)))
    }

    /// The subset of `ids` that exist.
    pub async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<i32> = Actors::find()
            .select_only()
            .column(actors::Column::Id)
            .filter(actors::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(found)
    }
}

async fn compact_movie_cast<C: ConnectionTrait>(conn: &C, movie_id: i32) -> Result<()> {
    let rows = MovieActors::find()
        .filter(movie_actors::Column::MovieId.eq(movie_id))
        .all(conn)
        .await?;

    let cast = compact_cast(
        rows.into_iter()
            .map(|row| CastMember {
                actor_id: row.actor_id,
                character: row.character,
                order: row.cast_order,
            })
            .collect(),
    );

    for member in cast {
        MovieActors::update_many()
            .col_expr(movie_actors::Column::CastOrder, member.order.into())
            .filter(movie_actors::Column::MovieId.eq(movie_id))
            .filter(movie_actors::Column::ActorId.eq(member.actor_id))
            .exec(conn)
            .await?;
    }

    Ok(())
}
