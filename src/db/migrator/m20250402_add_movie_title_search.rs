use crate::catalog::filter::search_key;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let result = manager
            .alter_table(
                Table::alter()
                    .table(Movies::Table)
                    .add_column(
                        ColumnDef::new(Movies::TitleSearch)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await;

        if let Err(e) = result {
            if !e.to_string().contains("duplicate column") {
                return Err(e);
            }
        }

        // SQLite's lower() only folds ASCII, so existing rows are keyed here
        let conn = manager.get_connection();
        let backend = manager.get_database_backend();
        let rows = conn
            .query_all(Statement::from_string(
                backend,
                "SELECT id, title FROM movies",
            ))
            .await?;

        for row in rows {
            let id: i32 = row.try_get("", "id")?;
            let title: String = row.try_get("", "title")?;
            conn.execute(Statement::from_sql_and_values(
                backend,
                "UPDATE movies SET title_search = ? WHERE id = ?",
                [search_key(&title).into(), id.into()],
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Movies::Table)
                    .drop_column(Movies::TitleSearch)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    TitleSearch,
}
