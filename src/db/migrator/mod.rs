use sea_orm_migration::prelude::*;

mod m20250301_initial;
mod m20250314_add_catalog_indexes;
mod m20250402_add_movie_title_search;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_initial::Migration),
            Box::new(m20250314_add_catalog_indexes::Migration),
            Box::new(m20250402_add_movie_title_search::Migration),
        ]
    }
}
