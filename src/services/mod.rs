pub mod error;
pub use error::CatalogError;

pub mod genre_service;
pub mod genre_service_impl;
pub use genre_service::GenreService;
pub use genre_service_impl::SeaOrmGenreService;

pub mod actor_service;
pub mod actor_service_impl;
pub use actor_service::ActorService;
pub use actor_service_impl::SeaOrmActorService;

pub mod movie_service;
pub mod movie_service_impl;
pub use movie_service::MovieService;
pub use movie_service_impl::SeaOrmMovieService;

mod uploads;
