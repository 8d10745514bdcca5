pub mod pg_genre_repository;

pub use pg_genre_repository::PgGenreRepository;
