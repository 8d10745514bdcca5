pub mod genre_dto;

pub use genre_dto::*;
