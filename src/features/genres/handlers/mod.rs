pub mod genre_handler;

pub use genre_handler::*;
