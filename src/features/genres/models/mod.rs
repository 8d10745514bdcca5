pub mod genre;

pub use genre::Genre;
