pub mod prelude;

pub mod actors;
pub mod genres;
pub mod movie_actors;
pub mod movie_genres;
pub mod movies;
