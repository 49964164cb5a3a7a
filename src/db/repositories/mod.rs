pub mod movie;
pub mod query;
pub mod tags;
