use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// `title` case-folded on write; fragment searches match against it.
    pub title_folded: String,
    #[sea_orm(column_type = "Text")]
    pub overview: String,
    pub release_date: Option<Date>,
    pub original_language: String,
    pub popularity: f64,
    pub vote_count: i64,
    pub vote_average: f64,
    pub poster_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_genres::Entity")]
    MovieGenres,
    #[sea_orm(has_many = "super::movie_actors::Entity")]
    MovieActors,
}

impl Related<super::movie_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenres.def()
    }
}

impl Related<super::movie_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieActors.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genres::Relation::Genre.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::movie_genres::Relation::Movie.def().rev())
    }
}

impl Related<super::actors::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_actors::Relation::Actor.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::movie_actors::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
