use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_movies_title")
                    .table(Movies::Table)
                    .col(Movies::Title)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_genres_name")
                    .table(Genres::Table)
                    .col(Genres::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_actors_name")
                    .table(Actors::Table)
                    .col(Actors::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // The composite keys lead with movie_id; these cover the reverse lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_movie_genres_genre_id")
                    .table(MovieGenres::Table)
                    .col(MovieGenres::GenreId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_actors_actor_id")
                    .table(MovieActors::Table)
                    .col(MovieActors::ActorId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_movie_actors_actor_id")
                    .table(MovieActors::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_movie_genres_genre_id")
                    .table(MovieGenres::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_actors_name")
                    .table(Actors::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_genres_name")
                    .table(Genres::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_movies_title")
                    .table(Movies::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Title,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum MovieGenres {
    Table,
    GenreId,
}

#[derive(DeriveIden)]
enum MovieActors {
    Table,
    ActorId,
}
