use sea_orm_migration::prelude::*;

use crate::services::filter::fold_case;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// `(table, source column, folded column, index)`
const FOLDED: [(&str, &str, &str, &str); 3] = [
    ("movies", "title", "title_folded", "idx_movies_title_folded"),
    ("genres", "name", "name_folded", "idx_genres_name_folded"),
    ("actors", "name", "name_folded", "idx_actors_name_folded"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, source, folded, index) in FOLDED {
            // Fresh databases already get the column from the entity
            if !manager.has_column(table, folded).await? {
                manager
                    .alter_table(
                        Table::alter()
                            .table(Alias::new(table))
                            .add_column(
                                ColumnDef::new(Alias::new(folded))
                                    .string()
                                    .not_null()
                                    .default(""),
                            )
                            .to_owned(),
                    )
                    .await?;
                backfill(manager, table, source, folded).await?;
            }

            manager
                .create_index(
                    Index::create()
                        .name(index)
                        .table(Alias::new(table))
                        .col(Alias::new(folded))
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _, folded, index) in FOLDED {
            manager
                .drop_index(Index::drop().name(index).table(Alias::new(table)).to_owned())
                .await?;
            manager
                .alter_table(
                    Table::alter()
                        .table(Alias::new(table))
                        .drop_column(Alias::new(folded))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

/// Fills `folded` from `source` row by row. SQLite's `LOWER()` only folds
/// ASCII, so this cannot be a single `UPDATE`.
async fn backfill(
    manager: &SchemaManager<'_>,
    table: &str,
    source: &str,
    folded: &str,
) -> Result<(), DbErr> {
    let conn = manager.get_connection();
    let backend = manager.get_database_backend();

    let select = Query::select()
        .column(Alias::new("id"))
        .column(Alias::new(source))
        .from(Alias::new(table))
        .to_owned();

    for row in conn.query_all(backend.build(&select)).await? {
        let id: i32 = row.try_get("", "id")?;
        let text: String = row.try_get("", source)?;
        let update = Query::update()
            .table(Alias::new(table))
            .value(Alias::new(folded), fold_case(&text))
            .and_where(Expr::col(Alias::new("id")).eq(id))
            .to_owned();
        conn.execute(backend.build(&update)).await?;
    }

    Ok(())
}
