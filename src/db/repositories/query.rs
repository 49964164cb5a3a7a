use std::marker::PhantomData;

use sea_orm::{
    Condition, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::domain::paging::PageWindow;

/// Read-only access to one entity type: filter, count, order and paginate.
///
/// Entity repositories compose this instead of re-implementing the same
/// query plumbing per table.
pub struct QueryRepository<E: EntityTrait> {
    conn: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E> QueryRepository<E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    pub async fn count(&self, condition: Condition) -> Result<u64, DbErr> {
        E::find().filter(condition).count(&self.conn).await
    }

    /// Fetches one page of rows. `order` is applied left to right.
    pub async fn page(
        &self,
        condition: Condition,
        order: &[(E::Column, Order)],
        window: &PageWindow,
    ) -> Result<Vec<E::Model>, DbErr> {
        let mut query = E::find().filter(condition);
        for (column, direction) in order {
            query = query.order_by(*column, direction.clone());
        }

        query
            .offset(window.skip())
            .limit(window.take())
            .all(&self.conn)
            .await
    }

    /// Number of distinct values of a text column among matching rows.
    pub async fn count_distinct(
        &self,
        column: E::Column,
        condition: Condition,
    ) -> Result<u64, DbErr> {
        E::find()
            .select_only()
            .column(column)
            .distinct()
            .filter(condition)
            .count(&self.conn)
            .await
    }

    /// One page of distinct values of a text column, sorted ascending.
    pub async fn distinct_values(
        &self,
        column: E::Column,
        condition: Condition,
        window: &PageWindow,
    ) -> Result<Vec<String>, DbErr> {
        E::find()
            .select_only()
            .column(column)
            .distinct()
            .filter(condition)
            .order_by_asc(column)
            .offset(window.skip())
            .limit(window.take())
            .into_tuple::<String>()
            .all(&self.conn)
            .await
    }
}
