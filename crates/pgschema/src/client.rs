//! Execution collaborator: the connection/driver boundary.
//!
//! Statement builders never manage connections. They render `(sql, values)` and
//! hand them to anything implementing [`GenericClient`].

use crate::error::{DbError, DbResult};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Anything that can run a rendered statement: a client, a transaction or a
/// pooled connection. Tests substitute a recording implementation.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = DbResult<Vec<Row>>> + Send;

    /// First row of the result, or [`DbError::NotFound`] when there is none.
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = DbResult<Row>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            rows.into_iter()
                .next()
                .ok_or_else(|| DbError::not_found("query returned no rows"))
        }
    }

    /// Execute a query and return the first row, if any.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = DbResult<Option<Row>>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send;
}

/// Forward to the driver's inherent methods, classifying errors on the way out.
macro_rules! forward_to_driver {
    ($($ty:ty),+ $(,)?) => {$(
        impl GenericClient for $ty {
            async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
                <$ty>::query(self, sql, params)
                    .await
                    .map_err(DbError::from_db_error)
            }

            async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
                <$ty>::execute(self, sql, params)
                    .await
                    .map_err(DbError::from_db_error)
            }
        }
    )+};
}

forward_to_driver!(tokio_postgres::Client, tokio_postgres::Transaction<'_>);

/// A pooled connection usable wherever a [`GenericClient`] is expected.
#[cfg(feature = "pool")]
pub struct PoolClient(deadpool_postgres::Client);

#[cfg(feature = "pool")]
impl PoolClient {
    pub fn new(client: deadpool_postgres::Client) -> Self {
        Self(client)
    }
}

#[cfg(feature = "pool")]
impl std::ops::Deref for PoolClient {
    type Target = deadpool_postgres::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(feature = "pool")]
impl GenericClient for PoolClient {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        let client: &tokio_postgres::Client = &self.0;
        GenericClient::query(client, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
        let client: &tokio_postgres::Client = &self.0;
        GenericClient::execute(client, sql, params).await
    }
}
