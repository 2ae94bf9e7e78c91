//! Statement builders.
//!
//! Each builder accumulates clauses through chained `&mut self` calls and renders
//! `(sql, values)` on demand. Placeholders are managed automatically (`$1`, `$2`, ...)
//! and numbered per statement.
//!
//! - [`InsertQuery`]: `INSERT INTO t (cols) VALUES (...)`
//! - [`UpdateQuery`]: `UPDATE t SET ...` + WHERE
//! - [`DeleteQuery`]: `DELETE FROM t` + WHERE (no condition deletes every row)
//! - [`SelectQuery`]: `SELECT cols FROM t` + WHERE / ORDER BY / LIMIT / OFFSET

mod common;
mod delete;
mod insert;
mod select;
mod update;

pub use common::Order;
pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::SelectQuery;
pub use update::UpdateQuery;

use crate::client::GenericClient;
use crate::error::DbResult;
use crate::value::{Value, as_params};
use tokio_postgres::Row;

pub(crate) async fn run_execute(
    conn: &impl GenericClient,
    sql: &str,
    values: &[&Value],
) -> DbResult<u64> {
    tracing::debug!(target: "pgschema.sql", sql = %sql, params = values.len(), "execute");
    let params = as_params(values);
    conn.execute(sql, &params).await.inspect_err(|e| {
        tracing::warn!(target: "pgschema.sql", sql = %sql, error = %e, "statement failed");
    })
}

pub(crate) async fn run_query(
    conn: &impl GenericClient,
    sql: &str,
    values: &[&Value],
) -> DbResult<Vec<Row>> {
    tracing::debug!(target: "pgschema.sql", sql = %sql, params = values.len(), "query");
    let params = as_params(values);
    conn.query(sql, &params).await.inspect_err(|e| {
        tracing::warn!(target: "pgschema.sql", sql = %sql, error = %e, "query failed");
    })
}

#[cfg(test)]
mod tests;
