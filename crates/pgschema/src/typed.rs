//! Marker traits implemented by generated per-table builders.
//!
//! Generated code exposes the same operations as inherent methods; these traits
//! let callers write code that is generic over any table's builder.

use crate::client::GenericClient;
use crate::error::DbResult;
use std::future::Future;

/// A typed INSERT builder for one table.
pub trait InsertBuilder {
    /// Table the statement targets.
    fn table(&self) -> &'static str;

    /// Render the statement.
    fn build(&self) -> String;

    /// Check required columns, then execute.
    fn execute(&self, conn: &impl GenericClient) -> impl Future<Output = DbResult<u64>> + Send;
}

/// A typed UPDATE builder for one table.
pub trait UpdateBuilder {
    fn table(&self) -> &'static str;

    fn build(&self) -> String;

    fn execute(&self, conn: &impl GenericClient) -> impl Future<Output = DbResult<u64>> + Send;
}

/// A typed DELETE builder for one table.
pub trait DeleteBuilder {
    fn table(&self) -> &'static str;

    fn build(&self) -> String;

    fn execute(&self, conn: &impl GenericClient) -> impl Future<Output = DbResult<u64>> + Send;
}
