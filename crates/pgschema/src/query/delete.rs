use super::common::{Clauses, push_tail};
use super::run_execute;
use crate::client::GenericClient;
use crate::error::DbResult;
use crate::value::Value;

/// DELETE builder.
///
/// Without any condition the statement deletes every row of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    table: String,
    clauses: Clauses,
}

impl DeleteQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            clauses: Clauses::default(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn add_condition(&mut self, condition: impl Into<String>) -> &mut Self {
        self.clauses.push_raw(condition.into());
        self
    }

    pub fn and_where(&mut self, condition: impl Into<String>) -> &mut Self {
        self.add_condition(condition)
    }

    pub fn where_with_value(
        &mut self,
        template: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.clauses.push_bound(template.into(), value.into());
        self
    }

    pub fn has_conditions(&self) -> bool {
        self.clauses.has_conditions()
    }

    pub fn values(&self) -> Vec<&Value> {
        self.clauses.values().collect()
    }

    pub fn build(&self) -> String {
        let mut sql = format!("DELETE FROM {}", self.table);
        push_tail(&mut sql, &self.clauses.render(0));
        sql
    }

    pub async fn execute(&self, conn: &impl GenericClient) -> DbResult<u64> {
        let sql = self.build();
        if !self.has_conditions() {
            tracing::debug!(
                target: "pgschema.sql",
                table = %self.table,
                "delete without condition"
            );
        }
        run_execute(conn, &sql, &self.values()).await
    }
}
