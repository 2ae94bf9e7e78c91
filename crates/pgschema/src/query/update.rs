use super::common::{Clauses, push_tail};
use super::run_execute;
use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::value::Value;

/// UPDATE builder.
///
/// Only WHERE conditions are offered after SET; PostgreSQL has no ORDER BY or
/// LIMIT for UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    table: String,
    columns: Vec<String>,
    values: Vec<Value>,
    clauses: Clauses,
}

impl UpdateQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
            clauses: Clauses::default(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn add_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.columns.push(name.into());
        self
    }

    pub fn add_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        self
    }

    /// Append `column = $n`.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.add_column(column).add_value(value)
    }

    /// Append a literal condition.
    pub fn add_condition(&mut self, condition: impl Into<String>) -> &mut Self {
        self.clauses.push_raw(condition.into());
        self
    }

    /// Alias of [`add_condition`](Self::add_condition).
    pub fn and_where(&mut self, condition: impl Into<String>) -> &mut Self {
        self.add_condition(condition)
    }

    /// Append a condition whose `?` binds `value`; numbered after the SET values.
    pub fn where_with_value(
        &mut self,
        template: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.clauses.push_bound(template.into(), value.into());
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_conditions(&self) -> bool {
        self.clauses.has_conditions()
    }

    /// SET values followed by condition values.
    pub fn values(&self) -> Vec<&Value> {
        self.values.iter().chain(self.clauses.values()).collect()
    }

    /// Render the statement.
    ///
    /// A builder with no column renders an empty SET list; [`execute`](Self::execute)
    /// rejects it before it reaches the database.
    ///
    /// # Panics
    ///
    /// If the number of columns differs from the number of values.
    pub fn build(&self) -> String {
        assert!(
            self.columns.len() == self.values.len(),
            "update {}: {} columns but {} values",
            self.table,
            self.columns.len(),
            self.values.len()
        );

        let assignments: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{} = ${}", col, i + 1))
            .collect();

        let mut sql = format!("UPDATE {} SET", self.table);
        push_tail(&mut sql, &assignments.join(", "));
        push_tail(&mut sql, &self.clauses.render(self.values.len()));
        sql
    }

    /// Execute and return the affected row count.
    ///
    /// Fails with [`DbError::NoColumnToUpdate`] when no column was set, whatever
    /// conditions are present.
    pub async fn execute(&self, conn: &impl GenericClient) -> DbResult<u64> {
        if self.columns.is_empty() {
            return Err(DbError::NoColumnToUpdate {
                table: self.table.clone(),
            });
        }
        let sql = self.build();
        run_execute(conn, &sql, &self.values()).await
    }
}
