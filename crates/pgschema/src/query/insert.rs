use super::{run_execute, run_query};
use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::value::Value;
use tokio_postgres::Row;

/// INSERT builder.
///
/// Columns and values are appended in lockstep; [`InsertQuery::set`] appends both.
///
/// ```rust
/// use pgschema::query::InsertQuery;
///
/// let mut q = InsertQuery::new("users");
/// q.add_column("name").add_value("Ann").set("email", "a@x.com");
/// assert_eq!(q.build(), "INSERT INTO users (name, email) VALUES ($1, $2)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    table: String,
    columns: Vec<String>,
    values: Vec<Value>,
    returning: Vec<String>,
}

impl InsertQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
            returning: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Append a column name. Pair every column with one [`add_value`](Self::add_value).
    pub fn add_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.columns.push(name.into());
        self
    }

    /// Append a value for the column at the same position.
    pub fn add_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        self
    }

    /// Append a column and its value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.add_column(column).add_value(value)
    }

    /// Set RETURNING columns.
    pub fn returning(&mut self, cols: &[&str]) -> &mut Self {
        self.returning = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Positional values, `$1` first.
    pub fn values(&self) -> Vec<&Value> {
        self.values.iter().collect()
    }

    /// Render the statement.
    ///
    /// # Panics
    ///
    /// If the number of columns differs from the number of values.
    pub fn build(&self) -> String {
        assert!(
            self.columns.len() == self.values.len(),
            "insert into {}: {} columns but {} values",
            self.table,
            self.columns.len(),
            self.values.len()
        );

        let mut sql = if self.columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table)
        } else {
            let placeholders: Vec<String> =
                (1..=self.values.len()).map(|i| format!("${i}")).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table,
                self.columns.join(", "),
                placeholders.join(", ")
            )
        };

        if !self.returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning.join(", "));
        }
        sql
    }

    /// Execute and return the affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> DbResult<u64> {
        let sql = self.build();
        run_execute(conn, &sql, &self.values()).await
    }

    /// Execute and return the RETURNING rows.
    pub async fn fetch(&self, conn: &impl GenericClient) -> DbResult<Vec<Row>> {
        let sql = self.build();
        run_query(conn, &sql, &self.values()).await
    }

    /// Execute and return the first RETURNING row.
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> DbResult<Row> {
        self.fetch(conn).await?.into_iter().next().ok_or_else(|| {
            DbError::not_found(format!("{}: insert returned no row", self.table))
        })
    }
}
