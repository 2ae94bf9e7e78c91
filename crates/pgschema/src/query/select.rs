use super::common::{Clauses, Order, push_tail};
use super::run_query;
use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::row::FromRow;
use crate::value::Value;
use tokio_postgres::Row;

/// SELECT builder.
///
/// ```rust
/// use pgschema::query::{Order, SelectQuery};
///
/// let mut q = SelectQuery::new("users");
/// q.add_column("name")
///     .where_with_value("email = ?", "a@x.com")
///     .and_where("name IS NOT NULL")
///     .order_by("name", Order::Asc)
///     .limit(10);
/// assert_eq!(
///     q.build(),
///     "SELECT name FROM users WHERE email = $1 AND name IS NOT NULL ORDER BY name ASC LIMIT 10"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    columns: Vec<String>,
    clauses: Clauses,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            clauses: Clauses::default(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Append a projected column. With none, `*` is selected.
    pub fn add_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.columns.push(name.into());
        self
    }

    pub fn add_condition(&mut self, condition: impl Into<String>) -> &mut Self {
        self.clauses.push_raw(condition.into());
        self
    }

    pub fn and_where(&mut self, condition: impl Into<String>) -> &mut Self {
        self.add_condition(condition)
    }

    /// Append a condition whose `?` binds `value`. A `?` inside quotes is text.
    ///
    /// # Panics
    ///
    /// If the template has no unquoted `?` or more than one.
    pub fn where_with_value(
        &mut self,
        template: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.clauses.push_bound(template.into(), value.into());
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>, order: Order) -> &mut Self {
        self.clauses.push_order(column.into(), order);
        self
    }

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.clauses.set_limit(limit);
        self
    }

    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.clauses.set_offset(offset);
        self
    }

    /// Projected columns; empty means all.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> Vec<&Value> {
        self.clauses.values().collect()
    }

    pub fn build(&self) -> String {
        let projection = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", projection, self.table);
        push_tail(&mut sql, &self.clauses.render(0));
        sql
    }

    /// Execute and return every row.
    pub async fn execute(&self, conn: &impl GenericClient) -> DbResult<Vec<Row>> {
        let sql = self.build();
        run_query(conn, &sql, &self.values()).await
    }

    /// Execute and return the first row, or [`DbError::NotFound`].
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> DbResult<Row> {
        self.execute(conn)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                DbError::not_found(format!("{}: expected one row, got none", self.table))
            })
    }

    /// Execute and map every row to `T`.
    pub async fn fetch_as<T: FromRow>(&self, conn: &impl GenericClient) -> DbResult<Vec<T>> {
        let rows = self.execute(conn).await?;
        rows.iter().map(T::from_row).collect()
    }
}
