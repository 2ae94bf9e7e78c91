use super::SchemaError;
use super::attribute::{AttrType, Attribute, Constraint};
use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::ident::{is_plain_ident, is_reserved, quote};
use crate::query::run_execute;
use serde::Serialize;
use std::collections::HashSet;

/// An ordered set of attributes under a table name.
///
/// The first attribute is always the identity column `id SERIAL PRIMARY KEY`;
/// it is added by [`TableSchema::new`] and cannot be removed or moved.
///
/// # Example
///
/// ```rust
/// use pgschema::schema::{AttrType, TableSchema};
///
/// let users = TableSchema::new("users")
///     .add_attribute("name", AttrType::Text).not_null().build()
///     .add_attribute("email", AttrType::Text).not_null().unique().build();
///
/// assert_eq!(
///     users.build_sql(),
///     "CREATE TABLE IF NOT EXISTS \"users\" (\"id\" SERIAL PRIMARY KEY, \
///      \"name\" VARCHAR(255) NOT NULL, \"email\" VARCHAR(255) NOT NULL UNIQUE)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    name: String,
    attributes: Vec<Attribute>,
}

impl TableSchema {
    /// Create a table seeded with the identity column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: vec![Attribute::identity()],
        }
    }

    /// Start a new attribute bound to this table; finish it with
    /// [`AttributeBuilder::build`].
    pub fn add_attribute(self, name: impl Into<String>, ty: AttrType) -> AttributeBuilder {
        AttributeBuilder {
            table: self,
            attribute: Attribute::new(name, ty),
        }
    }

    /// Attach an attribute built on its own.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All attributes, identity first.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attributes other than the identity column.
    pub fn user_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| !a.is_identity())
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name()).collect()
    }

    /// Render `CREATE TABLE IF NOT EXISTS`.
    pub fn build_sql(&self) -> String {
        let columns: Vec<String> = self.attributes.iter().map(|a| a.sql_definition()).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote(&self.name),
            columns.join(", ")
        )
    }

    /// Check the table for definition faults.
    ///
    /// Names must be lowercase plain identifiers that are not PostgreSQL reserved
    /// words. `id` and `PRIMARY KEY` belong to the identity column only, and
    /// column names must be unique.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if !is_plain_ident(&self.name) {
            return Err(SchemaError::InvalidTableName(self.name.clone()));
        }
        if is_reserved(&self.name) {
            return Err(SchemaError::ReservedWord {
                table: self.name.clone(),
                name: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for attr in &self.attributes {
            if !attr.is_identity() && attr.name() == "id" {
                return Err(SchemaError::ReservedColumn {
                    table: self.name.clone(),
                });
            }
            if !is_plain_ident(attr.name()) {
                return Err(SchemaError::InvalidColumnName {
                    table: self.name.clone(),
                    column: attr.name().to_string(),
                });
            }
            if is_reserved(attr.name()) {
                return Err(SchemaError::ReservedWord {
                    table: self.name.clone(),
                    name: attr.name().to_string(),
                });
            }
            if !attr.is_identity() && attr.constraints().contains(&Constraint::PrimaryKey) {
                return Err(SchemaError::ExtraPrimaryKey {
                    table: self.name.clone(),
                    column: attr.name().to_string(),
                });
            }
            if !seen.insert(attr.name()) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: attr.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Execute `CREATE TABLE IF NOT EXISTS` through the given client.
    ///
    /// A failure is returned as [`DbError::CreateTable`] naming this table.
    pub async fn create(&self, conn: &impl GenericClient) -> DbResult<()> {
        let sql = self.build_sql();
        run_execute(conn, &sql, &[])
            .await
            .map_err(|e| DbError::create_table(&self.name, e))?;
        Ok(())
    }
}

/// An attribute in progress, bound to its parent table.
#[must_use = "call .build() to attach the attribute to its table"]
pub struct AttributeBuilder {
    table: TableSchema,
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn not_null(mut self) -> Self {
        self.attribute = self.attribute.not_null();
        self
    }

    pub fn unique(mut self) -> Self {
        self.attribute = self.attribute.unique();
        self
    }

    /// Append a custom constraint token (e.g. `DEFAULT 0`).
    pub fn constraint(mut self, constraint: impl Into<Constraint>) -> Self {
        self.attribute = self.attribute.constraint(constraint);
        self
    }

    /// Attach the attribute and return the parent table.
    pub fn build(self) -> TableSchema {
        self.table.with_attribute(self.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use std::sync::Mutex;
    use tokio_postgres::Row;
    use tokio_postgres::types::ToSql;

    fn companies() -> TableSchema {
        TableSchema::new("companies")
            .add_attribute("name", AttrType::Text)
            .not_null()
            .unique()
            .build()
            .add_attribute("description", AttrType::Text)
            .build()
            .add_attribute("employee_count", AttrType::Integer)
            .build()
            .add_attribute("revenue", AttrType::Float)
            .build()
            .add_attribute("is_public", AttrType::Boolean)
            .not_null()
            .build()
    }

    #[test]
    fn new_table_has_identity_only() {
        let t = TableSchema::new("empty");
        assert_eq!(t.column_names(), vec!["id"]);
        assert_eq!(
            t.build_sql(),
            "CREATE TABLE IF NOT EXISTS \"empty\" (\"id\" SERIAL PRIMARY KEY)"
        );
    }

    #[test]
    fn build_sql_renders_in_declaration_order() {
        assert_eq!(
            companies().build_sql(),
            "CREATE TABLE IF NOT EXISTS \"companies\" (\"id\" SERIAL PRIMARY KEY, \
             \"name\" VARCHAR(255) NOT NULL UNIQUE, \"description\" VARCHAR(255), \
             \"employee_count\" INTEGER, \"revenue\" FLOAT, \"is_public\" BOOLEAN NOT NULL)"
        );
    }

    #[test]
    fn exactly_one_primary_key_first() {
        for table in [companies(), TableSchema::new("t")] {
            let sql = table.build_sql();
            assert_eq!(sql.matches("PRIMARY KEY").count(), 1);
            let first_col = sql.split_once('(').unwrap().1;
            assert!(first_col.starts_with("\"id\" SERIAL PRIMARY KEY"));
        }
    }

    #[test]
    fn quotes_table_name() {
        let t = TableSchema::new("odd\"name");
        assert!(
            t.build_sql()
                .starts_with("CREATE TABLE IF NOT EXISTS \"odd\"\"name\" (")
        );
    }

    #[test]
    fn detached_attribute_attaches() {
        let tag = Attribute::new("tag", AttrType::Text).not_null();
        let t = TableSchema::new("tags").with_attribute(tag);
        assert_eq!(t.column_names(), vec!["id", "tag"]);
        assert!(t.attribute("tag").unwrap().is_required());
    }

    #[test]
    fn attribute_flags_follow_constraints() {
        let t = companies();
        let name = t.attribute("name").unwrap();
        assert!(name.is_unique());
        assert!(name.is_required());
        assert!(!t.attribute("description").unwrap().is_unique());
        assert!(t.attribute("description").unwrap().is_nullable());
    }

    #[test]
    fn validate_accepts_well_formed_table() {
        assert_eq!(companies().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_reserved_id() {
        let t = TableSchema::new("users")
            .add_attribute("id", AttrType::Integer)
            .build();
        assert_eq!(
            t.validate(),
            Err(SchemaError::ReservedColumn {
                table: "users".to_string()
            })
        );
    }

    #[test]
    fn validate_rejects_second_primary_key() {
        let t = TableSchema::new("users")
            .add_attribute("code", AttrType::Text)
            .constraint("PRIMARY KEY")
            .build();
        assert_eq!(t.build_sql().matches("PRIMARY KEY").count(), 2);
        assert_eq!(
            t.validate(),
            Err(SchemaError::ExtraPrimaryKey {
                table: "users".to_string(),
                column: "code".to_string()
            })
        );

        let t = TableSchema::new("users")
            .add_attribute("code", AttrType::Text)
            .constraint("primary   key")
            .build();
        assert!(matches!(
            t.validate(),
            Err(SchemaError::ExtraPrimaryKey { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_columns() {
        let t = TableSchema::new("users")
            .add_attribute("name", AttrType::Text)
            .build()
            .add_attribute("name", AttrType::Text)
            .build();
        assert_eq!(
            t.validate(),
            Err(SchemaError::DuplicateColumn {
                table: "users".to_string(),
                column: "name".to_string()
            })
        );
    }

    #[test]
    fn validate_rejects_bad_identifiers() {
        let t = TableSchema::new("user list");
        assert_eq!(
            t.validate(),
            Err(SchemaError::InvalidTableName("user list".to_string()))
        );

        let t = TableSchema::new("users")
            .add_attribute("first name", AttrType::Text)
            .build();
        assert!(matches!(
            t.validate(),
            Err(SchemaError::InvalidColumnName { .. })
        ));
    }

    #[test]
    fn validate_rejects_names_that_need_quoting() {
        let t = TableSchema::new("users")
            .add_attribute("isPublic", AttrType::Boolean)
            .build();
        assert_eq!(
            t.validate(),
            Err(SchemaError::InvalidColumnName {
                table: "users".to_string(),
                column: "isPublic".to_string()
            })
        );

        assert_eq!(
            TableSchema::new("Users").validate(),
            Err(SchemaError::InvalidTableName("Users".to_string()))
        );

        assert_eq!(
            TableSchema::new("user").validate(),
            Err(SchemaError::ReservedWord {
                table: "user".to_string(),
                name: "user".to_string()
            })
        );

        let t = TableSchema::new("purchases")
            .add_attribute("order", AttrType::Integer)
            .build();
        assert_eq!(
            t.validate(),
            Err(SchemaError::ReservedWord {
                table: "purchases".to_string(),
                name: "order".to_string()
            })
        );
    }

    struct Refusing {
        calls: Mutex<Vec<String>>,
    }

    impl GenericClient for Refusing {
        async fn query(&self, sql: &str, _: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
            self.calls.lock().unwrap().push(sql.to_string());
            Err(DbError::Connection("connection reset".to_string()))
        }

        async fn execute(&self, sql: &str, _: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
            self.calls.lock().unwrap().push(sql.to_string());
            Err(DbError::Connection("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn create_failure_names_the_table() {
        let conn = Refusing {
            calls: Mutex::new(Vec::new()),
        };
        let err = companies().create(&conn).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to create table 'companies': Connection error: connection reset"
        );
        match err {
            DbError::CreateTable { table, source } => {
                assert_eq!(table, "companies");
                assert!(matches!(*source, DbError::Connection(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(conn.calls.lock().unwrap().len(), 1);
    }
}
