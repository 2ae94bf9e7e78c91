use super::SchemaError;
use super::table::TableSchema;
use crate::client::GenericClient;
use crate::error::DbResult;
use serde::Serialize;
use std::collections::HashMap;

/// Collects tables before the registry is frozen.
///
/// ```rust
/// use pgschema::schema::{AttrType, RegistryBuilder, TableSchema};
///
/// let registry = RegistryBuilder::new()
///     .register(TableSchema::new("users").add_attribute("name", AttrType::Text).build())
///     .register(TableSchema::new("posts"))
///     .build()?;
///
/// assert_eq!(registry.names().collect::<Vec<_>>(), ["users", "posts"]);
/// # Ok::<(), pgschema::schema::SchemaError>(())
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    tables: Vec<TableSchema>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, table: TableSchema) -> Self {
        self.tables.push(table);
        self
    }

    /// Validate every table and freeze the registry.
    ///
    /// Fails on the first definition fault, including a table name registered twice.
    pub fn build(self) -> Result<SchemaRegistry, SchemaError> {
        let mut index = HashMap::with_capacity(self.tables.len());
        for (i, table) in self.tables.iter().enumerate() {
            table.validate()?;
            if index.insert(table.name().to_string(), i).is_some() {
                return Err(SchemaError::DuplicateTable(table.name().to_string()));
            }
            tracing::info!(
                table = table.name(),
                columns = table.attributes().len(),
                "registered table"
            );
        }
        Ok(SchemaRegistry {
            tables: self.tables,
            index,
        })
    }
}

/// Read-only, ordered collection of table schemas.
///
/// Built once through [`RegistryBuilder`]; it has no mutating methods, so it can be
/// shared by reference between the generator and any runtime lookups.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaRegistry {
    tables: Vec<TableSchema>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tables in registration order.
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Table names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Create every registered table, in registration order.
    ///
    /// Stops at the first failure, which names the table.
    pub async fn create_all(&self, conn: &impl GenericClient) -> DbResult<()> {
        for table in &self.tables {
            tracing::info!(table = table.name(), "creating table");
            table.create(conn).await.inspect_err(|e| {
                tracing::warn!(table = table.name(), error = %e, "stopping table creation");
            })?;
        }
        tracing::info!(count = self.tables.len(), "all tables created");
        Ok(())
    }
}
