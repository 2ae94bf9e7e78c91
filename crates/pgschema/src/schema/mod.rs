//! Declarative table schema model.
//!
//! - [`Attribute`]: one column (name, type, ordered constraints)
//! - [`TableSchema`]: ordered attributes, always starting with `id SERIAL PRIMARY KEY`
//! - [`SchemaRegistry`]: frozen, ordered set of tables built via [`RegistryBuilder`]

mod attribute;
mod registry;
mod table;

pub use attribute::{AttrType, Attribute, Constraint};
pub use registry::{RegistryBuilder, SchemaRegistry};
pub use table::{AttributeBuilder, TableSchema};

use thiserror::Error;

/// Schema definition faults.
///
/// These indicate an authoring mistake in the schema itself, detected when a
/// registry is built or before code generation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid table name '{0}' (expected [a-z_][a-z0-9_]*)")]
    InvalidTableName(String),

    #[error("invalid column name '{column}' in table '{table}' (expected [a-z_][a-z0-9_]*)")]
    InvalidColumnName { table: String, column: String },

    #[error("'{name}' in table '{table}' is a reserved PostgreSQL key word")]
    ReservedWord { table: String, name: String },

    #[error("table '{table}': column name 'id' is reserved for the identity column")]
    ReservedColumn { table: String },

    #[error("table '{table}': column '{column}' is marked PRIMARY KEY; only 'id' may be")]
    ExtraPrimaryKey { table: String, column: String },

    #[error("table '{table}': duplicate column '{column}'")]
    DuplicateColumn { table: String, column: String },

    #[error("table '{0}' is registered more than once")]
    DuplicateTable(String),
}
