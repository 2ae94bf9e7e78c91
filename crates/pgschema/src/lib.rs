//! # pgschema
//!
//! Schema-first SQL statement builders for PostgreSQL.
//!
//! - **Declarative schema**: tables are described with [`TableSchema`] and frozen into a
//!   [`SchemaRegistry`]; every table carries an `id SERIAL PRIMARY KEY` column
//! - **Statement builders**: INSERT / UPDATE / DELETE / SELECT rendering `$n` placeholders
//!   and a positional [`Value`] list
//! - **Typed per-table APIs**: `pgschema-codegen` turns a registry into dedicated builders
//!   whose setters are checked at compile time
//! - **Transaction-friendly**: pass a transaction anywhere a [`GenericClient`] is expected
//!
//! ## Statement builders
//!
//! ```ignore
//! use pgschema::query::{InsertQuery, Order, SelectQuery};
//!
//! InsertQuery::new("users")
//!     .set("name", "Ann")
//!     .set("email", "a@x.com")
//!     .execute(&client)
//!     .await?;
//!
//! let rows = SelectQuery::new("users")
//!     .where_with_value("email = ?", "a@x.com")
//!     .order_by("name", Order::Asc)
//!     .limit(10)
//!     .execute(&client)
//!     .await?;
//! ```

pub mod client;
pub mod error;
pub mod ident;
pub mod query;
pub mod row;
pub mod schema;
pub mod typed;
pub mod value;

pub use client::GenericClient;
pub use error::{DbError, DbResult};
pub use query::{DeleteQuery, InsertQuery, Order, SelectQuery, UpdateQuery};
pub use row::{FromRow, RowExt};
pub use schema::{
    AttrType, Attribute, Constraint, RegistryBuilder, SchemaError, SchemaRegistry, TableSchema,
};
pub use value::Value;

// Generated code names driver types through this path.
pub use tokio_postgres;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use client::PoolClient;

#[cfg(feature = "pool")]
pub use pool::{checkout, create_pool, create_pool_with_config};
