//! Demo application for `pgschema`.
//!
//! [`schema`] declares the tables; the build script renders them with
//! `pgschema-codegen` and [`generated`] compiles the result.
//!
//! ```rust,no_run
//! use pgschema_demo::generated::USERS;
//!
//! # async fn demo(client: &pgschema::tokio_postgres::Client) -> pgschema::DbResult<()> {
//! USERS
//!     .insert()
//!     .set_name("John Doe")
//!     .set_email("john.doe@example.com")
//!     .set_password("hunter2")
//!     .execute(client)
//!     .await?;
//!
//! let johns = USERS
//!     .select()
//!     .select_name()
//!     .select_email()
//!     .where_name("John Doe")
//!     .execute(client)
//!     .await?;
//! # let _ = johns;
//! # Ok(())
//! # }
//! ```
//!
//! A column can be set only once per builder:
//!
//! ```compile_fail
//! use pgschema_demo::USERS;
//!
//! let _ = USERS.insert().set_name("a").set_name("b");
//! ```

pub mod schema;

/// Typed builders generated from [`schema::registry`].
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/schema.rs"));
}

pub use generated::{CATEGORIES, COMPANIES, Category, Company, POSTS, Post, USERS, User};
