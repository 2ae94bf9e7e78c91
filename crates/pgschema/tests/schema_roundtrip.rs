use pgschema::tokio_postgres::Row;
use pgschema::tokio_postgres::types::ToSql;
use pgschema::{AttrType, DbError, DbResult, GenericClient, RegistryBuilder, TableSchema};
use std::sync::Mutex;

#[derive(Default)]
struct Recorder {
    statements: Mutex<Vec<String>>,
    /// Fail every statement whose text contains this table name.
    fail_on: Option<&'static str>,
}

impl Recorder {
    fn failing_on(table: &'static str) -> Self {
        Self {
            fail_on: Some(table),
            ..Self::default()
        }
    }

    fn record(&self, sql: &str) -> DbResult<()> {
        self.statements.lock().unwrap().push(sql.to_string());
        match self.fail_on {
            Some(table) if sql.contains(&format!("\"{table}\"")) => {
                Err(DbError::Connection("connection reset".to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl GenericClient for Recorder {
    async fn query(&self, sql: &str, _params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        self.record(sql)?;
        Ok(Vec::new())
    }

    async fn execute(&self, sql: &str, _params: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
        self.record(sql)?;
        Ok(0)
    }
}

fn blog() -> pgschema::SchemaRegistry {
    RegistryBuilder::new()
        .register(
            TableSchema::new("users")
                .add_attribute("name", AttrType::Text)
                .not_null()
                .build()
                .add_attribute("email", AttrType::Text)
                .not_null()
                .unique()
                .build(),
        )
        .register(
            TableSchema::new("posts")
                .add_attribute("title", AttrType::Text)
                .not_null()
                .build()
                .add_attribute("user_id", AttrType::Integer)
                .not_null()
                .constraint("REFERENCES users(id)")
                .build(),
        )
        .build()
        .unwrap()
}

#[tokio::test]
async fn create_all_runs_in_registration_order() {
    let conn = Recorder::default();
    blog().create_all(&conn).await.unwrap();

    let statements = conn.statements.lock().unwrap().clone();
    assert_eq!(
        statements,
        vec![
            "CREATE TABLE IF NOT EXISTS \"users\" (\"id\" SERIAL PRIMARY KEY, \
             \"name\" VARCHAR(255) NOT NULL, \"email\" VARCHAR(255) NOT NULL UNIQUE)",
            "CREATE TABLE IF NOT EXISTS \"posts\" (\"id\" SERIAL PRIMARY KEY, \
             \"title\" VARCHAR(255) NOT NULL, \"user_id\" INTEGER NOT NULL REFERENCES users(id))",
        ]
    );
}

#[tokio::test]
async fn create_all_stops_at_the_failing_table() {
    let conn = Recorder::failing_on("posts");
    let err = blog().create_all(&conn).await.unwrap_err();

    assert!(
        matches!(&err, DbError::CreateTable { table, .. } if table == "posts"),
        "{err:?}"
    );
    assert!(err.to_string().contains("'posts'"), "{err}");
    assert_eq!(conn.statements.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn default_single_row_helpers_follow_query() {
    let conn = Recorder::default();
    let err = conn.query_one("SELECT 1", &[]).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(conn.query_opt("SELECT 1", &[]).await.unwrap().is_none());

    let conn = Recorder::failing_on("users");
    let err = conn
        .query_opt("SELECT * FROM \"users\"", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Connection(_)));
}

#[test]
fn every_table_has_a_single_leading_primary_key() {
    for table in blog().tables() {
        let sql = table.build_sql();
        assert_eq!(sql.matches("PRIMARY KEY").count(), 1, "{sql}");
        assert_eq!(table.attributes()[0].name(), "id");
        assert!(table.attributes()[0].is_identity());
    }
}

#[test]
fn registry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<pgschema::SchemaRegistry>();

    let registry = blog();
    std::thread::scope(|s| {
        s.spawn(|| assert!(registry.contains("users")));
        s.spawn(|| assert!(registry.contains("posts")));
    });
}
