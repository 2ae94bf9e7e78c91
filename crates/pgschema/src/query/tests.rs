use super::*;
use crate::error::DbError;
use std::sync::Mutex;
use tokio_postgres::types::ToSql;

/// Records every statement instead of sending it.
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    fail: bool,
}

impl Recorder {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn record(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<()> {
        self.calls.lock().unwrap().push((
            sql.to_string(),
            params.iter().map(|p| format!("{p:?}")).collect(),
        ));
        if self.fail {
            return Err(DbError::Connection("connection reset".to_string()));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl GenericClient for Recorder {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<Vec<Row>> {
        self.record(sql, params)?;
        Ok(Vec::new())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DbResult<u64> {
        self.record(sql, params)?;
        Ok(1)
    }
}

// ==================== INSERT ====================

#[test]
fn insert_pairs_columns_and_values() {
    let mut q = InsertQuery::new("users");
    q.add_column("name")
        .add_value("Ann")
        .add_column("email")
        .add_value("a@x.com");
    assert_eq!(q.build(), "INSERT INTO users (name, email) VALUES ($1, $2)");
    assert_eq!(
        q.values(),
        vec![
            &Value::Text("Ann".to_string()),
            &Value::Text("a@x.com".to_string())
        ]
    );
}

#[test]
fn insert_without_columns_uses_default_values() {
    assert_eq!(
        InsertQuery::new("users").build(),
        "INSERT INTO users DEFAULT VALUES"
    );
}

#[test]
fn insert_returning() {
    let mut q = InsertQuery::new("posts");
    q.set("title", "Hello").set("user_id", 7).returning(&["id"]);
    assert_eq!(
        q.build(),
        "INSERT INTO posts (title, user_id) VALUES ($1, $2) RETURNING id"
    );
}

#[test]
#[should_panic(expected = "2 columns but 1 values")]
fn insert_length_mismatch_panics() {
    let mut q = InsertQuery::new("users");
    q.add_column("name").add_column("email").add_value("Ann");
    q.build();
}

// ==================== UPDATE ====================

#[test]
fn update_numbers_conditions_after_set_values() {
    let mut q = UpdateQuery::new("users");
    q.set("name", "Bob")
        .set("email", "b@x.com")
        .and_where("id > 0")
        .where_with_value("id = ?", 3);
    assert_eq!(
        q.build(),
        "UPDATE users SET name = $1, email = $2 WHERE id > 0 AND id = $3"
    );
    assert_eq!(
        q.values(),
        vec![&Value::from("Bob"), &Value::from("b@x.com"), &Value::from(3)]
    );
}

#[test]
#[should_panic(expected = "update users: 1 columns but 0 values")]
fn update_length_mismatch_panics() {
    let mut q = UpdateQuery::new("users");
    q.add_column("name");
    q.build();
}

#[test]
#[should_panic(expected = "\"id = 1\" must contain exactly one `?`")]
fn delete_condition_without_placeholder_panics() {
    DeleteQuery::new("users").where_with_value("id = 1", 5);
}

#[test]
fn select_keeps_quoted_question_marks() {
    let mut q = SelectQuery::new("posts");
    q.where_with_value("title <> '?' AND content = ?", "body")
        .where_with_value("published = ?", true);
    assert_eq!(
        q.build(),
        "SELECT * FROM posts WHERE title <> '?' AND content = $1 AND published = $2"
    );
}

#[tokio::test]
async fn update_without_columns_is_rejected_regardless_of_conditions() {
    let conn = Recorder::default();

    let err = UpdateQuery::new("users").execute(&conn).await.unwrap_err();
    assert!(matches!(err, DbError::NoColumnToUpdate { ref table } if table == "users"));

    let mut q = UpdateQuery::new("users");
    q.and_where("id = 1").where_with_value("name = ?", "Ann");
    let err = q.execute(&conn).await.unwrap_err();
    assert!(matches!(err, DbError::NoColumnToUpdate { .. }));

    assert!(conn.calls().is_empty());
}

// ==================== DELETE ====================

#[test]
fn delete_without_condition_targets_whole_table() {
    assert_eq!(DeleteQuery::new("users").build(), "DELETE FROM users");
}

#[test]
fn delete_with_conditions() {
    let mut q = DeleteQuery::new("users");
    q.add_condition("active = FALSE")
        .where_with_value("email = ?", "a@x.com");
    assert_eq!(
        q.build(),
        "DELETE FROM users WHERE active = FALSE AND email = $1"
    );
    assert_eq!(q.values(), vec![&Value::from("a@x.com")]);
}

// ==================== SELECT ====================

#[test]
fn select_defaults_to_star() {
    assert_eq!(SelectQuery::new("users").build(), "SELECT * FROM users");
}

#[test]
fn select_mixed_conditions_number_in_order() {
    let mut q = SelectQuery::new("users");
    q.add_column("id")
        .add_column("name")
        .where_with_value("name = ?", "Ann")
        .and_where("email IS NOT NULL")
        .where_with_value("id < ?", 100)
        .order_by("id", Order::Desc)
        .limit(5)
        .offset(10);
    assert_eq!(
        q.build(),
        "SELECT id, name FROM users WHERE name = $1 AND email IS NOT NULL AND id < $2 \
         ORDER BY id DESC LIMIT 5 OFFSET 10"
    );
    assert_eq!(q.values().len(), 2);
}

#[test]
fn build_is_idempotent() {
    let mut s = SelectQuery::new("users");
    s.where_with_value("name = ?", "Ann").limit(1);
    assert_eq!(s.build(), s.build());

    let mut u = UpdateQuery::new("users");
    u.set("name", "Ann").where_with_value("id = ?", 1);
    assert_eq!(u.build(), u.build());

    let mut i = InsertQuery::new("users");
    i.set("name", "Ann");
    assert_eq!(i.build(), i.build());

    let d = DeleteQuery::new("users");
    assert_eq!(d.build(), d.build());
}

// ==================== Execution ====================

#[tokio::test]
async fn execute_hands_sql_and_values_to_the_client() {
    let conn = Recorder::default();
    let mut q = InsertQuery::new("users");
    q.set("name", "Ann").set("age", 30);
    assert_eq!(q.execute(&conn).await.unwrap(), 1);

    let calls = conn.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "INSERT INTO users (name, age) VALUES ($1, $2)");
    assert_eq!(calls[0].1, vec!["Text(\"Ann\")", "Integer(30)"]);
}

#[tokio::test]
async fn select_execute_and_fetch_one() {
    let conn = Recorder::default();
    let mut q = SelectQuery::new("users");
    q.where_with_value("id = ?", 1);

    assert!(q.execute(&conn).await.unwrap().is_empty());
    let err = q.fetch_one(&conn).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("users"));
    assert_eq!(conn.calls()[0].0, "SELECT * FROM users WHERE id = $1");
}

#[tokio::test]
async fn collaborator_errors_are_surfaced_unmodified() {
    let conn = Recorder::failing();
    let err = DeleteQuery::new("users").execute(&conn).await.unwrap_err();
    assert!(matches!(err, DbError::Connection(ref m) if m == "connection reset"));
}
