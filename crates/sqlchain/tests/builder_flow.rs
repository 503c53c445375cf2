//! End-to-end builder flows against a recording connection.

mod common;

use common::RecordingConnection;
use sqlchain::{
    Conditions, FetchStrategy, Mode, QueryBuilder, QueryError, QueryOutput, Row, Value,
};
use std::sync::Arc;

#[tokio::test]
async fn one_builder_serves_consecutive_statements() -> Result<(), QueryError> {
    let conn = Arc::new(RecordingConnection::with_rows(vec![
        Row::new().with("id", 1).with("name", "ada"),
    ]));
    let mut db = QueryBuilder::new(Arc::clone(&conn));

    let user = db
        .select(["id", "name"], "users")
        .where_([("name =", "ada")])?
        .limit(1, None)
        .result(FetchStrategy::One)
        .await?
        .into_row()
        .expect("one row");
    assert_eq!(user.try_get::<String>("name")?, "ada");

    let out = db
        .update("users", [("name", "ada l.")])?
        .where_([("id =", 1)])?
        .result(FetchStrategy::One)
        .await?;
    assert_eq!(out.affected(), Some(2));

    db.delete("users")?
        .where_([("id IN", [1, 2, 3])])?
        .result(FetchStrategy::One)
        .await?;

    assert_eq!(
        conn.executed(),
        vec![
            (
                "SELECT id,name FROM users WHERE name = ? LIMIT 1".to_string(),
                vec![Value::from("ada")]
            ),
            (
                " UPDATE users SET name = ? WHERE id = ?".to_string(),
                vec![Value::from("ada l."), Value::Int(1)]
            ),
            (
                "DELETE FROM users WHERE id IN (?,?,?)".to_string(),
                vec![Value::Int(1), Value::Int(2), Value::Int(3)]
            ),
        ]
    );
    assert_eq!(db.mode(), Mode::Empty);
    Ok(())
}

#[tokio::test]
async fn driver_error_propagates_and_builder_recovers() {
    let conn = Arc::new(RecordingConnection::failing_on("missing_table"));
    let mut db = QueryBuilder::new(Arc::clone(&conn));

    let err = db
        .select("*", "missing_table")
        .result(FetchStrategy::All)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("syntax error"));
    assert_eq!(db.sql(), "");

    db.truncate("present_table").unwrap();
    let out = db.result(FetchStrategy::One).await.unwrap();
    assert_eq!(out, QueryOutput::Affected(0));
    assert_eq!(conn.executed().len(), 1);
}

#[tokio::test]
async fn or_conditions_and_null_marker() {
    let conn = Arc::new(RecordingConnection::default());
    let mut db = QueryBuilder::new(Arc::clone(&conn));

    db.select("*", "tickets")
        .where_with(
            Conditions::new()
                .with("assignee IS", Value::Null)
                .with("priority >=", 3),
            "OR",
        )
        .unwrap()
        .order_by(["priority DESC", "id"])
        .unwrap()
        .result(FetchStrategy::All)
        .await
        .unwrap();

    let (sql, values) = conn.executed().remove(0);
    assert_eq!(
        sql,
        "SELECT * FROM tickets WHERE assignee IS NULL OR priority >= ? ORDER BY priority DESC,id"
    );
    assert_eq!(values, vec![Value::Int(3)]);
}

#[tokio::test]
async fn invalid_sequence_surfaces_immediately() {
    let conn = Arc::new(RecordingConnection::default());
    let mut db = QueryBuilder::new(conn);

    let err = db.where_([("id =", 1)]).unwrap_err();
    assert!(matches!(err, QueryError::InvalidSequence(_)));

    db.insert_into("t", &["a"], [1]).unwrap();
    let err = db.delete("t").unwrap_err();
    assert!(err.is_invalid_sequence());
    assert_eq!(db.sql(), "INSERT INTO t(a) VALUES (?)");
}
