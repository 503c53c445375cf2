//! Statement execution against a [`Connection`].

use crate::connection::{Connection, PreparedStatement};
use crate::error::{QueryError, QueryResult};
use crate::fetch::{FetchStrategy, QueryOutput};
use crate::placeholder;
use crate::value::Value;

const LOG_TARGET: &str = "sqlchain.sql";
const MAX_LOGGED_SQL: usize = 200;

/// Run a read statement and materialize its rows per `strategy`.
pub async fn extract<C: Connection>(
    conn: &C,
    sql: &str,
    values: &[Value],
    strategy: FetchStrategy,
) -> QueryResult<QueryOutput> {
    check_parameters(sql, values)?;
    tracing::debug!(
        target: LOG_TARGET,
        mode = "read",
        fetch = %strategy,
        param_count = values.len(),
        sql = %truncate_sql(sql),
    );

    let output = async {
        let mut stmt = conn.prepare(sql).await?;
        stmt.execute(values).await?;
        strategy.fetch(&mut stmt).await
    }
    .await
    .inspect_err(|e| log_failure(sql, e))?;

    tracing::debug!(target: LOG_TARGET, rows = row_count(&output), "read complete");
    Ok(output)
}

/// Run a write statement and report the affected-row count.
pub async fn mutate<C: Connection>(
    conn: &C,
    sql: &str,
    values: &[Value],
) -> QueryResult<QueryOutput> {
    check_parameters(sql, values)?;
    tracing::debug!(
        target: LOG_TARGET,
        mode = "write",
        param_count = values.len(),
        sql = %truncate_sql(sql),
    );

    let affected = async {
        let mut stmt = conn.prepare(sql).await?;
        stmt.execute(values).await
    }
    .await
    .inspect_err(|e| log_failure(sql, e))?;

    tracing::debug!(target: LOG_TARGET, affected, "write complete");
    Ok(QueryOutput::Affected(affected))
}

fn check_parameters(sql: &str, values: &[Value]) -> QueryResult<()> {
    let placeholders = placeholder::count(sql);
    if placeholders != values.len() {
        return Err(QueryError::ParameterMismatch {
            placeholders,
            values: values.len(),
        });
    }
    Ok(())
}

fn row_count(output: &QueryOutput) -> usize {
    match output {
        QueryOutput::Rows(rows) => rows.len(),
        QueryOutput::Row(row) => usize::from(row.is_some()),
        QueryOutput::Column(value) => usize::from(value.is_some()),
        QueryOutput::Empty | QueryOutput::Affected(_) => 0,
    }
}

fn log_failure(sql: &str, err: &QueryError) {
    tracing::warn!(target: LOG_TARGET, error = %err, sql = %truncate_sql(sql), "statement failed");
}

fn truncate_sql(sql: &str) -> String {
    if sql.len() <= MAX_LOGGED_SQL {
        return sql.to_string();
    }
    let mut end = MAX_LOGGED_SQL;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &sql[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_check_counts_placeholders() {
        assert!(check_parameters("SELECT 1", &[]).is_ok());
        let err = check_parameters("WHERE a = ? AND b = ?", &[Value::Int(1)]).unwrap_err();
        assert!(matches!(
            err,
            QueryError::ParameterMismatch {
                placeholders: 2,
                values: 1
            }
        ));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let sql = "é".repeat(150);
        let out = truncate_sql(&sql);
        assert!(out.ends_with("..."));
        assert!(out.len() <= MAX_LOGGED_SQL + 3);
    }
}
