//! WHERE conditions and their rendering.
//!
//! A condition is a key (a column followed by its operator, e.g. `"age >="`)
//! paired with a [`ConditionValue`]. The last whitespace-separated token of
//! the key picks the rendering:
//!
//! | key ends with | value | fragment | bound values |
//! |---|---|---|---|
//! | `BETWEEN` | 2-element list | `(<key> ? AND ?)` | both elements |
//! | `IN` | non-empty list | `<key> (?,?,...)` | every element |
//! | anything else | list | `<key>` verbatim (raw fragment mode) | every element |
//! | anything else | `Value::Null` | `<key> NULL` | none |
//! | anything else | scalar | `<key> ?` | the scalar |
//!
//! # Raw fragment mode
//!
//! A list value under a key without a `BETWEEN`/`IN` suffix is bound as-is:
//! the key must already contain one `?` per element, e.g.
//! `("(a = ? OR b = ?)", [1, 2])`. The builder adds no placeholders of its
//! own; a miscount is caught at execution time as
//! [`QueryError::ParameterMismatch`](crate::QueryError::ParameterMismatch).

use crate::error::{QueryError, QueryResult};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;


/// Default connective between conditions.
pub const AND: &str = "AND";
/// Alternative connective between conditions.
pub const OR: &str = "OR";

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// A single value; `Value::Null` renders `NULL` instead of a placeholder.
    Scalar(Value),
    /// A sequence of values for `BETWEEN`, `IN` or raw fragments.
    List(Vec<Value>),
}

impl ConditionValue {
    /// Create a list value.
    pub fn list<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// The NULL marker.
    pub fn null() -> Self {
        Self::Scalar(Value::Null)
    }
}

impl From<Value> for ConditionValue {
    fn from(v: Value) -> Self {
        Self::Scalar(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for ConditionValue {
    fn from(v: Vec<T>) -> Self {
        Self::list(v)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for ConditionValue {
    fn from(v: [T; N]) -> Self {
        Self::list(v)
    }
}

macro_rules! impl_scalar_condition_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for ConditionValue {
                fn from(v: $t) -> Self {
                    Self::Scalar(Value::from(v))
                }
            }
        )*
    };
}

impl_scalar_condition_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    Decimal,
    String,
    &str,
    Uuid,
    NaiveDate,
    NaiveDateTime,
    DateTime<Utc>,
    serde_json::Value,
);

impl<T: Into<Value>> From<Option<T>> for ConditionValue {
    fn from(v: Option<T>) -> Self {
        Self::Scalar(Value::from(v))
    }
}

/// A single `key → value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    key: String,
    value: ConditionValue,
}

impl Condition {
    pub fn new(key: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &ConditionValue {
        &self.value
    }

    /// Render this condition as ` <fragment>` into `out`.
    fn render(&self, out: &mut Fragment) -> QueryResult<()> {
        let key = self.key.as_str();
        match (trailing_keyword(key), &self.value) {
            (Some("BETWEEN"), ConditionValue::List(values)) => {
                let [low, high] = values.as_slice() else {
                    return Err(QueryError::invalid_clause(format!(
                        "`{key}` expects exactly 2 values, got {}",
                        values.len()
                    )));
                };
                out.sql.push_str(" (");
                out.sql.push_str(key);
                out.sql.push_str(" ? AND ?)");
                out.values.push(low.clone());
                out.values.push(high.clone());
            }
            (Some("IN"), ConditionValue::List(values)) => {
                if values.is_empty() {
                    return Err(QueryError::invalid_clause(format!(
                        "`{key}` expects at least one value"
                    )));
                }
                out.sql.push(' ');
                out.sql.push_str(key);
                out.sql.push(' ');
                push_placeholder_group(&mut out.sql, values.len());
                out.values.extend(values.iter().cloned());
            }
            (Some(keyword @ ("BETWEEN" | "IN")), ConditionValue::Scalar(value)) => {
                return Err(QueryError::invalid_clause(format!(
                    "`{key}` expects a list of values, got a single {} ({keyword})",
                    value.kind()
                )));
            }
            (_, ConditionValue::List(values)) => {
                out.sql.push(' ');
                out.sql.push_str(key);
                out.values.extend(values.iter().cloned());
            }
            (_, ConditionValue::Scalar(Value::Null)) => {
                out.sql.push(' ');
                out.sql.push_str(key);
                out.sql.push_str(" NULL");
            }
            (_, ConditionValue::Scalar(value)) => {
                out.sql.push(' ');
                out.sql.push_str(key);
                out.sql.push_str(" ?");
                out.values.push(value.clone());
            }
        }
        Ok(())
    }
}

/// An insertion-ordered set of conditions.
///
/// ```ignore
/// use sqlchain::{Conditions, Value};
///
/// let conds = Conditions::new()
///     .with("status =", "active")
///     .with("age BETWEEN", [18, 65])
///     .with("deleted_at IS", Value::Null);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    items: Vec<Condition>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<ConditionValue>) -> &mut Self {
        self.items.push(Condition::new(key, value));
        self
    }

    /// Append a condition (consuming version).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.items.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Conditions
where
    K: Into<String>,
    V: Into<ConditionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|(key, value)| Condition::new(key, value))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Conditions
where
    K: Into<String>,
    V: Into<ConditionValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> From<Vec<(K, V)>> for Conditions
where
    K: Into<String>,
    V: Into<ConditionValue>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<Condition> for Conditions {
    fn from(condition: Condition) -> Self {
        Self {
            items: vec![condition],
        }
    }
}

/// SQL text plus the values bound by it, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Fragment {
    pub(crate) sql: String,
    pub(crate) values: Vec<Value>,
}

/// Render ` WHERE <c1> <logic> <c2> ...`.
///
/// Nothing is returned unless every condition renders, so a failing call
/// leaves the caller's statement untouched.
pub(crate) fn render_where(conditions: &Conditions, logic: &str) -> QueryResult<Fragment> {
    if conditions.is_empty() {
        return Err(QueryError::invalid_clause(
            "WHERE requires at least one condition",
        ));
    }

    let mut out = Fragment {
        sql: String::from(" WHERE"),
        values: Vec::new(),
    };
    let last = conditions.len() - 1;
    for (i, condition) in conditions.iter().enumerate() {
        condition.render(&mut out)?;
        if i < last {
            out.sql.push(' ');
            out.sql.push_str(logic);
        }
    }
    Ok(out)
}

/// Append `(?,?,...)` with `count` placeholders.
pub(crate) fn push_placeholder_group(sql: &mut String, count: usize) {
    sql.push('(');
    for i in 0..count {
        if i > 0 {
            sql.push(',');
        }
        sql.push('?');
    }
    sql.push(')');
}

fn trailing_keyword(key: &str) -> Option<&str> {
    key.split_whitespace().next_back()
}
