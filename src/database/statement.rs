//! Parameterized statement builders.
//!
//! Builders collect `(column, value)` pairs and render a single statement with
//! PostgreSQL positional placeholders, so a column is only ever named when a
//! value is bound for it.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::Postgres;

/// A value bound to a statement placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i32),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

/// Rendered SQL plus its parameters in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlValue>,
}

impl SqlResult {
    /// Attach every parameter to a sqlx query in order
    pub fn bind(&self) -> sqlx::query::Query<'_, Postgres, PgArguments> {
        let mut q = sqlx::query(&self.query);
        for p in &self.params {
            q = bind_param(q, p);
        }
        q
    }
}

pub fn bind_param<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    v: &'q SqlValue,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match v {
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Text(s) => q.bind(s.as_str()),
        SqlValue::Timestamp(t) => q.bind(*t),
    }
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// INSERT whose column list grows one pair at a time
#[derive(Debug)]
pub struct InsertStatement {
    table: &'static str,
    columns: Vec<&'static str>,
    values: Vec<SqlValue>,
    returning: Option<&'static str>,
}

impl InsertStatement {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            columns: Vec::new(),
            values: Vec::new(),
            returning: None,
        }
    }

    pub fn value(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.columns.push(column);
        self.values.push(value.into());
        self
    }

    /// Adds the column only when a value is present
    pub fn value_opt<V: Into<SqlValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.value(column, v),
            None => self,
        }
    }

    pub fn returning(mut self, column: &'static str) -> Self {
        self.returning = Some(column);
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let field_list = self
            .columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");

        let placeholders = (1..=self.values.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");

        let mut query = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(self.table),
            field_list,
            placeholders
        );
        if let Some(column) = self.returning {
            query.push_str(&format!(" RETURNING {}", quote_identifier(column)));
        }

        SqlResult {
            query,
            params: self.values.clone(),
        }
    }
}

/// UPDATE ... SET over only the assigned columns, keyed by one column
#[derive(Debug)]
pub struct UpdateStatement {
    table: &'static str,
    assignments: Vec<(&'static str, SqlValue)>,
    key: (&'static str, SqlValue),
}

impl UpdateStatement {
    pub fn new(table: &'static str, key_column: &'static str, key: impl Into<SqlValue>) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            key: (key_column, key.into()),
        }
    }

    pub fn set(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.assignments.push((column, value.into()));
        self
    }

    pub fn set_opt<V: Into<SqlValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Renders the statement, or `None` when nothing was assigned.
    pub fn to_sql(&self) -> Option<SqlResult> {
        if self.assignments.is_empty() {
            return None;
        }

        let set_clauses = self
            .assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ${}", quote_identifier(column), i + 1))
            .collect::<Vec<_>>()
            .join(", ");

        let mut params: Vec<SqlValue> = self.assignments.iter().map(|(_, v)| v.clone()).collect();
        params.push(self.key.1.clone());

        let query = format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            quote_identifier(self.table),
            set_clauses,
            quote_identifier(self.key.0),
            params.len()
        );

        Some(SqlResult { query, params })
    }
}
