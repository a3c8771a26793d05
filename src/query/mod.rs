//! Parameterized SQL construction.
//!
//! Every caller-supplied value travels as a positional argument; only
//! fragments written in this crate ever become statement text. [`SqlBuilder`]
//! owns the placeholder counter, so a fragment and the argument it refers to
//! are always appended together and numbering cannot drift across branches.

pub mod tasks;
pub mod users;

use chrono::{DateTime, Utc};

/// A value bound to one `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    BigInt(i64),
    Timestamp(DateTime<Utc>),
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::BigInt(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

/// Statement text plus the arguments for its placeholders, in order.
///
/// `text` contains exactly `args.len()` placeholders, numbered `$1..=$n`.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub text: String,
    pub args: Vec<SqlValue>,
}

/// Accumulates statement text and arguments.
#[derive(Debug, Default)]
pub struct SqlBuilder {
    text: String,
    args: Vec<SqlValue>,
}

impl SqlBuilder {
    pub fn new(base: &str) -> Self {
        Self {
            text: base.to_string(),
            args: Vec::new(),
        }
    }

    /// Appends fixed text. Must never contain caller input.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.text.push_str(sql);
        self
    }

    /// Appends `sql` followed by the next placeholder, and records `value`
    /// as that placeholder's argument.
    pub fn push_bind(&mut self, sql: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.args.push(value.into());
        self.text.push_str(sql);
        self.text.push('$');
        self.text.push_str(&self.args.len().to_string());
        self
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    pub fn build(self) -> BuiltQuery {
        BuiltQuery {
            text: self.text,
            args: self.args,
        }
    }
}

/// The `SET` list of a sparse `UPDATE`.
///
/// Only columns that were explicitly set appear; an empty list means the
/// caller has nothing to write and should skip the statement entirely.
#[derive(Debug, Default)]
pub struct Assignments {
    columns: Vec<&'static str>,
    values: Vec<SqlValue>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &'static str, value: impl Into<SqlValue>) -> &mut Self {
        self.columns.push(column);
        self.values.push(value.into());
        self
    }

    /// Sets `column` only when `value` is present.
    pub fn set_if<V: Into<SqlValue>>(&mut self, column: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(column, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Renders `UPDATE <table> SET ..., updated_at = now() WHERE <keys> RETURNING <returning>`.
    ///
    /// Returns `None` when no column was set.
    pub fn into_update(
        self,
        table: &'static str,
        keys: Vec<(&'static str, SqlValue)>,
        returning: &str,
    ) -> Option<BuiltQuery> {
        if self.is_empty() {
            return None;
        }

        let mut builder = SqlBuilder::new("UPDATE ");
        builder.push(table).push(" SET ");
        for (i, (column, value)) in self.columns.into_iter().zip(self.values).enumerate() {
            let sep = if i == 0 { "" } else { ", " };
            builder.push_bind(&format!("{}{} = ", sep, column), value);
        }
        builder.push(", updated_at = now()");

        for (i, (column, value)) in keys.into_iter().enumerate() {
            let keyword = if i == 0 { " WHERE " } else { " AND " };
            builder.push_bind(&format!("{}{} = ", keyword, column), value);
        }
        builder.push(" RETURNING ").push(returning);

        Some(builder.build())
    }
}

/// Placeholder numbers in the order they appear in `text`.
#[cfg(test)]
pub(crate) fn placeholders(text: &str) -> Vec<usize> {
    let re = regex::Regex::new(r"\$(\d+)").unwrap();
    re.captures_iter(text)
        .map(|c| c[1].parse().unwrap())
        .collect()
}
