//! Search result pages.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// The two result sets a search job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// Raw log messages
    Messages,
    /// Aggregate records
    Records,
}

impl ResultKind {
    /// Path segment of the paginated results endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Records => "records",
        }
    }

    /// Name of the step output field that carries the written locator.
    pub fn path_field(&self) -> &'static str {
        match self {
            Self::Messages => "messagesPath",
            Self::Records => "recordsPath",
        }
    }

    /// Default object key for a job's results under a prefix.
    pub fn default_key(&self, prefix: &str, id: &str) -> String {
        format!("{}{}_{}.csv", prefix, id, self.as_str())
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered field names captured from the first page of a dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema(Vec<String>);

impl Schema {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Schema {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// One result row: an unordered field → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(default)]
    pub map: HashMap<String, Value>,
}

impl ResultRow {
    /// Value of a field, `None` when the row does not carry it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.map.get(field)
    }
}

/// One `(offset, limit)` window of a result set.
///
/// Only the first page of a dump carries the schema; every later page is
/// encoded against it.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPage {
    First { schema: Schema, rows: Vec<ResultRow> },
    Subsequent { rows: Vec<ResultRow> },
}

impl ResultPage {
    pub fn rows(&self) -> &[ResultRow] {
        match self {
            Self::First { rows, .. } | Self::Subsequent { rows } => rows,
        }
    }

    pub fn is_first(&self) -> bool {
        matches!(self, Self::First { .. })
    }
}
