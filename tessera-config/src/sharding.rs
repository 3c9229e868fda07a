use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sharded logical table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Table {
    /// Logical table name, as it appears in SQL statements.
    pub name: String,
    /// Node template, e.g. `ds_${0..1}.t_order_${0..1}`.
    ///
    /// If none specified, the table is spread over
    /// every supplied data source.
    #[serde(default)]
    pub data_nodes: Option<String>,
    /// Strategy picking the data source for a statement.
    #[serde(default)]
    pub database_strategy: Option<Strategy>,
    /// Strategy picking the physical table within a data source.
    #[serde(default)]
    pub table_strategy: Option<Strategy>,
    /// Generator for this table's auto-generated key column.
    #[serde(default)]
    pub key_generator: Option<KeyGenerator>,
}

/// Sharding strategy for one axis (database or table).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Strategy {
    /// Sharding algorithm.
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Sharding column.
    #[serde(default)]
    pub column: String,
    /// Inline expression, e.g. `t_order_${order_id % 2}`.
    #[serde(default)]
    pub expression: Option<String>,
    /// Value range to node index mappings.
    #[serde(default)]
    pub ranges: Vec<ShardRange>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Copy, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Hash the sharding value, modulo the node count.
    Modulo,
    /// Match the sharding value against configured ranges.
    Range,
    /// Evaluate an inline `prefix_${column % n}` expression.
    Inline,
    /// No sharding on this axis.
    #[default]
    None,
}

/// One contiguous range of sharding values mapped to a node index.
///
/// An absent bound is open-ended on that side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ShardRange {
    #[serde(default)]
    pub start: Option<FlexibleType>,
    #[serde(default)]
    pub end: Option<FlexibleType>,
    pub shard: usize,
}

/// Key generator declaration: which generator, for which column.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct KeyGenerator {
    /// Generator type tag, looked up in the generator registry.
    #[serde(default)]
    pub kind: String,
    /// Column the generated key is for.
    #[serde(default)]
    pub column: String,
    /// Generator-specific settings, e.g. `node_id` for snowflake.
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Eq, Hash)]
#[serde(untagged)]
pub enum FlexibleType {
    Integer(i64),
    String(String),
}

impl From<i64> for FlexibleType {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<String> for FlexibleType {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FlexibleType {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}
