use uuid::Uuid;

/// A resolved sharding value for one column.
///
/// Produced by the (out-of-scope) condition-extraction layer; this
/// engine only maps it to node indices.
#[derive(Debug, Clone, PartialEq)]
pub enum ShardValue {
    Integer(i64),
    Uuid(Uuid),
    Varchar(String),
    /// Inclusive range of integer values.
    Range(i64, i64),
}

impl From<i64> for ShardValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for ShardValue {
    fn from(value: &str) -> Self {
        Self::Varchar(value.to_owned())
    }
}

impl From<Uuid> for ShardValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}
