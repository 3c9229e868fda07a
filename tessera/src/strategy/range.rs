use std::collections::BTreeSet;

use tessera_config::{FlexibleType, ShardRange};

use super::value::ShardValue;
use crate::topology::error::Error;

/// Maps contiguous, half-open `[start, end)` value ranges to node indices.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeStrategy {
    column: String,
    ranges: Vec<ShardRange>,
}

impl RangeStrategy {
    pub(crate) fn new(column: &str, ranges: &[ShardRange]) -> Self {
        Self {
            column: column.to_owned(),
            ranges: ranges.to_vec(),
        }
    }

    pub(crate) fn column(&self) -> &str {
        &self.column
    }

    /// A value outside every configured range doesn't narrow the node set.
    pub(crate) fn resolve(
        &self,
        value: &ShardValue,
        node_count: usize,
    ) -> Result<BTreeSet<usize>, Error> {
        let mut result = BTreeSet::new();

        for range in &self.ranges {
            let matched = match value {
                ShardValue::Integer(value) => integer(range, *value),
                ShardValue::Varchar(value) => varchar(range, value),
                ShardValue::Uuid(value) => varchar(range, &value.to_string()),
                ShardValue::Range(start, end) => overlaps(range, *start, *end),
            };
            if matched {
                result.insert(range.shard);
            }
        }

        if result.is_empty() {
            return Ok((0..node_count).collect());
        }
        result.retain(|index| *index < node_count);
        Ok(result)
    }
}

fn integer(range: &ShardRange, value: i64) -> bool {
    match (&range.start, &range.end) {
        (Some(FlexibleType::Integer(start)), Some(FlexibleType::Integer(end))) => {
            value >= *start && value < *end
        }
        (Some(FlexibleType::Integer(start)), None) => value >= *start,
        (None, Some(FlexibleType::Integer(end))) => value < *end,
        _ => false,
    }
}

fn varchar(range: &ShardRange, value: &str) -> bool {
    match (&range.start, &range.end) {
        (Some(FlexibleType::String(start)), Some(FlexibleType::String(end))) => {
            value >= start.as_str() && value < end.as_str()
        }
        (Some(FlexibleType::String(start)), None) => value >= start.as_str(),
        (None, Some(FlexibleType::String(end))) => value < end.as_str(),
        _ => false,
    }
}

/// An inclusive value range intersects the configured half-open range.
fn overlaps(range: &ShardRange, start: i64, end: i64) -> bool {
    let lower = match &range.start {
        Some(FlexibleType::Integer(value)) => Some(*value),
        Some(FlexibleType::String(_)) => return false,
        None => None,
    };
    let upper = match &range.end {
        Some(FlexibleType::Integer(value)) => Some(*value),
        Some(FlexibleType::String(_)) => return false,
        None => None,
    };
    if lower.is_none() && upper.is_none() {
        return false;
    }
    lower.map(|lower| end >= lower).unwrap_or(true)
        && upper.map(|upper| start < upper).unwrap_or(true)
}
