//! Inline sharding expressions.
//!
//! The enumerable form `prefix_${column % n}`: the node index is the
//! sharding value modulo `n`. Parsed once at construction; anything
//! else in the placeholder is rejected there, not at query time.

use std::collections::BTreeSet;

use tessera_config::Strategy as StrategyConfig;

use super::value::ShardValue;
use crate::topology::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct InlineStrategy {
    column: String,
    modulus: i64,
}

impl InlineStrategy {
    pub(crate) fn from_config(config: &StrategyConfig) -> Result<Self, Error> {
        let expression = config
            .expression
            .as_deref()
            .ok_or_else(|| Error::MalformedExpression("(no expression)".into()))?;
        let (column, modulus) = parse(expression)?;

        // The declared column wins over the one in the expression.
        let column = if config.column.is_empty() {
            column
        } else {
            config.column.clone()
        };

        Ok(Self { column, modulus })
    }

    pub(crate) fn column(&self) -> &str {
        &self.column
    }

    pub(crate) fn resolve(
        &self,
        value: &ShardValue,
        node_count: usize,
    ) -> Result<BTreeSet<usize>, Error> {
        match value {
            ShardValue::Integer(value) => Ok([self.index(*value, node_count)].into()),
            ShardValue::Varchar(text) => {
                let value: i64 = text.parse().map_err(|_| Error::InvalidShardValue)?;
                Ok([self.index(value, node_count)].into())
            }
            ShardValue::Range(start, end) => {
                if end - start + 1 >= self.modulus {
                    return Ok((0..node_count).collect());
                }
                Ok((*start..=*end)
                    .map(|value| self.index(value, node_count))
                    .collect())
            }
            ShardValue::Uuid(_) => Err(Error::InvalidShardValue),
        }
    }

    fn index(&self, value: i64, node_count: usize) -> usize {
        (value.rem_euclid(self.modulus) as usize) % node_count.max(1)
    }
}

/// Parse `prefix_${column % n}` into its column and modulus.
fn parse(expression: &str) -> Result<(String, i64), Error> {
    let malformed = || Error::MalformedExpression(expression.to_owned());

    let start = expression.find("${").ok_or_else(malformed)?;
    let end = expression[start..]
        .find('}')
        .map(|offset| start + offset)
        .ok_or_else(malformed)?;

    let body = &expression[start + 2..end];
    let (column, modulus) = body.split_once('%').ok_or_else(malformed)?;
    let column = column.trim();
    let modulus: i64 = modulus.trim().parse().map_err(|_| malformed())?;

    if column.is_empty() || modulus <= 0 {
        return Err(malformed());
    }

    Ok((column.to_owned(), modulus))
}
