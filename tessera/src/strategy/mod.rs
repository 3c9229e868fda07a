//! Sharding strategies.
//!
//! A strategy maps one resolved sharding value (or value range) to the
//! set of node indices it lands on; the node lists themselves live in
//! the table rules.

pub mod inline;
pub mod range;
pub mod value;

pub use inline::InlineStrategy;
pub use range::RangeStrategy;
pub use value::ShardValue;

use std::collections::BTreeSet;
use std::hash::Hasher;

use fnv::FnvHasher;

use tessera_config::{Algorithm, Strategy as StrategyConfig};

use crate::topology::error::Error;

/// Closed set of sharding algorithms. Constructed from the configured
/// type tag; an unrecognized tag never gets past deserialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ShardingStrategy {
    /// Hash the value, modulo the node count.
    Modulo(ModuloStrategy),
    /// Match the value against configured ranges.
    Range(RangeStrategy),
    /// Evaluate an inline `prefix_${column % n}` expression.
    Inline(InlineStrategy),
    /// No sharding on this axis; never narrows the node set.
    #[default]
    None,
}

impl ShardingStrategy {
    pub fn from_config(config: &StrategyConfig) -> Result<Self, Error> {
        Ok(match config.algorithm {
            Algorithm::Modulo => Self::Modulo(ModuloStrategy::new(&config.column)),
            Algorithm::Range => Self::Range(RangeStrategy::new(&config.column, &config.ranges)),
            Algorithm::Inline => Self::Inline(InlineStrategy::from_config(config)?),
            Algorithm::None => Self::None,
        })
    }

    /// Node indices the value lands on, out of `node_count` nodes.
    pub fn resolve(&self, value: &ShardValue, node_count: usize) -> Result<BTreeSet<usize>, Error> {
        if node_count == 0 {
            return Ok(BTreeSet::new());
        }
        match self {
            Self::Modulo(modulo) => modulo.resolve(value, node_count),
            Self::Range(range) => range.resolve(value, node_count),
            Self::Inline(inline) => inline.resolve(value, node_count),
            Self::None => Ok((0..node_count).collect()),
        }
    }

    /// The sharding column, if this strategy has one.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Modulo(modulo) => Some(modulo.column()),
            Self::Range(range) => Some(range.column()),
            Self::Inline(inline) => Some(inline.column()),
            Self::None => None,
        }
    }

    /// The column participates in this strategy.
    pub fn is_sharding_column(&self, column: &str) -> bool {
        self.column()
            .map(|own| own.eq_ignore_ascii_case(column))
            .unwrap_or(false)
    }
}

/// Hash/modulo sharding.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuloStrategy {
    column: String,
}

impl ModuloStrategy {
    pub(crate) fn new(column: &str) -> Self {
        Self {
            column: column.to_owned(),
        }
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
            ShardValue::Integer(value) => {
                Ok([(value.rem_euclid(node_count as i64)) as usize].into())
            }
            ShardValue::Uuid(value) => Ok([hash(value.as_bytes()) % node_count].into()),
            ShardValue::Varchar(value) => Ok([hash(value.as_bytes()) % node_count].into()),
            ShardValue::Range(start, end) => {
                if end - start + 1 >= node_count as i64 {
                    return Ok((0..node_count).collect());
                }
                Ok((*start..=*end)
                    .map(|value| (value.rem_euclid(node_count as i64)) as usize)
                    .collect())
            }
        }
    }
}

fn hash(bytes: &[u8]) -> usize {
    let mut hasher = FnvHasher::default();
    hasher.write(bytes);
    hasher.finish() as usize
}
