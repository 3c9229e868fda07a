//! Key generation strategies.
//!
//! Generators are registered by type tag at process start and looked up
//! by name during rule construction; an unknown tag fails construction
//! instead of falling back to anything.

pub mod snowflake;

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use once_cell::sync::Lazy;
use thiserror::Error;
use uuid::Uuid;

pub use snowflake::Snowflake;
use tessera_config::KeyGenerator as KeyGeneratorConfig;

/// A generated key value.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Number(i64),
    Uuid(Uuid),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown key generator \"{0}\"")]
    UnknownGenerator(String),

    #[error("invalid node identifier: {0}")]
    InvalidNodeId(String),

    #[error("timestamp overflows the key layout")]
    ClockOverflow,
}

/// Produce the next globally-unique key, independent of any single
/// shard's native auto-increment.
pub trait KeyGenerator: Debug + Send + Sync {
    fn next_key(&self) -> Result<Key, Error>;
}

/// Uuid v4 keys.
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl KeyGenerator for UuidGenerator {
    fn next_key(&self) -> Result<Key, Error> {
        Ok(Key::Uuid(Uuid::new_v4()))
    }
}

type Constructor = fn(&HashMap<String, String>) -> Result<Arc<dyn KeyGenerator>, Error>;

static REGISTRY: Lazy<HashMap<&'static str, Constructor>> = Lazy::new(|| {
    let mut registry: HashMap<&'static str, Constructor> = HashMap::new();
    registry.insert("snowflake", |properties| {
        Ok(Arc::new(Snowflake::from_properties(properties)?))
    });
    registry.insert("uuid", |_| Ok(Arc::new(UuidGenerator)));
    registry
});

/// Instantiate the configured generator.
pub fn from_config(config: &KeyGeneratorConfig) -> Result<Arc<dyn KeyGenerator>, Error> {
    let constructor = REGISTRY
        .get(config.kind.as_str())
        .ok_or_else(|| Error::UnknownGenerator(config.kind.clone()))?;
    constructor(&config.properties)
}

/// The system default generator, used when nothing is configured.
pub fn system_default() -> Arc<dyn KeyGenerator> {
    Arc::new(Snowflake::default())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_registry() {
        let config = KeyGeneratorConfig {
            kind: "uuid".into(),
            column: "id".into(),
            properties: HashMap::new(),
        };
        let generator = from_config(&config).unwrap();
        assert!(matches!(generator.next_key().unwrap(), Key::Uuid(_)));
    }

    #[test]
    fn test_unknown_generator() {
        let config = KeyGeneratorConfig {
            kind: "sequence".into(),
            ..Default::default()
        };
        assert!(matches!(
            from_config(&config),
            Err(Error::UnknownGenerator(kind)) if kind == "sequence"
        ));
    }

    #[test]
    fn test_system_default() {
        assert!(matches!(
            system_default().next_key().unwrap(),
            Key::Number(_)
        ));
    }
}
