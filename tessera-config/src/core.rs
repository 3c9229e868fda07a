use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::data_source::ReplicaGroup;
use crate::error::Error;
use crate::sharding::{KeyGenerator, Strategy, Table};

/// Sharding rule configuration: one snapshot of everything the
/// topology engine needs to lay logical tables out over data sources.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Config {
    /// Sharded logical tables.
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Replication groups, each collapsing to one logical data source name.
    #[serde(default)]
    pub replica_groups: Vec<ReplicaGroup>,
    /// Comma-joined groups of logical tables that shard in lockstep,
    /// e.g. `"t_order, t_order_item"`.
    #[serde(default)]
    pub binding_tables: Vec<String>,
    /// Logical tables replicated identically to every data source.
    #[serde(default)]
    pub broadcast_tables: Vec<String>,
    /// Tables without a rule of their own are routed here, when set.
    #[serde(default)]
    pub default_data_source: Option<String>,
    /// Fallback database strategy for tables that don't declare one.
    #[serde(default)]
    pub default_database_strategy: Option<Strategy>,
    /// Fallback table strategy for tables that don't declare one.
    #[serde(default)]
    pub default_table_strategy: Option<Strategy>,
    /// Fallback key generator for tables that don't declare one.
    #[serde(default)]
    pub default_key_generator: Option<KeyGenerator>,
    /// Data sources excluded from this snapshot.
    #[serde(default)]
    pub disabled_data_sources: Vec<String>,
}

impl Config {
    /// Load configuration from disk, or use defaults when the file
    /// doesn't exist. Any other read failure is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        match read_to_string(path) {
            Ok(config) => {
                let config: Config = toml::from_str(&config)?;
                info!("loaded \"{}\"", path.display());
                Ok(config)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("\"{}\" doesn't exist, loading defaults instead", path.display());
                Ok(Config::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Find a table declaration by logical name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|table| table.name.eq_ignore_ascii_case(name))
    }

    /// Column the rule-wide default key generator is configured for.
    pub fn default_key_column(&self) -> Option<&str> {
        self.default_key_generator
            .as_ref()
            .map(|generator| generator.column.as_str())
            .filter(|column| !column.is_empty())
    }
}
