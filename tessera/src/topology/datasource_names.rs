//! Data source names visible to the sharding engine.
//!
//! Replication groups collapse into their logical name here, so the rest
//! of the engine never needs to know about replication topology.

use indexmap::IndexSet;
use rand::seq::IndexedRandom;

use tessera_config::ReplicaGroup;

/// The resolved data source universe for one configuration snapshot.
#[derive(Debug, Clone, Default)]
pub struct DataSourceNames {
    names: IndexSet<String>,
    groups: Vec<ReplicaGroup>,
    default_data_source: Option<String>,
}

impl DataSourceNames {
    /// Resolve raw physical names against replication groups.
    ///
    /// Group members are replaced by the group's logical name, in the
    /// position of the first member seen; disabled names are excluded
    /// from the universe for this snapshot.
    pub fn new(
        raw: &[String],
        groups: &[ReplicaGroup],
        disabled: &[String],
        default_data_source: Option<String>,
    ) -> Self {
        let mut names = IndexSet::new();
        for name in raw {
            if disabled.iter().any(|d| d.eq_ignore_ascii_case(name)) {
                continue;
            }
            match groups.iter().find(|group| group.contains(name)) {
                Some(group) => names.insert(group.name.clone()),
                None => names.insert(name.clone()),
            };
        }

        Self {
            names,
            groups: groups.to_vec(),
            default_data_source,
        }
    }

    /// Resolved names, in first-seen order.
    pub fn names(&self) -> &IndexSet<String> {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Data source used for tables without a rule of their own, if set.
    pub fn default_data_source(&self) -> Option<&str> {
        self.default_data_source.as_deref()
    }

    /// The concrete name a write statement should be sent to:
    /// the group's primary for a group name, else the input unchanged.
    ///
    /// Resolution is best-effort; unknown names pass through and strict
    /// validation happens at table rule construction.
    pub fn resolve_physical<'a>(&'a self, name: &'a str) -> &'a str {
        match self.find_group(name) {
            Some(group) => &group.primary,
            None => name,
        }
    }

    /// The concrete name a read statement should be sent to: a random
    /// replica for a group name (the primary when the group has none),
    /// else the input unchanged.
    pub fn resolve_read<'a>(&'a self, name: &'a str) -> &'a str {
        match self.find_group(name) {
            Some(group) => group
                .replicas
                .choose(&mut rand::rng())
                .unwrap_or(&group.primary),
            None => name,
        }
    }

    fn find_group(&self, name: &str) -> Option<&ReplicaGroup> {
        self.groups
            .iter()
            .find(|group| group.name.eq_ignore_ascii_case(name))
    }
}
