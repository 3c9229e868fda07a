use serde::{Deserialize, Serialize};

/// A replication group: one primary and any number of replicas,
/// exposed to the sharding engine under a single logical name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ReplicaGroup {
    /// Logical name the group is addressed by.
    pub name: String,
    /// Data source serving writes.
    pub primary: String,
    /// Data sources serving reads.
    #[serde(default)]
    pub replicas: Vec<String>,
}

impl ReplicaGroup {
    /// The given physical name is a member of this group.
    pub fn contains(&self, name: &str) -> bool {
        self.primary.eq_ignore_ascii_case(name)
            || self
                .replicas
                .iter()
                .any(|replica| replica.eq_ignore_ascii_case(name))
    }
}
