//! Sharding topology and rule engine.
//!
//! Turns a declarative sharding configuration into an immutable,
//! queryable topology: which physical tables on which data sources
//! back each logical table, which tables shard in lockstep, and which
//! are replicated everywhere. Routing layers read one published
//! instance lock-free; configuration changes build a replacement and
//! swap it atomically.

pub mod keygen;
pub mod strategy;
pub mod topology;

pub use keygen::{Key, KeyGenerator};
pub use strategy::{ShardValue, ShardingStrategy};
pub use topology::published::{reload, reload_from_path, replace, topology};
pub use topology::{BindingTableRule, DataNode, DataSourceNames, Error, ShardingRule, TableRule};
