//! In-memory sharding topology.
//!
//! A configuration snapshot flows through name resolution, per-table
//! rule construction and binding-group construction into one immutable
//! [`ShardingRule`], consulted read-only for every statement.

pub mod binding;
pub mod data_node;
pub mod datasource_names;
pub mod error;
pub mod expression;
pub mod published;
pub mod rule;
pub mod table_rule;

pub use binding::BindingTableRule;
pub use data_node::DataNode;
pub use datasource_names::DataSourceNames;
pub use error::Error;
pub use rule::ShardingRule;
pub use table_rule::TableRule;
