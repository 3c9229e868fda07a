// Submodules
pub mod core;
pub mod data_source;
pub mod error;
pub mod sharding;

pub use core::Config;
pub use data_source::ReplicaGroup;
pub use error::Error;
pub use sharding::*;
