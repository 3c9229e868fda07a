use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed data node \"{0}\", expected \"<data_source>.<table>\"")]
    MalformedDataNode(String),

    #[error("malformed node expression \"{0}\"")]
    MalformedExpression(String),

    #[error("unknown data source \"{0}\"")]
    UnknownDataSource(String),

    #[error("binding table \"{0}\" has no table rule")]
    UnknownBindingTable(String),

    #[error("duplicate table rule for logic table \"{0}\"")]
    DuplicateTableRule(String),

    #[error("table \"{0}\" is declared both sharded and broadcast")]
    BroadcastConflict(String),

    #[error("no table rule for logic table \"{0}\"")]
    NoTableRule(String),

    #[error("no data node for table \"{1}\" on data source \"{0}\"")]
    NoMatchingDataNode(String, String),

    #[error("data sources cannot be empty")]
    NoDataSources,

    #[error("sharding value doesn't match the strategy")]
    InvalidShardValue,

    #[error("{0}")]
    KeyGeneration(#[from] crate::keygen::Error),

    #[error("{0}")]
    Config(#[from] tessera_config::Error),
}
