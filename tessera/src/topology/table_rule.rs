//! Routing rule for one logical table.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use tessera_config::Table as TableConfig;

use crate::keygen::{self, KeyGenerator};
use crate::strategy::ShardingStrategy;

use super::data_node::DataNode;
use super::datasource_names::DataSourceNames;
use super::error::Error;
use super::expression;

/// One logical table: its physical data nodes, cached lookup views
/// over them, and the strategies that pick among them.
///
/// Immutable once built; configuration changes replace the instance
/// wholesale, they never patch it.
#[derive(Debug, Clone)]
pub struct TableRule {
    logic_table: String,
    actual_data_nodes: Vec<DataNode>,
    /// Dense node → position map. Empty for single-node and broadcast
    /// rules, whose callers never route by index.
    data_node_index: HashMap<DataNode, usize>,
    actual_table_names: IndexSet<String>,
    actual_data_source_names: IndexSet<String>,
    data_source_to_tables: IndexMap<String, Vec<String>>,
    database_strategy: Option<ShardingStrategy>,
    table_strategy: Option<ShardingStrategy>,
    key_generate_column: Option<String>,
    key_generator: Option<Arc<dyn KeyGenerator>>,
}

impl TableRule {
    /// Single fixed node on one data source. No strategies, no key
    /// generator, no index map.
    pub(crate) fn fixed(data_source_name: &str, logic_table: &str) -> Self {
        Self::build(
            logic_table,
            vec![DataNode::new(data_source_name, logic_table)],
            false,
            None,
            None,
            None,
            None,
        )
    }

    /// One node per data source, every table named after the logic table.
    /// Used to materialize broadcast tables on demand.
    pub(crate) fn broadcast<'a>(
        logic_table: &str,
        data_sources: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        let nodes = data_sources
            .into_iter()
            .map(|data_source| DataNode::new(data_source, logic_table))
            .collect();
        Self::build(logic_table, nodes, false, None, None, None, None)
    }

    /// Cross product of the logic table over every supplied data source,
    /// in the order they were supplied.
    pub(crate) fn cross_product(
        config: &TableConfig,
        data_sources: &[String],
        default_key_column: Option<&str>,
    ) -> Result<Self, Error> {
        let nodes = data_sources
            .iter()
            .map(|data_source| DataNode::new(data_source, &config.name))
            .collect();
        Self::from_config(config, nodes, default_key_column)
    }

    /// Nodes from the configured node expression, each validated against
    /// the resolved data source universe.
    pub(crate) fn from_expression(
        config: &TableConfig,
        expression_text: &str,
        names: &DataSourceNames,
        default_key_column: Option<&str>,
    ) -> Result<Self, Error> {
        let mut nodes = Vec::new();
        for text in expression::expand(expression_text)? {
            let node = DataNode::from_str(&text)?;
            if !names.contains(node.data_source_name()) {
                return Err(Error::UnknownDataSource(node.data_source_name().to_owned()));
            }
            nodes.push(node);
        }
        Self::from_config(config, nodes, default_key_column)
    }

    fn from_config(
        config: &TableConfig,
        nodes: Vec<DataNode>,
        default_key_column: Option<&str>,
    ) -> Result<Self, Error> {
        let database_strategy = config
            .database_strategy
            .as_ref()
            .map(ShardingStrategy::from_config)
            .transpose()?;
        let table_strategy = config
            .table_strategy
            .as_ref()
            .map(ShardingStrategy::from_config)
            .transpose()?;

        // A table-local generator needs both a type and a column;
        // otherwise the rule-wide default column and generator apply.
        let (key_generate_column, key_generator) = match &config.key_generator {
            Some(generator) if !generator.kind.is_empty() && !generator.column.is_empty() => {
                let instance: Arc<dyn KeyGenerator> = keygen::from_config(generator)?;
                (Some(generator.column.clone()), Some(instance))
            }
            _ => (default_key_column.map(str::to_owned), None),
        };

        Ok(Self::build(
            &config.name,
            nodes,
            true,
            database_strategy,
            table_strategy,
            key_generate_column,
            key_generator,
        ))
    }

    fn build(
        logic_table: &str,
        actual_data_nodes: Vec<DataNode>,
        indexed: bool,
        database_strategy: Option<ShardingStrategy>,
        table_strategy: Option<ShardingStrategy>,
        key_generate_column: Option<String>,
        key_generator: Option<Arc<dyn KeyGenerator>>,
    ) -> Self {
        let mut data_node_index = HashMap::new();
        let mut actual_table_names = IndexSet::new();
        let mut actual_data_source_names = IndexSet::new();
        let mut data_source_to_tables: IndexMap<String, Vec<String>> = IndexMap::new();

        // One pass; the ordered views keep first-seen order.
        for (position, node) in actual_data_nodes.iter().enumerate() {
            if indexed {
                data_node_index.insert(node.clone(), position);
            }
            actual_table_names.insert(node.table_name().to_owned());
            actual_data_source_names.insert(node.data_source_name().to_owned());
            data_source_to_tables
                .entry(node.data_source_name().to_owned())
                .or_default()
                .push(node.table_name().to_owned());
        }

        Self {
            logic_table: logic_table.to_lowercase(),
            actual_data_nodes,
            data_node_index,
            actual_table_names,
            actual_data_source_names,
            data_source_to_tables,
            database_strategy,
            table_strategy,
            key_generate_column,
            key_generator,
        }
    }

    /// Canonical (lower-cased) logical table name.
    pub fn logic_table(&self) -> &str {
        &self.logic_table
    }

    pub fn actual_data_nodes(&self) -> &[DataNode] {
        &self.actual_data_nodes
    }

    /// Distinct physical table names, in first-seen order.
    pub fn actual_table_names(&self) -> &IndexSet<String> {
        &self.actual_table_names
    }

    /// Distinct data source names, in first-seen order.
    pub fn actual_data_source_names(&self) -> &IndexSet<String> {
        &self.actual_data_source_names
    }

    pub fn data_source_to_tables(&self) -> &IndexMap<String, Vec<String>> {
        &self.data_source_to_tables
    }

    /// Physical tables for this rule on one data source.
    pub fn actual_tables_on(&self, data_source: &str) -> &[String] {
        self.data_source_to_tables
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(data_source))
            .map(|(_, tables)| tables.as_slice())
            .unwrap_or(&[])
    }

    /// The physical table belongs to this rule.
    pub fn has_actual_table(&self, name: &str) -> bool {
        self.actual_table_names
            .iter()
            .any(|table| table.eq_ignore_ascii_case(name))
    }

    /// Position of the (data source, table) node in the node list.
    ///
    /// Rules without an index map (fixed, broadcast) report `None`;
    /// callers special-case those shapes instead of routing by index.
    pub fn actual_table_index(&self, data_source: &str, actual_table: &str) -> Option<usize> {
        self.data_node_index
            .get(&DataNode::new(data_source, actual_table))
            .copied()
    }

    pub fn database_strategy(&self) -> Option<&ShardingStrategy> {
        self.database_strategy.as_ref()
    }

    pub fn table_strategy(&self) -> Option<&ShardingStrategy> {
        self.table_strategy.as_ref()
    }

    pub fn key_generate_column(&self) -> Option<&str> {
        self.key_generate_column.as_deref()
    }

    pub fn key_generator(&self) -> Option<&Arc<dyn KeyGenerator>> {
        self.key_generator.as_ref()
    }
}
