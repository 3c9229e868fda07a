//! Binding table groups.
//!
//! Tables declared to shard in lockstep: the same position in each
//! table's node list lands on the same shard, so joins across them
//! route without per-pair validation at query time.

use std::sync::Arc;

use super::error::Error;
use super::table_rule::TableRule;

/// One group of lockstep tables, referencing already-built table rules.
#[derive(Debug, Clone)]
pub struct BindingTableRule {
    table_rules: Vec<Arc<TableRule>>,
}

impl BindingTableRule {
    pub(crate) fn new(table_rules: Vec<Arc<TableRule>>) -> Self {
        Self { table_rules }
    }

    pub fn table_rules(&self) -> &[Arc<TableRule>] {
        &self.table_rules
    }

    pub fn has_logic_table(&self, logic_table: &str) -> bool {
        self.table_rules
            .iter()
            .any(|rule| rule.logic_table().eq_ignore_ascii_case(logic_table))
    }

    pub fn all_logic_tables(&self) -> Vec<&str> {
        self.table_rules
            .iter()
            .map(|rule| rule.logic_table())
            .collect()
    }

    /// The actual table of `logic_table` that sits at the same node-list
    /// position as `other_actual_table` does on `data_source`.
    pub fn binding_actual_table(
        &self,
        data_source: &str,
        logic_table: &str,
        other_actual_table: &str,
    ) -> Result<String, Error> {
        let index = self
            .table_rules
            .iter()
            .find_map(|rule| rule.actual_table_index(data_source, other_actual_table))
            .ok_or_else(|| {
                Error::NoMatchingDataNode(data_source.to_owned(), other_actual_table.to_owned())
            })?;

        let rule = self
            .table_rules
            .iter()
            .find(|rule| rule.logic_table().eq_ignore_ascii_case(logic_table))
            .ok_or_else(|| Error::NoTableRule(logic_table.to_owned()))?;

        rule.actual_data_nodes()
            .get(index)
            .map(|node| node.table_name().to_owned())
            .ok_or_else(|| {
                Error::NoMatchingDataNode(data_source.to_owned(), logic_table.to_owned())
            })
    }
}
