//! The sharding rule aggregate.
//!
//! Owns every table rule, the binding groups, the broadcast set and the
//! rule-wide defaults; routing consults one immutable instance of this
//! per statement.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::info;

use tessera_config::Config;

use crate::keygen::{self, Key, KeyGenerator};
use crate::strategy::ShardingStrategy;

use super::binding::BindingTableRule;
use super::data_node::DataNode;
use super::datasource_names::DataSourceNames;
use super::error::Error;
use super::table_rule::TableRule;

/// Databases and tables sharding rule, built once per configuration
/// snapshot and read lock-free afterward.
#[derive(Debug, Clone)]
pub struct ShardingRule {
    table_rules: Vec<Arc<TableRule>>,
    binding_table_rules: Vec<BindingTableRule>,
    broadcast_tables: IndexSet<String>,
    data_source_names: DataSourceNames,
    default_database_strategy: ShardingStrategy,
    default_table_strategy: ShardingStrategy,
    default_key_generator: Arc<dyn KeyGenerator>,
}

impl Default for ShardingRule {
    fn default() -> Self {
        Self {
            table_rules: Vec::new(),
            binding_table_rules: Vec::new(),
            broadcast_tables: IndexSet::new(),
            data_source_names: DataSourceNames::default(),
            default_database_strategy: ShardingStrategy::None,
            default_table_strategy: ShardingStrategy::None,
            default_key_generator: keygen::system_default(),
        }
    }
}

impl ShardingRule {
    /// Build the aggregate from one configuration snapshot and the set
    /// of live physical data source names.
    ///
    /// Built bottom-up into local state; a failure anywhere aborts the
    /// whole attempt and nothing is published.
    pub fn new(config: &Config, data_sources: &[String]) -> Result<Self, Error> {
        if data_sources.is_empty() {
            return Err(Error::NoDataSources);
        }

        let data_source_names = DataSourceNames::new(
            data_sources,
            &config.replica_groups,
            &config.disabled_data_sources,
            config.default_data_source.clone(),
        );
        // Every supplied source can be disabled for this snapshot.
        if data_source_names.is_empty() {
            return Err(Error::NoDataSources);
        }

        let table_rules = Self::build_table_rules(config, &data_source_names, data_sources)?;
        for (position, rule) in table_rules.iter().enumerate() {
            if table_rules[..position]
                .iter()
                .any(|other| other.logic_table() == rule.logic_table())
            {
                return Err(Error::DuplicateTableRule(rule.logic_table().to_owned()));
            }
        }

        let broadcast_tables: IndexSet<String> = config.broadcast_tables.iter().cloned().collect();
        for rule in &table_rules {
            if broadcast_tables
                .iter()
                .any(|table| table.eq_ignore_ascii_case(rule.logic_table()))
            {
                return Err(Error::BroadcastConflict(rule.logic_table().to_owned()));
            }
        }

        let binding_table_rules = Self::build_binding_rules(&config.binding_tables, &table_rules)?;

        let default_database_strategy = match &config.default_database_strategy {
            Some(strategy) => ShardingStrategy::from_config(strategy)?,
            None => ShardingStrategy::None,
        };
        let default_table_strategy = match &config.default_table_strategy {
            Some(strategy) => ShardingStrategy::from_config(strategy)?,
            None => ShardingStrategy::None,
        };
        let default_key_generator = match &config.default_key_generator {
            Some(generator) if !generator.kind.is_empty() => keygen::from_config(generator)?,
            _ => keygen::system_default(),
        };

        info!(
            "sharding topology: {} table rules, {} binding groups, {} broadcast tables, {} data sources",
            table_rules.len(),
            binding_table_rules.len(),
            broadcast_tables.len(),
            data_source_names.names().len(),
        );

        Ok(Self {
            table_rules,
            binding_table_rules,
            broadcast_tables,
            data_source_names,
            default_database_strategy,
            default_table_strategy,
            default_key_generator,
        })
    }

    fn build_table_rules(
        config: &Config,
        names: &DataSourceNames,
        raw: &[String],
    ) -> Result<Vec<Arc<TableRule>>, Error> {
        let default_key_column = config.default_key_column();

        // Cross products run over the supplied list pre-resolution, but
        // disabled sources are out of the snapshot either way.
        let enabled: Vec<String> = raw
            .iter()
            .filter(|name| {
                !config
                    .disabled_data_sources
                    .iter()
                    .any(|disabled| disabled.eq_ignore_ascii_case(name))
            })
            .cloned()
            .collect();

        // One explicit node expression anywhere means the deployment is
        // shard-aware: tables without one aren't spread. With no
        // expressions at all, every table is spread naively across all
        // supplied connections, pre-resolution.
        let template_mode = config.tables.iter().any(|table| table.data_nodes.is_some());

        let mut rules = Vec::with_capacity(config.tables.len());
        for table in &config.tables {
            let rule = match &table.data_nodes {
                Some(expression) => {
                    TableRule::from_expression(table, expression, names, default_key_column)?
                }
                None if template_mode => {
                    let data_source = names
                        .default_data_source()
                        .or_else(|| names.names().first().map(String::as_str))
                        .ok_or(Error::NoDataSources)?;
                    TableRule::fixed(data_source, &table.name)
                }
                None => TableRule::cross_product(table, &enabled, default_key_column)?,
            };
            rules.push(Arc::new(rule));
        }
        Ok(rules)
    }

    fn build_binding_rules(
        groups: &[String],
        table_rules: &[Arc<TableRule>],
    ) -> Result<Vec<BindingTableRule>, Error> {
        let mut result = Vec::with_capacity(groups.len());
        for group in groups {
            let mut members = Vec::new();
            for name in group.split(',').map(str::trim).filter(|name| !name.is_empty()) {
                let rule = table_rules
                    .iter()
                    .find(|rule| rule.logic_table().eq_ignore_ascii_case(name))
                    .ok_or_else(|| Error::UnknownBindingTable(name.to_owned()))?;
                members.push(rule.clone());
            }
            result.push(BindingTableRule::new(members));
        }
        Ok(result)
    }

    /// The resolved data source universe.
    pub fn data_source_names(&self) -> &DataSourceNames {
        &self.data_source_names
    }

    pub fn table_rules(&self) -> &[Arc<TableRule>] {
        &self.table_rules
    }

    /// Find a table rule by logical name.
    pub fn find_table_rule(&self, logic_table: &str) -> Option<&Arc<TableRule>> {
        self.table_rules
            .iter()
            .find(|rule| rule.logic_table().eq_ignore_ascii_case(logic_table))
    }

    /// Find the table rule owning a physical table name.
    pub fn find_table_rule_by_actual_table(&self, actual_table: &str) -> Option<&Arc<TableRule>> {
        self.table_rules
            .iter()
            .find(|rule| rule.has_actual_table(actual_table))
    }

    /// Filter a list of logical names down to the sharded ones.
    pub fn sharding_logic_table_names<S: AsRef<str>>(&self, logic_tables: &[S]) -> Vec<String> {
        logic_tables
            .iter()
            .filter(|table| self.find_table_rule(table.as_ref()).is_some())
            .map(|table| table.as_ref().to_owned())
            .collect()
    }

    /// Get a table rule, materializing broadcast tables on demand and
    /// falling back to the default data source when one is configured.
    pub fn table_rule(&self, logic_table: &str) -> Result<Arc<TableRule>, Error> {
        if let Some(rule) = self.find_table_rule(logic_table) {
            return Ok(rule.clone());
        }
        if self.is_broadcast_table(logic_table) {
            return Ok(Arc::new(TableRule::broadcast(
                logic_table,
                self.data_source_names.names(),
            )));
        }
        if let Some(default) = self.data_source_names.default_data_source() {
            return Ok(Arc::new(TableRule::fixed(default, logic_table)));
        }
        Err(Error::NoTableRule(logic_table.to_owned()))
    }

    /// Table's own database strategy, else the rule-wide default.
    pub fn database_strategy<'a>(&'a self, rule: &'a TableRule) -> &'a ShardingStrategy {
        rule.database_strategy()
            .unwrap_or(&self.default_database_strategy)
    }

    /// Table's own table strategy, else the rule-wide default.
    pub fn table_strategy<'a>(&'a self, rule: &'a TableRule) -> &'a ShardingStrategy {
        rule.table_strategy().unwrap_or(&self.default_table_strategy)
    }

    pub fn is_broadcast_table(&self, logic_table: &str) -> bool {
        self.broadcast_tables
            .iter()
            .any(|table| table.eq_ignore_ascii_case(logic_table))
    }

    /// Every named table is broadcast. False for an empty input.
    pub fn is_all_broadcast_tables<S: AsRef<str>>(&self, logic_tables: &[S]) -> bool {
        !logic_tables.is_empty()
            && logic_tables
                .iter()
                .all(|table| self.is_broadcast_table(table.as_ref()))
    }

    /// Find the binding group a logical table belongs to.
    pub fn find_binding_table_rule(&self, logic_table: &str) -> Option<&BindingTableRule> {
        self.binding_table_rules
            .iter()
            .find(|group| group.has_logic_table(logic_table))
    }

    /// Every named table belongs to one binding group. False for an
    /// empty input.
    pub fn is_all_binding_tables<S: AsRef<str>>(&self, logic_tables: &[S]) -> bool {
        if logic_tables.is_empty() {
            return false;
        }
        let Some(group) = logic_tables
            .iter()
            .find_map(|table| self.find_binding_table_rule(table.as_ref()))
        else {
            return false;
        };
        logic_tables
            .iter()
            .all(|table| group.has_logic_table(table.as_ref()))
    }

    /// Any of the named tables has a rule or is broadcast.
    pub fn table_rule_exists<S: AsRef<str>>(&self, logic_tables: &[S]) -> bool {
        logic_tables.iter().any(|table| {
            self.find_table_rule(table.as_ref()).is_some()
                || self.is_broadcast_table(table.as_ref())
        })
    }

    /// Every named table is unruled and routes to the default data
    /// source. False for an empty input.
    pub fn is_all_in_default_data_source<S: AsRef<str>>(&self, logic_tables: &[S]) -> bool {
        !logic_tables.is_empty()
            && !logic_tables.iter().any(|table| {
                self.find_table_rule(table.as_ref()).is_some()
                    || self.is_broadcast_table(table.as_ref())
            })
    }

    /// The column participates in the effective database or table
    /// strategy of the table.
    pub fn is_sharding_column(&self, column: &str, logic_table: &str) -> bool {
        self.find_table_rule(logic_table)
            .map(|rule| {
                self.database_strategy(rule).is_sharding_column(column)
                    || self.table_strategy(rule).is_sharding_column(column)
            })
            .unwrap_or(false)
    }

    /// Column the effective key generator fills for this table, if any.
    pub fn generate_key_column(&self, logic_table: &str) -> Option<String> {
        self.find_table_rule(logic_table)
            .and_then(|rule| rule.key_generate_column().map(str::to_owned))
    }

    /// Produce the next key for the table's auto-generated column using
    /// the table's generator, else the rule-wide default.
    pub fn generate_key(&self, logic_table: &str) -> Result<Key, Error> {
        let rule = self
            .find_table_rule(logic_table)
            .ok_or_else(|| Error::NoTableRule(logic_table.to_owned()))?;
        let key = match rule.key_generator() {
            Some(generator) => generator.next_key()?,
            None => self.default_key_generator.next_key()?,
        };
        Ok(key)
    }

    /// First data node of the table, in node-list order.
    pub fn first_data_node(&self, logic_table: &str) -> Result<DataNode, Error> {
        let rule = self.table_rule(logic_table)?;
        rule.actual_data_nodes()
            .first()
            .cloned()
            .ok_or_else(|| Error::NoTableRule(logic_table.to_owned()))
    }

    /// The table's data node on one specific data source.
    pub fn data_node(&self, data_source: &str, logic_table: &str) -> Result<DataNode, Error> {
        let rule = self.table_rule(logic_table)?;
        rule.actual_data_nodes()
            .iter()
            .find(|node| node.data_source_name().eq_ignore_ascii_case(data_source))
            .cloned()
            .ok_or_else(|| {
                Error::NoMatchingDataNode(data_source.to_owned(), logic_table.to_owned())
            })
    }

    /// Given one resolved (logic, actual) pair on a data source, the
    /// parallel logic → actual mapping for every other candidate table
    /// in the same binding group, by positional index. Joins across
    /// bound tables always hit the same shard.
    pub fn logic_and_actual_binding_tables<S: AsRef<str>>(
        &self,
        data_source: &str,
        logic_table: &str,
        actual_table: &str,
        candidates: &[S],
    ) -> Result<IndexMap<String, String>, Error> {
        let mut result = IndexMap::new();
        let Some(group) = self.find_binding_table_rule(logic_table) else {
            return Ok(result);
        };
        for candidate in candidates {
            let name = candidate.as_ref();
            if name.eq_ignore_ascii_case(logic_table) || !group.has_logic_table(name) {
                continue;
            }
            result.insert(
                name.to_lowercase(),
                group.binding_actual_table(data_source, name, actual_table)?,
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::strategy::ShardValue;

    fn sources(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn sharded_config() -> Config {
        toml::from_str(
            r#"
            broadcast_tables = ["t_config"]
            binding_tables = ["t_order, t_order_item"]

            [[tables]]
            name = "t_order"
            data_nodes = "ds_${0..1}.t_order_${0..1}"

            [[tables]]
            name = "t_order_item"
            data_nodes = "ds_${0..1}.t_order_item_${0..1}"

            [default_table_strategy]
            algorithm = "modulo"
            column = "order_id"
        "#,
        )
        .unwrap()
    }

    fn sharded_rule() -> ShardingRule {
        ShardingRule::new(&sharded_config(), &sources(&["ds_0", "ds_1"])).unwrap()
    }

    #[test]
    fn test_trivial_mode() {
        let rule = ShardingRule::new(&Config::default(), &sources(&["ds_0", "ds_1"])).unwrap();
        assert!(rule.table_rules().is_empty());
        assert_eq!(
            rule.data_source_names().names().iter().collect::<Vec<_>>(),
            vec!["ds_0", "ds_1"]
        );
    }

    #[test]
    fn test_empty_data_sources() {
        assert!(matches!(
            ShardingRule::new(&Config::default(), &[]),
            Err(Error::NoDataSources)
        ));
    }

    #[test]
    fn test_find_table_rule() {
        let rule = sharded_rule();
        assert!(rule.find_table_rule("T_ORDER").is_some());
        assert!(rule.find_table_rule("t_missing").is_none());
        assert!(rule.find_table_rule_by_actual_table("t_order_1").is_some());
        assert!(rule.find_table_rule_by_actual_table("t_order_9").is_none());
    }

    #[test]
    fn test_cross_product_only_when_no_table_has_expression() {
        // No expressions anywhere: both tables spread over all
        // supplied connections.
        let config: Config = toml::from_str(
            r#"
            [[tables]]
            name = "t_order"

            [[tables]]
            name = "t_user"
        "#,
        )
        .unwrap();
        let rule = ShardingRule::new(&config, &sources(&["ds_0", "ds_1", "ds_2"])).unwrap();
        let order = rule.find_table_rule("t_order").unwrap();
        let nodes: Vec<String> = order
            .actual_data_nodes()
            .iter()
            .map(|node| node.to_string())
            .collect();
        assert_eq!(nodes, vec!["ds_0.t_order", "ds_1.t_order", "ds_2.t_order"]);
        assert_eq!(order.actual_table_index("ds_1", "t_order"), Some(1));

        // One expression anywhere: the table without one isn't spread.
        let config: Config = toml::from_str(
            r#"
            [[tables]]
            name = "t_order"
            data_nodes = "ds_${0..1}.t_order_${0..1}"

            [[tables]]
            name = "t_user"
        "#,
        )
        .unwrap();
        let rule = ShardingRule::new(&config, &sources(&["ds_0", "ds_1", "ds_2"])).unwrap();
        let user = rule.find_table_rule("t_user").unwrap();
        assert_eq!(user.actual_data_nodes().len(), 1);
        assert_eq!(user.actual_data_nodes()[0].data_source_name(), "ds_0");
        assert_eq!(user.actual_table_index("ds_0", "t_user"), None);
    }

    #[test]
    fn test_disabled_excluded_from_cross_product() {
        let config: Config = toml::from_str(
            r#"
            disabled_data_sources = ["ds_1"]

            [[tables]]
            name = "t_order"
        "#,
        )
        .unwrap();
        let rule = ShardingRule::new(&config, &sources(&["ds_0", "ds_1", "ds_2"])).unwrap();
        let order = rule.find_table_rule("t_order").unwrap();
        let nodes: Vec<String> = order
            .actual_data_nodes()
            .iter()
            .map(|node| node.to_string())
            .collect();
        assert_eq!(nodes, vec!["ds_0.t_order", "ds_2.t_order"]);
        assert_eq!(order.actual_table_index("ds_2", "t_order"), Some(1));
    }

    #[test]
    fn test_all_data_sources_disabled() {
        let config: Config = toml::from_str(
            r#"
            disabled_data_sources = ["ds_0", "DS_1"]
        "#,
        )
        .unwrap();
        assert!(matches!(
            ShardingRule::new(&config, &sources(&["ds_0", "ds_1"])),
            Err(Error::NoDataSources)
        ));
    }

    #[test]
    fn test_sharding_logic_table_names() {
        let rule = sharded_rule();
        assert_eq!(
            rule.sharding_logic_table_names(&["t_order", "t_config", "t_missing"]),
            vec!["t_order"]
        );
        assert_eq!(
            rule.sharding_logic_table_names(&["T_ORDER_ITEM"]),
            vec!["T_ORDER_ITEM"]
        );
        assert!(rule.sharding_logic_table_names::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_unknown_binding_table() {
        let config: Config = toml::from_str(
            r#"
            binding_tables = ["t_order, t_missing"]

            [[tables]]
            name = "t_order"
            data_nodes = "ds_${0..1}.t_order_${0..1}"
        "#,
        )
        .unwrap();
        assert!(matches!(
            ShardingRule::new(&config, &sources(&["ds_0", "ds_1"])),
            Err(Error::UnknownBindingTable(name)) if name == "t_missing"
        ));
    }

    #[test]
    fn test_duplicate_table_rule() {
        let config: Config = toml::from_str(
            r#"
            [[tables]]
            name = "t_order"

            [[tables]]
            name = "T_ORDER"
        "#,
        )
        .unwrap();
        assert!(matches!(
            ShardingRule::new(&config, &sources(&["ds_0"])),
            Err(Error::DuplicateTableRule(_))
        ));
    }

    #[test]
    fn test_broadcast_conflict() {
        let config: Config = toml::from_str(
            r#"
            broadcast_tables = ["t_order"]

            [[tables]]
            name = "t_order"
        "#,
        )
        .unwrap();
        assert!(matches!(
            ShardingRule::new(&config, &sources(&["ds_0"])),
            Err(Error::BroadcastConflict(name)) if name == "t_order"
        ));
    }

    #[test]
    fn test_broadcast_tables() {
        let rule = sharded_rule();
        assert!(rule.is_broadcast_table("t_config"));
        assert!(rule.is_broadcast_table("T_CONFIG"));
        assert!(!rule.is_all_broadcast_tables::<&str>(&[]));
        assert!(rule.is_all_broadcast_tables(&["t_config"]));
        assert!(!rule.is_all_broadcast_tables(&["t_config", "t_order"]));

        // Materialized on demand: one node per resolved data source.
        let broadcast = rule.table_rule("t_config").unwrap();
        assert_eq!(broadcast.actual_data_nodes().len(), 2);
        assert_eq!(broadcast.actual_table_index("ds_0", "t_config"), None);
    }

    #[test]
    fn test_binding_tables() {
        let rule = sharded_rule();
        assert!(!rule.is_all_binding_tables::<&str>(&[]));
        assert!(rule.is_all_binding_tables(&["t_order", "t_order_item"]));
        assert!(rule.is_all_binding_tables(&["T_ORDER"]));
        assert!(!rule.is_all_binding_tables(&["t_order", "t_config"]));
    }

    #[test]
    fn test_binding_consistency() {
        let rule = sharded_rule();
        let mapping = rule
            .logic_and_actual_binding_tables(
                "ds_0",
                "t_order",
                "t_order_1",
                &["t_order", "t_order_item"],
            )
            .unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("t_order_item").unwrap(), "t_order_item_1");

        let order = rule.find_table_rule("t_order").unwrap();
        let item = rule.find_table_rule("t_order_item").unwrap();
        assert_eq!(
            order.actual_table_index("ds_0", "t_order_1"),
            item.actual_table_index("ds_0", "t_order_item_1"),
        );
    }

    #[test]
    fn test_table_rule_exists() {
        let rule = sharded_rule();
        assert!(rule.table_rule_exists(&["t_order", "t_missing"]));
        assert!(rule.table_rule_exists(&["t_config"]));
        assert!(!rule.table_rule_exists(&["t_missing"]));
    }

    #[test]
    fn test_default_strategy_fallback() {
        let rule = sharded_rule();
        let order = rule.find_table_rule("t_order").unwrap();
        assert!(order.table_strategy().is_none());
        assert_eq!(rule.table_strategy(order), &rule.default_table_strategy);
        assert!(rule.is_sharding_column("order_id", "t_order"));
        assert!(!rule.is_sharding_column("status", "t_order"));
        // Database axis has no strategy at all.
        assert_eq!(rule.database_strategy(order), &ShardingStrategy::None);
    }

    #[test]
    fn test_effective_strategy_resolves() {
        let rule = sharded_rule();
        let order = rule.find_table_rule("t_order").unwrap();
        let indices = rule
            .table_strategy(order)
            .resolve(&ShardValue::Integer(7), 2)
            .unwrap();
        assert_eq!(indices, [1].into());
    }

    #[test]
    fn test_no_table_rule() {
        let rule = sharded_rule();
        assert!(matches!(
            rule.table_rule("t_missing"),
            Err(Error::NoTableRule(name)) if name == "t_missing"
        ));
    }

    #[test]
    fn test_default_data_source_fallback() {
        let config: Config = toml::from_str(
            r#"
            default_data_source = "ds_0"

            [[tables]]
            name = "t_order"
            data_nodes = "ds_${0..1}.t_order_${0..1}"
        "#,
        )
        .unwrap();
        let rule = ShardingRule::new(&config, &sources(&["ds_0", "ds_1"])).unwrap();
        let fallback = rule.table_rule("t_audit").unwrap();
        assert_eq!(fallback.actual_data_nodes().len(), 1);
        assert_eq!(fallback.actual_data_nodes()[0].data_source_name(), "ds_0");

        assert!(rule.is_all_in_default_data_source(&["t_audit"]));
        assert!(!rule.is_all_in_default_data_source(&["t_audit", "t_order"]));
        assert!(!rule.is_all_in_default_data_source::<&str>(&[]));
    }

    #[test]
    fn test_data_node_lookups() {
        let rule = sharded_rule();
        let first = rule.first_data_node("t_order").unwrap();
        assert_eq!(first, DataNode::new("ds_0", "t_order_0"));

        let exact = rule.data_node("ds_1", "t_order").unwrap();
        assert_eq!(exact.data_source_name(), "ds_1");

        assert!(matches!(
            rule.data_node("ds_9", "t_order"),
            Err(Error::NoMatchingDataNode(data_source, table))
                if data_source == "ds_9" && table == "t_order"
        ));
    }

    #[test]
    fn test_generate_key() {
        let config: Config = toml::from_str(
            r#"
            [[tables]]
            name = "t_order"

            [tables.key_generator]
            kind = "uuid"
            column = "order_id"

            [[tables]]
            name = "t_user"

            [default_key_generator]
            kind = "snowflake"
            column = "id"
        "#,
        )
        .unwrap();
        let rule = ShardingRule::new(&config, &sources(&["ds_0"])).unwrap();

        assert!(matches!(
            rule.generate_key("t_order").unwrap(),
            Key::Uuid(_)
        ));
        assert!(matches!(
            rule.generate_key("t_user").unwrap(),
            Key::Number(_)
        ));
        assert_eq!(rule.generate_key_column("t_order"), Some("order_id".into()));
        assert_eq!(rule.generate_key_column("t_user"), Some("id".into()));
        assert!(matches!(
            rule.generate_key("t_missing"),
            Err(Error::NoTableRule(_))
        ));
    }

    #[test]
    fn test_replica_group_universe() {
        let config: Config = toml::from_str(
            r#"
            [[replica_groups]]
            name = "ds_0"
            primary = "ds_0_primary"
            replicas = ["ds_0_replica"]

            [[tables]]
            name = "t_order"
            data_nodes = "ds_0.t_order_${0..1}"
        "#,
        )
        .unwrap();
        let rule = ShardingRule::new(
            &config,
            &sources(&["ds_0_primary", "ds_0_replica", "ds_1"]),
        )
        .unwrap();
        assert_eq!(
            rule.data_source_names().names().iter().collect::<Vec<_>>(),
            vec!["ds_0", "ds_1"]
        );
        assert_eq!(rule.data_source_names().resolve_physical("ds_0"), "ds_0_primary");
        assert!(rule.find_table_rule("t_order").is_some());
    }

    #[test]
    fn test_repeated_construction_is_identical() {
        let config = sharded_config();
        let first = ShardingRule::new(&config, &sources(&["ds_0", "ds_1"])).unwrap();
        let second = ShardingRule::new(&config, &sources(&["ds_0", "ds_1"])).unwrap();

        for (a, b) in first.table_rules().iter().zip(second.table_rules()) {
            assert_eq!(a.actual_data_nodes(), b.actual_data_nodes());
            for (position, node) in a.actual_data_nodes().iter().enumerate() {
                assert_eq!(
                    b.actual_table_index(node.data_source_name(), node.table_name()),
                    Some(position)
                );
            }
        }
    }
}
