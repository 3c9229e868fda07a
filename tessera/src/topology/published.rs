//! The published sharding topology.
//!
//! One `ShardingRule` instance is visible to readers at a time. A
//! configuration change builds a complete replacement off to the side
//! and swaps it in with a single atomic store; in-flight readers keep
//! their consistent, slightly-stale instance until they drop it.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use parking_lot::lock_api::MutexGuard;
use parking_lot::{Mutex, RawMutex};
use tracing::{error, info};

use tessera_config::Config;

use super::error::Error;
use super::rule::ShardingRule;

static TOPOLOGY: Lazy<ArcSwap<ShardingRule>> =
    Lazy::new(|| ArcSwap::from_pointee(ShardingRule::default()));
static LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Sync topology changes during modification.
pub fn lock() -> MutexGuard<'static, RawMutex, ()> {
    LOCK.lock()
}

/// Get the published topology handle.
pub fn topology() -> Arc<ShardingRule> {
    TOPOLOGY.load().clone()
}

/// Publish a fully-built rule.
pub fn replace(rule: ShardingRule) {
    TOPOLOGY.store(Arc::new(rule));
}

/// Rebuild the topology from a configuration snapshot and swap it in.
///
/// A construction failure leaves the previously published instance
/// untouched and serving.
pub fn reload(config: &Config, data_sources: &[String]) -> Result<(), Error> {
    let _lock = lock();
    let rule = match ShardingRule::new(config, data_sources) {
        Ok(rule) => rule,
        Err(err) => {
            error!("sharding topology rejected: {}", err);
            return Err(err);
        }
    };
    replace(rule);
    info!("sharding topology reloaded");
    Ok(())
}

/// Load the configuration file and rebuild the topology from it.
///
/// A missing file loads defaults; an unreadable or malformed one is an
/// error and the previously published instance keeps serving.
pub fn reload_from_path(path: impl AsRef<Path>, data_sources: &[String]) -> Result<(), Error> {
    let config = Config::load(path)?;
    reload(&config, data_sources)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reload_from_path_rejects_malformed_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[[tables]\nname = ").unwrap();
        assert!(matches!(
            reload_from_path(file.path(), &["ds_0".into()]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let _guard = lock();

        let config: Config = toml::from_str(
            r#"
            [[tables]]
            name = "t_order"
            data_nodes = "ds_${0..1}.t_order_${0..1}"
        "#,
        )
        .unwrap();
        let rule = ShardingRule::new(&config, &["ds_0".into(), "ds_1".into()]).unwrap();
        TOPOLOGY.store(Arc::new(rule));
        assert!(topology().find_table_rule("t_order").is_some());

        // ds_9 isn't a known data source; the swap never happens.
        let bad: Config = toml::from_str(
            r#"
            [[tables]]
            name = "t_order"
            data_nodes = "ds_9.t_order"
        "#,
        )
        .unwrap();
        drop(_guard);
        assert!(reload(&bad, &["ds_0".into(), "ds_1".into()]).is_err());
        assert!(topology().find_table_rule("t_order").is_some());
        assert_eq!(
            topology()
                .find_table_rule("t_order")
                .unwrap()
                .actual_data_nodes()
                .len(),
            4
        );
    }
}
