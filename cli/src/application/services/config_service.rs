//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{StackConfig, apply_config_value, validate_stack_config};
use crate::domain::network::Network;

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<StackConfig> {
    store.load()
}

/// Validate and persist a single `key = value` setting.
///
/// The whole resulting config must still define a network, so a change that
/// only becomes invalid in combination with another key is rejected too. The
/// stored file is left untouched when validation fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<StackConfig> {
    let mut config = store.load()?;
    apply_config_value(&mut config, key, value)?;
    validate_stack_config(&config)?;
    Network::define(&config.network)?;
    store.save(&config)?;
    tracing::info!(key, value, "configuration updated");
    Ok(config)
}
