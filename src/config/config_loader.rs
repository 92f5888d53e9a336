use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_SERVER, DELIVERY_BASE_DELAY_MS, DELIVERY_MAX_RETRIES, MAX_BATCH_BYTES,
};
use config::{Config as RConfig, Environment};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub collect_url: String,
    pub bearer_token: String,
    pub event_source: String,

    pub server: String,

    pub max_batch_bytes: usize,
    pub max_retries: u64,
    pub base_delay_ms: u64,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_config() -> Result<Config> {
        let mut builder = RConfig::builder();

        // set defaults
        builder = builder
            .set_default("collect_url", "")?
            .set_default("bearer_token", "")?
            .set_default("event_source", "")?
            .set_default("server", DEFAULT_SERVER)?
            .set_default("max_batch_bytes", MAX_BATCH_BYTES as u64)?
            .set_default("max_retries", DELIVERY_MAX_RETRIES)?
            .set_default("base_delay_ms", DELIVERY_BASE_DELAY_MS)?;

        // environment overrides, e.g. SCANNER_COLLECT_URL
        builder = builder.add_source(Environment::with_prefix("SCANNER").try_parsing(true));

        let config: Config = builder
            .build()?
            .try_deserialize()
            .context("failed to parse configuration")?;

        if config.collect_url.is_empty() || config.bearer_token.is_empty() {
            bail!("SCANNER_COLLECT_URL and SCANNER_BEARER_TOKEN must be set");
        }

        if config.event_source.is_empty() {
            bail!("SCANNER_EVENT_SOURCE must be set");
        }

        Ok(config)
    }
}
