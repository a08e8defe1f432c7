use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::customer_token::CustomerTokenConfig;
use crate::storage::KeyValueStore;
use crate::utils::constants::CUSTOMER_TOKEN_CONF_KEY;

const HOST: &str = "host";
const PROJECT_TOKEN: &str = "projectToken";
const PUBLIC_KEY: &str = "publicKey";
const CUSTOMER_IDS: &str = "customerIds";
const EXPIRATION: &str = "expiration";

/// Persists the configuration record as one flat JSON object of
/// string-or-null values. Customer ids are nested as a JSON string and the
/// expiration as a decimal string.
#[derive(Debug)]
pub struct ConfigStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ConfigStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, CUSTOMER_TOKEN_CONF_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    /// Missing, empty or unreadable stored values yield the all-empty record.
    pub async fn load(&self) -> CustomerTokenConfig {
        match self.store.load(&self.key).await {
            Ok(Some(raw)) if !raw.trim().is_empty() => decode(&raw).unwrap_or_else(|err| {
                warn!("stored configuration '{}' is unreadable, starting empty: {:#}", self.key, err);
                CustomerTokenConfig::default()
            }),
            Ok(_) => {
                debug!("no stored configuration under '{}'", self.key);
                CustomerTokenConfig::default()
            }
            Err(err) => {
                warn!("loading configuration '{}' failed, starting empty: {:#}", self.key, err);
                CustomerTokenConfig::default()
            }
        }
    }

    pub async fn save(&self, config: &CustomerTokenConfig) -> Result<()> {
        let raw = encode(config)?;
        self.store.save(&self.key, &raw).await
    }
}

pub fn encode(config: &CustomerTokenConfig) -> Result<String> {
    let customer_ids = config
        .customer_ids
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let mut flat: BTreeMap<&str, Option<String>> = BTreeMap::new();
    flat.insert(HOST, config.host.clone());
    flat.insert(PROJECT_TOKEN, config.project_token.clone());
    flat.insert(PUBLIC_KEY, config.public_key.clone());
    flat.insert(CUSTOMER_IDS, customer_ids);
    flat.insert(EXPIRATION, config.expiration.map(|exp| exp.to_string()));
    Ok(serde_json::to_string(&flat)?)
}

pub fn decode(raw: &str) -> Result<CustomerTokenConfig> {
    let mut flat: HashMap<String, Option<String>> =
        serde_json::from_str(raw).context("configuration is not a flat string map")?;
    let mut take = |key: &str| flat.remove(key).flatten();

    let customer_ids = match take(CUSTOMER_IDS).filter(|ids| !ids.is_empty()) {
        Some(ids) => Some(
            serde_json::from_str::<HashMap<String, String>>(&ids)
                .context("customerIds is not a string map")?,
        ),
        None => None,
    };

    Ok(CustomerTokenConfig {
        host: take(HOST),
        project_token: take(PROJECT_TOKEN),
        public_key: take(PUBLIC_KEY),
        customer_ids,
        expiration: take(EXPIRATION).and_then(|exp| exp.trim().parse().ok()),
    })
}
