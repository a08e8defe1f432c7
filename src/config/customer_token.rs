use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// ================================
/// Customer token configuration record
/// ================================
///
/// Every field is optional. The record is ready for a token fetch only when
/// host, project token and public key are set and at least one customer id exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerTokenConfig {
    pub host: Option<String>,
    pub project_token: Option<String>,
    pub public_key: Option<String>,
    pub customer_ids: Option<HashMap<String, String>>,
    pub expiration: Option<i64>,
}

impl CustomerTokenConfig {
    /// Overwrite only the fields the request supplies.
    pub fn merge(&mut self, request: ConfigureRequest) {
        if request.host.is_some() {
            self.host = request.host;
        }
        if request.project_token.is_some() {
            self.project_token = request.project_token;
        }
        if request.public_key.is_some() {
            self.public_key = request.public_key;
        }
        if request.customer_ids.is_some() {
            self.customer_ids = request.customer_ids;
        }
        if request.expiration.is_some() {
            self.expiration = request.expiration;
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready_parts().is_some()
    }

    /// Borrowed required fields, present only for a ready record.
    pub fn ready_parts(&self) -> Option<ReadyConfig<'_>> {
        let customer_ids = self.customer_ids.as_ref().filter(|ids| !ids.is_empty())?;
        Some(ReadyConfig {
            host: self.host.as_deref()?,
            project_token: self.project_token.as_deref()?,
            public_key: self.public_key.as_deref()?,
            customer_ids,
            expiration: self.expiration,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReadyConfig<'a> {
    pub host: &'a str,
    pub project_token: &'a str,
    pub public_key: &'a str,
    pub customer_ids: &'a HashMap<String, String>,
    pub expiration: Option<i64>,
}

impl ReadyConfig<'_> {
    pub fn token_url(&self, endpoint_path: &str) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), endpoint_path)
    }
}

/// Partial update accepted by `configure`, from the HTTP route or the agent YAML.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureRequest {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub project_token: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_customer_ids")]
    pub customer_ids: Option<HashMap<String, String>>,
    #[serde(default)]
    pub expiration: Option<i64>,
}

/// Customer id values arrive from loosely typed callers; scalars are
/// stringified and null entries dropped.
fn deserialize_customer_ids<'de, D>(deserializer: D) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|ids| {
        ids.into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(value) => Some((key, value)),
                other => Some((key, other.to_string())),
            })
            .collect()
    }))
}
