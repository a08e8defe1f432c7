//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

/// Minimum interval between two fetch attempts, whatever their outcome.
pub const DEFAULT_RATE_LIMIT_SECONDS: u64 = 300;

pub const DEFAULT_ENDPOINT_PATH: &str = "/webxp/exampleapp/customertokens";

/// Key the flattened configuration record is persisted under.
pub const CUSTOMER_TOKEN_CONF_KEY: &str = "CustomerTokenConf";

pub const CONTENT_TYPE_JSON: &str = "application/json";
