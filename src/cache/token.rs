use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Body posted to the token issuing endpoint.
#[derive(Debug, Serialize)]
pub struct CustomerTokenRequest<'a> {
    pub project_id: &'a str,
    pub kid: &'a str,
    pub sub: &'a HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Success body of the token issuing endpoint. Both fields may be null.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CustomerTokenResponse {
    #[serde(rename = "customer_token")]
    pub token: Option<String>,
    #[serde(rename = "expire_time")]
    pub expiration: Option<i64>,
}
