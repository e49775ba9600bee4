use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::helpers::time::expires_at;

/// Result of one renewal call, decoded from the endpoint's JSON body.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenRecord {
    pub access_token: String,
    #[serde(rename = "expires_in")]
    pub access_token_expire: i64,   // seconds
    pub refresh_token: String,
    #[serde(rename = "refresh_expires_in")]
    pub refresh_token_expire: i64,  // seconds
    #[serde(default)]
    pub id_token: String,
}

impl TokenRecord {
    /// Absolute expiry of the access token, counted from `issued_at`.
    pub fn access_expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        expires_at(issued_at, self.access_token_expire)
    }

    pub fn refresh_expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        expires_at(issued_at, self.refresh_token_expire)
    }
}
