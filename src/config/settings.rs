use crate::utils::error::{Result, ShippingError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Production endpoint of the USPS Web Tools API.
pub const DEFAULT_URL: &str = "https://production.shippingapis.com/ShippingAPI.dll";

pub const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 10;

/// Operator-configured USPS account and rate-display settings.
///
/// Read-only to the core: every rate or tracking call borrows the same
/// settings value, nothing is mutated mid-request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UspsSettings {
    #[serde(default = "default_url")]
    pub url: String,
    pub username: String,
    pub password: String,
    /// Flat surcharge added once per aggregated shipping option.
    #[serde(default)]
    pub additional_handling_charge: Decimal,
    pub carrier_services_domestic: ServiceAllowList,
    pub carrier_services_international: ServiceAllowList,
    /// Per-request timeout in seconds.
    #[serde(default = "default_client_timeout_secs")]
    pub client_timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_client_timeout_secs() -> u64 {
    DEFAULT_CLIENT_TIMEOUT_SECS
}

impl UspsSettings {
    /// Loads settings from a TOML file and validates them.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: UspsSettings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.url).map_err(|e| ShippingError::ConfigError {
            message: format!("invalid USPS endpoint URL \"{}\": {}", self.url, e),
        })?;
        Ok(())
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client_timeout_secs)
    }
}

/// Set of carrier service codes the operator wants to offer to customers.
///
/// The persisted form is the legacy bracket-delimited string, e.g.
/// `"[1]:[3]:[4]:"`; the brackets keep a single-digit code from matching
/// inside a multi-digit one. That format is parsed here, once, at the
/// configuration boundary; the core only ever sees the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ServiceAllowList {
    codes: BTreeSet<String>,
}

impl ServiceAllowList {
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses the legacy `"[code]:"` encoding. Text outside brackets is
    /// ignored, empty tokens are dropped.
    pub fn parse_legacy(encoded: &str) -> Self {
        let mut codes = BTreeSet::new();
        let mut rest = encoded;
        while let Some(start) = rest.find('[') {
            let Some(len) = rest[start + 1..].find(']') else {
                break;
            };
            let token = rest[start + 1..start + 1 + len].trim();
            if !token.is_empty() {
                codes.insert(token.to_string());
            }
            rest = &rest[start + 1 + len + 1..];
        }
        Self { codes }
    }

    pub fn allows(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Whether the "letter" token re-enables letter/postcard services.
    pub fn allows_letters(&self) -> bool {
        self.codes.contains("letter")
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn to_legacy(&self) -> String {
        self.codes.iter().map(|c| format!("[{c}]:")).collect()
    }
}

impl From<String> for ServiceAllowList {
    fn from(encoded: String) -> Self {
        Self::parse_legacy(&encoded)
    }
}

impl From<ServiceAllowList> for String {
    fn from(list: ServiceAllowList) -> Self {
        list.to_legacy()
    }
}

impl fmt::Display for ServiceAllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_legacy())
    }
}
