//! Client configuration.
//!
//! Defaults target the public API. `from_env` overlays the `ENCLAVE_*`
//! environment variables.

use std::env;
use std::time::Duration;

use crate::error::ApiError;
use crate::types::OrgId;

pub const DEFAULT_BASE_URL: &str = "https://api.enclave.io";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_BASE_URL: &str = "ENCLAVE_API_URL";
pub const ENV_ORG_ID: &str = "ENCLAVE_ORG_ID";
pub const ENV_TIMEOUT_SECS: &str = "ENCLAVE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Organisation used by [`EnclaveClient::default_organisation`](crate::EnclaveClient::default_organisation).
    pub org_id: Option<OrgId>,
    /// Whole-request timeout applied by the transport. `None` disables it.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            org_id: None,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_org(mut self, org_id: impl Into<OrgId>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as unset;
    /// a timeout of `0` disables the timeout.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = url;
        }
        config.org_id = get(ENV_ORG_ID).map(OrgId::from);
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}")))?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        Ok(config)
    }
}
