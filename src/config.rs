//! Client configuration

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default Slack Web API endpoint
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// How many `users.info` lookups a channel member listing keeps in flight
pub const DEFAULT_MEMBER_CONCURRENCY: usize = 5;

/// Settings for a [`WebClient`](crate::WebClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API token sent with every call
    pub token: String,
    /// Base URL that method names are appended to
    pub base_url: String,
    /// Concurrency limit used when resolving channel members
    pub member_concurrency: usize,
    /// Per-request timeout for the HTTP transport, in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            member_concurrency: DEFAULT_MEMBER_CONCURRENCY,
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), ..Self::default() }
    }

    /// Load configuration from defaults overlaid with `SLAMP_*` environment variables
    ///
    /// `SLAMP_TOKEN`, `SLAMP_BASE_URL`, `SLAMP_MEMBER_CONCURRENCY` and `SLAMP_TIMEOUT_SECS` are
    /// recognised.
    pub fn load() -> Result<Self> {
        Self::figment().extract().map_err(|e| Box::new(e).into())
    }

    /// The figment the configuration is extracted from, for callers that want to merge in
    /// further providers
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(ClientConfig::default()))
            .merge(Env::prefixed("SLAMP_"))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_member_concurrency(mut self, limit: usize) -> Self {
        self.member_concurrency = limit;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}
