use std::env;
use std::time::Duration;

use rpc_scenario_client::ClientError;
use rpc_scenario_client::DEFAULT_ACCEPT_ENCODING;
use rpc_scenario_client::HttpClientConfig;
use rpc_scenario_client::HttpRpcClient;

pub const DEFAULT_BASE_URL: &str = "http://localhost";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const BASE_URL_ENV: &str = "RPC_SCENARIO_BASE_URL";
pub const TIMEOUT_ENV: &str = "RPC_SCENARIO_TIMEOUT_MS";
pub const HEADERS_ENV: &str = "RPC_SCENARIO_HEADERS";

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Sent on every request after the default `Accept-Encoding`.
    pub headers: Vec<(String, String)>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ScenarioConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_millis(
                lookup(TIMEOUT_ENV)
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_MS),
            ),
            headers: lookup(HEADERS_ENV)
                .map(|v| parse_header_list(&v))
                .unwrap_or_default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn build_client(&self) -> Result<HttpRpcClient, ClientError> {
        let mut headers = vec![(
            "Accept-Encoding".to_string(),
            DEFAULT_ACCEPT_ENCODING.to_string(),
        )];
        headers.extend(self.headers.iter().cloned());
        HttpRpcClient::with_config(
            &self.base_url,
            HttpClientConfig {
                timeout: self.timeout,
                headers,
            },
        )
    }
}

/// Parses one `Name: value` header. Returns `None` without a colon or name.
pub fn parse_header(raw: &str) -> Option<(String, String)> {
    let (name, value) = raw.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

fn parse_header_list(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter(|part| !part.trim().is_empty())
        .filter_map(parse_header)
        .collect()
}
