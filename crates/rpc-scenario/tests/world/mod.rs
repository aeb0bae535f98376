//! World state for JSON-RPC scenarios.

use std::sync::OnceLock;
use std::time::Duration;

use cucumber::World;
use rpc_scenario::ScenarioConfig;
use rpc_scenario::ScenarioContext;
use rpc_scenario_client::HttpRpcClient;

static BASE_URL: OnceLock<String> = OnceLock::new();

/// Points every new world at the running test application.
pub fn set_base_url(url: String) {
    let _ = BASE_URL.set(url);
}

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct RpcWorld {
    pub context: ScenarioContext<HttpRpcClient>,
}

impl RpcWorld {
    fn new() -> Self {
        let base_url = BASE_URL
            .get()
            .cloned()
            .expect("base URL must be set before running scenarios");
        let client = ScenarioConfig::from_lookup(|_| None)
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(5))
            .build_client()
            .expect("Failed to build client");
        Self {
            context: ScenarioContext::new(client),
        }
    }
}
