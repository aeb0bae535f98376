#![allow(dead_code)]
#![allow(unused_imports)]

pub mod test_app;

pub use test_app::TestServer;

use assert_cmd::Command;
use rpc_scenario::ScenarioConfig;
use rpc_scenario::ScenarioContext;
use rpc_scenario_client::HttpRpcClient;
use std::time::Duration;

pub fn rpc_scenario_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rpc-scenario"));
    cmd.env_remove("RPC_SCENARIO_BASE_URL")
        .env_remove("RPC_SCENARIO_HEADERS")
        .env_remove("RPC_SCENARIO_LOG")
        .env_remove("RUST_LOG");
    cmd
}

pub fn http_context(server: &TestServer) -> ScenarioContext<HttpRpcClient> {
    let client = ScenarioConfig::from_lookup(|_| None)
        .with_base_url(server.url())
        .with_timeout(Duration::from_secs(5))
        .build_client()
        .expect("Failed to build client");
    ScenarioContext::new(client)
}

pub fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|cells| cells.iter().map(|c| c.to_string()).collect())
        .collect()
}
