#![deny(clippy::all)]

//! Table-driven JSON-RPC scenarios.
//!
//! [`ScenarioContext`] holds the state of one scenario and exposes one
//! operation per step: send a request built from a parameter table, then
//! assert on the result, the error or the HTTP status. The fixture codec
//! lives in `rpc-scenario-fixture`, the transport in `rpc-scenario-client`.

pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod table;
pub mod telemetry;

pub use config::ScenarioConfig;
pub use context::ScenarioContext;
pub use error::StepError;

pub use rpc_scenario_client::HttpRpcClient;
pub use rpc_scenario_client::RpcClient;
