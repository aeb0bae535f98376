//! Per-scenario state threaded through every step.
//!
//! A `ScenarioContext` owns the RPC client, the pinned request id and the
//! last request/response pair. Step definitions call one operation per step;
//! nothing is kept in globals, so scenarios can run in parallel with one
//! context each.

use rpc_scenario_client::RequestId;
use rpc_scenario_client::RpcClient;
use rpc_scenario_client::RpcExchange;
use rpc_scenario_client::RpcRequest;
use rpc_scenario_client::generate_request_id;
use rpc_scenario_fixture::ExpectedRow;
use rpc_scenario_fixture::Node;
use rpc_scenario_fixture::compare;
use rpc_scenario_fixture::compare_all;
use rpc_scenario_fixture::encode_parameters;
use rpc_scenario_fixture::resolve_path;
use serde_json::Value;
use tracing::debug;
use tracing::info;
use tracing::info_span;

use crate::error::StepError;
use crate::table;

pub struct ScenarioContext<C: RpcClient> {
    client: C,
    request_id: Option<RequestId>,
    last_request: Option<RpcRequest>,
    last_exchange: Option<RpcExchange>,
}

impl<C: RpcClient> ScenarioContext<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            request_id: None,
            last_request: None,
            last_exchange: None,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Pins the id of every following request in this scenario.
    pub fn set_request_id(&mut self, id: impl Into<RequestId>) {
        let id = id.into();
        debug!(%id, "Pinned request id");
        self.request_id = Some(id);
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn last_request(&self) -> Option<&RpcRequest> {
        self.last_request.as_ref()
    }

    pub fn last_exchange(&self) -> Option<&RpcExchange> {
        self.last_exchange.as_ref()
    }

    /// Encodes `rows` (two cells each) as nested params and sends them.
    pub fn send_request(
        &mut self,
        method: &str,
        rows: &[Vec<String>],
    ) -> Result<&RpcExchange, StepError> {
        let pairs = table::rows_hash(rows)?;
        let params = encode_parameters(&pairs)?;
        self.send(method, Some(params.to_json()))
    }

    pub fn send_request_without_params(&mut self, method: &str) -> Result<&RpcExchange, StepError> {
        self.send(method, None)
    }

    /// Sends raw params, bypassing the table codec.
    pub fn send(&mut self, method: &str, params: Option<Value>) -> Result<&RpcExchange, StepError> {
        let id = self.request_id.clone().unwrap_or_else(generate_request_id);
        let request = RpcRequest::new(id, method, params);
        let _span = info_span!("scenario_request", method, id = %request.id).entered();
        info!("Sending scenario request");

        self.last_exchange = None;
        let exchange = self.client.send(&request);
        self.last_request = Some(request);
        let exchange = exchange?;

        debug!(
            status = exchange.status,
            is_error = exchange.response.is_error(),
            "Stored scenario response"
        );
        Ok(self.last_exchange.insert(exchange))
    }

    pub fn exchange(&self) -> Result<&RpcExchange, StepError> {
        self.last_exchange.as_ref().ok_or(StepError::NoRequestSent)
    }

    /// The `result` member of the last response.
    pub fn result(&self) -> Result<Node, StepError> {
        let exchange = self.exchange()?;
        match (exchange.result(), exchange.error()) {
            (Some(result), _) => Ok(Node::from(result)),
            (None, Some(error)) => Err(StepError::NoResult {
                error: format!("{} {}", error.code, error.message),
            }),
            (None, None) => Err(StepError::NoResult {
                error: "none".to_string(),
            }),
        }
    }

    pub fn assert_result(&self, rows: &[Vec<String>]) -> Result<(), StepError> {
        self.compare_result(rows, None)
    }

    pub fn assert_result_with_count(
        &self,
        rows: &[Vec<String>],
        count: usize,
    ) -> Result<(), StepError> {
        self.compare_result(rows, Some(count))
    }

    /// Checks every row and reports all failures together.
    pub fn assert_result_all(
        &self,
        rows: &[Vec<String>],
        count: Option<usize>,
    ) -> Result<(), StepError> {
        let expected = table::expected_rows(rows)?;
        let result = self.result()?;
        match StepError::from_mismatches(compare_all(&result, &expected, count)) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn assert_result_count(&self, count: usize) -> Result<(), StepError> {
        self.compare_result(&[], Some(count))
    }

    pub fn assert_result_value(&self, path: &str, expected: &str) -> Result<(), StepError> {
        let result = self.result()?;
        compare(&result, &[ExpectedRow::new(path, expected)], None)?;
        Ok(())
    }

    /// Looks up `path` in the last result.
    pub fn result_at(&self, path: &str) -> Result<Node, StepError> {
        let result = self.result()?;
        Ok(resolve_path(&result, path)?.clone())
    }

    pub fn assert_error(&self, code: i64, message: &str) -> Result<(), StepError> {
        let exchange = self.exchange()?;
        let error = exchange.error().ok_or_else(|| StepError::NoError {
            result: exchange
                .result()
                .map(Value::to_string)
                .unwrap_or_else(|| "none".to_string()),
        })?;

        if error.code != code {
            return Err(StepError::ErrorCodeMismatch {
                expected: code,
                actual: error.code,
            });
        }
        if error.message != message {
            return Err(StepError::ErrorMessageMismatch {
                expected: message.to_string(),
                actual: error.message.clone(),
            });
        }
        Ok(())
    }

    /// As [`assert_error`](Self::assert_error), then compares `error.data`
    /// against `rows`.
    pub fn assert_error_data(
        &self,
        code: i64,
        message: &str,
        rows: &[Vec<String>],
    ) -> Result<(), StepError> {
        self.assert_error(code, message)?;
        let expected = table::expected_rows(rows)?;

        let data = self
            .exchange()?
            .error()
            .and_then(|error| error.data.as_ref())
            .ok_or(StepError::NoErrorData)?;
        compare(&Node::from(data), &expected, None)?;
        Ok(())
    }

    pub fn assert_status(&self, status: u16) -> Result<(), StepError> {
        let actual = self.exchange()?.status;
        if actual != status {
            return Err(StepError::StatusMismatch {
                expected: status,
                actual,
            });
        }
        Ok(())
    }

    /// Compares the `id` echoed in the response envelope with `expected`.
    pub fn assert_response_id(&self, expected: &str) -> Result<(), StepError> {
        let actual = match &self.exchange()?.response.id {
            Some(id) => id.to_string(),
            None => "null".to_string(),
        };
        if actual != expected {
            return Err(StepError::IdMismatch {
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(())
    }

    /// Forgets the pinned id and the last request/response.
    pub fn reset(&mut self) {
        self.request_id = None;
        self.last_request = None;
        self.last_exchange = None;
    }

    fn compare_result(&self, rows: &[Vec<String>], count: Option<usize>) -> Result<(), StepError> {
        let expected = table::expected_rows(rows)?;
        let result = self.result()?;
        compare(&result, &expected, count)?;
        Ok(())
    }
}

impl<C: RpcClient + std::fmt::Debug> std::fmt::Debug for ScenarioContext<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("client", &self.client)
            .field("request_id", &self.request_id)
            .field("last_request", &self.last_request)
            .field("last_exchange", &self.last_exchange)
            .finish()
    }
}
