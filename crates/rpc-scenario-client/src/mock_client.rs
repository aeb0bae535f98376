use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde_json::Value;

use crate::client::RpcClient;
use crate::error::ClientError;
use crate::error_codes;
use crate::types::RpcErrorObject;
use crate::types::RpcExchange;
use crate::types::RpcRequest;
use crate::types::RpcResponse;

/// Canned reply for one method.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    Result(Value),
    Error(RpcErrorObject),
    /// Echoes the request params back as the result.
    Echo,
}

/// In-memory `RpcClient` for tests.
///
/// Replies are configured per method. Every request is recorded so tests can
/// assert on what was sent. Clones share state, which lets a test keep a
/// handle after moving the client into a scenario context.
///
/// # Example
///
/// ```
/// use rpc_scenario_client::{MockClient, RpcClient};
/// use serde_json::json;
///
/// let mut mock = MockClient::new();
/// mock.set_response("health", json!({ "status": "ok" }));
///
/// let result = mock.call("health", None).unwrap();
/// assert_eq!(result, json!({ "status": "ok" }));
/// assert_eq!(mock.call_count("health"), 1);
/// ```
#[derive(Clone)]
pub struct MockClient {
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    calls: Arc<Mutex<Vec<RpcRequest>>>,
    settings: Arc<Mutex<MockSettings>>,
}

#[derive(Debug, Clone)]
struct MockSettings {
    default_reply: MockReply,
    status: u16,
    error_on_missing: bool,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    /// Creates a mock that echoes params for unconfigured methods.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            settings: Arc::new(Mutex::new(MockSettings {
                default_reply: MockReply::Echo,
                status: 200,
                error_on_missing: false,
            })),
        }
    }

    /// Creates a mock that answers unconfigured methods with -32601.
    pub fn new_strict() -> Self {
        let mock = Self::new();
        lock(&mock.settings).error_on_missing = true;
        mock
    }

    pub fn set_response(&mut self, method: &str, result: Value) {
        self.set_reply(method, MockReply::Result(result));
    }

    pub fn set_error(&mut self, method: &str, code: i64, message: &str, data: Option<Value>) {
        self.set_reply(
            method,
            MockReply::Error(RpcErrorObject {
                code,
                message: message.to_string(),
                data,
            }),
        );
    }

    pub fn set_reply(&mut self, method: &str, reply: MockReply) {
        lock(&self.replies).insert(method.to_string(), reply);
    }

    pub fn set_default_reply(&mut self, reply: MockReply) {
        lock(&self.settings).default_reply = reply;
    }

    /// HTTP status reported on every exchange.
    pub fn set_status(&mut self, status: u16) {
        lock(&self.settings).status = status;
    }

    pub fn get_calls(&self) -> Vec<RpcRequest> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    pub fn last_call(&self, method: &str) -> Option<RpcRequest> {
        lock(&self.calls)
            .iter()
            .rev()
            .find(|r| r.method == method)
            .cloned()
    }

    pub fn params_for(&self, method: &str) -> Vec<Option<Value>> {
        lock(&self.calls)
            .iter()
            .filter(|r| r.method == method)
            .map(|r| r.params.clone())
            .collect()
    }

    pub fn clear_calls(&mut self) {
        lock(&self.calls).clear();
    }

    pub fn clear_replies(&mut self) {
        lock(&self.replies).clear();
    }

    pub fn reset(&mut self) {
        self.clear_calls();
        self.clear_replies();
    }

    fn reply_for(&self, method: &str) -> Option<MockReply> {
        if let Some(reply) = lock(&self.replies).get(method) {
            return Some(reply.clone());
        }
        let settings = lock(&self.settings);
        if settings.error_on_missing {
            None
        } else {
            Some(settings.default_reply.clone())
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RpcClient for MockClient {
    fn send(&mut self, request: &RpcRequest) -> Result<RpcExchange, ClientError> {
        lock(&self.calls).push(request.clone());

        let id = Some(request.id.clone());
        let response = match self.reply_for(&request.method) {
            Some(MockReply::Result(result)) => RpcResponse::success(request.id.clone(), result),
            Some(MockReply::Echo) => RpcResponse::success(
                request.id.clone(),
                request.params.clone().unwrap_or(Value::Null),
            ),
            Some(MockReply::Error(error)) => {
                RpcResponse::error_with_data(id, error.code, &error.message, error.data)
            }
            None => {
                let code = error_codes::METHOD_NOT_FOUND;
                RpcResponse::error(id, code, error_codes::describe(code).unwrap_or_default())
            }
        };

        let body = serde_json::to_string(&response)?;
        Ok(RpcExchange {
            status: lock(&self.settings).status,
            body,
            response,
        })
    }
}
