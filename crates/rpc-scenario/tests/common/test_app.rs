//! In-process JSON-RPC application for integration tests.
//!
//! Methods:
//! - `app`: returns its params unchanged
//! - `errorWithData`: fails with `params.message`, `params.errorCode` and the
//!   JSON document in `params.data`
//!
//! Unknown methods answer -32601, undecodable bodies -32700. A GET on the
//! endpoint returns the service map.

#![allow(dead_code)]

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread::JoinHandle;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::post;
use rpc_scenario_client::error_codes;
use serde_json::Value;
use serde_json::json;
use tokio::sync::oneshot;

pub const RPC_PATH: &str = "/json-rpc";

#[derive(Clone, Default)]
struct AppState {
    requests: Arc<Mutex<Vec<Value>>>,
}

pub fn router() -> Router {
    router_with_state(AppState::default())
}

fn router_with_state(state: AppState) -> Router {
    Router::new()
        .route(RPC_PATH, post(handle_rpc).get(service_map))
        .with_state(state)
}

async fn service_map() -> Json<Value> {
    Json(json!({
        "transport": "POST",
        "envelope": "JSON-RPC-2.0",
        "methods": ["app", "errorWithData"],
    }))
}

async fn handle_rpc(State(state): State<AppState>, body: String) -> Json<Value> {
    let request: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(_) => return Json(reserved(Value::Null, error_codes::PARSE_ERROR)),
    };
    state.requests.lock().unwrap().push(request.clone());

    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let Some(method) = request.get("method").and_then(Value::as_str) else {
        return Json(reserved(id, error_codes::INVALID_REQUEST));
    };
    let params = request.get("params").cloned().unwrap_or(Value::Null);

    let reply = match method {
        "app" => json!({"jsonrpc": "2.0", "id": id, "result": params}),
        "errorWithData" => error_with_data(id, &params),
        _ => reserved(id, error_codes::METHOD_NOT_FOUND),
    };
    Json(reply)
}

fn error_with_data(id: Value, params: &Value) -> Value {
    let message = params.get("message").and_then(Value::as_str);
    let code = params
        .get("errorCode")
        .and_then(|c| c.as_i64().or_else(|| c.as_str().and_then(|s| s.parse().ok())));
    let (Some(message), Some(code)) = (message, code) else {
        return reserved(id, error_codes::INVALID_PARAMS);
    };
    let data = params
        .get("data")
        .and_then(Value::as_str)
        .and_then(|raw| serde_json::from_str(raw).ok());
    error(id, code, message, data)
}

fn reserved(id: Value, code: i64) -> Value {
    error(id, code, error_codes::describe(code).unwrap_or_default(), None)
}

fn error(id: Value, code: i64, message: &str, data: Option<Value>) -> Value {
    let mut error = json!({"code": code, "message": message});
    if let Some(data) = data {
        error["data"] = data;
    }
    json!({"jsonrpc": "2.0", "id": id, "error": error})
}

/// The test application served from a dedicated thread.
pub struct TestServer {
    addr: SocketAddr,
    state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn start() -> Self {
        let state = AppState::default();
        let app = router_with_state(state.clone());
        let (addr_tx, addr_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("rpc-test-app".to_string())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("Failed to create tokio runtime");
                runtime.block_on(async move {
                    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                        .await
                        .expect("Failed to bind test app");
                    addr_tx
                        .send(listener.local_addr().expect("Failed to read local addr"))
                        .expect("Failed to report test app address");
                    tokio::select! {
                        result = axum::serve(listener, app).into_future() => {
                            result.expect("Test app failed");
                        }
                        _ = shutdown_rx => {}
                    }
                });
            })
            .expect("Failed to spawn test app thread");

        let addr = addr_rx.recv().expect("Test app did not start");
        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, RPC_PATH)
    }

    /// Every decodable request body received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<Value> {
        self.requests().pop()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
