use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use tracing::warn;
use url::Url;

use crate::error::ClientError;
use crate::types::RequestId;
use crate::types::RpcExchange;
use crate::types::RpcRequest;
use crate::types::RpcResponse;

pub const DEFAULT_ACCEPT_ENCODING: &str = "gzip;q=1.0,deflate;q=0.6,identity;q=0.3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Random id for requests whose scenario did not pin one.
pub fn generate_request_id() -> RequestId {
    RequestId::String(uuid::Uuid::new_v4().simple().to_string())
}

pub trait RpcClient {
    /// Sends `request` and returns the exchange, including RPC errors.
    fn send(&mut self, request: &RpcRequest) -> Result<RpcExchange, ClientError>;

    /// Sends a request with a generated id and returns its `result`.
    fn call(&mut self, method: &str, params: Option<Value>) -> Result<Value, ClientError> {
        let request = RpcRequest::new(generate_request_id(), method, params);
        let exchange = self.send(&request)?;

        if let Some(error) = exchange.response.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        exchange.response.result.ok_or_else(|| {
            ClientError::InvalidResponse("response has neither result nor error".into())
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            headers: vec![(
                "Accept-Encoding".to_string(),
                DEFAULT_ACCEPT_ENCODING.to_string(),
            )],
        }
    }
}

/// JSON-RPC over HTTP POST.
pub struct HttpRpcClient {
    endpoint: Url,
    agent: ureq::Agent,
    headers: Vec<(String, String)>,
}

impl std::fmt::Debug for HttpRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRpcClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("headers", &self.headers)
            .finish()
    }
}

impl HttpRpcClient {
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        Self::with_config(endpoint, HttpClientConfig::default())
    }

    pub fn with_config(endpoint: &str, config: HttpClientConfig) -> Result<Self, ClientError> {
        let endpoint = Url::parse(endpoint)?;
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Ok(Self {
            endpoint,
            agent,
            headers: config.headers,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn post(&self, body: &str) -> Result<(u16, String), ClientError> {
        let mut request = self
            .agent
            .post(self.endpoint.as_str())
            .set("Content-Type", "application/json")
            .set("Accept", "application/json");
        for (name, value) in &self.headers {
            request = request.set(name, value);
        }

        match request.send_string(body) {
            Ok(resp) => read_body(resp),
            Err(ureq::Error::Status(_, resp)) => read_body(resp),
            Err(ureq::Error::Transport(err)) => Err(ClientError::Transport(err.to_string())),
        }
    }
}

fn read_body(resp: ureq::Response) -> Result<(u16, String), ClientError> {
    let status = resp.status();
    let body = resp
        .into_string()
        .map_err(|e| ClientError::Transport(e.to_string()))?;
    Ok((status, body))
}

impl RpcClient for HttpRpcClient {
    fn send(&mut self, request: &RpcRequest) -> Result<RpcExchange, ClientError> {
        let payload = serde_json::to_string(request)?;
        debug!(
            method = %request.method,
            id = %request.id,
            endpoint = %self.endpoint,
            "Sending JSON-RPC request"
        );

        let (status, body) = self.post(&payload)?;

        let response = match serde_json::from_str::<RpcResponse>(&body) {
            Ok(response) => response,
            Err(_) if !(200..300).contains(&status) => {
                return Err(ClientError::Http { status, body });
            }
            Err(e) => {
                warn!(status, error = %e, "Undecodable JSON-RPC response body");
                return Err(ClientError::InvalidResponse(format!("{e}: {body}")));
            }
        };

        debug!(status, is_error = response.is_error(), "Received JSON-RPC response");
        Ok(RpcExchange {
            status,
            body,
            response,
        })
    }
}
