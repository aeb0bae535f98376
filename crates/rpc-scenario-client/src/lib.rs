#![deny(clippy::all)]

mod client;
mod error;
pub mod error_codes;
mod mock_client;
mod types;

pub use client::DEFAULT_ACCEPT_ENCODING;
pub use client::DEFAULT_TIMEOUT;
pub use client::HttpClientConfig;
pub use client::HttpRpcClient;
pub use client::RpcClient;
pub use client::generate_request_id;
pub use error::ClientError;
pub use mock_client::MockClient;
pub use mock_client::MockReply;
pub use types::JSONRPC_VERSION;
pub use types::RequestId;
pub use types::RpcErrorObject;
pub use types::RpcExchange;
pub use types::RpcRequest;
pub use types::RpcResponse;

pub type Result<T> = std::result::Result<T, ClientError>;
