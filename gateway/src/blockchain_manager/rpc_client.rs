use std::time::Duration;

use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, Bytes},
    rpc::{client::RpcClient, types::TransactionRequest},
    transports::{http::reqwest::Url, RpcError as TransportRpcError, TransportError},
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::time;

use crate::errors::RpcError;

/// Read-only contract call transport.
#[async_trait]
pub trait CallTransport: Send + Sync {
    /// `eth_call` against the latest block; returns the raw output bytes.
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes>;
}

/// JSON-RPC over HTTP. Fails fast: no retry layer, errors go straight back
/// to the caller.
pub struct JsonRpcClient {
    client: RpcClient,
    timeout: Duration,
}

impl JsonRpcClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url).context("Failed to parse rpc url")?;
        let client = RpcClient::builder().http(url);
        Ok(Self { client, timeout })
    }
}

fn map_transport_error(error: TransportError) -> RpcError {
    match &error {
        TransportRpcError::ErrorResp(payload) => RpcError::Node {
            code: payload.code,
            message: payload.message.to_string(),
        },
        TransportRpcError::NullResp | TransportRpcError::DeserError { .. } => {
            RpcError::MalformedResponse(error.to_string())
        }
        _ => RpcError::Transport(error.to_string()),
    }
}

fn call_request(to: Address, data: Bytes) -> TransactionRequest {
    TransactionRequest::default().to(to).input(data.into())
}

#[async_trait]
impl CallTransport for JsonRpcClient {
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let request = self
            .client
            .request("eth_call", (call_request(to, data), BlockNumberOrTag::Latest));

        let output: Bytes = time::timeout(self.timeout, async move { request.await })
            .await
            .map_err(|_| RpcError::Timeout(self.timeout))?
            .map_err(map_transport_error)?;
        Ok(output)
    }
}
