use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use alloy::primitives::{Address, Bytes};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::Notify;

use super::rpc_client::CallTransport;

/// In-memory transport keyed by (target, call data).
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<(Address, Bytes), Result<Vec<u8>, String>>>,
    calls: Mutex<Vec<(Address, Bytes)>>,
    gate: Mutex<Option<Arc<Notify>>>,
    entered: Notify,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, to: Address, data: Bytes, output: Vec<u8>) {
        self.responses.lock().unwrap().insert((to, data), Ok(output));
    }

    pub fn fail(&self, to: Address, data: Bytes, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert((to, data), Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<(Address, Bytes)> {
        self.calls.lock().unwrap().clone()
    }

    /// Parks every following call until the returned gate is notified once
    /// per call.
    pub fn hold_calls(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Resolves once a call has reached the gate.
    pub async fn call_parked(&self) {
        self.entered.notified().await
    }
}

#[async_trait]
impl CallTransport for MockTransport {
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        self.calls.lock().unwrap().push((to, data.clone()));
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }
        match self.responses.lock().unwrap().get(&(to, data)) {
            Some(Ok(output)) => Ok(Bytes::from(output.clone())),
            Some(Err(message)) => Err(anyhow!("{}", message)),
            None => Err(anyhow!("no mock response")),
        }
    }
}
