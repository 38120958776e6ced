use std::{fmt, time::Duration};

/// Caller supplied a malformed or out-of-range value. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputError(pub String);

impl InputError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InputError {}

/// A component could not be built from the supplied configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, reason: String },
    OracleNotConfigured,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "{} is not set", name),
            Self::Invalid { name, reason } => write!(f, "{} is invalid: {}", name, reason),
            Self::OracleNotConfigured => write!(f, "oracle address not configured"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The RPC endpoint was unreachable or answered with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    Transport(String),
    Timeout(Duration),
    Node { code: i64, message: String },
    MalformedResponse(String),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(reason) => write!(f, "rpc request failed: {}", reason),
            Self::Timeout(after) => write!(f, "rpc request timed out after {:?}", after),
            Self::Node { code, message } => write!(f, "rpc error {}: {}", code, message),
            Self::MalformedResponse(reason) => write!(f, "malformed rpc response: {}", reason),
        }
    }
}

impl std::error::Error for RpcError {}

/// True when any error in the chain is an [`InputError`].
pub fn is_input_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| cause.is::<InputError>())
}
