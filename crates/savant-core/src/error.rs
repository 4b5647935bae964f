//! Shared error type across Savant crates.

use thiserror::Error;

/// JSON-RPC error codes understood by hub clients (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCode {
    /// Input was not valid JSON.
    ParseError,
    /// JSON was valid but not a request object.
    InvalidRequest,
    /// Unknown method or unresolved tool name.
    MethodNotFound,
    /// Params missing or of the wrong shape.
    InvalidParams,
    /// Anything raised while executing a tool.
    InternalError,
    /// Tool blocked by sandbox policy (application range).
    SandboxViolation,
}

impl RpcCode {
    /// Numeric code placed on the wire.
    pub fn code(self) -> i64 {
        match self {
            RpcCode::ParseError => -32700,
            RpcCode::InvalidRequest => -32600,
            RpcCode::MethodNotFound => -32601,
            RpcCode::InvalidParams => -32602,
            RpcCode::InternalError => -32603,
            RpcCode::SandboxViolation => -32001,
        }
    }

    /// Default message used when a caller supplies none.
    pub fn as_str(self) -> &'static str {
        match self {
            RpcCode::ParseError => "Parse error",
            RpcCode::InvalidRequest => "Invalid Request",
            RpcCode::MethodNotFound => "Method not found",
            RpcCode::InvalidParams => "Invalid params",
            RpcCode::InternalError => "Internal error",
            RpcCode::SandboxViolation => "Sandbox violation",
        }
    }

    /// Reverse lookup from a wire code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -32700 => Some(RpcCode::ParseError),
            -32600 => Some(RpcCode::InvalidRequest),
            -32601 => Some(RpcCode::MethodNotFound),
            -32602 => Some(RpcCode::InvalidParams),
            -32603 => Some(RpcCode::InternalError),
            -32001 => Some(RpcCode::SandboxViolation),
            _ => None,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HubError>;

/// Unified error type used by core and hub.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("Tool {tool} blocked by sandbox policy")]
    SandboxViolation { tool: String },
    /// Failure raised by an engine callable or one of its hooks.
    #[error("{0}")]
    Tool(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("config: {0}")]
    Config(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl HubError {
    /// Map to the wire code reported to clients.
    pub fn rpc_code(&self) -> RpcCode {
        match self {
            HubError::Parse(_) => RpcCode::ParseError,
            HubError::InvalidRequest(_) => RpcCode::InvalidRequest,
            HubError::MethodNotFound(_) => RpcCode::MethodNotFound,
            HubError::InvalidParams(_) => RpcCode::InvalidParams,
            HubError::SandboxViolation { .. } => RpcCode::SandboxViolation,
            HubError::Tool(_)
            | HubError::Conflict(_)
            | HubError::Config(_)
            | HubError::Io(_)
            | HubError::Internal(_) => RpcCode::InternalError,
        }
    }

    /// Convenience for engines surfacing an opaque failure.
    pub fn tool(msg: impl Into<String>) -> Self {
        HubError::Tool(msg.into())
    }
}
