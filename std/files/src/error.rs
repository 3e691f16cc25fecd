use crate::guard::GuardError;
use thiserror::Error;

/// Errors that stop the server process.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] GuardError),

    #[error("MCP server initialization error: {0}")]
    ServerInit(#[from] rmcp::service::ServerInitializeError),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
