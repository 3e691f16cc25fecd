//! MCP server for browsing and reading files.
//!
//! Every path is checked against the permitted directories configured at
//! startup before any filesystem I/O. Exposes three tools: `browse-files`,
//! `read-file` and `greet`.

use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};
pub mod access;
pub mod error;
pub mod fs;
pub mod guard;
pub mod tools;

pub use access::{AccessError, FileAccessor, SymlinkPolicy};
pub use guard::{GuardError, PathGuard};

/// MCP files server restricted to a fixed set of permitted directories.
#[derive(Debug, Clone)]
pub struct FilesServer {
    pub(crate) accessor: FileAccessor,
    pub(crate) tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for FilesServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "wmcp-files".into(),
                title: Some("Walrus MCP Files Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Files server for browsing and reading files inside the permitted directories."
                    .into(),
            ),
        }
    }
}
