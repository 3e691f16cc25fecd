//! Tool implementations for the files MCP server.

use crate::FilesServer;
use crate::access::{AccessError, FileAccessor, display_roots};
use chrono::{SecondsFormat, Utc};
use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::Deserialize;

/// Text returned by `browse-files` when no file was found.
pub const EMPTY_DIRECTORY: &str = "Given directory is empty";

/// Parameters for browsing a directory.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrowseFilesParams {
    /// The directory to browse.
    pub dir_path: String,
}

/// Parameters for reading a file.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileParams {
    /// Path to the file that needs to be read.
    pub file_path: String,
}

/// Parameters for the greeting tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GreetParams {
    /// Recipient name.
    pub name: String,
}

#[tool_router]
impl FilesServer {
    /// Create a new files server around the given accessor.
    pub fn new(accessor: FileAccessor) -> Self {
        tracing::info!(roots = %display_roots(accessor.guard().roots()), "serving permitted directories");
        Self {
            accessor,
            tool_router: Self::tool_router(),
        }
    }

    /// Recursively list every file below a permitted directory.
    #[tool(
        name = "browse-files",
        description = "Browse/list the files in the specified directory. Specified directory needs to be part of the permitted directories tree. Denied paths and I/O failures are returned as a tool error whose text starts with `Error: `"
    )]
    async fn browse_files(
        &self,
        Parameters(params): Parameters<BrowseFilesParams>,
    ) -> Result<String, String> {
        match self.accessor.list(&params.dir_path).await {
            Ok(files) if files.is_empty() => Ok(EMPTY_DIRECTORY.into()),
            Ok(files) => Ok(files
                .iter()
                .map(|f| f.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            Err(AccessError::Denied { path, roots }) => Err(format!(
                "Error: Directory not permitted. You need to specify permitted directories when setting up MCP. Permitted directories are: {} and {path} is not included in allowed directories.",
                display_roots(&roots)
            )),
            Err(e) => Err(format!("Error: {e}")),
        }
    }

    /// Read a whole file inside a permitted directory.
    #[tool(
        name = "read-file",
        description = "Read the file at the specified path. This path must be part of the permitted directories tree. Denied paths and I/O failures are returned as a tool error whose text starts with `Error: `"
    )]
    async fn read_file(
        &self,
        Parameters(params): Parameters<ReadFileParams>,
    ) -> Result<String, String> {
        match self.accessor.read(&params.file_path).await {
            Ok(content) => Ok(content),
            Err(AccessError::Denied { .. }) => Err("Error: File path not permitted.".into()),
            Err(e) => Err(format!("Error: {e}")),
        }
    }

    /// Greet the caller with the current server time.
    #[tool(description = "Greet someone and report the current server time")]
    async fn greet(&self, Parameters(params): Parameters<GreetParams>) -> String {
        format!(
            "Hello, {}! Current server time: {}",
            params.name,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }
}
