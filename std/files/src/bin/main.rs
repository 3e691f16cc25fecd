//! Binary entry point for the wmcp-files MCP server.

use clap::Parser;
use rmcp::ServiceExt;
use wmcp_files::{FileAccessor, FilesServer, PathGuard, SymlinkPolicy, error::Error};

/// Walrus MCP Files Server — browse and read files inside permitted directories.
#[derive(Parser)]
#[command(name = "wmcp-files", version, about)]
struct Cli {
    /// Permitted directories the server may access.
    #[arg(num_args = 0..)]
    allowed_dirs: Vec<std::path::PathBuf>,

    /// How symlinks inside permitted directories are treated.
    #[arg(long, value_enum, default_value_t = SymlinkPolicy::Contain)]
    symlinks: SymlinkPolicy,
}

async fn run(cli: Cli) -> Result<(), Error> {
    let guard = PathGuard::new(cli.allowed_dirs)?;
    let accessor = FileAccessor::local(guard).with_symlinks(cli.symlinks);
    let server = FilesServer::new(accessor);
    let transport = rmcp::transport::stdio();
    server.serve(transport).await?.waiting().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
