//! FitLog
//!
//! An MCP server for food, exercise and custom metric logging.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use fitlog::build_info;
use fitlog::config::Config;
use fitlog::db::Database;
use fitlog::mcp::FitLogService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the MCP protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fitlog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    build_info::print_startup_banner(&config);
    eprintln!("Starting MCP server on stdio...");

    let database = Database::open(&config)?;

    let service = FitLogService::new(&config, database);

    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
