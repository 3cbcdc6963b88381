//! price-updater -- MCP price replacement server.
//!
//! Usage: price-updater --workspace <path> [--store <file>]

fn flag_value(name: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != name).nth(1)
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr so it does not interfere with MCP stdio.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let workspace = flag_value("--workspace").unwrap_or_else(|| ".".to_string());
    let workspace = std::path::Path::new(&workspace).canonicalize()?;

    let config = price_updater::server::McpServerConfig {
        workspace,
        store_path: flag_value("--store").map(std::path::PathBuf::from),
    };

    price_updater::run_mcp_server(config)
}
