//! Command-line front end for the algolia-mcp server
//!
//! Flags override the config file and environment. `--list-tools`
//! prints the tool catalog and exits without starting a transport.

pub mod output;

use crate::core::config::{split_list, Config, Transport};
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use crate::mcp::handlers::ProtocolHandlers;
use crate::mcp::{sse, McpServer, ToolRegistry};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Algolia MCP server
///
/// Exposes the Algolia Search, Analytics, A/B testing, Recommend,
/// Query Suggestions, Monitoring and Usage APIs as MCP tools.
#[derive(Parser, Debug, Default)]
#[command(name = "algolia-mcp")]
#[command(version)]
#[command(about = "Model Context Protocol server for Algolia", long_about = None)]
pub struct Cli {
    /// Transport to serve (stdio or sse)
    #[arg(long)]
    pub transport: Option<Transport>,

    /// Bind address for the SSE transport
    #[arg(long)]
    pub host: Option<String>,

    /// Port for the SSE transport
    #[arg(long)]
    pub port: Option<u16>,

    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only register tools that do not modify Algolia data
    #[arg(long)]
    pub read_only: bool,

    /// Comma separated toolsets to enable (default: all)
    #[arg(long, value_name = "LIST")]
    pub toolsets: Option<String>,

    /// Print the available tools and exit
    #[arg(long)]
    pub list_tools: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of file and env settings
    pub fn apply(&self, config: &mut Config) {
        if let Some(transport) = self.transport {
            config.server.transport = transport;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.read_only {
            config.tools.read_only = true;
        }
        if let Some(toolsets) = &self.toolsets {
            config.tools.toolsets = split_list(toolsets);
        }
    }

    /// Resolve the effective configuration without validating it
    pub fn resolve_config(&self) -> crate::Result<Config> {
        let xdg = XdgDirs::new();
        let mut config = Config::resolve(&xdg, self.config.as_deref())?;
        self.apply(&mut config);
        Ok(config)
    }
}

/// Run the server with the parsed arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.resolve_config()?;

    if cli.list_tools {
        let services = Arc::new(Services::new(config)?);
        let registry = ToolRegistry::register_all(&services);
        output::print_tool_list(&registry);
        return Ok(());
    }

    config.validate()?;
    config.log_config();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let transport = config.server.transport;
    let services = Arc::new(Services::new(config)?);
    let handlers = Arc::new(ProtocolHandlers::new(services));

    match transport {
        Transport::Stdio => McpServer::with_handlers(handlers).run().await?,
        Transport::Sse => sse::serve(handlers, &addr).await?,
    }

    Ok(())
}
