//! MCP server implementation (stdio)

use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::handlers::ProtocolHandlers;
use crate::mcp::transport::StdioTransport;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader};
use tracing::{debug, info};

pub struct McpServer {
    handlers: Arc<ProtocolHandlers>,
}

impl McpServer {
    pub fn new(services: Arc<Services>) -> Self {
        Self::with_handlers(Arc::new(ProtocolHandlers::new(services)))
    }

    pub fn with_handlers(handlers: Arc<ProtocolHandlers>) -> Self {
        Self { handlers }
    }

    /// Run the MCP server on stdin/stdout until EOF or Ctrl+C
    pub async fn run(&self) -> Result<(), McpError> {
        info!("Starting Algolia MCP server (stdio)");

        let reader = BufReader::new(tokio::io::stdin());
        let mut transport = StdioTransport::new();

        // Spawn signal handler
        let mut shutdown = tokio::spawn(async {
            tokio::signal::ctrl_c().await.ok();
        });

        tokio::select! {
            res = self.serve(reader, &mut transport) => res?,
            _ = &mut shutdown => info!("Received shutdown signal"),
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Answer every line of `reader` until EOF
    pub async fn serve<R, W>(
        &self,
        reader: R,
        transport: &mut StdioTransport<W>,
    ) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            debug!("Received: {}", line);

            if let Some(response) = self.handlers.dispatch(&line).await {
                transport.send_response(&response).await?;
            }
        }

        debug!("stdin closed");
        Ok(())
    }
}
