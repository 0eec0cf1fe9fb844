//! Stdio transport for MCP protocol
//!
//! One JSON-RPC message per line. Anything written here goes to the
//! client, so logging must stay on stderr.

use crate::mcp::error::McpError;
use crate::mcp::protocol::JsonRpcResponse;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter, Stdout};
use tracing::debug;

pub struct StdioTransport<W = Stdout> {
    writer: BufWriter<W>,
}

impl StdioTransport<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin> StdioTransport<W> {
    /// Transport over an arbitrary writer (used by tests)
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Send JSON-RPC response as one line
    pub async fn send_response(&mut self, response: &JsonRpcResponse) -> Result<(), McpError> {
        let json = serde_json::to_string(response)?;
        debug!("Sending: {}", json);

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl Default for StdioTransport<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}
