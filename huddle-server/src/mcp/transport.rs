// Copyright 2025 Huddle (https://github.com/huddle-sports/huddle)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Line-oriented transport and the generic serve loop.
//!
//! The line transport reads newline-delimited JSON. Lines that do not parse,
//! or that lack the `"jsonrpc": "2.0"` marker and a method, are dropped from
//! protocol processing: logged at debug level on stderr and nothing else, so
//! arbitrary text can share the stream without corrupting the session.
//!
//! The serve loop dispatches requests in arrival order but concurrently:
//! each request runs on its own task and sends its response through the
//! transport's sender handle, so responses may complete out of order and
//! callers correlate by request id. A dedicated writer task serializes the
//! actual output so response lines never interleave.

use crate::mcp::handler::McpHandler;
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use async_trait::async_trait;
use serde_json::Value;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Channel closed")]
    ChannelClosed,
}

/// Transport abstraction carrying JSON-RPC messages to and from the handler.
#[async_trait]
pub trait McpTransport: Send {
    /// The next valid protocol message, or `None` once the stream ends.
    async fn recv(&mut self) -> Result<Option<JsonRpcRequest>, TransportError>;

    /// A clonable handle for sending responses, usable from any task.
    fn sender(&self) -> mpsc::Sender<JsonRpcResponse>;

    /// Send one response through the transport.
    async fn send(&mut self, response: JsonRpcResponse) -> Result<(), TransportError> {
        self.sender()
            .send(response)
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }

    /// Stop reading and flush pending output. The underlying output stream
    /// is left open where it is shared (stdout is).
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Newline-delimited JSON over a buffered reader and any writer.
pub struct LineTransport<R> {
    lines: Lines<R>,
    out_tx: Option<mpsc::Sender<JsonRpcResponse>>,
    writer_task: Option<JoinHandle<()>>,
    closed: bool,
}

impl<R> LineTransport<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new<W>(reader: R, writer: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (out_tx, mut out_rx) = mpsc::channel::<JsonRpcResponse>(32);
        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(response) = out_rx.recv().await {
                if let Err(e) = write_line(&mut writer, &response).await {
                    debug!(error = %e, "stopping writer after output failure");
                    break;
                }
            }
        });

        Self {
            lines: reader.lines(),
            out_tx: Some(out_tx),
            writer_task: Some(writer_task),
            closed: false,
        }
    }
}

/// The production transport: stdin/stdout of this process.
pub fn stdio() -> LineTransport<BufReader<Stdin>> {
    LineTransport::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
}

async fn write_line<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> io::Result<()> {
    let line = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

#[async_trait]
impl<R> McpTransport for LineTransport<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn recv(&mut self) -> Result<Option<JsonRpcRequest>, TransportError> {
        if self.closed {
            return Ok(None);
        }

        while let Some(line) = self.lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let value: Value = match serde_json::from_str(trimmed) {
                Ok(value) => value,
                Err(e) => {
                    debug!(error = %e, "dropping non-JSON line");
                    continue;
                }
            };
            if value.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
                debug!("dropping line without jsonrpc 2.0 marker");
                continue;
            }
            if value.get("method").and_then(Value::as_str).is_none() {
                debug!("dropping message without a method");
                continue;
            }

            match serde_json::from_value(value) {
                Ok(request) => return Ok(Some(request)),
                Err(e) => {
                    debug!(error = %e, "dropping malformed request");
                    continue;
                }
            }
        }

        Ok(None)
    }

    fn sender(&self) -> mpsc::Sender<JsonRpcResponse> {
        match &self.out_tx {
            Some(tx) => tx.clone(),
            // Closed: hand back a sender whose receiver is gone, so sends
            // fail instead of queueing forever.
            None => mpsc::channel(1).0,
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closed = true;
        self.out_tx.take();
        if let Some(task) = self.writer_task.take() {
            let _ = task.await;
        }
        Ok(())
    }
}

/// Read requests until the stream ends, dispatching each on its own task.
/// Closing the transport afterwards waits for in-flight responses to flush.
pub async fn serve<T: McpTransport>(
    mut transport: T,
    handler: Arc<McpHandler>,
) -> Result<(), TransportError> {
    let sender = transport.sender();

    while let Some(request) = transport.recv().await? {
        let handler = handler.clone();
        let sender = sender.clone();
        tokio::spawn(async move {
            if let Some(response) = handler.handle_request(request).await {
                let _ = sender.send(response).await;
            }
        });
    }

    drop(sender);
    transport.close().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::JsonRpcId;
    use tokio::io::AsyncReadExt;

    fn reader_only(input: &'static [u8]) -> LineTransport<BufReader<&'static [u8]>> {
        LineTransport::new(BufReader::new(input), tokio::io::sink())
    }

    #[tokio::test]
    async fn only_valid_protocol_lines_are_delivered() {
        let input: &[u8] = b"this is not json\n\
            {\"method\": \"ping\", \"id\": 1}\n\
            {\"jsonrpc\": \"2.0\", \"method\": \"ping\", \"id\": 1}\n";
        let mut transport = reader_only(input);

        let request = transport.recv().await.unwrap().unwrap();
        assert_eq!(request.method, "ping");
        assert!(transport.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_lines_and_responses_are_dropped() {
        let input: &[u8] = b"\n\
            {\"jsonrpc\": \"2.0\", \"result\": {}, \"id\": 1}\n\
            {\"jsonrpc\": \"2.0\", \"method\": \"tools/list\", \"id\": 2}\n";
        let mut transport = reader_only(input);

        let request = transport.recv().await.unwrap().unwrap();
        assert_eq!(request.method, "tools/list");
    }

    #[tokio::test]
    async fn responses_are_single_json_lines() {
        let (client, server) = tokio::io::duplex(1024);
        let empty: &[u8] = b"";
        let mut transport = LineTransport::new(BufReader::new(empty), server);

        transport
            .send(JsonRpcResponse::success(
                JsonRpcId::Number(1),
                serde_json::json!({"ok": true}),
            ))
            .await
            .unwrap();
        transport.close().await.unwrap();

        let mut written = String::new();
        let mut client = client;
        client.read_to_string(&mut written).await.unwrap();
        assert!(written.ends_with('\n'));
        let parsed: Value = serde_json::from_str(written.trim()).unwrap();
        assert_eq!(parsed["jsonrpc"], "2.0");
        assert_eq!(parsed["id"], 1);
    }

    #[tokio::test]
    async fn recv_after_close_is_none() {
        let input: &[u8] = b"{\"jsonrpc\": \"2.0\", \"method\": \"ping\", \"id\": 1}\n";
        let mut transport = reader_only(input);
        transport.close().await.unwrap();
        assert!(transport.recv().await.unwrap().is_none());
    }
}
