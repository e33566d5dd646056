//! Newline-delimited JSON-RPC transport for serving [`McpServer`] sessions.
//!
//! Each line read is one JSON-RPC message. A line that cannot be decoded is
//! answered with a JSON-RPC error and the session keeps reading.

use std::collections::HashSet;
use std::future::{Future, ready};
use std::io;

use rmcp::model::{JsonRpcMessage, RequestId};
use rmcp::service::{RxJsonRpcMessage, TxJsonRpcMessage};
use rmcp::transport::Transport;
use rmcp::{ErrorData, RoleServer, ServiceExt};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::McpResult;
use crate::server::McpServer;

/// Line-oriented server transport over any reader/writer pair.
///
/// Outgoing lines are written by a background task in the order they are
/// queued. Request ids are tracked until their response is sent, and a
/// request reusing an id that is still in flight is rejected.
pub struct LineTransport<R> {
    reader: BufReader<R>,
    line: Vec<u8>,
    outbox: Option<mpsc::UnboundedSender<Vec<u8>>>,
    writer: Option<JoinHandle<()>>,
    in_flight: HashSet<RequestId>,
}

impl<R> LineTransport<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub fn new<W>(reader: R, writer: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outbox, rx) = mpsc::unbounded_channel();
        Self {
            reader: BufReader::new(reader),
            line: Vec::new(),
            outbox: Some(outbox),
            writer: Some(tokio::spawn(write_lines(writer, rx))),
            in_flight: HashSet::new(),
        }
    }

    fn queue(&self, message: &impl Serialize) -> io::Result<()> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');
        self.outbox
            .as_ref()
            .ok_or_else(closed)?
            .send(line)
            .map_err(|_| closed())
    }

    fn reject(&self, id: Value, error: ErrorData) {
        let response = json!({"jsonrpc": "2.0", "id": id, "error": error});
        if let Err(e) = self.queue(&response) {
            warn!(error = %e, "Failed to queue error response");
        }
    }

    /// Decode one line. Lines that were answered or ignored yield `None`.
    fn decode(&mut self, line: &[u8]) -> Option<RxJsonRpcMessage<RoleServer>> {
        let value: Value = match serde_json::from_slice(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Received unparseable message");
                self.reject(
                    Value::Null,
                    ErrorData::parse_error(format!("Parse error: {e}"), None),
                );
                return None;
            }
        };

        let id = value.get("id").cloned();
        let message: RxJsonRpcMessage<RoleServer> = match serde_json::from_value(value) {
            Ok(message) => message,
            Err(e) => {
                match id {
                    Some(id) => {
                        warn!(%id, error = %e, "Received invalid request");
                        self.reject(
                            id,
                            ErrorData::invalid_request(format!("Invalid request: {e}"), None),
                        );
                    }
                    None => debug!(error = %e, "Ignoring invalid notification"),
                }
                return None;
            }
        };

        if let JsonRpcMessage::Request(request) = &message {
            if !self.in_flight.insert(request.id.clone()) {
                warn!(id = %request.id, "Rejecting request with an id already in flight");
                self.reject(
                    json!(request.id),
                    ErrorData::invalid_request(
                        format!("Duplicate request id: {}", request.id),
                        None,
                    ),
                );
                return None;
            }
        }
        Some(message)
    }
}

impl<R> Transport<RoleServer> for LineTransport<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    type Error = io::Error;

    fn send(
        &mut self,
        item: TxJsonRpcMessage<RoleServer>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static {
        match &item {
            JsonRpcMessage::Response(response) => {
                self.in_flight.remove(&response.id);
            }
            JsonRpcMessage::Error(error) => {
                self.in_flight.remove(&error.id);
            }
            _ => {}
        }
        ready(self.queue(&item))
    }

    async fn receive(&mut self) -> Option<RxJsonRpcMessage<RoleServer>> {
        loop {
            let mut line = std::mem::take(&mut self.line);
            line.clear();
            match self.reader.read_until(b'\n', &mut line).await {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "Failed to read from transport");
                    return None;
                }
            }

            let message = match line.trim_ascii() {
                [] => None,
                trimmed => self.decode(trimmed),
            };
            self.line = line;
            if message.is_some() {
                return message;
            }
        }
    }

    fn close(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        // Dropping the sender lets the writer drain what is queued and exit.
        self.outbox.take();
        let writer = self.writer.take();
        async move {
            if let Some(writer) = writer {
                writer.await.map_err(io::Error::other)?;
            }
            Ok(())
        }
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "transport closed")
}

async fn write_lines<W>(mut writer: W, mut outbox: mpsc::UnboundedReceiver<Vec<u8>>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = outbox.recv().await {
        if let Err(e) = write_line(&mut writer, &line).await {
            error!(error = %e, "Failed to write to transport");
            break;
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &[u8]) -> io::Result<()> {
    writer.write_all(line).await?;
    writer.flush().await
}

/// Serve one MCP session over `reader`/`writer` until the input closes.
pub async fn serve<R, W>(server: McpServer, reader: R, writer: W) -> McpResult<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let session = server.serve(LineTransport::new(reader, writer)).await?;
    let reason = session.waiting().await?;
    info!(?reason, "MCP session ended");
    Ok(())
}

impl McpServer {
    /// Serve this server on stdin/stdout.
    pub async fn serve_stdio(self) -> McpResult<()> {
        info!("Starting MCP server on stdio");
        serve(self, tokio::io::stdin(), tokio::io::stdout()).await
    }
}
