//! Connection Handler Module
//!
//! Each accepted client runs its own task executing the loop:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │      Main Loop               │
//! │                              │
//! │  ┌─────────────────────────┐ │
//! │  │ Read bytes from socket  │ │
//! │  └───────────┬─────────────┘ │
//! │              ▼               │
//! │  ┌─────────────────────────┐ │
//! │  │ Parse RESP frame        │ │
//! │  └───────────┬─────────────┘ │
//! │              ▼               │
//! │  ┌─────────────────────────┐ │
//! │  │ Execute command         │ │
//! │  └───────────┬─────────────┘ │
//! │              ▼               │
//! │  ┌─────────────────────────┐ │
//! │  │ Send reply              │ │
//! │  └───────────┬─────────────┘ │
//! │              ▼               │
//! │         [Loop back]          │
//! └──────────────────────────────┘
//! ```
//!
//! ## Buffer Management
//!
//! TCP is a stream protocol: one read may carry a partial frame or several
//! pipelined frames. Incoming data accumulates in a `BytesMut` buffer; the
//! parser takes whole frames off the front and leaves the rest for the next
//! round. Within a connection, commands are strictly pipelined: each
//! request is executed and answered before the next is taken.
//!
//! A protocol error is answered with an `-ERR` reply and the connection is
//! closed; a malformed but well-framed command only gets an error reply and
//! the connection stays open.

use crate::commands::CommandHandler;
use crate::protocol::{ParseError, RespParser, Value};
use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

/// Maximum size for the read buffer (64 KB)
const MAX_BUFFER_SIZE: usize = 64 * 1024;

/// Initial buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total commands processed
    pub commands_processed: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Handles a single client connection.
///
/// Owns the socket, the read buffer, and the parser state for one client.
pub struct ConnectionHandler {
    /// The TCP stream for this connection
    stream: BufWriter<TcpStream>,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// Buffer for incoming data
    buffer: BytesMut,

    /// The command handler (shared keyspace behind it)
    command_handler: CommandHandler,

    /// RESP parser
    parser: RespParser,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,
}

impl ConnectionHandler {
    /// Creates a new connection handler.
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        command_handler: CommandHandler,
        stats: Arc<ConnectionStats>,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream: BufWriter::new(stream),
            addr,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            command_handler,
            parser: RespParser::new(),
            stats,
        }
    }

    /// Runs the connection loop until the client disconnects or an error
    /// occurs.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        info!(client = %self.addr, "Client connected");

        let result = self.main_loop().await;

        match &result {
            Ok(()) => info!(client = %self.addr, "Client disconnected gracefully"),
            Err(e) => match e {
                ConnectionError::ClientDisconnected => {
                    debug!(client = %self.addr, "Client disconnected")
                }
                ConnectionError::IoError(io_err)
                    if io_err.kind() == std::io::ErrorKind::ConnectionReset =>
                {
                    debug!(client = %self.addr, "Connection reset by client")
                }
                _ => warn!(client = %self.addr, error = %e, "Connection error"),
            },
        }

        self.stats.connection_closed();
        result
    }

    /// The main read-execute-respond loop.
    async fn main_loop(&mut self) -> Result<(), ConnectionError> {
        loop {
            loop {
                match self.try_parse_command() {
                    Ok(Some(request)) => {
                        let reply = self.command_handler.execute(request);
                        self.stats.command_processed();
                        self.send_reply(&reply).await?;
                    }
                    Ok(None) => break,
                    Err(e) => {
                        // Tell the client what went wrong, then drop the
                        // connection: after a framing error the rest of the
                        // stream cannot be trusted
                        let reply = Value::err(format!("protocol error: {}", e));
                        self.send_reply(&reply).await?;
                        return Err(ConnectionError::ParseError(e));
                    }
                }
            }

            // Need more data - read from the socket
            self.read_more_data().await?;
        }
    }

    /// Attempts to parse one frame from the front of the buffer.
    fn try_parse_command(&mut self) -> Result<Option<Value>, ParseError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        match self.parser.parse(&self.buffer) {
            Ok(Some((value, consumed))) => {
                let _ = self.buffer.split_to(consumed);
                trace!(
                    client = %self.addr,
                    consumed = consumed,
                    remaining = self.buffer.len(),
                    "Parsed command"
                );
                Ok(Some(value))
            }
            Ok(None) => {
                trace!(
                    client = %self.addr,
                    buffered = self.buffer.len(),
                    "Incomplete frame, need more data"
                );
                Ok(None)
            }
            Err(e) => {
                warn!(client = %self.addr, error = %e, "Parse error");
                Err(e)
            }
        }
    }

    /// Reads more data from the socket into the buffer.
    async fn read_more_data(&mut self) -> Result<(), ConnectionError> {
        if self.buffer.len() >= MAX_BUFFER_SIZE {
            warn!(
                client = %self.addr,
                size = self.buffer.len(),
                "Buffer size limit exceeded"
            );
            return Err(ConnectionError::BufferFull);
        }

        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(4096);
        }

        let n = self.stream.get_mut().read_buf(&mut self.buffer).await?;

        if n == 0 {
            // Connection closed by client
            if self.buffer.is_empty() {
                return Err(ConnectionError::ClientDisconnected);
            } else {
                // Partial frame in buffer
                return Err(ConnectionError::UnexpectedEof);
            }
        }

        self.stats.bytes_read(n);
        trace!(client = %self.addr, bytes = n, "Read data");

        Ok(())
    }

    /// Serializes and sends a reply to the client.
    async fn send_reply(&mut self, reply: &Value) -> Result<(), ConnectionError> {
        let bytes = reply.serialize();
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        self.stats.bytes_written(bytes.len());
        trace!(
            client = %self.addr,
            bytes = bytes.len(),
            "Sent reply"
        );
        Ok(())
    }
}

/// Errors that can occur while handling a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// RESP parse error
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    /// Client disconnected normally
    #[error("Client disconnected")]
    ClientDisconnected,

    /// Unexpected end of stream (partial frame)
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    /// Buffer size limit exceeded
    #[error("Buffer size limit exceeded")]
    BufferFull,
}

/// Handles a client connection to completion.
///
/// This is a convenience function that creates a [`ConnectionHandler`]
/// and runs it.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    command_handler: CommandHandler,
    stats: Arc<ConnectionStats>,
) {
    let handler = ConnectionHandler::new(stream, addr, command_handler, stats);
    if let Err(e) = handler.run().await {
        match e {
            ConnectionError::ClientDisconnected => {}
            ConnectionError::IoError(ref io_err)
                if io_err.kind() == std::io::ErrorKind::ConnectionReset => {}
            _ => {
                debug!(client = %addr, error = %e, "Connection ended with error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Keyspace;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn create_test_server() -> (SocketAddr, Arc<Keyspace>, Arc<ConnectionStats>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let keyspace = Arc::new(Keyspace::new(HashMap::new()));
        let stats = Arc::new(ConnectionStats::new());

        let keyspace_clone = Arc::clone(&keyspace);
        let stats_clone = Arc::clone(&stats);

        tokio::spawn(async move {
            while let Ok((stream, client_addr)) = listener.accept().await {
                let handler = CommandHandler::new(Arc::clone(&keyspace_clone));
                let stats = Arc::clone(&stats_clone);
                tokio::spawn(handle_connection(stream, client_addr, handler, stats));
            }
        });

        (addr, keyspace, stats)
    }

    async fn read_reply(client: &mut TcpStream, expected_len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; 256];
        let mut total = 0;
        while total < expected_len {
            let n = client.read(&mut buf[total..]).await.unwrap();
            if n == 0 {
                break;
            }
            total += n;
        }
        buf.truncate(total);
        buf
    }

    #[tokio::test]
    async fn test_ping_pong() {
        let (addr, _, _) = create_test_server().await;

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"*1\r\n$4\r\nPING\r\n").await.unwrap();

        assert_eq!(read_reply(&mut client, 7).await, b"+PONG\r\n");
    }

    #[tokio::test]
    async fn test_echo() {
        let (addr, _, _) = create_test_server().await;

        let mut client = TcpStream::connect(addr).await.unwrap();
        client
            .write_all(b"*2\r\n$4\r\nECHO\r\n$5\r\nhello\r\n")
            .await
            .unwrap();

        assert_eq!(read_reply(&mut client, 11).await, b"$5\r\nhello\r\n");
    }

    #[tokio::test]
    async fn test_set_get_missing() {
        let (addr, _, _) = create_test_server().await;

        let mut client = TcpStream::connect(addr).await.unwrap();

        client
            .write_all(b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n")
            .await
            .unwrap();
        assert_eq!(read_reply(&mut client, 5).await, b"+OK\r\n");

        client
            .write_all(b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n")
            .await
            .unwrap();
        assert_eq!(read_reply(&mut client, 9).await, b"$3\r\nbar\r\n");

        client
            .write_all(b"*2\r\n$3\r\nGET\r\n$7\r\nmissing\r\n")
            .await
            .unwrap();
        assert_eq!(read_reply(&mut client, 5).await, b"$-1\r\n");
    }

    #[tokio::test]
    async fn test_set_px_expires_end_to_end() {
        let (addr, _, _) = create_test_server().await;

        let mut client = TcpStream::connect(addr).await.unwrap();

        client
            .write_all(b"*5\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n$2\r\nPX\r\n$3\r\n100\r\n")
            .await
            .unwrap();
        assert_eq!(read_reply(&mut client, 5).await, b"+OK\r\n");

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        client
            .write_all(b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n")
            .await
            .unwrap();
        assert_eq!(read_reply(&mut client, 5).await, b"$-1\r\n");
    }

    #[tokio::test]
    async fn test_pipelined_commands_in_one_write() {
        let (addr, _, _) = create_test_server().await;

        let mut client = TcpStream::connect(addr).await.unwrap();

        client
            .write_all(b"*3\r\n$3\r\nSET\r\n$2\r\nk1\r\n$2\r\nv1\r\n*3\r\n$3\r\nSET\r\n$2\r\nk2\r\n$2\r\nv2\r\n*2\r\n$3\r\nGET\r\n$2\r\nk1\r\n*2\r\n$3\r\nGET\r\n$2\r\nk2\r\n")
            .await
            .unwrap();

        // +OK\r\n +OK\r\n $2\r\nv1\r\n $2\r\nv2\r\n
        let reply = read_reply(&mut client, 26).await;
        assert_eq!(reply, b"+OK\r\n+OK\r\n$2\r\nv1\r\n$2\r\nv2\r\n");
    }

    #[tokio::test]
    async fn test_frame_split_across_writes() {
        let (addr, _, _) = create_test_server().await;

        let mut client = TcpStream::connect(addr).await.unwrap();

        client.write_all(b"*2\r\n$4\r\nEC").await.unwrap();
        client.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        client.write_all(b"HO\r\n$3\r\nhey\r\n").await.unwrap();

        assert_eq!(read_reply(&mut client, 9).await, b"$3\r\nhey\r\n");
    }

    #[tokio::test]
    async fn test_malformed_command_keeps_connection_open() {
        let (addr, _, _) = create_test_server().await;

        let mut client = TcpStream::connect(addr).await.unwrap();

        // Well-framed but not a command array
        client.write_all(b"*1\r\n:42\r\n").await.unwrap();
        let reply = read_reply(&mut client, 5).await;
        assert!(reply.starts_with(b"-ERR"));

        // Still serving
        client.write_all(b"*1\r\n$4\r\nPING\r\n").await.unwrap();
        assert_eq!(read_reply(&mut client, 7).await, b"+PONG\r\n");
    }

    #[tokio::test]
    async fn test_protocol_error_replies_then_closes() {
        let (addr, _, _) = create_test_server().await;

        let mut client = TcpStream::connect(addr).await.unwrap();

        client.write_all(b"@garbage\r\n").await.unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).await.unwrap();

        // The error reply arrives, then EOF
        assert!(buf.starts_with(b"-ERR protocol error"));
    }

    #[tokio::test]
    async fn test_connection_stats() {
        let (addr, _, stats) = create_test_server().await;

        assert_eq!(stats.active_connections.load(Ordering::Relaxed), 0);

        let mut client = TcpStream::connect(addr).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert_eq!(stats.connections_accepted.load(Ordering::Relaxed), 1);
        assert_eq!(stats.active_connections.load(Ordering::Relaxed), 1);

        client.write_all(b"*1\r\n$4\r\nPING\r\n").await.unwrap();
        let mut buf = [0u8; 64];
        let _ = client.read(&mut buf).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert!(stats.commands_processed.load(Ordering::Relaxed) >= 1);
        assert!(stats.bytes_read.load(Ordering::Relaxed) > 0);
        assert!(stats.bytes_written.load(Ordering::Relaxed) > 0);

        drop(client);

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert_eq!(stats.active_connections.load(Ordering::Relaxed), 0);
    }
}
