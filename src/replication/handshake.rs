//! Replica Handshake
//!
//! When started with `--replicaof "<host> <port>"` the server introduces
//! itself to the upstream before it begins serving. The exchange is three
//! fixed frames, each of which must be answered exactly as expected before
//! the next is sent:
//!
//! 1. `PING`                               → `+PONG\r\n`
//! 2. `REPLCONF listening-port <port>`     → `+OK\r\n`
//! 3. `REPLCONF capa psync2`               → `+OK\r\n`
//!
//! Any connect failure, read failure, or mismatched reply abandons the
//! handshake; the server still starts serving with `role=slave`. No
//! replication traffic follows the handshake.

use crate::protocol::Value;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Errors raised while talking to the upstream.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// Connect, read, or write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upstream closed the connection mid-handshake
    #[error("upstream closed the connection")]
    UpstreamClosed,

    /// The upstream answered a step with something unexpected
    #[error("unexpected reply to {step}: {got:?}")]
    UnexpectedReply { step: &'static str, got: String },
}

/// Runs the three-frame handshake against `host:port`.
///
/// `listening_port` is the port this server accepts clients on, reported
/// in the REPLCONF frame.
pub async fn perform_handshake(
    host: &str,
    port: u16,
    listening_port: u16,
) -> Result<(), HandshakeError> {
    let mut stream = TcpStream::connect((host, port)).await?;
    debug!(upstream = %format!("{}:{}", host, port), "Connected to upstream");

    exchange(
        &mut stream,
        "PING",
        Value::array(vec![Value::bulk("PING")]),
        b"+PONG\r\n",
    )
    .await?;

    exchange(
        &mut stream,
        "REPLCONF listening-port",
        Value::array(vec![
            Value::bulk("REPLCONF"),
            Value::bulk("listening-port"),
            Value::bulk(listening_port.to_string()),
        ]),
        b"+OK\r\n",
    )
    .await?;

    exchange(
        &mut stream,
        "REPLCONF capa",
        Value::array(vec![
            Value::bulk("REPLCONF"),
            Value::bulk("capa"),
            Value::bulk("psync2"),
        ]),
        b"+OK\r\n",
    )
    .await?;

    info!(upstream = %format!("{}:{}", host, port), "Handshake with upstream complete");
    Ok(())
}

/// Sends one frame and requires the exact expected reply bytes.
async fn exchange(
    stream: &mut TcpStream,
    step: &'static str,
    frame: Value,
    expected: &[u8],
) -> Result<(), HandshakeError> {
    stream.write_all(&frame.serialize()).await?;

    let mut buf = [0u8; 64];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        return Err(HandshakeError::UpstreamClosed);
    }
    if &buf[..n] != expected {
        return Err(HandshakeError::UnexpectedReply {
            step,
            got: String::from_utf8_lossy(&buf[..n]).to_string(),
        });
    }
    Ok(())
}
