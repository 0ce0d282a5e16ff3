//! # Network Transport
//!
//! Raw TCP connection to a network printer (usually port 9100).
//!
//! Connecting and writing are bounded by the configured timeout; a device
//! that stops accepting data surfaces as [`LabelError::TransportTimeout`].

use std::io::Write;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::{Transport, io_error};
use crate::error::LabelError;

/// Default raw printing port.
pub const DEFAULT_PORT: u16 = 9100;

/// An open TCP connection to a printer.
pub struct TcpTransport {
    stream: TcpStream,
    addr: String,
}

impl TcpTransport {
    /// Connect to `addr` (`host:port`).
    pub fn connect(addr: &str, timeout: Duration) -> Result<Self, LabelError> {
        let resolved = addr
            .to_socket_addrs()
            .map_err(|e| io_error(&format!("Failed to resolve {}", addr), e))?
            .next()
            .ok_or_else(|| LabelError::Transport(format!("No address found for {}", addr)))?;

        let stream = TcpStream::connect_timeout(&resolved, timeout)
            .map_err(|e| io_error(&format!("Failed to connect to {}", addr), e))?;
        stream
            .set_write_timeout(Some(timeout))
            .map_err(|e| io_error("Failed to set write timeout", e))?;

        Ok(Self {
            stream,
            addr: addr.to_string(),
        })
    }
}

impl Transport for TcpTransport {
    fn write(&mut self, data: &[u8]) -> Result<(), LabelError> {
        self.stream
            .write_all(data)
            .map_err(|e| io_error(&format!("Write to {} failed", self.addr), e))?;
        self.stream
            .flush()
            .map_err(|e| io_error(&format!("Flush to {} failed", self.addr), e))
    }

    fn dispose(&mut self) -> Result<(), LabelError> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Peer already closed the connection
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(io_error(&format!("Closing {} failed", self.addr), e)),
        }
    }
}
