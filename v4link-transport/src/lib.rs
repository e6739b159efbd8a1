//! Transport layer for the V4-link protocol
//!
//! Provides byte-stream communication with devices over a serial port, or
//! over TCP to a network serial bridge.

pub mod error;
pub mod serial;
pub mod tcp;

pub use error::{Error, Result};
pub use serial::SerialTransport;
pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Prefix selecting the TCP transport in a target string
pub const TCP_SCHEME: &str = "tcp://";

/// Duplex byte stream to a device
#[async_trait]
pub trait Transport: Send {
    /// Open the underlying port or connection
    async fn connect(&mut self) -> Result<()>;

    /// Close the underlying port or connection
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Write all bytes and flush
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive whatever bytes are available
    ///
    /// Waits up to `timeout` for at least one byte and fails with
    /// [`Error::ReadTimeout`] if none arrives.
    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut>;

    /// Drop inbound bytes that arrived outside an exchange
    async fn discard_input(&mut self) -> Result<()> {
        Ok(())
    }

    /// Get remote address (device path or host:port)
    fn remote_addr(&self) -> String;
}

/// Build a transport from a target string
///
/// `tcp://host:port` selects [`TcpTransport`]; anything else is taken as a
/// serial device path opened at `baud_rate`.
///
/// # Examples
///
/// ```
/// use v4link_transport::{from_target, Transport};
///
/// let transport = from_target("/dev/ttyACM0", 115_200).unwrap();
/// assert_eq!(transport.remote_addr(), "/dev/ttyACM0");
///
/// let transport = from_target("tcp://192.168.4.1:3333", 115_200).unwrap();
/// assert_eq!(transport.remote_addr(), "192.168.4.1:3333");
/// ```
pub fn from_target(target: &str, baud_rate: u32) -> Result<Box<dyn Transport>> {
    match target.strip_prefix(TCP_SCHEME) {
        Some(authority) => {
            let (host, port) = authority
                .rsplit_once(':')
                .ok_or_else(|| Error::InvalidAddress(format!("missing port in {}", target)))?;
            let port = port
                .parse::<u16>()
                .map_err(|e| Error::InvalidAddress(format!("{}: {}", target, e)))?;

            if host.is_empty() {
                return Err(Error::InvalidAddress(format!("missing host in {}", target)));
            }

            Ok(Box::new(TcpTransport::new(host, port)))
        }
        None if target.is_empty() => Err(Error::InvalidAddress("empty target".into())),
        None => Ok(Box::new(
            SerialTransport::new(target).with_baud_rate(baud_rate),
        )),
    }
}
