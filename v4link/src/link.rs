//! Request/response exchange with a V4-link device

use std::path::Path;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use v4link_bytecode::Program;
use v4link_core::constants::{DEFAULT_TIMEOUT, RESPONSE_FRAME_SIZE};
use v4link_core::{Command, Frame, ResponseStatus, Session, SessionState};
use v4link_transport::{SerialTransport, TcpTransport, Transport};

use crate::error::{Error, Result};

/// Link to one V4 device
///
/// Runs one exchange at a time: encode a frame, write it, wait for the
/// five-byte status response within a deadline, decode it. Nothing is
/// retried here; retry policy belongs to the caller.
///
/// # Examples
///
/// ```no_run
/// use v4link::{LinkSession, samples};
///
/// #[tokio::main]
/// async fn main() -> v4link::Result<()> {
///     let mut link = LinkSession::serial("/dev/ttyACM0", 115_200);
///     link.connect().await?;
///
///     let status = link.exec(&samples::lit42()).await?;
///     println!("Response: {}", status);
///
///     link.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct LinkSession {
    transport: Box<dyn Transport>,
    session: Session,
    timeout: Duration,
    rx: BytesMut,
}

impl LinkSession {
    /// Create a link over any transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_boxed(Box::new(transport))
    }

    /// Create a link over an already boxed transport
    pub fn from_boxed(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            session: Session::new(),
            timeout: DEFAULT_TIMEOUT,
            rx: BytesMut::with_capacity(RESPONSE_FRAME_SIZE),
        }
    }

    /// Create a link over a serial port
    pub fn serial(path: impl Into<String>, baud_rate: u32) -> Self {
        Self::new(SerialTransport::new(path).with_baud_rate(baud_rate))
    }

    /// Create a link through a TCP serial bridge
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::new(TcpTransport::new(host, port))
    }

    /// Create a link from a target string (`/dev/ttyACM0`, `tcp://host:port`)
    pub fn open_target(target: &str, baud_rate: u32) -> Result<Self> {
        Ok(Self::from_boxed(v4link_transport::from_target(
            target, baud_rate,
        )?))
    }

    /// Set the response timeout used by [`ping`](Self::ping),
    /// [`exec`](Self::exec) and [`reset`](Self::reset)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Exchange state handle
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Bytes received during the most recent exchange
    ///
    /// Kept for diagnostics after a timeout or a decode failure; cleared when
    /// the next exchange starts.
    pub fn last_received(&self) -> &[u8] {
        &self.rx
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Open the transport
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to {}...", self.transport.remote_addr());

        self.transport.connect().await?;

        info!("Connected to {}", self.transport.remote_addr());
        Ok(())
    }

    /// Close the transport
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.transport.remote_addr());

        self.transport.disconnect().await?;

        info!("Disconnected");
        Ok(())
    }

    /// Liveness check
    pub async fn ping(&mut self) -> Result<ResponseStatus> {
        self.send(Command::Ping, Bytes::new(), self.timeout).await
    }

    /// Run a program on the device VM
    pub async fn exec(&mut self, program: &Program) -> Result<ResponseStatus> {
        debug!("Program:\n{}", program.disassemble());

        self.send(Command::Exec, program.bytes(), self.timeout).await
    }

    /// Load a raw program file and run it
    ///
    /// A missing file is reported before anything is written to the device.
    pub async fn exec_file(&mut self, path: impl AsRef<Path>) -> Result<ResponseStatus> {
        let program = Program::from_file(path)?;
        self.exec(&program).await
    }

    /// Reset the device VM
    pub async fn reset(&mut self) -> Result<ResponseStatus> {
        self.send(Command::Reset, Bytes::new(), self.timeout).await
    }

    /// Send one command and wait for its status
    ///
    /// A non-OK status is a successful exchange: it is returned as a value,
    /// not as an error.
    ///
    /// # Errors
    ///
    /// - [`Error::Core`] with `PayloadTooLarge` before any I/O
    /// - [`Error::NotConnected`] if the transport is closed
    /// - [`Error::Transport`] if writing or reading fails
    /// - [`Error::Timeout`] if fewer than 5 bytes arrive before the deadline
    /// - [`Error::Core`] with a frame error if the response does not decode
    pub async fn send(
        &mut self,
        command: Command,
        payload: impl Into<Bytes>,
        timeout: Duration,
    ) -> Result<ResponseStatus> {
        let frame = Frame::new(command, payload)?;

        if !command.takes_payload() && !frame.payload().is_empty() {
            warn!(
                command = command.name(),
                len = frame.payload().len(),
                "Payload on a command that does not take one; sending as given"
            );
        }

        if !self.transport.is_connected() {
            return Err(Error::NotConnected);
        }

        let exchange = self.session.begin()?;
        self.rx.clear();

        trace!(exchange, "Sending: {:?}", frame);

        if let Err(e) = self.write_frame(&frame).await {
            self.session.abort();
            return Err(e);
        }

        match self.read_response(timeout).await {
            Ok(()) => {}
            Err(e @ Error::Timeout { .. }) => {
                warn!(
                    exchange,
                    command = command.name(),
                    partial = %hex::encode(&self.rx),
                    "{}",
                    e
                );
                self.session.finish(SessionState::TimedOut)?;
                return Err(e);
            }
            Err(e) => {
                self.session.abort();
                return Err(e);
            }
        }

        if self.rx.len() > RESPONSE_FRAME_SIZE {
            debug!(
                extra = self.rx.len() - RESPONSE_FRAME_SIZE,
                "Ignoring bytes after response frame"
            );
        }

        match Frame::decode_status(&self.rx) {
            Ok(status) => {
                self.session.finish(SessionState::Complete)?;
                debug!(exchange, command = command.name(), %status, "Response");
                Ok(status)
            }
            Err(e) => {
                self.session.finish(SessionState::FrameError)?;
                warn!(
                    exchange,
                    response = %hex::encode(&self.rx),
                    "Invalid response: {}",
                    e
                );
                Err(e.into())
            }
        }
    }

    // Helper methods

    async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let data = frame.encode();

        self.transport.discard_input().await?;

        debug!(
            "Sending frame ({} bytes): {}",
            data.len(),
            hex::encode(&data)
        );
        self.transport.send(&data).await?;

        Ok(())
    }

    async fn read_response(&mut self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now().checked_add(timeout);

        while self.rx.len() < RESPONSE_FRAME_SIZE {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                // Too far out to represent; the transport read bounds the wait
                None => timeout,
            };
            if remaining.is_zero() {
                return Err(self.timeout_error(timeout));
            }

            match self.transport.receive(remaining).await {
                Ok(chunk) => self.rx.extend_from_slice(&chunk),
                Err(v4link_transport::Error::ReadTimeout) => {
                    return Err(self.timeout_error(timeout));
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!(
            "Received response ({} bytes): {}",
            self.rx.len(),
            hex::encode(&self.rx)
        );

        Ok(())
    }

    fn timeout_error(&self, timeout: Duration) -> Error {
        Error::Timeout {
            timeout,
            received: self.rx.len(),
        }
    }
}
