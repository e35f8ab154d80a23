//! Serial link lifecycle
//!
//! The hand announces itself with a status line once its servos are
//! initialised. Frames are only streamed after that first line arrives, which
//! the type-state machine below enforces:
//!
//! ```text
//! HandLink<AwaitingHello> ──await_hello()──► HandLink<Streaming>
//! ```

use std::io;
use std::time::Duration;

use chrono::{DateTime, Local};
use statum::{machine, state};
use thiserror::Error;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::frame::ActuatorFrame;
use super::line_buffer::LineBuffer;
use super::Transport;

/// Interval between polls while waiting for the hand, matching the tick rate
const HELLO_POLL_INTERVAL: Duration = Duration::from_millis(33);

/// Polls between "still waiting" log lines (about five seconds)
const HELLO_LOG_EVERY: u32 = 150;

const READ_CHUNK: usize = 256;

/// How long a single read or write may block on the port
const PORT_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Invalid robot hand serial port: {0}")]
    PortNotFound(String),

    #[error("Robot hand not responding on {port}: {reason}")]
    NotResponding { port: String, reason: String },

    #[error("The robot hand disconnected: {0}")]
    Disconnected(#[from] io::Error),
}

/// Latest status line received from the hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandStatus {
    pub text: String,
    pub received_at: DateTime<Local>,
}

impl HandStatus {
    fn new(text: String) -> Self {
        Self {
            text,
            received_at: Local::now(),
        }
    }
}

#[state]
#[derive(Debug, Clone)]
pub enum LinkState {
    AwaitingHello,
    Streaming,
}

#[machine]
pub struct HandLink<S: LinkState> {
    transport: Box<dyn Transport>,

    // Bytes received but not yet terminated by a delimiter
    lines: LineBuffer,

    port_name: String,
}

impl<S: LinkState> HandLink<S> {
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    // Reads whatever is pending on the port into the line buffer
    fn drain_available(&mut self) -> Result<usize, LinkError> {
        let available = self.transport.bytes_available()?;
        if available == 0 {
            return Ok(0);
        }

        let mut chunk = [0u8; READ_CHUNK];
        let mut total = 0;
        while total < available {
            let want = (available - total).min(READ_CHUNK);
            let read = self.transport.read_bytes(&mut chunk[..want])?;
            if read == 0 {
                break;
            }
            self.lines.extend(&chunk[..read]);
            total += read;
        }
        debug!("Read {} bytes from {}", total, self.port_name);
        Ok(total)
    }
}

impl HandLink<AwaitingHello> {
    /// Opens `port` at `baud_rate`
    ///
    /// # Errors
    ///
    /// * [`LinkError::PortNotFound`] - no such device
    /// * [`LinkError::NotResponding`] - the device exists but could not be opened
    pub fn open(port: &str, baud_rate: u32) -> Result<Self, LinkError> {
        info!("Opening robot hand serial port {} at {} baud", port, baud_rate);

        let serial = serialport::new(port, baud_rate)
            .timeout(PORT_TIMEOUT)
            .open()
            .map_err(|e| {
                error!("Failed to open {}: {}", port, e);
                match e.kind() {
                    serialport::ErrorKind::NoDevice
                    | serialport::ErrorKind::Io(io::ErrorKind::NotFound) => {
                        LinkError::PortNotFound(port.to_string())
                    }
                    _ => LinkError::NotResponding {
                        port: port.to_string(),
                        reason: e.to_string(),
                    },
                }
            })?;

        info!("Serial port {} open", port);
        Ok(Self::with_transport(Box::new(serial), port))
    }

    /// Wraps an already open transport
    pub fn with_transport(transport: Box<dyn Transport>, port_name: &str) -> Self {
        Self::new(transport, LineBuffer::new(), port_name.to_string())
    }

    /// Waits for the hand's first status line, then starts streaming
    ///
    /// Polls at the tick rate and never times out; the hand only speaks once
    /// its servos are initialised, which can take a few seconds. Callers that
    /// need cancellation should race this future against a shutdown signal.
    pub async fn await_hello(mut self) -> Result<(HandLink<Streaming>, HandStatus), LinkError> {
        info!("Waiting for robot hand on {} to initialize", self.port_name);

        let mut ticker = interval(HELLO_POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls: u32 = 0;

        loop {
            ticker.tick().await;

            self.drain_available()?;
            if let Some(line) = self.lines.next_line() {
                info!("Robot hand says: {}", line);
                return Ok((self.transition(), HandStatus::new(line)));
            }

            polls += 1;
            if polls % HELLO_LOG_EVERY == 0 {
                warn!(
                    "Still waiting for robot hand on {} ({} polls)",
                    self.port_name, polls
                );
            }
        }
    }
}

impl HandLink<Streaming> {
    /// Writes one actuator frame
    pub fn send(&mut self, frame: &ActuatorFrame) -> Result<(), LinkError> {
        self.transport.write_bytes(frame.as_bytes())?;
        Ok(())
    }

    /// Latest complete status line, if the hand sent one since the last poll
    pub fn poll_status(&mut self) -> Result<Option<HandStatus>, LinkError> {
        self.drain_available()?;
        Ok(self.lines.latest_line().map(HandStatus::new))
    }
}
