//! Serial link to the robot hand
//!
//! - [`frame`] - The 6-byte actuator frame written every tick
//! - [`line_buffer`] - Reassembles the hand's delimited status lines
//! - [`link`] - Port lifecycle: open, wait for the hand's hello, stream
//!
//! # Protocol
//!
//! ```text
//! host ──► hand   0x19 grab 0x16 flex 0x17 turn      (every tick)
//! hand ──► host   "<status text>\r\n"                (whenever it has something to say)
//! ```

pub mod frame;
pub mod line_buffer;
pub mod link;

use std::io::{self, Read, Write};

pub use frame::ActuatorFrame;
pub use line_buffer::LineBuffer;
pub use link::{AwaitingHello, HandLink, LinkError, Streaming};

/// Byte-level primitives the link needs from a port
pub trait Transport: Send {
    /// Bytes that can be read without blocking
    fn bytes_available(&mut self) -> io::Result<usize>;

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl Transport for Box<dyn serialport::SerialPort> {
    fn bytes_available(&mut self) -> io::Result<usize> {
        let count = self.bytes_to_read().map_err(io::Error::from)?;
        Ok(count as usize)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)?;
        self.flush()
    }
}
