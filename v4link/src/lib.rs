//! # v4link
//!
//! Host side of the V4-link protocol: drive the V4 bytecode VM on a
//! microcontroller over a serial line.
//!
//! ## Features
//!
//! - Bit-exact frame encoding with CRC-8 checksums
//! - Bytecode assembler for the V4 instruction set
//! - Async/await API using Tokio, one exchange at a time with a deadline
//! - Typed errors separating "could not talk to the device" from
//!   "device rejected the request"
//!
//! ## Quick Start
//!
//! ```no_run
//! use v4link::{Assembler, LinkSession};
//!
//! #[tokio::main]
//! async fn main() -> v4link::Result<()> {
//!     let mut link = LinkSession::serial("/dev/ttyACM0", 115_200);
//!     link.connect().await?;
//!
//!     println!("PING: {}", link.ping().await?);
//!
//!     let mut asm = Assembler::new();
//!     asm.lit(10).lit(20).add().ret();
//!     println!("EXEC: {}", link.exec(&asm.finish()).await?);
//!
//!     link.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod link;

// Re-exports
pub use error::{Error, Result, StatusExt};
pub use link::LinkSession;

// Re-export protocol and bytecode types
pub use v4link_bytecode::{Assembler, Instruction, Opcode, Program, SysCall, samples};
pub use v4link_core::{Command, Frame, ResponseStatus, Session, SessionState, constants};
pub use v4link_transport::{SerialTransport, TcpTransport, Transport};
