//! # v4link-core
//!
//! Core protocol implementation for the V4-link serial protocol.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - CRC-8 checksum calculation
//! - Command and response status definitions
//! - Exchange state tracking
//! - Protocol constants

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod session;

pub use command::{Command, ResponseStatus};
pub use error::{Error, Result};
pub use frame::Frame;
pub use session::{Session, SessionState};
