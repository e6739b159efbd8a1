//! Bytecode errors

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Program file not found: {}", .0.display())]
    ProgramNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown opcode 0x{opcode:02X} at offset {offset}")]
    UnknownOpcode { offset: usize, opcode: u8 },

    #[error("Offset {offset} is past the end of {len} bytes of code")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("Truncated operand for opcode 0x{opcode:02X} at offset {offset}")]
    TruncatedOperand { offset: usize, opcode: u8 },
}
