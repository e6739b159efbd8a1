//! Bytecode assembly for the V4 VM
//!
//! Emits the exact byte layout the device interpreter expects. This is a
//! byte emitter, not a compiler: stack effects are never checked.

pub mod assembler;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod samples;
pub mod syscall;

pub use assembler::Assembler;
pub use error::{Error, Result};
pub use instruction::Instruction;
pub use opcode::{Opcode, Operand};
pub use program::Program;
pub use syscall::SysCall;
