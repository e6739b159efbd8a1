//! V4 opcode definitions
//!
//! Only the encoding is described here. What an opcode does to the stack is
//! decided by the device VM.

use std::fmt;

/// Operand carried after an opcode byte
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Opcode only
    None,

    /// One unsigned byte
    U8,

    /// Four bytes, little-endian signed integer
    I32,
}

impl Operand {
    /// Encoded size in bytes
    pub const fn size(self) -> usize {
        match self {
            Self::None => 0,
            Self::U8 => 1,
            Self::I32 => 4,
        }
    }
}

/// V4 instruction opcodes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Push 32-bit literal
    Lit = 0x00,

    /// Drop top of stack
    Drop = 0x02,

    /// Pop b, pop a, push a + b
    Add = 0x10,

    /// Pop b, pop a, push a * b
    Mul = 0x12,

    /// Return from execution
    Ret = 0x51,

    /// System call
    Sys = 0x60,

    /// Push 8-bit unsigned literal
    LitU8 = 0x76,
}

impl Opcode {
    /// All opcodes known to this host
    pub const ALL: [Opcode; 7] = [
        Self::Lit,
        Self::Drop,
        Self::Add,
        Self::Mul,
        Self::Ret,
        Self::Sys,
        Self::LitU8,
    ];

    /// Operand that follows this opcode
    pub const fn operand(self) -> Operand {
        match self {
            Self::Lit => Operand::I32,
            Self::Sys | Self::LitU8 => Operand::U8,
            Self::Drop | Self::Add | Self::Mul | Self::Ret => Operand::None,
        }
    }

    /// Encoded size including the opcode byte
    pub const fn encoded_len(self) -> usize {
        1 + self.operand().size()
    }

    /// Assembly mnemonic
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Lit => "LIT",
            Self::Drop => "DROP",
            Self::Add => "ADD",
            Self::Mul => "MUL",
            Self::Ret => "RET",
            Self::Sys => "SYS",
            Self::LitU8 => "LIT_U8",
        }
    }

    /// Decode an opcode byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Lit),
            0x02 => Some(Self::Drop),
            0x10 => Some(Self::Add),
            0x12 => Some(Self::Mul),
            0x51 => Some(Self::Ret),
            0x60 => Some(Self::Sys),
            0x76 => Some(Self::LitU8),
            _ => None,
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
