//! Instruction encoding and decoding

use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{Error, Result};
use crate::opcode::Opcode;
use crate::syscall::SysCall;

/// One opcode with its operand
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    Lit(i32),
    LitU8(u8),
    Add,
    Mul,
    Drop,
    Sys(u8),
    Ret,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Lit(_) => Opcode::Lit,
            Self::LitU8(_) => Opcode::LitU8,
            Self::Add => Opcode::Add,
            Self::Mul => Opcode::Mul,
            Self::Drop => Opcode::Drop,
            Self::Sys(_) => Opcode::Sys,
            Self::Ret => Opcode::Ret,
        }
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        self.opcode().encoded_len()
    }

    /// Append the encoded instruction to `buf`
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.opcode().into());

        match *self {
            Self::Lit(value) => buf.put_i32_le(value),
            Self::LitU8(value) | Self::Sys(value) => buf.put_u8(value),
            Self::Add | Self::Mul | Self::Drop | Self::Ret => {}
        }
    }

    /// Decode the instruction starting at `offset`
    ///
    /// Returns the instruction and its encoded length.
    pub fn decode(code: &[u8], offset: usize) -> Result<(Self, usize)> {
        let mut cursor = code.get(offset..).unwrap_or_default();
        if !cursor.has_remaining() {
            return Err(Error::OffsetOutOfRange {
                offset,
                len: code.len(),
            });
        }

        let byte = cursor.get_u8();
        let opcode = Opcode::from_byte(byte).ok_or(Error::UnknownOpcode {
            offset,
            opcode: byte,
        })?;

        if cursor.remaining() < opcode.operand().size() {
            return Err(Error::TruncatedOperand {
                offset,
                opcode: byte,
            });
        }

        let instruction = match opcode {
            Opcode::Lit => Self::Lit(cursor.get_i32_le()),
            Opcode::LitU8 => Self::LitU8(cursor.get_u8()),
            Opcode::Sys => Self::Sys(cursor.get_u8()),
            Opcode::Add => Self::Add,
            Opcode::Mul => Self::Mul,
            Opcode::Drop => Self::Drop,
            Opcode::Ret => Self::Ret,
        };

        Ok((instruction, opcode.encoded_len()))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Lit(value) => write!(f, "LIT {}", value),
            Self::LitU8(value) => write!(f, "LIT_U8 {}", value),
            Self::Sys(id) => match SysCall::from_id(id) {
                Some(call) => write!(f, "SYS {}", call),
                None => write!(f, "SYS 0x{:02X}", id),
            },
            other => f.write_str(other.opcode().mnemonic()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encoded(instruction: Instruction) -> Vec<u8> {
        let mut buf = Vec::new();
        instruction.encode(&mut buf);
        buf
    }

    #[test]
    fn test_encode_lit_little_endian() {
        assert_eq!(encoded(Instruction::Lit(1000)), vec![0x00, 0xE8, 0x03, 0x00, 0x00]);
        assert_eq!(encoded(Instruction::Lit(-1)), vec![0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_encode_byte_operands() {
        assert_eq!(encoded(Instruction::LitU8(200)), vec![0x76, 200]);
        assert_eq!(encoded(Instruction::Sys(0x22)), vec![0x60, 0x22]);
        assert_eq!(encoded(Instruction::Drop), vec![0x02]);
    }

    #[test]
    fn test_decode_lit() {
        let code = [0x76, 0x05, 0x00, 0x2C, 0x01, 0x00, 0x00];
        assert_eq!(Instruction::decode(&code, 0).unwrap(), (Instruction::LitU8(5), 2));
        assert_eq!(Instruction::decode(&code, 2).unwrap(), (Instruction::Lit(300), 5));
    }

    #[test]
    fn test_decode_unknown_opcode() {
        let result = Instruction::decode(&[0x51, 0x33], 1);
        assert!(matches!(
            result,
            Err(Error::UnknownOpcode {
                offset: 1,
                opcode: 0x33
            })
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let result = Instruction::decode(&[0x00, 0x2A, 0x00], 0);
        assert!(matches!(result, Err(Error::TruncatedOperand { offset: 0, .. })));
    }

    #[test]
    fn test_decode_past_end() {
        let result = Instruction::decode(&[0x51], 1);
        assert!(matches!(
            result,
            Err(Error::OffsetOutOfRange { offset: 1, len: 1 })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Instruction::Lit(42).to_string(), "LIT 42");
        assert_eq!(Instruction::Sys(0x22).to_string(), "SYS DELAY_MS");
        assert_eq!(Instruction::Sys(0x40).to_string(), "SYS 0x40");
        assert_eq!(Instruction::Ret.to_string(), "RET");
    }
}
