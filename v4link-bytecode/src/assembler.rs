//! Bytecode builder ("assembler")
//!
//! A low-level byte emitter: every call appends the fixed encoding of one
//! instruction. Nothing is validated, reordered or optimized, so a program
//! that pops an empty stack is emitted just as written.

use bytes::BytesMut;
use tracing::trace;

use crate::instruction::Instruction;
use crate::program::Program;
use crate::syscall::SysCall;

/// Bytecode builder
///
/// # Examples
///
/// ```
/// use v4link_bytecode::Assembler;
///
/// let mut asm = Assembler::new();
/// asm.lit(10).lit(20).add().ret();
/// let program = asm.finish();
///
/// assert_eq!(
///     program.as_bytes(),
///     &[0x00, 0x0A, 0, 0, 0, 0x00, 0x14, 0, 0, 0, 0x10, 0x51]
/// );
/// ```
#[derive(Debug, Default, Clone)]
pub struct Assembler {
    code: BytesMut,
    count: usize,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any instruction
    pub fn push(&mut self, instruction: Instruction) -> &mut Self {
        instruction.encode(&mut self.code);
        self.count += 1;
        self
    }

    /// Append a sequence of instructions in order
    pub fn extend<I>(&mut self, instructions: I) -> &mut Self
    where
        I: IntoIterator<Item = Instruction>,
    {
        for instruction in instructions {
            self.push(instruction);
        }
        self
    }

    /// `LIT value` (opcode + 4-byte LE literal)
    pub fn lit(&mut self, value: i32) -> &mut Self {
        self.push(Instruction::Lit(value))
    }

    /// `LIT_U8 value` (opcode + 1 byte)
    pub fn lit_u8(&mut self, value: u8) -> &mut Self {
        self.push(Instruction::LitU8(value))
    }

    /// Push `value` with the shortest literal encoding
    pub fn lit_auto(&mut self, value: i32) -> &mut Self {
        match u8::try_from(value) {
            Ok(small) => self.lit_u8(small),
            Err(_) => self.lit(value),
        }
    }

    pub fn add(&mut self) -> &mut Self {
        self.push(Instruction::Add)
    }

    pub fn mul(&mut self) -> &mut Self {
        self.push(Instruction::Mul)
    }

    /// Drop top of stack
    pub fn drop_top(&mut self) -> &mut Self {
        self.push(Instruction::Drop)
    }

    pub fn sys(&mut self, call: SysCall) -> &mut Self {
        self.push(Instruction::Sys(call.into()))
    }

    /// System call by raw identifier
    pub fn sys_raw(&mut self, id: u8) -> &mut Self {
        self.push(Instruction::Sys(id))
    }

    /// Return; terminates a program
    pub fn ret(&mut self) -> &mut Self {
        self.push(Instruction::Ret)
    }

    /// Bytes emitted so far
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Number of instructions emitted so far
    pub fn instruction_count(&self) -> usize {
        self.count
    }

    /// Freeze the emitted bytes into a program
    pub fn finish(self) -> Program {
        trace!(
            instructions = self.count,
            len = self.code.len(),
            "Assembled program"
        );

        Program::from(self.code.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lit_ret() {
        let mut asm = Assembler::new();
        asm.lit(42).ret();

        assert_eq!(asm.finish().as_bytes(), &[0x00, 0x2A, 0x00, 0x00, 0x00, 0x51]);
    }

    #[test]
    fn test_addition() {
        let mut asm = Assembler::new();
        asm.lit(10).lit(20).add().ret();

        assert_eq!(
            asm.finish().as_bytes(),
            &[0x00, 0x0A, 0, 0, 0, 0x00, 0x14, 0, 0, 0, 0x10, 0x51]
        );
    }

    #[test]
    fn test_compact_literals() {
        let mut asm = Assembler::new();
        asm.lit_u8(5).lit_u8(10).add().ret();

        assert_eq!(asm.finish().as_bytes(), &[0x76, 5, 0x76, 10, 0x10, 0x51]);
    }

    #[test]
    fn test_lit_auto() {
        let mut asm = Assembler::new();
        asm.lit_auto(250).lit_auto(300).lit_auto(-1);

        assert_eq!(
            asm.finish().as_bytes(),
            &[0x76, 250, 0x00, 0x2C, 0x01, 0, 0, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_sys_and_drop() {
        let mut asm = Assembler::new();
        asm.lit_u8(7)
            .lit_u8(3)
            .sys(SysCall::GpioInit)
            .drop_top()
            .sys_raw(0x22)
            .ret();

        assert_eq!(
            asm.finish().as_bytes(),
            &[0x76, 7, 0x76, 3, 0x60, 0x00, 0x02, 0x60, 0x22, 0x51]
        );
    }

    #[test]
    fn test_no_validation() {
        // Pops from an empty stack on the device; emitted as written
        let mut asm = Assembler::new();
        asm.add().drop_top().mul();

        assert_eq!(asm.instruction_count(), 3);
        assert_eq!(asm.finish().as_bytes(), &[0x10, 0x02, 0x12]);
    }

    #[test]
    fn test_extend_matches_builder() {
        let mut a = Assembler::new();
        a.extend([Instruction::Lit(7), Instruction::Lit(6), Instruction::Mul, Instruction::Ret]);

        let mut b = Assembler::new();
        b.lit(7).lit(6).mul().ret();

        assert_eq!(a.len(), 12);
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn test_empty() {
        let asm = Assembler::new();
        assert!(asm.is_empty());
        assert!(asm.finish().is_empty());
    }
}
