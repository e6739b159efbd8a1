//! Flattened bytecode programs
//!
//! A program file is the raw instruction stream: no header and no length
//! prefix. The whole file content is the EXEC payload.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::error::{Error, Result};
use crate::instruction::Instruction;

/// Immutable bytecode ready to be sent as an EXEC payload
///
/// Cloning is cheap (reference counted), so one program can be sent any
/// number of times.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Program {
    code: Bytes,
}

impl Program {
    /// Read a program file
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProgramNotFound`] if `path` does not exist, or
    /// [`Error::Io`] if it cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let code = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::ProgramNotFound(path.to_path_buf()),
            _ => Error::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        debug!(path = %path.display(), len = code.len(), "Loaded program");

        Ok(Self::from(code))
    }

    /// Write the raw program bytes to `path`
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        fs::write(path, &self.code).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), len = self.code.len(), "Wrote program");

        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    /// Shared handle to the program bytes
    pub fn bytes(&self) -> Bytes {
        self.code.clone()
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Decode the byte stream back into instructions
    pub fn instructions(&self) -> Result<Vec<Instruction>> {
        let mut instructions = Vec::new();
        let mut offset = 0;

        while offset < self.code.len() {
            let (instruction, len) = Instruction::decode(&self.code, offset)?;
            instructions.push(instruction);
            offset += len;
        }

        Ok(instructions)
    }

    /// One instruction per line, or the hex dump if the stream does not decode
    pub fn disassemble(&self) -> String {
        match self.instructions() {
            Ok(instructions) => instructions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => format!("{} ({})", hex::encode(&self.code), e),
        }
    }
}

impl From<Bytes> for Program {
    fn from(code: Bytes) -> Self {
        Self { code }
    }
}

impl From<Vec<u8>> for Program {
    fn from(code: Vec<u8>) -> Self {
        Self { code: code.into() }
    }
}

impl From<Program> for Bytes {
    fn from(program: Program) -> Bytes {
        program.code
    }
}

impl AsRef<[u8]> for Program {
    fn as_ref(&self) -> &[u8] {
        &self.code
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("len", &self.code.len())
            .field("code", &hex::encode(&self.code))
            .finish()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Program({} bytes)", self.code.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Assembler;
    use pretty_assertions::assert_eq;

    fn lit42() -> Program {
        let mut asm = Assembler::new();
        asm.lit(42).ret();
        asm.finish()
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lit42.bin");

        lit42().write_to(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![0x00, 0x2A, 0x00, 0x00, 0x00, 0x51]);

        let loaded = Program::from_file(&path).unwrap();
        assert_eq!(loaded, lit42());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");

        let result = Program::from_file(&path);
        assert!(matches!(result, Err(Error::ProgramNotFound(p)) if p == path));
    }

    #[test]
    fn test_whole_file_is_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.bin");
        fs::write(&path, [0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

        let program = Program::from_file(&path).unwrap();
        assert_eq!(program.as_bytes(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_instructions() {
        let mut asm = Assembler::new();
        asm.lit_u8(200).sys(crate::SysCall::DelayMs).ret();

        assert_eq!(
            asm.finish().instructions().unwrap(),
            vec![
                Instruction::LitU8(200),
                Instruction::Sys(0x22),
                Instruction::Ret
            ]
        );
    }

    #[test]
    fn test_disassemble() {
        assert_eq!(lit42().disassemble(), "LIT 42\nRET");

        let broken = Program::from(vec![0x51, 0x00, 0x01]);
        assert!(broken.instructions().is_err());
        assert!(broken.disassemble().starts_with("510001"));
    }

    #[test]
    fn test_reuse_shares_bytes() {
        let program = lit42();
        let a = program.bytes();
        let b = program.bytes();

        assert_eq!(a.as_ptr(), b.as_ptr());
    }
}
