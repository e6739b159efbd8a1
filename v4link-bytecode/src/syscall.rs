//! System call identifiers and HAL constants

use std::fmt;

/// System calls dispatched by the `SYS` opcode
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SysCall {
    /// (pin, mode → err)
    GpioInit = 0x00,

    /// (pin, value → err)
    GpioWrite = 0x01,

    /// (ms → )
    DelayMs = 0x22,
}

impl SysCall {
    pub fn name(self) -> &'static str {
        match self {
            Self::GpioInit => "GPIO_INIT",
            Self::GpioWrite => "GPIO_WRITE",
            Self::DelayMs => "DELAY_MS",
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0x00 => Some(Self::GpioInit),
            0x01 => Some(Self::GpioWrite),
            0x22 => Some(Self::DelayMs),
            _ => None,
        }
    }
}

impl From<SysCall> for u8 {
    fn from(call: SysCall) -> u8 {
        call as u8
    }
}

impl fmt::Display for SysCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// GPIO arguments understood by the device HAL
pub mod gpio {
    /// Output mode for `GPIO_INIT`
    pub const MODE_OUTPUT: u8 = 3;

    pub const LOW: u8 = 0;
    pub const HIGH: u8 = 1;

    /// On-board LED of the NanoC6 board
    pub const NANOC6_LED: u8 = 7;
}
