//! Ready-made programs for bring-up and smoke tests

use crate::assembler::Assembler;
use crate::program::Program;
use crate::syscall::{SysCall, gpio};

/// `LIT 42; RET`
pub fn lit42() -> Program {
    let mut asm = Assembler::new();
    asm.lit(42).ret();
    asm.finish()
}

/// `10 + 20`
pub fn add() -> Program {
    let mut asm = Assembler::new();
    asm.lit(10).lit(20).add().ret();
    asm.finish()
}

/// `7 * 6`
pub fn mul() -> Program {
    let mut asm = Assembler::new();
    asm.lit(7).lit(6).mul().ret();
    asm.finish()
}

/// `LIT_U8 42; RET`
pub fn compact() -> Program {
    let mut asm = Assembler::new();
    asm.lit_u8(42).ret();
    asm.finish()
}

/// `5 + 10` with one-byte literals
pub fn compact_add() -> Program {
    let mut asm = Assembler::new();
    asm.lit_u8(5).lit_u8(10).add().ret();
    asm.finish()
}

/// `count` delays of `delay_ms` each
pub fn delays(count: usize, delay_ms: i32) -> Program {
    let mut asm = Assembler::new();
    for _ in 0..count {
        delay(&mut asm, delay_ms);
    }
    asm.ret();
    asm.finish()
}

/// Configure `pin` as output and drive it high
pub fn led_on(pin: u8) -> Program {
    let mut asm = Assembler::new();
    gpio_init(&mut asm, pin);
    gpio_write(&mut asm, pin, gpio::HIGH);
    asm.ret();
    asm.finish()
}

/// Configure `pin` as output and drive it low
pub fn led_off(pin: u8) -> Program {
    let mut asm = Assembler::new();
    gpio_init(&mut asm, pin);
    gpio_write(&mut asm, pin, gpio::LOW);
    asm.ret();
    asm.finish()
}

/// Blink `pin` `times` times, `delay_ms` on and `delay_ms` off
pub fn blink(pin: u8, times: usize, delay_ms: i32) -> Program {
    let mut asm = Assembler::new();
    gpio_init(&mut asm, pin);

    for _ in 0..times {
        gpio_write(&mut asm, pin, gpio::HIGH);
        delay(&mut asm, delay_ms);
        gpio_write(&mut asm, pin, gpio::LOW);
        delay(&mut asm, delay_ms);
    }

    asm.ret();
    asm.finish()
}

/// Morse SOS on `pin` (dot 100ms, dash 300ms)
pub fn sos(pin: u8) -> Program {
    const DOT: i32 = 100;
    const DASH: i32 = 300;
    const GAP: i32 = 100;

    let mut asm = Assembler::new();
    gpio_init(&mut asm, pin);

    for symbol in [DOT, DOT, DOT, DASH, DASH, DASH, DOT, DOT, DOT] {
        gpio_write(&mut asm, pin, gpio::HIGH);
        delay(&mut asm, symbol);
        gpio_write(&mut asm, pin, gpio::LOW);
        delay(&mut asm, GAP);
    }

    asm.ret();
    asm.finish()
}

fn gpio_init(asm: &mut Assembler, pin: u8) {
    asm.lit_u8(pin)
        .lit_u8(gpio::MODE_OUTPUT)
        .sys(SysCall::GpioInit)
        .drop_top();
}

fn gpio_write(asm: &mut Assembler, pin: u8, level: u8) {
    asm.lit_u8(pin)
        .lit_u8(level)
        .sys(SysCall::GpioWrite)
        .drop_top();
}

fn delay(asm: &mut Assembler, ms: i32) {
    asm.lit_auto(ms).sys(SysCall::DelayMs);
}
