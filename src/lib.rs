//! A CHIP-8 virtual machine.
//!
//! [`Chip8`] (also exported as [`Machine`]) owns the whole machine and is driven by its host one
//! instruction (`step`) and one timer tick (`tick_timers`) at a time.

pub use chip8::Chip8;
pub use chip8::Chip8 as Machine;
pub use constants::{CLOCK_SPEED, TIMER_RATE};
pub use error::Fault;
pub use instruction::{disassemble, Instruction};
pub use opcode::Opcode;

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
pub mod state;
