use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// `RomTooLarge` and `InvalidKey` are reported to the caller and leave the machine untouched.
/// The rest are runtime faults; once one is raised the machine halts until the next load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("stack overflow: more than {depth} nested subroutine calls")]
    StackOverflow { depth: usize },

    #[error("stack underflow: returned from a subroutine with an empty call stack")]
    StackUnderflow,

    #[error("key {0:#04X} is not on the keypad (expected 0x0..=0xF)")]
    InvalidKey(u8),

    #[error("machine is halted: {0}")]
    Halted(Box<Fault>),
}
