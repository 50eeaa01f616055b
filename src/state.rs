use std::ops::Range;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET,
    SPRITE_SHEET_START, STACK_SIZE,
};
use crate::error::Fault;

/// The FrameBuffer is indexed as [y][x] and every cell holds either 0 or 1
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The pressed status of each key 0..F
pub type Keys = [bool; KEY_COUNT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is also the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - While the sound timer is non-zero the host should be beeping
///
/// ## Memory
/// - 16 level call stack of return addresses
/// - 4096 bytes of addressable memory
/// - 32x64 frame buffer
///     - stores the contents of the next frame to be drawn
///
/// States are small enough to copy, so every instruction builds a new one rather than
/// mutating in place. A fault raised partway through an instruction therefore never
/// leaves a half-applied state behind.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: Stack,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            delay_timer: 0,
            sound_timer: 0,
            stack: Stack::new(),
            memory: Memory::new(),
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// # Memory
/// 4096 bytes with the sprite sheet loaded into the reserved low addresses.
///
/// Every access is bounds checked; addresses never wrap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Memory([u8; MEMORY_SIZE]);

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = SPRITE_SHEET_START as usize;
        bytes[start..start + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory(bytes)
    }

    /// Resolves `len` bytes starting at `addr` to an index range.
    ///
    /// The reported address is the first one that falls outside of memory.
    fn range(addr: u16, len: usize) -> Result<Range<usize>, Fault> {
        let start = addr as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(Fault::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }

    pub fn read_byte(&self, addr: u16) -> Result<u8, Fault> {
        Ok(self.read(addr, 1)?[0])
    }

    /// Reads the big-endian word at `addr`
    pub fn read_word(&self, addr: u16) -> Result<u16, Fault> {
        let bytes = self.read(addr, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read(&self, addr: u16, len: usize) -> Result<&[u8], Fault> {
        Ok(&self.0[Self::range(addr, len)?])
    }

    pub fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), Fault> {
        let range = Self::range(addr, data.len())?;
        self.0[range].copy_from_slice(data);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// # Stack
/// Holds the return addresses of up to `STACK_SIZE` nested subroutine calls.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Stack {
    frames: [u16; STACK_SIZE],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            frames: [0; STACK_SIZE],
            sp: 0,
        }
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        if self.sp == STACK_SIZE {
            return Err(Fault::StackOverflow { depth: STACK_SIZE });
        }
        self.frames[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.frames[self.sp])
    }

    /// The number of return addresses currently on the stack
    pub fn depth(&self) -> usize {
        self.sp
    }

    /// The live return addresses, oldest first
    pub fn as_slice(&self) -> &[u16] {
        &self.frames[..self.sp]
    }
}
