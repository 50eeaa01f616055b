/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Where ROMs are loaded and execution begins
/// 0x000 - 0x1FF is reserved for the interpreter (and its sprite sheet)
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between PROGRAM_START and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Maximum depth of nested subroutine calls
pub const STACK_SIZE: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// Default instruction rate in Hz
pub const CLOCK_SPEED: u32 = 540;

/// Rate in Hz at which the delay and sound timers should be ticked
pub const TIMER_RATE: u32 = 60;

/// The number of previous states that are kept for rewinding
pub const MAX_SAVED_STATES: usize = 600;

/// Address of the first byte of the sprite sheet
pub const SPRITE_SHEET_START: u16 = 0x000;

/// Height in bytes (rows) of a single hex digit sprite
pub const SPRITE_HEIGHT: u16 = 5;

/// # Sprite Sheet
/// Sprites for the hexadecimal digits 0..F, stored in the reserved low memory.
/// Each digit is 4 pixels wide and 5 pixels tall; only the high nibble of each row is used.
///
/// ```text
/// "0"       bin       hex
/// ****    11110000    0xF0
/// *  *    10010000    0x90
/// *  *    10010000    0x90
/// *  *    10010000    0x90
/// ****    11110000    0xF0
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
