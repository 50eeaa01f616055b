/// Field extraction for raw 16-bit instruction words.
///
/// An instruction is read from memory high byte first. Taken as four nibbles `[o x y n]`:
/// - `o` picks the instruction family
/// - `n` or `kk` picks the instruction within the `0x0`, `0x8`, `0xE` and `0xF` families
/// - `x` and `y` name registers, `kk` is an 8-bit immediate, `nnn` a 12-bit address
///
/// Which of these fields an instruction actually reads is up to its decoding.
pub trait Opcode {
    /// All four nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// Register index in bits 8..12.
    fn x(&self) -> u8;

    /// Register index in bits 4..8.
    fn y(&self) -> u8;

    /// Low nibble; a sprite height for `DRW`, a sub-operation for the `0x8` family.
    fn n(&self) -> u8;

    /// Low byte, used as an immediate.
    fn kk(&self) -> u8;

    /// Low 12 bits, used as a memory address.
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (((self & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}
