use std::fmt;

use crate::error::Fault;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::{Keys, State};

/// # Instructions
/// A decoded Chip-8 opcode along with the operands it carries.
///
/// Register operands (`x`, `y`) are register indices 0x0..=0xF, not register values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: machine code routine on the COSMAC VIP, ignored here
    Sys(u16),
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SeByte { x: u8, kk: u8 },
    /// 4xkk
    SneByte { x: u8, kk: u8 },
    /// 5xy0
    SeReg { x: u8, y: u8 },
    /// 6xkk
    LdByte { x: u8, kk: u8 },
    /// 7xkk
    AddByte { x: u8, kk: u8 },
    /// 8xy0
    LdReg { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    Shr { x: u8 },
    /// 8xy7
    Subn { x: u8, y: u8 },
    /// 8xyE
    Shl { x: u8 },
    /// 9xy0
    SneReg { x: u8, y: u8 },
    /// Annn
    LdI(u16),
    /// Bnnn
    JpV0(u16),
    /// Cxkk
    Rnd { x: u8, kk: u8 },
    /// Dxyn
    Drw { x: u8, y: u8, n: u8 },
    /// Ex9E
    Skp { x: u8 },
    /// ExA1
    Sknp { x: u8 },
    /// Fx07
    LdFromDt { x: u8 },
    /// Fx0A
    LdKey { x: u8 },
    /// Fx15
    LdDt { x: u8 },
    /// Fx18
    LdSt { x: u8 },
    /// Fx1E
    AddI { x: u8 },
    /// Fx29
    LdFont { x: u8 },
    /// Fx33
    LdBcd { x: u8 },
    /// Fx55
    LdStore { x: u8 },
    /// Fx65
    LdRead { x: u8 },
    /// Anything else; executes as a no-op
    Unknown(u16),
}

impl Instruction {
    /// Selects the correct Instruction for a given Opcode.
    ///
    /// Decoding is cased first on the most significant nibble and then, for the families that
    /// share one, on the least significant nibble or byte.
    pub fn decode(op: u16) -> Self {
        use Instruction::*;

        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
        match op.nibbles().0 {
            0x0 => match op {
                0x00E0 => Cls,
                0x00EE => Ret,
                _ => Sys(addr),
            },
            0x1 => Jp(addr),
            0x2 => Call(addr),
            0x3 => SeByte { x, kk },
            0x4 => SneByte { x, kk },
            0x5 if n == 0x0 => SeReg { x, y },
            0x6 => LdByte { x, kk },
            0x7 => AddByte { x, kk },
            0x8 => match n {
                0x0 => LdReg { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => AddReg { x, y },
                0x5 => Sub { x, y },
                0x6 => Shr { x },
                0x7 => Subn { x, y },
                0xE => Shl { x },
                _ => Unknown(op),
            },
            0x9 if n == 0x0 => SneReg { x, y },
            0xA => LdI(addr),
            0xB => JpV0(addr),
            0xC => Rnd { x, kk },
            0xD => Drw { x, y, n },
            0xE => match kk {
                0x9E => Skp { x },
                0xA1 => Sknp { x },
                _ => Unknown(op),
            },
            0xF => match kk {
                0x07 => LdFromDt { x },
                0x0A => LdKey { x },
                0x15 => LdDt { x },
                0x18 => LdSt { x },
                0x1E => AddI { x },
                0x29 => LdFont { x },
                0x33 => LdBcd { x },
                0x55 => LdStore { x },
                0x65 => LdRead { x },
                _ => Unknown(op),
            },
            _ => Unknown(op),
        }
    }

    /// Applies the Instruction to `state`, returning the state that follows it.
    ///
    /// On error `state` is untouched; nothing is partially applied.
    pub fn execute(&self, state: &State, pressed_keys: &Keys) -> Result<State, Fault> {
        use Instruction::*;

        Ok(match *self {
            Sys(_) | Unknown(_) => nop(state),
            Cls => cls(state),
            Ret => ret(state)?,
            Jp(addr) => jp(state, addr),
            Call(addr) => call(state, addr)?,
            SeByte { x, kk } => se_byte(state, x, kk),
            SneByte { x, kk } => sne_byte(state, x, kk),
            SeReg { x, y } => se_reg(state, x, y),
            LdByte { x, kk } => ld_byte(state, x, kk),
            AddByte { x, kk } => add_byte(state, x, kk),
            LdReg { x, y } => ld_reg(state, x, y),
            Or { x, y } => or(state, x, y),
            And { x, y } => and(state, x, y),
            Xor { x, y } => xor(state, x, y),
            AddReg { x, y } => add_reg(state, x, y),
            Sub { x, y } => sub(state, x, y),
            Shr { x } => shr(state, x),
            Subn { x, y } => subn(state, x, y),
            Shl { x } => shl(state, x),
            SneReg { x, y } => sne_reg(state, x, y),
            LdI(addr) => ld_i(state, addr),
            JpV0(addr) => jp_v0(state, addr),
            Rnd { x, kk } => rnd(state, x, kk),
            Drw { x, y, n } => drw(state, x, y, n)?,
            Skp { x } => skp(state, x, pressed_keys),
            Sknp { x } => sknp(state, x, pressed_keys),
            LdFromDt { x } => ld_from_dt(state, x),
            LdKey { x } => ld_key(state, x, pressed_keys),
            LdDt { x } => ld_dt(state, x),
            LdSt { x } => ld_st(state, x),
            AddI { x } => add_i(state, x),
            LdFont { x } => ld_font(state, x),
            LdBcd { x } => ld_bcd(state, x)?,
            LdStore { x } => ld_store(state, x)?,
            LdRead { x } => ld_read(state, x)?,
        })
    }
}

/// Canonical mnemonics, e.g. `ADD V1, V2` or `JP 0x208`
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys(addr) => write!(f, "SYS {:#05X}", addr),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp(addr) => write!(f, "JP {:#05X}", addr),
            Call(addr) => write!(f, "CALL {:#05X}", addr),
            SeByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SneByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x } => write!(f, "SHR V{:X}", x),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x } => write!(f, "SHL V{:X}", x),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI(addr) => write!(f, "LD I, {:#05X}", addr),
            JpV0(addr) => write!(f, "JP V0, {:#05X}", addr),
            Rnd { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdFromDt { x } => write!(f, "LD V{:X}, DT", x),
            LdKey { x } => write!(f, "LD V{:X}, K", x),
            LdDt { x } => write!(f, "LD DT, V{:X}", x),
            LdSt { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LdFont { x } => write!(f, "LD F, V{:X}", x),
            LdBcd { x } => write!(f, "LD B, V{:X}", x),
            LdStore { x } => write!(f, "LD [I], V{:X}", x),
            LdRead { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(op) => write!(f, "DW {:#06X}", op),
        }
    }
}

/// Disassembles a single opcode into its mnemonic
pub fn disassemble(op: u16) -> String {
    Instruction::decode(op).to_string()
}
