use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use chip8_core::constants::PROGRAM_START;
use chip8_core::disassemble;

/// Prints a listing of every word in the ROM at `path`
pub fn disasm(path: &Path) -> anyhow::Result<()> {
    let rom = fs::read(path).with_context(|| format!("unable to read ROM {}", path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in listing(&rom) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// One `address  opcode  mnemonic` line per word, as laid out once loaded.
///
/// Sprite data is decoded as if it were code, there's no telling them apart statically.
pub fn listing(rom: &[u8]) -> Vec<String> {
    rom.chunks(2)
        .enumerate()
        .map(|(index, word)| {
            let addr = PROGRAM_START as usize + index * 2;
            match *word {
                [high, low] => {
                    let op = u16::from_be_bytes([high, low]);
                    format!("{:03X}  {:04X}  {}", addr, op, disassemble(op))
                }
                _ => format!("{:03X}  {:02X}    DB {:#04X}", addr, word[0], word[0]),
            }
        })
        .collect()
}
