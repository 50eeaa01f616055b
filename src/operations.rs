use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_HEIGHT, SPRITE_SHEET_START};
use crate::error::Fault;
use crate::state::{Keys, State};

/// PC = PC + 2, or PC + 4 if `skip`
fn skip_if(state: &State, skip: bool) -> State {
    let pc = if skip { state.pc + 0x4 } else { state.pc + 0x2 };
    State { pc, ..*state }
}

/// Does nothing but move on to the next instruction
pub fn nop(state: &State) -> State {
    State {
        pc: state.pc + 0x2,
        ..*state
    }
}

/// clear
pub fn cls(state: &State) -> State {
    State {
        pc: state.pc + 0x2,
        frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    }
}

/// PC = STACK.pop()
pub fn ret(state: &State) -> Result<State, Fault> {
    let mut stack = state.stack;
    let pc = stack.pop()?;
    Ok(State { pc, stack, ..*state })
}

/// PC = addr
pub fn jp(state: &State, addr: u16) -> State {
    State { pc: addr, ..*state }
}

/// STACK.push(PC + 2); PC = addr
pub fn call(state: &State, addr: u16) -> Result<State, Fault> {
    let mut stack = state.stack;
    stack.push(state.pc + 0x2)?;
    Ok(State {
        pc: addr,
        stack,
        ..*state
    })
}

/// if Vx == kk then pc += 2
pub fn se_byte(state: &State, x: u8, kk: u8) -> State {
    skip_if(state, state.v[x as usize] == kk)
}

/// if Vx != kk then pc += 2
pub fn sne_byte(state: &State, x: u8, kk: u8) -> State {
    skip_if(state, state.v[x as usize] != kk)
}

/// if Vx == Vy then pc += 2
pub fn se_reg(state: &State, x: u8, y: u8) -> State {
    skip_if(state, state.v[x as usize] == state.v[y as usize])
}

/// if Vx != Vy then pc += 2
pub fn sne_reg(state: &State, x: u8, y: u8) -> State {
    skip_if(state, state.v[x as usize] != state.v[y as usize])
}

/// Vx = kk
pub fn ld_byte(state: &State, x: u8, kk: u8) -> State {
    let mut v = state.v;
    v[x as usize] = kk;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it, VF is left alone
pub fn add_byte(state: &State, x: u8, kk: u8) -> State {
    let mut v = state.v;
    v[x as usize] = v[x as usize].wrapping_add(kk);
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx = Vy
pub fn ld_reg(state: &State, x: u8, y: u8) -> State {
    let mut v = state.v;
    v[x as usize] = v[y as usize];
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx |= Vy
pub fn or(state: &State, x: u8, y: u8) -> State {
    let mut v = state.v;
    v[x as usize] |= v[y as usize];
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx &= Vy
pub fn and(state: &State, x: u8, y: u8) -> State {
    let mut v = state.v;
    v[x as usize] &= v[y as usize];
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx ^= Vy
pub fn xor(state: &State, x: u8, y: u8) -> State {
    let mut v = state.v;
    v[x as usize] ^= v[y as usize];
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

// The arithmetic below always writes VF after Vx, so when VF is the
// destination it ends up holding the flag.

/// Vx += Vy; VF = overflow
pub fn add_reg(state: &State, x: u8, y: u8) -> State {
    let (res, over) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    let mut v = state.v;
    v[x as usize] = res;
    v[0xF] = over as u8;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &State, x: u8, y: u8) -> State {
    let (res, under) = state.v[x as usize].overflowing_sub(state.v[y as usize]);
    let mut v = state.v;
    v[x as usize] = res;
    v[0xF] = !under as u8;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &State, x: u8, y: u8) -> State {
    let (res, under) = state.v[y as usize].overflowing_sub(state.v[x as usize]);
    let mut v = state.v;
    v[x as usize] = res;
    v[0xF] = !under as u8;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(state: &State, x: u8) -> State {
    let mut v = state.v;
    let lsb = v[x as usize] & 0x1;
    v[x as usize] >>= 1;
    v[0xF] = lsb;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(state: &State, x: u8) -> State {
    let mut v = state.v;
    let msb = v[x as usize] >> 7;
    v[x as usize] <<= 1;
    v[0xF] = msb;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// I = addr
pub fn ld_i(state: &State, addr: u16) -> State {
    State {
        pc: state.pc + 0x2,
        i: addr,
        ..*state
    }
}

/// PC = V0 + addr
pub fn jp_v0(state: &State, addr: u16) -> State {
    State {
        pc: addr + u16::from(state.v[0x0]),
        ..*state
    }
}

/// Vx = rand_byte & kk
pub fn rnd(state: &State, x: u8, kk: u8) -> State {
    let rand_byte: u8 = rand::random();
    let mut v = state.v;
    v[x as usize] = rand_byte & kk;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
pub fn drw(state: &State, x: u8, y: u8, n: u8) -> Result<State, Fault> {
    let sprite = state.memory.read(state.i, n as usize)?;
    let origin_x = state.v[x as usize] as usize;
    let origin_y = state.v[y as usize] as usize;

    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;
    let mut collision = 0x0;

    for (row, byte) in sprite.iter().enumerate() {
        let py = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel_value = (byte >> (7 - bit)) & 0x1;
            collision |= pixel_value & frame_buffer[py][px];
            frame_buffer[py][px] ^= pixel_value;
        }
    }
    v[0xF] = collision;

    Ok(State {
        pc: state.pc + 0x2,
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// Only the low nibble of Vx names a key
fn key_in(state: &State, x: u8, pressed_keys: &Keys) -> bool {
    pressed_keys[(state.v[x as usize] & 0xF) as usize]
}

/// if Vx.pressed then pc += 2
pub fn skp(state: &State, x: u8, pressed_keys: &Keys) -> State {
    skip_if(state, key_in(state, x, pressed_keys))
}

/// if !Vx.pressed then pc += 2
pub fn sknp(state: &State, x: u8, pressed_keys: &Keys) -> State {
    skip_if(state, !key_in(state, x, pressed_keys))
}

/// Vx = DT
pub fn ld_from_dt(state: &State, x: u8) -> State {
    let mut v = state.v;
    v[x as usize] = state.delay_timer;
    State {
        pc: state.pc + 0x2,
        v,
        ..*state
    }
}

/// await keypress for Vx
/// While no key is pressed the state is returned untouched so that this instruction runs again.
/// Otherwise Vx = the lowest pressed key.
pub fn ld_key(state: &State, x: u8, pressed_keys: &Keys) -> State {
    match pressed_keys.iter().position(|&pressed| pressed) {
        Some(key) => {
            let mut v = state.v;
            v[x as usize] = key as u8;
            State {
                pc: state.pc + 0x2,
                v,
                ..*state
            }
        }
        None => *state,
    }
}

/// DT = Vx
pub fn ld_dt(state: &State, x: u8) -> State {
    State {
        pc: state.pc + 0x2,
        delay_timer: state.v[x as usize],
        ..*state
    }
}

/// ST = Vx
pub fn ld_st(state: &State, x: u8) -> State {
    State {
        pc: state.pc + 0x2,
        sound_timer: state.v[x as usize],
        ..*state
    }
}

/// I += Vx
/// VF is left alone. I saturates at 0xFFFF instead of wrapping back into the font, so an I
/// past the end of memory faults on its next use.
pub fn add_i(state: &State, x: u8) -> State {
    State {
        pc: state.pc + 0x2,
        i: state.i.saturating_add(u16::from(state.v[x as usize])),
        ..*state
    }
}

/// I = sprite_address(Vx)
/// Set I to the memory address of the sprite for the digit in the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ld_font(state: &State, x: u8) -> State {
    let digit = u16::from(state.v[x as usize] & 0xF);
    State {
        pc: state.pc + 0x2,
        i: SPRITE_SHEET_START + digit * SPRITE_HEIGHT,
        ..*state
    }
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn ld_bcd(state: &State, x: u8) -> Result<State, Fault> {
    let value = state.v[x as usize];
    let bcd = [value / 100, value / 10 % 10, value % 10];
    let mut memory = state.memory;
    memory.write(state.i, &bcd)?;
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// mem[I..=I+x] = V0..=Vx
/// Fill memory starting at address i with V0..=Vx; I is left alone
pub fn ld_store(state: &State, x: u8) -> Result<State, Fault> {
    let mut memory = state.memory;
    memory.write(state.i, &state.v[..=x as usize])?;
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// V0..=Vx = mem[I..=I+x]
/// Fill V0..=Vx with memory starting at address i; I is left alone
pub fn ld_read(state: &State, x: u8) -> Result<State, Fault> {
    let mut v = state.v;
    v[..=x as usize].copy_from_slice(state.memory.read(state.i, x as usize + 1)?);
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn lit_pixels(state: &State) -> usize {
        state
            .frame_buffer
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&pixel| pixel == 1)
            .count()
    }

    #[test]
    fn test_drw_wraps_horizontally() {
        let mut state = State::new();
        state.memory.write(0x300, &[0xFF]).unwrap();
        state.i = 0x300;
        state.v[0x0] = 60;
        let state = drw(&state, 0x0, 0x1, 1).unwrap();
        assert_eq!(state.frame_buffer[0][60..64], [1, 1, 1, 1]);
        assert_eq!(state.frame_buffer[0][0..4], [1, 1, 1, 1]);
        assert_eq!(state.frame_buffer[0][4], 0);
    }

    #[test]
    fn test_drw_wraps_vertically() {
        let mut state = State::new();
        state.memory.write(0x300, &[0x80, 0x80, 0x80]).unwrap();
        state.i = 0x300;
        state.v[0x1] = 31;
        let state = drw(&state, 0x0, 0x1, 3).unwrap();
        assert_eq!(state.frame_buffer[31][0], 1);
        assert_eq!(state.frame_buffer[0][0], 1);
        assert_eq!(state.frame_buffer[1][0], 1);
        assert_eq!(lit_pixels(&state), 3);
    }

    #[test]
    fn test_drw_wraps_start_coordinates() {
        let mut state = State::new();
        state.v[0x0] = 64 + 2;
        state.v[0x1] = 32 + 1;
        // the "0" digit's first row is 1111
        let state = drw(&state, 0x0, 0x1, 1).unwrap();
        assert_eq!(state.frame_buffer[1][2..6], [1, 1, 1, 1]);
    }

    #[test]
    fn test_drw_past_end_of_memory_faults() {
        let mut state = State::new();
        state.i = 0xFFD;
        assert_eq!(
            drw(&state, 0x0, 0x0, 5),
            Err(Fault::MemoryOutOfBounds { address: 0x1000 })
        );
    }

    #[test]
    fn test_drw_zero_rows_clears_collision() {
        let mut state = State::new();
        state.v[0xF] = 0x1;
        let state = drw(&state, 0x0, 0x0, 0).unwrap();
        assert_eq!(state.v[0xF], 0x0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_ld_key_waits_without_keys() {
        let state = State::new();
        assert_eq!(ld_key(&state, 0x3, &[false; 16]), state);
    }

    #[test]
    fn test_ld_key_takes_lowest_pressed_key() {
        let state = State::new();
        let mut keys = [false; 16];
        keys[0x9] = true;
        keys[0x4] = true;
        let state = ld_key(&state, 0x3, &keys);
        assert_eq!(state.v[0x3], 0x4);
        assert_eq!(state.pc, 0x202);
    }

    #[test]
    fn test_ld_font_uses_low_nibble() {
        let mut state = State::new();
        state.v[0x2] = 0x1B;
        let state = ld_font(&state, 0x2);
        assert_eq!(state.i, 0xB * 5);
    }

    #[test]
    fn test_ld_store_past_end_of_memory_faults_without_writing() {
        let mut state = State::new();
        state.i = 0xFFE;
        state.v[0x0..0x3].copy_from_slice(&[0x1, 0x2, 0x3]);
        assert_eq!(
            ld_store(&state, 0x2),
            Err(Fault::MemoryOutOfBounds { address: 0x1000 })
        );
        assert_eq!(state.memory.read(0xFFE, 2).unwrap(), &[0x0, 0x0]);
    }

    #[quickcheck]
    fn prop_drw_twice_restores_frame(vx: u8, vy: u8, digit: u8, rows: u8) -> bool {
        let mut state = State::new();
        state.v[0x1] = vx;
        state.v[0x2] = vy;
        state.i = u16::from(digit & 0xF) * SPRITE_HEIGHT;
        let n = rows % 16;
        let once = drw(&state, 0x1, 0x2, n).unwrap();
        let twice = drw(&once, 0x1, 0x2, n).unwrap();
        let drew_something = lit_pixels(&once) > 0;
        twice.frame_buffer == state.frame_buffer
            && once.v[0xF] == 0x0
            && twice.v[0xF] == drew_something as u8
    }

    #[quickcheck]
    fn prop_ld_bcd_digits_rebuild_value(value: u8) -> bool {
        let mut state = State::new();
        state.v[0x5] = value;
        state.i = 0x300;
        let state = ld_bcd(&state, 0x5).unwrap();
        let digits = state.memory.read(0x300, 3).unwrap();
        digits.iter().all(|&digit| digit < 10)
            && u16::from(digits[0]) * 100 + u16::from(digits[1]) * 10 + u16::from(digits[2])
                == u16::from(value)
    }
}
