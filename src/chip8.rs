use std::collections::VecDeque;

use log::{debug, error, trace, warn};

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, MAX_ROM_SIZE, MAX_SAVED_STATES, MEMORY_SIZE,
    PROGRAM_START,
};
use crate::error::Fault;
use crate::instruction::Instruction;
use crate::state::{FrameBuffer, Keys, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - `pressed_keys` with public interfaces for manipulating them
///  - the `fault` that halted it, if any
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing and reversing the CPU
/// - advancing its timers
/// - inspecting registers, memory and its frame buffer
///
/// The host owns the clock: `step` runs exactly one instruction and `tick_timers` decrements the
/// timers exactly once, so the host decides how many of each to run per frame.
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    pressed_keys: Keys,
    fault: Option<Fault>,
}

impl Chip8 {
    /// Creates a machine with zeroed registers, a blank display and the sprite sheet in memory
    pub fn power_up() -> Self {
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::with_capacity(MAX_SAVED_STATES),
            pressed_keys: [false; KEY_COUNT],
            fault: None,
        }
    }

    /// Load a rom into memory at `PROGRAM_START`
    /// - everything but the sprite sheet is reset first, including history and keys
    /// - a rom that doesn't fit is rejected without touching the current state
    ///
    /// # Arguments
    /// * `rom` the raw bytes of a program
    pub fn load(&mut self, rom: &[u8]) -> Result<(), Fault> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Fault::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }

        let mut state = State::new();
        state.memory.write(PROGRAM_START, rom)?;

        self.state = state;
        self.previous_states.clear();
        self.pressed_keys = [false; KEY_COUNT];
        self.fault = None;
        debug!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing the draw flag
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was pressed
    pub fn press_key(&mut self, key: u8) -> Result<(), Fault> {
        *self.key_mut(key)? = true;
        Ok(())
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was released
    pub fn release_key(&mut self, key: u8) -> Result<(), Fault> {
        *self.key_mut(key)? = false;
        Ok(())
    }

    fn key_mut(&mut self, key: u8) -> Result<&mut bool, Fault> {
        self.pressed_keys
            .get_mut(key as usize)
            .ok_or(Fault::InvalidKey(key))
    }

    /// Advances the CPU by a single cycle
    /// - gets, decodes and executes the next opcode
    /// - returns the executed instruction
    ///
    /// While waiting for a keypress this makes no progress, but still succeeds.
    ///
    /// A fault halts the machine: it is returned once as-is and every later call returns it
    /// wrapped in `Fault::Halted` until a new rom is loaded (or the fault is rewound).
    pub fn step(&mut self) -> Result<Instruction, Fault> {
        if let Some(fault) = &self.fault {
            return Err(Fault::Halted(Box::new(fault.clone())));
        }

        self.cycle().map_err(|fault| {
            error!("halting at pc {:#05X}: {}", self.state.pc, fault);
            self.fault = Some(fault.clone());
            fault
        })
    }

    fn cycle(&mut self) -> Result<Instruction, Fault> {
        let op = self.fetch()?;
        let instruction = Instruction::decode(op);
        trace!(
            "{:04X} {:<16} pc{:04X} i{:04X} v{:02X?}",
            op,
            instruction.to_string(),
            self.state.pc,
            self.state.i,
            self.state.v
        );
        if let Instruction::Sys(_) | Instruction::Unknown(_) = instruction {
            warn!("skipping opcode {:#06X} at {:#05X}", op, self.state.pc);
        }

        let next = instruction.execute(&self.state, &self.pressed_keys)?;
        // stalls (key waits, jumps to self) leave nothing to rewind
        if next != self.state {
            self.save_state();
        }
        self.state = next;
        Ok(instruction)
    }

    /// Decodes the instruction at the pc without executing it
    pub fn current_instruction(&self) -> Result<Instruction, Fault> {
        Ok(Instruction::decode(self.fetch()?))
    }

    /// Whether the next step will stall on `LD Vx, K` for lack of a pressed key
    pub fn awaiting_key(&self) -> bool {
        matches!(self.current_instruction(), Ok(Instruction::LdKey { .. }))
            && !self.pressed_keys.iter().any(|&pressed| pressed)
    }

    /// Reverses the CPU by a single cycle if possible
    /// - if there are previous_states, pops the last one and restores it
    /// - clears any fault, since the state that raised it is gone
    ///
    /// Returns whether a state was restored
    pub fn rewind(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = State {
                    draw_flag: true,
                    ..state
                };
                self.fault = None;
                debug!("rewound to pc {:#05X}", self.state.pc);
                true
            }
            None => false,
        }
    }

    /// Puts the current state in previous_states
    /// - if there are already MAX_SAVED_STATES saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.previous_states.len() == MAX_SAVED_STATES {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state);
    }

    /// Decrements the delay and sound timers once each, stopping at 0
    /// - a halted machine keeps its timers frozen until it's reloaded or rewound
    pub fn tick_timers(&mut self) {
        if self.fault.is_some() {
            return;
        }
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn fetch(&self) -> Result<u16, Fault> {
        self.state.memory.read_word(self.state.pc)
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn i(&self) -> u16 {
        self.state.i
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    /// Whether the host should be beeping
    pub fn buzzer_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// V0..VF
    pub fn registers(&self) -> &[u8; 16] {
        &self.state.v
    }

    /// Vx, or None if `x` isn't a register
    pub fn register(&self, x: u8) -> Option<u8> {
        self.state.v.get(x as usize).copied()
    }

    /// Return addresses of the subroutines currently being executed, oldest first
    pub fn stack(&self) -> &[u16] {
        self.state.stack.as_slice()
    }

    pub fn memory(&self) -> &[u8] {
        self.state.memory.as_slice()
    }

    pub fn memory_size(&self) -> usize {
        MEMORY_SIZE
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn display_width(&self) -> usize {
        DISPLAY_WIDTH
    }

    pub fn display_height(&self) -> usize {
        DISPLAY_HEIGHT
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.pressed_keys.get(key as usize).copied().unwrap_or(false)
    }

    /// The fault that halted the machine, if any
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::power_up()
    }
}
