use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use clap::Args;
use log::{debug, info};

use chip8_core::{Fault, Instruction, Machine, CLOCK_SPEED, TIMER_RATE};
use display::Display;

use crate::keymap::keymap;

#[derive(Args, Debug)]
pub struct Settings {
    /// ROM image to load at 0x200
    pub rom: PathBuf,
    /// Instructions executed per second
    #[arg(long, default_value_t = CLOCK_SPEED, value_parser = clap::value_parser!(u32).range(1..))]
    pub clock_speed: u32,
    /// Timer decrements per second
    #[arg(long, default_value_t = TIMER_RATE, value_parser = clap::value_parser!(u32).range(1..))]
    pub timer_rate: u32,
    /// Stop after this many instructions
    #[arg(long, default_value_t = 10_000)]
    pub cycles: u64,
    /// Hold the clock speed instead of running as fast as possible
    #[arg(long)]
    pub realtime: bool,
    /// Keys held down for the whole run, e.g. "qe" (layout 1234/QWER/ASDF/ZXCV)
    #[arg(long, default_value = "")]
    pub hold: String,
    /// Step back this many instructions before printing the final frame
    #[arg(long, default_value_t = 0)]
    pub rewind: usize,
}

/// Why a run stopped
#[derive(Debug, PartialEq)]
enum Stop {
    CycleLimit,
    Spinning(u16),
    AwaitingKey,
    Faulted(Fault),
}

pub fn run(settings: &Settings) -> anyhow::Result<()> {
    let rom = fs::read(&settings.rom)
        .with_context(|| format!("unable to read ROM {}", settings.rom.display()))?;
    let held = held_keys(&settings.hold)?;

    let mut chip8 = Machine::power_up();
    chip8.load(&rom)?;
    info!("loaded {} ({} bytes)", settings.rom.display(), rom.len());
    for key in held {
        chip8.press_key(key)?;
    }

    let (stop, executed) = execute(&mut chip8, settings);
    info!("stopped after {} instructions: {:?}", executed, stop);

    for _ in 0..settings.rewind {
        if !chip8.rewind() {
            break;
        }
    }

    Display::default().render_to(&mut io::stdout().lock(), chip8.frame_buffer())?;

    match stop {
        Stop::Faulted(fault) => Err(fault.into()),
        _ => Ok(()),
    }
}

fn held_keys(hold: &str) -> anyhow::Result<Vec<u8>> {
    hold.chars()
        .map(|c| keymap(c).ok_or_else(|| anyhow!("{:?} isn't mapped to a keypad key", c)))
        .collect()
}

/// Steps the machine until it stops making progress, returning why it stopped and how many
/// instructions ran
fn execute(chip8: &mut Machine, settings: &Settings) -> (Stop, u64) {
    let cycle_time = Duration::from_secs_f64(1.0 / f64::from(settings.clock_speed));
    let cycles_per_tick = u64::from((settings.clock_speed / settings.timer_rate).max(1));
    let mut last_cycle = Instant::now();
    let mut buzzing = false;
    let mut executed = 0;

    let stop = loop {
        if executed == settings.cycles {
            break Stop::CycleLimit;
        }
        if chip8.awaiting_key() {
            break Stop::AwaitingKey;
        }

        let pc = chip8.pc();
        let instruction = match chip8.step() {
            Ok(instruction) => instruction,
            Err(fault) => break Stop::Faulted(fault),
        };
        executed += 1;

        if executed % cycles_per_tick == 0 {
            chip8.tick_timers();
        }
        if chip8.buzzer_active() != buzzing {
            buzzing = !buzzing;
            debug!("buzzer {}", if buzzing { "on" } else { "off" });
        }

        if instruction == Instruction::Jp(pc) {
            break Stop::Spinning(pc);
        }

        // Handle timing
        if settings.realtime {
            let current_time = Instant::now();
            let elapsed_cycle_time = current_time - last_cycle;
            if cycle_time > elapsed_cycle_time {
                std::thread::sleep(cycle_time - elapsed_cycle_time);
            }
            last_cycle = Instant::now();
        }
    };
    (stop, executed)
}
