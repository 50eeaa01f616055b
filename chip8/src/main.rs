use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod disasm;
mod keymap;
mod run;

/// Runs and inspects CHIP-8 ROMs from the terminal
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a ROM headlessly and print the final frame
    Run(run::Settings),
    /// Print a listing of a ROM
    Disasm {
        /// ROM image to list
        rom: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Run(settings) => run::run(&settings),
        Command::Disasm { rom } => disasm::disasm(&rom),
    }
}
