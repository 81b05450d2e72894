mod automaton;
mod decode;
mod table;

pub use automaton::AutomatonCmd;
pub use decode::{parse_word, DecodeCmd, OutputFormat};
pub use table::TableCmd;

use anyhow::Result;
use clap::Subcommand;

// Enum defining the available subcommands of `or1k-dis`.
#[derive(Subcommand)]
pub enum Commands {
    /// Decode instruction words
    Decode(DecodeCmd),
    /// List the opcode table
    Table(TableCmd),
    /// Show the decode automaton
    Automaton(AutomatonCmd),
}

impl Commands {
    pub fn run(&self) -> Result<()> {
        match self {
            Commands::Decode(cmd) => cmd.run(),
            Commands::Table(cmd) => cmd.run(),
            Commands::Automaton(cmd) => cmd.run(),
        }
    }
}
