use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use itertools::Itertools;
use or1k_decode::{or1k, DecodeTables};
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Address-free assembly text
    Text,
    /// Assembly text plus opcode index, category and flags
    Verbose,
}

// Structure representing the 'decode' subcommand.
#[derive(clap::Args)]
#[command(about, long_about = None)]
pub struct DecodeCmd {
    /// Instruction words in hex (`0x` prefix optional). Read from stdin when omitted.
    words: Vec<String>,

    #[clap(short, long, value_enum, default_value_t = OutputFormat::Text, env = "OR1K_DIS_FORMAT")]
    format: OutputFormat,
}

impl DecodeCmd {
    pub fn run(&self) -> Result<()> {
        let tables = or1k();
        let stdout = io::stdout();
        let mut out = stdout.lock();

        if !self.words.is_empty() {
            for word in &self.words {
                writeln!(out, "{}", render(tables, parse_word(word)?, self.format))?;
            }
            return Ok(());
        }

        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            for word in line.split_whitespace() {
                writeln!(out, "{}", render(tables, parse_word(word)?, self.format))?;
            }
        }
        Ok(())
    }
}

/// Parse a hex instruction word, with or without `0x`
pub fn parse_word(word: &str) -> Result<u32> {
    let digits = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")).unwrap_or(word);
    u32::from_str_radix(&digits.replace('_', ""), 16)
        .with_context(|| format!("Invalid instruction word `{word}`"))
}

fn render(tables: &DecodeTables, raw: u32, format: OutputFormat) -> String {
    let Some(disassembly) = tables.disassemble(raw) else {
        warn!("No opcode matches {raw:#010x}");
        return format!("{raw:08x}  <invalid>");
    };

    match format {
        OutputFormat::Text => format!("{raw:08x}  {disassembly}"),
        OutputFormat::Verbose => {
            let (category, flags) = tables
                .spec(disassembly.index)
                .map(|spec| (spec.category.to_string(), flag_names(spec.flags).join("|")))
                .unwrap_or_default();
            format!(
                "{raw:08x}  {:<28} #{:<3} {category:<9} {flags}",
                disassembly.to_string(),
                disassembly.index,
            )
        }
    }
}

pub(crate) fn flag_names(flags: u32) -> impl Iterator<Item = &'static str> {
    use or1k_decode::opcode_table::{DELAY_SLOT, READS_FLAG, WRITES_FLAG};

    [(DELAY_SLOT, "delay"), (READS_FLAG, "reads-flag"), (WRITES_FLAG, "writes-flag")]
        .into_iter()
        .filter(move |&(bit, _)| flags & bit != 0)
        .map(|(_, name)| name)
}
