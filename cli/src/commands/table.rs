use std::io::{self, Write};

use anyhow::Result;
use itertools::Itertools;
use or1k_decode::{or1k, DecodeTables};

use super::decode::flag_names;

// Structure representing the 'table' subcommand.
#[derive(clap::Args)]
#[command(about, long_about = None)]
pub struct TableCmd {
    /// Only list opcodes whose mnemonic starts with this prefix
    #[clap(short, long)]
    prefix: Option<String>,

    /// Also list field letters and their widths
    #[clap(long)]
    letters: bool,
}

impl TableCmd {
    pub fn run(&self) -> Result<()> {
        let tables = or1k();
        let stdout = io::stdout();
        let mut out = stdout.lock();

        for line in self.lines(tables) {
            writeln!(out, "{line}")?;
        }
        if self.letters {
            writeln!(out)?;
            for (letter, info) in tables.letters().iter() {
                writeln!(
                    out,
                    "{letter}  {:>2} bits  {:<8}  first used by {}",
                    info.width,
                    if info.signed { "signed" } else { "unsigned" },
                    tables.spec(info.first_opcode).map_or("?", |spec| spec.name)
                )?;
            }
        }
        Ok(())
    }

    fn lines<'a>(&'a self, tables: &'a DecodeTables) -> impl Iterator<Item = String> + 'a {
        tables
            .specs()
            .iter()
            .enumerate()
            .filter(|(_, spec)| self.prefix.as_deref().is_none_or(|p| spec.name.starts_with(p)))
            .map(|(index, spec)| {
                let field = tables.field_mask(index).unwrap_or_default();
                let missing_handler = spec.handler.is_none().then_some("no-handler");
                format!(
                    "{index:>3}  {:<11} {:<14} mask={:#010x} value={:#010x}  {:<9} {}",
                    spec.name,
                    spec.syntax,
                    field.mask,
                    field.value,
                    spec.category.to_string(),
                    flag_names(spec.flags).chain(missing_handler).join(",")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_filter() {
        let cmd = TableCmd { prefix: Some("l.sf".into()), letters: false };
        let lines: Vec<String> = cmd.lines(or1k()).collect();
        // Ten immediate and ten register compares
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|line| line.contains("Compare")));
        assert!(lines[0].contains("l.sfeqi"));
        assert!(lines[0].contains("mask=0xffe00000 value=0xbc000000"));
    }
}
