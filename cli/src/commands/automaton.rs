use std::io::{self, Write};

use anyhow::Result;
use itertools::Itertools;
use or1k_decode::{or1k, DecodeTables, Node};

// Structure representing the 'automaton' subcommand.
#[derive(clap::Args)]
#[command(about, long_about = None)]
pub struct AutomatonCmd {
    /// Dump the flat word form, eight words per line
    #[clap(long)]
    flat: bool,
}

impl AutomatonCmd {
    pub fn run(&self) -> Result<()> {
        let tables = or1k();
        let stdout = io::stdout();
        let mut out = stdout.lock();

        if self.flat {
            for chunk in &tables.automaton().serialize().into_iter().chunks(8) {
                writeln!(out, "{}", chunk.map(|word| format!("{word:08x}")).join(" "))?;
            }
        } else {
            for line in stats(tables) {
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    }
}

fn stats(tables: &DecodeTables) -> Vec<String> {
    let automaton = tables.automaton();
    let (mut branches, mut leaves, mut edges) = (0usize, 0usize, 0usize);
    for node in automaton.nodes() {
        match node {
            Node::Branch(branch) => {
                branches += 1;
                edges += branch.fanout();
            }
            Node::Leaf(_) => leaves += 1,
            Node::Invalid => {}
        }
    }

    vec![
        format!("opcodes:    {}", tables.len()),
        format!("letters:    {}", tables.letters().iter().map(|(letter, _)| letter).join("")),
        format!("branches:   {branches}"),
        format!("leaves:     {leaves}"),
        format!("edges:      {edges}"),
        format!("depth:      {}", automaton.depth()),
        format!("flat words: {}", automaton.serialize().len()),
    ]
}
