//! Per-letter operand field properties
//!
//! Each field letter used by the opcode table is resolved once, before the automaton is
//! built: whether its value is signed, and how many bits it spans. The width is taken from
//! the first opcode using the letter. Signed fields must keep that width in every opcode,
//! because it determines where sign extension starts; unsigned fields may vary.

use std::collections::BTreeMap;

use crate::{
    error::BuildError,
    opcode_table::{OpcodeIndex, OpcodeSpec},
    template::Template,
};

/// Field letters whose value is a two's complement number
pub const SIGNED_LETTERS: &[char] = &['I', 'N'];

pub fn is_signed(letter: char) -> bool {
    SIGNED_LETTERS.contains(&letter)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterInfo {
    pub signed: bool,
    pub width: u8,
    /// Opcode the width was taken from
    pub first_opcode: OpcodeIndex,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterTable {
    letters: BTreeMap<char, LetterInfo>,
}

impl LetterTable {
    pub fn build(specs: &[OpcodeSpec], templates: &[Template]) -> Result<Self, BuildError> {
        let mut letters: BTreeMap<char, LetterInfo> = BTreeMap::new();

        for (index, template) in templates.iter().enumerate() {
            for letter in template.letters() {
                let width = template.letter_width(letter);
                match letters.get(&letter) {
                    None => {
                        letters.insert(
                            letter,
                            LetterInfo { signed: is_signed(letter), width, first_opcode: index },
                        );
                    }
                    Some(info) if info.signed && info.width != width => {
                        return Err(BuildError::InconsistentLetterWidth {
                            letter,
                            first_opcode: specs[info.first_opcode].name,
                            first_width: info.width,
                            opcode: specs[index].name,
                            width,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(Self { letters })
    }

    pub fn get(&self, letter: char) -> Option<&LetterInfo> {
        self.letters.get(&letter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &LetterInfo)> {
        self.letters.iter().map(|(&letter, info)| (letter, info))
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}
