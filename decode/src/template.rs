//! Bit-template parser
//!
//! A bit-template describes one opcode's encoding, most significant bit first:
//!
//! ```text
//! l.addi  "10 0x7  DDDDD AAAAA IIII IIII IIII IIII"
//!          ^^ ^^^  ^^^^^ ^^^^^ ^^^^^^^^^^^^^^^^^^^
//!          |  |    |     |     immediate field `I`
//!          |  |    |     register field `A`
//!          |  |    register field `D`
//!          |  hex nibble, four fixed bits
//!          two fixed bits
//! ```
//!
//! Words are separated by whitespace. A word written `0xH` is a nibble (four fixed bits).
//! In every other word each character stands for one bit: `0`/`1` fixed, `-` don't-care and
//! any ASCII letter an operand bit belonging to the field of that letter.
//!
//! Templates must cover all 32 bits; shorthand templates such as `"000 AAAAA"` are rejected
//! with [`TemplateError::Width`] instead of being padded.

use itertools::Itertools;

use crate::{error::TemplateError, utils::low_mask};

/// One lexical element of a bit-template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    FixedZero,
    FixedOne,
    DontCare,
    /// One bit of the operand field named by the letter
    Operand(char),
    /// Four fixed bits
    Nibble(u8),
}

impl Token {
    /// Number of bit positions the token covers
    pub const fn width(self) -> u32 {
        match self {
            Token::Nibble(_) => 4,
            _ => 1,
        }
    }
}

/// Split a template into tokens, without checking its total width
pub fn tokenize(template: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::with_capacity(32);
    for word in template.split_whitespace() {
        if let Some(digits) = word.strip_prefix("0x") {
            let mut chars = digits.chars();
            let nibble = match (chars.next(), chars.next()) {
                (Some(digit), None) => digit.to_digit(16),
                _ => None,
            };
            match nibble {
                Some(nibble) => tokens.push(Token::Nibble(nibble as u8)),
                None => return Err(TemplateError::InvalidNibble(word.to_string())),
            }
            continue;
        }

        for c in word.chars() {
            let token = match c {
                '0' => Token::FixedZero,
                '1' => Token::FixedOne,
                '-' => Token::DontCare,
                c if c.is_ascii_alphabetic() => Token::Operand(c),
                c => return Err(TemplateError::UnexpectedChar(c)),
            };
            tokens.push(token);
        }
    }
    Ok(tokens)
}

/// The fixed bits of an encoding: a word `w` matches when `w & mask == value`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldMask {
    pub mask: u32,
    pub value: u32,
}

impl FieldMask {
    #[inline]
    pub const fn matches(&self, raw: u32) -> bool {
        raw & self.mask == self.value
    }

    /// Whether some instruction word matches both encodings
    pub const fn overlaps(&self, other: &FieldMask) -> bool {
        (self.value ^ other.value) & self.mask & other.mask == 0
    }
}

/// A contiguous run of operand bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRun {
    /// Position of the run's least significant bit in the instruction word
    pub shift: u8,
    pub width: u8,
    /// Position of the run's least significant bit in the reassembled field
    pub field_shift: u8,
}

/// A parsed bit-template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    field: FieldMask,
    /// Operand bits as `(letter, bit position)`, in template order (bit 31 first)
    operand_bits: Vec<(char, u8)>,
}

impl Template {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let tokens = tokenize(template)?;
        let total: u32 = tokens.iter().map(|token| token.width()).sum();
        if total != 32 {
            return Err(TemplateError::Width(total));
        }

        let mut field = FieldMask::default();
        let mut operand_bits = Vec::new();
        let mut next = 32u32;
        for token in tokens {
            next -= token.width();
            let pos = next;
            match token {
                Token::FixedZero => field.mask |= 1 << pos,
                Token::FixedOne => {
                    field.mask |= 1 << pos;
                    field.value |= 1 << pos;
                }
                Token::DontCare => {}
                Token::Operand(letter) => operand_bits.push((letter, pos as u8)),
                Token::Nibble(nibble) => {
                    field.mask |= 0xF << pos;
                    field.value |= u32::from(nibble) << pos;
                }
            }
        }
        debug_assert_eq!(field.value & field.mask, field.value);

        Ok(Self { field, operand_bits })
    }

    pub fn field(&self) -> FieldMask {
        self.field
    }

    /// Distinct field letters, in order of first appearance
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.operand_bits.iter().map(|&(letter, _)| letter).unique()
    }

    pub fn contains(&self, letter: char) -> bool {
        self.operand_bits.iter().any(|&(l, _)| l == letter)
    }

    /// Number of bits the field spans in this template
    pub fn letter_width(&self, letter: char) -> u8 {
        self.operand_bits.iter().filter(|&&(l, _)| l == letter).count() as u8
    }

    /// Mask of every bit belonging to the field
    pub fn letter_mask(&self, letter: char) -> u32 {
        self.operand_bits.iter().filter(|&&(l, _)| l == letter).fold(0, |m, &(_, p)| m | 1 << p)
    }

    /// The field's bits decomposed into maximal contiguous runs, the run holding the
    /// field's least significant bits first.
    pub fn runs(&self, letter: char) -> Vec<BitRun> {
        let mut positions: Vec<u8> = self
            .operand_bits
            .iter()
            .filter(|&&(l, _)| l == letter)
            .map(|&(_, pos)| pos)
            .collect();
        positions.sort_unstable();

        let mut runs = Vec::new();
        let mut field_shift = 0u8;
        // Consecutive positions share the same `pos - index` key
        for (_, run) in &positions.iter().enumerate().chunk_by(|&(i, &pos)| pos as usize - i) {
            let run: Vec<u8> = run.map(|(_, &pos)| pos).collect();
            let width = run.len() as u8;
            runs.push(BitRun { shift: run[0], width, field_shift });
            field_shift += width;
        }
        runs
    }

    /// Place `value` into the field's bit positions of `raw`, the inverse of reading the
    /// field back through [`Template::runs`]
    pub fn insert(&self, raw: u32, letter: char, value: u32) -> u32 {
        self.runs(letter).iter().fold(raw & !self.letter_mask(letter), |raw, run| {
            raw | ((value >> run.field_shift) & low_mask(run.width)) << run.shift
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_words() {
        let tokens = tokenize("10 0x7 D-").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::FixedOne,
                Token::FixedZero,
                Token::Nibble(7),
                Token::Operand('D'),
                Token::DontCare
            ]
        );
    }

    #[test]
    fn test_tokenize_rejects_bad_nibble() {
        assert_eq!(tokenize("0x"), Err(TemplateError::InvalidNibble("0x".into())));
        assert_eq!(tokenize("0xAB"), Err(TemplateError::InvalidNibble("0xAB".into())));
        assert_eq!(tokenize("0xG"), Err(TemplateError::InvalidNibble("0xG".into())));
    }

    #[test]
    fn test_tokenize_rejects_unknown_char() {
        assert_eq!(tokenize("01*"), Err(TemplateError::UnexpectedChar('*')));
    }

    #[test]
    fn test_parse_addi() {
        let t = Template::parse("10 0x7  DDDDD AAAAA IIII IIII IIII IIII").unwrap();
        assert_eq!(t.field(), FieldMask { mask: 0xFC00_0000, value: 0x9C00_0000 });
        assert_eq!(t.letters().collect::<Vec<_>>(), vec!['D', 'A', 'I']);
        assert_eq!(t.letter_width('D'), 5);
        assert_eq!(t.letter_width('I'), 16);
        assert_eq!(t.letter_mask('A'), 0x001F_0000);
    }

    #[test]
    fn test_parse_nibble_zero_bits_are_fixed() {
        // 0x0 still fixes four bits to zero
        let t = Template::parse("00 0x0  ----- ----- ---- ---- ---- ----").unwrap();
        assert_eq!(t.field(), FieldMask { mask: 0xFC00_0000, value: 0 });
    }

    #[test]
    fn test_parse_rejects_short_template() {
        assert_eq!(Template::parse("000 AAAAA"), Err(TemplateError::Width(8)));
    }

    #[test]
    fn test_split_field_runs_are_lsb_first() {
        // l.sw: I spans bits 25..21 and 10..0
        let t = Template::parse("11 0x5  IIIII AAAAA BBBB BIII IIII IIII").unwrap();
        assert_eq!(
            t.runs('I'),
            vec![
                BitRun { shift: 0, width: 11, field_shift: 0 },
                BitRun { shift: 21, width: 5, field_shift: 11 },
            ]
        );
        assert_eq!(t.runs('B'), vec![BitRun { shift: 11, width: 5, field_shift: 0 }]);
    }

    #[test]
    fn test_insert_split_field() {
        let t = Template::parse("11 0x5  IIIII AAAAA BBBB BIII IIII IIII").unwrap();
        let raw = t.insert(t.field().value, 'I', 0xFFFC);
        assert_eq!(raw, 0xD400_0000 | (0x1F << 21) | 0x7FC);
    }

    #[test]
    fn test_overlaps() {
        let a = FieldMask { mask: 0b110, value: 0b100 };
        let b = FieldMask { mask: 0b011, value: 0b001 };
        let c = FieldMask { mask: 0b010, value: 0b010 };
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!b.overlaps(&c));
    }
}
