//! Operand extraction programs
//!
//! Every opcode gets a list of [`OperandStep`]s compiled from its operand syntax and its
//! bit-template. Running the steps against an instruction word yields the operand values in
//! syntax order.
//!
//! Syntax elements:
//!
//! | Element      | Meaning                                                          |
//! |--------------|------------------------------------------------------------------|
//! | `r<L>`       | register, index taken from field `<L>`                           |
//! | `<L>`        | immediate taken from field `<L>`                                 |
//! | `<L>(r<M>)`  | displacement: immediate `<L>` relative to base register `<M>`    |
//! | `,`          | separator                                                        |
//! | `0` or empty | a single synthetic zero operand                                  |
//!
//! A field may be split over several runs of the word. Its steps are emitted for the run
//! holding the least significant bits first, each fragment landing at its own position in
//! the reassembled value. Sign extension is applied once, after the last fragment.

use std::{iter::Peekable, str::CharIndices};

use crate::{
    error::BuildError,
    letters::LetterTable,
    opcode_table::OpcodeSpec,
    template::Template,
    utils::{low_mask, sign_extend},
};

/// Most operands any opcode may have
pub const MAX_OPERANDS: usize = 5;

/// Field letter of the destination register
pub const DESTINATION_LETTER: char = 'D';

/// One extraction step: read a run of bits and merge it into the current operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OperandStep {
    /// Position of the run's least significant bit in the instruction word
    pub shift: u8,
    /// Zero for the synthetic operand
    pub width: u8,
    /// Position of the run inside the reassembled value
    pub field_shift: u8,
    /// Operand the step contributes to
    pub slot: u8,
    pub last_of_operand: bool,
    pub is_register: bool,
    pub is_destination: bool,
    /// The run belongs to the base register of a displacement operand
    pub is_displacement_base: bool,
    /// Set on the last fragment of a signed field
    pub sign_extend_width: Option<u8>,
    /// Last step of the last operand
    pub terminal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperandKind {
    Register,
    #[default]
    Immediate,
    /// `value` is the displacement, `base` the register it is relative to
    Displacement,
    /// Placeholder for opcodes without operands
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Operand {
    pub kind: OperandKind,
    /// Register index or immediate bits, sign-extended when `signed`
    pub value: u32,
    /// Base register of a displacement, reassembled like any other field
    pub base: u32,
    pub signed: bool,
    pub is_destination: bool,
}

impl Operand {
    pub const fn as_signed(&self) -> i32 {
        self.value as i32
    }
}

/// Extracted operands, in syntax order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Operands {
    operands: [Operand; MAX_OPERANDS],
    len: usize,
}

impl Operands {
    fn push(&mut self, operand: Operand) {
        debug_assert!(self.len < MAX_OPERANDS);
        if let Some(slot) = self.operands.get_mut(self.len) {
            *slot = operand;
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<&Operand> {
        self.as_slice().get(index)
    }

    pub fn as_slice(&self) -> &[Operand] {
        &self.operands[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operand> {
        self.as_slice().iter()
    }

    /// The destination register operand, if any
    pub fn destination(&self) -> Option<&Operand> {
        self.iter().find(|operand| operand.is_destination)
    }

    /// The displacement operand, if any
    pub fn displacement(&self) -> Option<&Operand> {
        self.iter().find(|operand| operand.kind == OperandKind::Displacement)
    }
}

impl std::ops::Index<usize> for Operands {
    type Output = Operand;

    fn index(&self, index: usize) -> &Operand {
        &self.as_slice()[index]
    }
}

/// One operand as written in the syntax string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyntaxOperand {
    Register(char),
    Immediate(char),
    Displacement { imm: char, base: char },
    Synthetic,
}

fn parse_syntax(spec: &OpcodeSpec) -> Result<Vec<SyntaxOperand>, BuildError> {
    let syntax = spec.syntax;
    if syntax.is_empty() {
        return Ok(vec![SyntaxOperand::Synthetic]);
    }

    let error = |offset: usize| BuildError::Syntax { opcode: spec.name, syntax, offset };
    let mut chars = syntax.char_indices().peekable();
    let mut operands = Vec::new();

    loop {
        let (offset, c) = chars.next().ok_or_else(|| error(syntax.len()))?;
        let operand = match c {
            '0' => SyntaxOperand::Synthetic,
            'r' if chars.peek().is_some_and(|&(_, c)| c.is_ascii_alphabetic()) => {
                SyntaxOperand::Register(field_letter(&mut chars, syntax.len()).map_err(error)?)
            }
            c if c.is_ascii_alphabetic() => {
                if chars.next_if(|&(_, c)| c == '(').is_some() {
                    let base = match chars.next() {
                        Some((_, 'r')) => field_letter(&mut chars, syntax.len()).map_err(error)?,
                        Some((offset, _)) => return Err(error(offset)),
                        None => return Err(error(syntax.len())),
                    };
                    match chars.next() {
                        Some((_, ')')) => {}
                        Some((offset, _)) => return Err(error(offset)),
                        None => return Err(error(syntax.len())),
                    }
                    SyntaxOperand::Displacement { imm: c, base }
                } else {
                    SyntaxOperand::Immediate(c)
                }
            }
            _ => return Err(error(offset)),
        };
        operands.push(operand);

        match chars.next() {
            None => break,
            Some((_, ',')) => {}
            Some((offset, _)) => return Err(error(offset)),
        }
    }

    Ok(operands)
}

fn field_letter(chars: &mut Peekable<CharIndices<'_>>, end: usize) -> Result<char, usize> {
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => Ok(c),
        Some((offset, _)) => Err(offset),
        None => Err(end),
    }
}

/// Compile the extraction program of one opcode
pub fn compile_program(
    spec: &OpcodeSpec,
    template: &Template,
    letters: &LetterTable,
) -> Result<Vec<OperandStep>, BuildError> {
    let operands = parse_syntax(spec)?;
    if operands.len() > MAX_OPERANDS {
        return Err(BuildError::TooManyOperands { opcode: spec.name, max: MAX_OPERANDS });
    }

    let mut steps = Vec::new();
    for (slot, operand) in operands.iter().enumerate() {
        let slot = slot as u8;
        let first = steps.len();
        match *operand {
            SyntaxOperand::Register(letter) => {
                let proto = OperandStep {
                    slot,
                    is_register: true,
                    is_destination: letter == DESTINATION_LETTER,
                    ..Default::default()
                };
                field_steps(spec, template, letters, letter, proto, &mut steps)?;
            }
            SyntaxOperand::Immediate(letter) => {
                let proto = OperandStep { slot, ..Default::default() };
                field_steps(spec, template, letters, letter, proto, &mut steps)?;
            }
            SyntaxOperand::Displacement { imm, base } => {
                let proto = OperandStep { slot, ..Default::default() };
                field_steps(spec, template, letters, imm, proto, &mut steps)?;
                let proto = OperandStep {
                    slot,
                    is_register: true,
                    is_displacement_base: true,
                    ..Default::default()
                };
                field_steps(spec, template, letters, base, proto, &mut steps)?;
            }
            SyntaxOperand::Synthetic => steps.push(OperandStep { slot, ..Default::default() }),
        }
        debug_assert!(steps.len() > first);
        if let Some(last) = steps.last_mut() {
            last.last_of_operand = true;
        }
    }
    if let Some(last) = steps.last_mut() {
        last.terminal = true;
    }

    Ok(steps)
}

/// Append one step per run of `letter`, flagging sign extension on the last one
fn field_steps(
    spec: &OpcodeSpec,
    template: &Template,
    letters: &LetterTable,
    letter: char,
    proto: OperandStep,
    steps: &mut Vec<OperandStep>,
) -> Result<(), BuildError> {
    let runs = template.runs(letter);
    let info = letters.get(letter);
    let (Some(info), false) = (info, runs.is_empty()) else {
        return Err(BuildError::UnknownField { opcode: spec.name, letter });
    };

    let first = steps.len();
    steps.extend(runs.iter().map(|run| OperandStep {
        shift: run.shift,
        width: run.width,
        field_shift: run.field_shift,
        ..proto
    }));
    if info.signed && !proto.is_displacement_base {
        if let Some(last) = steps[first..].last_mut() {
            last.sign_extend_width = Some(info.width);
        }
    }
    Ok(())
}

/// Run an extraction program against an instruction word
pub fn extract(raw: u32, program: &[OperandStep]) -> Operands {
    let mut operands = Operands::default();
    let mut current = Operand::default();

    for step in program {
        let fragment = (raw >> step.shift) & low_mask(step.width);
        if step.is_displacement_base {
            current.base |= fragment << step.field_shift;
            current.kind = OperandKind::Displacement;
        } else {
            current.value |= fragment << step.field_shift;
            current.kind = match (step.is_register, step.width) {
                (true, _) => OperandKind::Register,
                (false, 0) => OperandKind::Synthetic,
                (false, _) => OperandKind::Immediate,
            };
        }
        current.is_destination |= step.is_destination;

        if let Some(width) = step.sign_extend_width {
            current.value = sign_extend(current.value, width) as u32;
            current.signed = true;
        }
        if step.last_of_operand {
            operands.push(current);
            current = Operand::default();
        }
        if step.terminal {
            break;
        }
    }

    operands
}
