//! Textual rendering of decoded instructions
//!
//! `l.addi r3,r4,0x10`, `l.sw -0x4(r1),r9`, `l.nop 0x0`. Opcodes whose only operand is the
//! synthetic zero print as the bare mnemonic.

use std::fmt;

use crate::{
    opcode_table::OpcodeIndex,
    operand::{Operand, OperandKind, Operands},
    DecodeTables,
};

/// A decoded instruction ready for printing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disassembly {
    pub raw: u32,
    pub index: OpcodeIndex,
    pub mnemonic: &'static str,
    pub operands: Operands,
}

struct Imm(u32, bool);

impl fmt::Display for Imm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Imm(value, signed) = *self;
        if signed && (value as i32) < 0 {
            write!(f, "-{:#x}", (value as i32).unsigned_abs())
        } else {
            write!(f, "{value:#x}")
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OperandKind::Register => write!(f, "r{}", self.value),
            OperandKind::Immediate => fmt::Display::fmt(&Imm(self.value, self.signed), f),
            OperandKind::Displacement => {
                write!(f, "{}(r{})", Imm(self.value, self.signed), self.base)
            }
            OperandKind::Synthetic => Ok(()),
        }
    }
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic)?;
        let mut operands =
            self.operands.iter().filter(|operand| operand.kind != OperandKind::Synthetic);
        if let Some(first) = operands.next() {
            write!(f, " {first}")?;
            for operand in operands {
                write!(f, ",{operand}")?;
            }
        }
        Ok(())
    }
}

impl DecodeTables {
    /// Decode and extract `raw` in one go; `None` for an invalid word
    pub fn disassemble(&self, raw: u32) -> Option<Disassembly> {
        let index = self.decode(raw)?;
        let spec = self.spec(index)?;
        Some(Disassembly { raw, index, mnemonic: spec.name, operands: self.extract(raw, index) })
    }
}
