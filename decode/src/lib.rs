//! OR1K instruction decoder
//!
//! An opcode table ([`OpcodeSpec`] rows with bit-templates and operand syntax) is compiled
//! once into [`DecodeTables`]:
//!
//! - a decode [`Automaton`] mapping a 32-bit word to an opcode index, or to nothing when the
//!   word is not a valid instruction
//! - one operand extraction program per opcode
//!
//! ```
//! let tables = or1k_decode::or1k();
//! let index = tables.decode(0x9C64_0010).unwrap();
//! assert_eq!(tables.spec(index).unwrap().name, "l.addi");
//! assert_eq!(tables.disassemble(0x9C64_0010).unwrap().to_string(), "l.addi r3,r4,0x10");
//! ```
//!
//! Compilation fails on a defective table, see [`BuildError`]. Decoding itself never fails:
//! unknown words are simply `None`.

pub mod automaton;
pub mod disasm;
pub mod error;
pub mod letters;
pub mod opcode_table;
pub mod operand;
pub mod template;
pub mod utils;

use std::sync::OnceLock;

use tracing::info;

pub use automaton::{walk_flat, Automaton, Node, NodeRef};
pub use disasm::Disassembly;
pub use error::{BuildError, TemplateError};
pub use letters::{LetterInfo, LetterTable};
pub use opcode_table::{InsnCategory, OpcodeIndex, OpcodeSpec, OR1K_OPCODES};
pub use operand::{extract, Operand, OperandKind, OperandStep, Operands, MAX_OPERANDS};
pub use template::{FieldMask, Template};

/// Everything derived from one opcode table
#[derive(Debug, Clone)]
pub struct DecodeTables {
    specs: Vec<OpcodeSpec>,
    fields: Vec<FieldMask>,
    letters: LetterTable,
    automaton: Automaton,
    programs: Vec<Vec<OperandStep>>,
}

impl DecodeTables {
    /// Compile `specs`. Opcode indices are positions in `specs`.
    pub fn compile(specs: &[OpcodeSpec]) -> Result<Self, BuildError> {
        let templates = specs
            .iter()
            .map(|spec| {
                Template::parse(spec.template)
                    .map_err(|source| BuildError::Template { opcode: spec.name, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let fields: Vec<FieldMask> = templates.iter().map(Template::field).collect();

        let letters = LetterTable::build(specs, &templates)?;
        let automaton = Automaton::build(specs, &fields)?;
        let programs = specs
            .iter()
            .zip(&templates)
            .map(|(spec, template)| operand::compile_program(spec, template, &letters))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Compiled decode tables: {} opcodes, {} field letters, {} automaton nodes",
            specs.len(),
            letters.len(),
            automaton.node_count()
        );

        Ok(Self { specs: specs.to_vec(), fields, letters, automaton, programs })
    }

    /// Release the tables. Dropping them has the same effect.
    pub fn destroy(self) {
        drop(self);
    }

    /// Opcode index of `raw`, or `None` if it is not a valid instruction
    #[inline]
    pub fn decode(&self, raw: u32) -> Option<OpcodeIndex> {
        let index = self.automaton.walk(raw)?;
        self.fields[index].matches(raw).then_some(index)
    }

    /// Operands of `raw` decoded as opcode `index`. An out of range index yields no
    /// operands.
    pub fn extract(&self, raw: u32, index: OpcodeIndex) -> Operands {
        self.programs.get(index).map(|program| operand::extract(raw, program)).unwrap_or_default()
    }

    /// Index of the opcode named `name`
    pub fn find(&self, name: &str) -> Option<OpcodeIndex> {
        self.specs.iter().position(|spec| spec.name == name)
    }

    pub fn spec(&self, index: OpcodeIndex) -> Option<&OpcodeSpec> {
        self.specs.get(index)
    }

    pub fn field_mask(&self, index: OpcodeIndex) -> Option<FieldMask> {
        self.fields.get(index).copied()
    }

    pub fn program(&self, index: OpcodeIndex) -> Option<&[OperandStep]> {
        self.programs.get(index).map(Vec::as_slice)
    }

    /// Number of operands opcode `index` produces
    pub fn operand_count(&self, index: OpcodeIndex) -> Option<usize> {
        self.program(index).map(|program| program.iter().filter(|s| s.last_of_operand).count())
    }

    pub fn specs(&self) -> &[OpcodeSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn letters(&self) -> &LetterTable {
        &self.letters
    }
}

static OR1K_TABLES: OnceLock<DecodeTables> = OnceLock::new();

/// The OR1K tables, compiled on first use.
///
/// # Panics
///
/// Panics if the built-in table does not compile; that is a defect in [`OR1K_OPCODES`].
pub fn or1k() -> &'static DecodeTables {
    OR1K_TABLES.get_or_init(|| match DecodeTables::compile(OR1K_OPCODES) {
        Ok(tables) => tables,
        Err(e) => panic!("OR1K opcode table does not compile: {e}"),
    })
}
