/// Bit-template parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Malformed hex nibble token `{0}`")]
    InvalidNibble(String),

    #[error("Unexpected character `{0}` in bit template")]
    UnexpectedChar(char),

    #[error("Template covers {0} bits, expected 32")]
    Width(u32),
}

/// Errors raised while compiling an opcode table.
///
/// Every variant is a defect in the (compiled-in) table, never a property of the
/// instruction stream being decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Opcode table is empty")]
    EmptyTable,

    #[error("Bad bit template for `{opcode}`: {source}")]
    Template {
        opcode: &'static str,
        #[source]
        source: TemplateError,
    },

    #[error(
        "Signed field `{letter}` spans {width} bits in `{opcode}` \
         but {first_width} bits in `{first_opcode}`"
    )]
    InconsistentLetterWidth {
        letter: char,
        first_opcode: &'static str,
        first_width: u8,
        opcode: &'static str,
        width: u8,
    },

    #[error("Opcodes `{first}` and `{second}` match overlapping instruction words")]
    OverlappingOpcodes { first: &'static str, second: &'static str },

    #[error("No common fixed bit-field separates {opcodes:?} (available mask {available:#010x})")]
    NoDiscriminatingField { opcodes: Vec<&'static str>, available: u32 },

    #[error("Bad operand syntax `{syntax}` for `{opcode}` at offset {offset}")]
    Syntax { opcode: &'static str, syntax: &'static str, offset: usize },

    #[error("Operand field `{letter}` of `{opcode}` does not appear in its bit template")]
    UnknownField { opcode: &'static str, letter: char },

    #[error("`{opcode}` has more than {max} operands")]
    TooManyOperands { opcode: &'static str, max: usize },
}
