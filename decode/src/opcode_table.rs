//! OR1K opcode descriptors
//!
//! The table is pure input data for [`crate::DecodeTables::compile`]. Each row gives the
//! mnemonic, the operand syntax, the bit-template and metadata the decoder stores but never
//! interprets (execution routine, flags and category).
//!
//! Major opcodes (bits 31..26) without a row, such as `0x07` or the `0x0A` vector space,
//! decode as invalid.

use std::fmt;

/// Position of an opcode in its table
pub type OpcodeIndex = usize;

/// The instruction has a delay slot
pub const DELAY_SLOT: u32 = 1 << 0;
/// The instruction reads the compare flag
pub const READS_FLAG: u32 = 1 << 1;
/// The instruction writes the compare flag
pub const WRITES_FLAG: u32 = 1 << 2;

/// Coarse instruction class, used by schedulers and statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsnCategory {
    Unknown,
    Exception,
    Arith,
    Shift,
    Compare,
    Branch,
    Jump,
    Load,
    Store,
    MovImm,
    Move,
    Extend,
    Nop,
    Mac,
    Float,
}

impl fmt::Display for InsnCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One instruction variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeSpec {
    pub name: &'static str,
    /// Operand syntax, e.g. `rD,I(rA)`
    pub syntax: &'static str,
    /// Bit-template, see [`crate::template`]
    pub template: &'static str,
    /// Name of the execution routine, if the simulator implements one
    pub handler: Option<&'static str>,
    pub flags: u32,
    pub category: InsnCategory,
}

impl OpcodeSpec {
    pub const fn new(name: &'static str, syntax: &'static str, template: &'static str) -> Self {
        Self { name, syntax, template, handler: None, flags: 0, category: InsnCategory::Unknown }
    }

    pub const fn has_delay_slot(&self) -> bool {
        self.flags & DELAY_SLOT != 0
    }
}

macro_rules! op {
    ($name:literal, $syntax:literal, $template:literal, $handler:ident, $flags:expr, $category:ident) => {
        OpcodeSpec {
            name: $name,
            syntax: $syntax,
            template: $template,
            handler: Some(stringify!($handler)),
            flags: $flags,
            category: InsnCategory::$category,
        }
    };
    ($name:literal, $syntax:literal, $template:literal, _, $flags:expr, $category:ident) => {
        OpcodeSpec {
            name: $name,
            syntax: $syntax,
            template: $template,
            handler: None,
            flags: $flags,
            category: InsnCategory::$category,
        }
    };
}

#[rustfmt::skip]
pub static OR1K_OPCODES: &[OpcodeSpec] = &[
    op!("l.j",       "N",            "00 0x0  NNNNN NNNNN NNNN NNNN NNNN NNNN", l_j, DELAY_SLOT, Jump),
    op!("l.jal",     "N",            "00 0x1  NNNNN NNNNN NNNN NNNN NNNN NNNN", l_jal, DELAY_SLOT, Jump),
    op!("l.bnf",     "N",            "00 0x3  NNNNN NNNNN NNNN NNNN NNNN NNNN", l_bnf, DELAY_SLOT | READS_FLAG, Branch),
    op!("l.bf",      "N",            "00 0x4  NNNNN NNNNN NNNN NNNN NNNN NNNN", l_bf, DELAY_SLOT | READS_FLAG, Branch),
    op!("l.nop",     "K",            "00 0x5  01--- ----- KKKK KKKK KKKK KKKK", l_nop, 0, Nop),
    op!("l.movhi",   "rD,K",         "00 0x6  DDDDD ----0 KKKK KKKK KKKK KKKK", l_movhi, 0, MovImm),
    op!("l.macrc",   "rD",           "00 0x6  DDDDD ----1 0000 0000 0000 0000", l_macrc, 0, Mac),
    op!("l.sys",     "K",            "00 0x8  00000 00000 KKKK KKKK KKKK KKKK", l_sys, 0, Exception),
    op!("l.trap",    "K",            "00 0x8  01000 00000 KKKK KKKK KKKK KKKK", l_trap, 0, Exception),
    op!("l.msync",   "",             "00 0x8  10000 00000 0000 0000 0000 0000", _, 0, Unknown),
    op!("l.psync",   "",             "00 0x8  10100 00000 0000 0000 0000 0000", _, 0, Unknown),
    op!("l.csync",   "",             "00 0x8  11000 00000 0000 0000 0000 0000", _, 0, Unknown),
    op!("l.rfe",     "",             "00 0x9  ----- ----- ---- ---- ---- ----", l_rfe, 0, Exception),

    op!("l.jr",      "rB",           "01 0x1  ----- ----- BBBB B--- ---- ----", l_jr, DELAY_SLOT, Jump),
    op!("l.jalr",    "rB",           "01 0x2  ----- ----- BBBB B--- ---- ----", l_jalr, DELAY_SLOT, Jump),
    op!("l.maci",    "rA,I",         "01 0x3  IIIII AAAAA ---- -III IIII IIII", l_maci, 0, Mac),
    op!("l.cust1",   "",             "01 0xC  ----- ----- ---- ---- ---- ----", l_cust1, 0, Unknown),
    op!("l.cust2",   "",             "01 0xD  ----- ----- ---- ---- ---- ----", l_cust2, 0, Unknown),
    op!("l.cust3",   "",             "01 0xE  ----- ----- ---- ---- ---- ----", l_cust3, 0, Unknown),
    op!("l.cust4",   "",             "01 0xF  ----- ----- ---- ---- ---- ----", l_cust4, 0, Unknown),

    op!("l.ld",      "rD,I(rA)",     "10 0x0  DDDDD AAAAA IIII IIII IIII IIII", _, 0, Load),
    op!("l.lwz",     "rD,I(rA)",     "10 0x1  DDDDD AAAAA IIII IIII IIII IIII", l_lwz, 0, Load),
    op!("l.lws",     "rD,I(rA)",     "10 0x2  DDDDD AAAAA IIII IIII IIII IIII", l_lws, 0, Load),
    op!("l.lbz",     "rD,I(rA)",     "10 0x3  DDDDD AAAAA IIII IIII IIII IIII", l_lbz, 0, Load),
    op!("l.lbs",     "rD,I(rA)",     "10 0x4  DDDDD AAAAA IIII IIII IIII IIII", l_lbs, 0, Load),
    op!("l.lhz",     "rD,I(rA)",     "10 0x5  DDDDD AAAAA IIII IIII IIII IIII", l_lhz, 0, Load),
    op!("l.lhs",     "rD,I(rA)",     "10 0x6  DDDDD AAAAA IIII IIII IIII IIII", l_lhs, 0, Load),
    op!("l.addi",    "rD,rA,I",      "10 0x7  DDDDD AAAAA IIII IIII IIII IIII", l_add, WRITES_FLAG, Arith),
    op!("l.addic",   "rD,rA,I",      "10 0x8  DDDDD AAAAA IIII IIII IIII IIII", l_addc, WRITES_FLAG, Arith),
    op!("l.andi",    "rD,rA,K",      "10 0x9  DDDDD AAAAA KKKK KKKK KKKK KKKK", l_and, WRITES_FLAG, Arith),
    op!("l.ori",     "rD,rA,K",      "10 0xA  DDDDD AAAAA KKKK KKKK KKKK KKKK", l_or, 0, Arith),
    op!("l.xori",    "rD,rA,I",      "10 0xB  DDDDD AAAAA IIII IIII IIII IIII", l_xor, 0, Arith),
    op!("l.muli",    "rD,rA,I",      "10 0xC  DDDDD AAAAA IIII IIII IIII IIII", l_mul, 0, Arith),
    op!("l.mfspr",   "rD,rA,K",      "10 0xD  DDDDD AAAAA KKKK KKKK KKKK KKKK", l_mfspr, 0, Move),
    op!("l.slli",    "rD,rA,L",      "10 0xE  DDDDD AAAAA ---- ---- 00LL LLLL", l_sll, 0, Shift),
    op!("l.srli",    "rD,rA,L",      "10 0xE  DDDDD AAAAA ---- ---- 01LL LLLL", l_srl, 0, Shift),
    op!("l.srai",    "rD,rA,L",      "10 0xE  DDDDD AAAAA ---- ---- 10LL LLLL", l_sra, 0, Shift),
    op!("l.rori",    "rD,rA,L",      "10 0xE  DDDDD AAAAA ---- ---- 11LL LLLL", _, 0, Shift),
    op!("l.sfeqi",   "rA,I",         "10 0xF  00000 AAAAA IIII IIII IIII IIII", l_sfeq, WRITES_FLAG, Compare),
    op!("l.sfnei",   "rA,I",         "10 0xF  00001 AAAAA IIII IIII IIII IIII", l_sfne, WRITES_FLAG, Compare),
    op!("l.sfgtui",  "rA,I",         "10 0xF  00010 AAAAA IIII IIII IIII IIII", l_sfgtu, WRITES_FLAG, Compare),
    op!("l.sfgeui",  "rA,I",         "10 0xF  00011 AAAAA IIII IIII IIII IIII", l_sfgeu, WRITES_FLAG, Compare),
    op!("l.sfltui",  "rA,I",         "10 0xF  00100 AAAAA IIII IIII IIII IIII", l_sfltu, WRITES_FLAG, Compare),
    op!("l.sfleui",  "rA,I",         "10 0xF  00101 AAAAA IIII IIII IIII IIII", l_sfleu, WRITES_FLAG, Compare),
    op!("l.sfgtsi",  "rA,I",         "10 0xF  01010 AAAAA IIII IIII IIII IIII", l_sfgts, WRITES_FLAG, Compare),
    op!("l.sfgesi",  "rA,I",         "10 0xF  01011 AAAAA IIII IIII IIII IIII", l_sfges, WRITES_FLAG, Compare),
    op!("l.sfltsi",  "rA,I",         "10 0xF  01100 AAAAA IIII IIII IIII IIII", l_sflts, WRITES_FLAG, Compare),
    op!("l.sflesi",  "rA,I",         "10 0xF  01101 AAAAA IIII IIII IIII IIII", l_sfles, WRITES_FLAG, Compare),

    op!("l.mtspr",   "rA,rB,K",      "11 0x0  KKKKK AAAAA BBBB BKKK KKKK KKKK", l_mtspr, 0, Move),
    op!("l.mac",     "rA,rB",        "11 0x1  ----- AAAAA BBBB B--- ---- 0x1", l_mac, 0, Mac),
    op!("l.msb",     "rA,rB",        "11 0x1  ----- AAAAA BBBB B--- ---- 0x2", l_msb, 0, Mac),

    op!("lf.add.s",  "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x0 0x0", lf_add_s, 0, Float),
    op!("lf.sub.s",  "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x0 0x1", lf_sub_s, 0, Float),
    op!("lf.mul.s",  "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x0 0x2", lf_mul_s, 0, Float),
    op!("lf.div.s",  "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x0 0x3", lf_div_s, 0, Float),
    op!("lf.itof.s", "rD,rA",        "11 0x2  DDDDD AAAAA 0000 0--- 0x0 0x4", lf_itof_s, 0, Float),
    op!("lf.ftoi.s", "rD,rA",        "11 0x2  DDDDD AAAAA 0000 0--- 0x0 0x5", lf_ftoi_s, 0, Float),
    op!("lf.rem.s",  "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x0 0x6", lf_rem_s, 0, Float),
    op!("lf.madd.s", "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x0 0x7", lf_madd_s, 0, Float),
    op!("lf.sfeq.s", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x0 0x8", lf_sfeq_s, WRITES_FLAG, Float),
    op!("lf.sfne.s", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x0 0x9", lf_sfne_s, WRITES_FLAG, Float),
    op!("lf.sfgt.s", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x0 0xA", lf_sfgt_s, WRITES_FLAG, Float),
    op!("lf.sfge.s", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x0 0xB", lf_sfge_s, WRITES_FLAG, Float),
    op!("lf.sflt.s", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x0 0xC", lf_sflt_s, WRITES_FLAG, Float),
    op!("lf.sfle.s", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x0 0xD", lf_sfle_s, WRITES_FLAG, Float),
    op!("lf.cust1.s", "",            "11 0x2  ----- ----- ---- ---- 0xE ----", _, 0, Float),
    op!("lf.add.d",  "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x1 0x0", _, 0, Float),
    op!("lf.sub.d",  "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x1 0x1", _, 0, Float),
    op!("lf.mul.d",  "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x1 0x2", _, 0, Float),
    op!("lf.div.d",  "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x1 0x3", _, 0, Float),
    op!("lf.itof.d", "rD,rA",        "11 0x2  DDDDD AAAAA 0000 0--- 0x1 0x4", _, 0, Float),
    op!("lf.ftoi.d", "rD,rA",        "11 0x2  DDDDD AAAAA 0000 0--- 0x1 0x5", _, 0, Float),
    op!("lf.rem.d",  "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x1 0x6", _, 0, Float),
    op!("lf.madd.d", "rD,rA,rB",     "11 0x2  DDDDD AAAAA BBBB B--- 0x1 0x7", _, 0, Float),
    op!("lf.sfeq.d", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x1 0x8", _, WRITES_FLAG, Float),
    op!("lf.sfne.d", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x1 0x9", _, WRITES_FLAG, Float),
    op!("lf.sfgt.d", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x1 0xA", _, WRITES_FLAG, Float),
    op!("lf.sfge.d", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x1 0xB", _, WRITES_FLAG, Float),
    op!("lf.sflt.d", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x1 0xC", _, WRITES_FLAG, Float),
    op!("lf.sfle.d", "rA,rB",        "11 0x2  ----- AAAAA BBBB B--- 0x1 0xD", _, WRITES_FLAG, Float),
    op!("lf.cust1.d", "",            "11 0x2  ----- ----- ---- ---- 0xF ----", _, 0, Float),

    op!("l.sd",      "I(rA),rB",     "11 0x4  IIIII AAAAA BBBB BIII IIII IIII", _, 0, Store),
    op!("l.sw",      "I(rA),rB",     "11 0x5  IIIII AAAAA BBBB BIII IIII IIII", l_sw, 0, Store),
    op!("l.sb",      "I(rA),rB",     "11 0x6  IIIII AAAAA BBBB BIII IIII IIII", l_sb, 0, Store),
    op!("l.sh",      "I(rA),rB",     "11 0x7  IIIII AAAAA BBBB BIII IIII IIII", l_sh, 0, Store),

    op!("l.add",     "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 ---- 0x0", l_add, WRITES_FLAG, Arith),
    op!("l.addc",    "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 ---- 0x1", l_addc, WRITES_FLAG, Arith),
    op!("l.sub",     "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 ---- 0x2", l_sub, 0, Arith),
    op!("l.and",     "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 ---- 0x3", l_and, WRITES_FLAG, Arith),
    op!("l.or",      "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 ---- 0x4", l_or, 0, Arith),
    op!("l.xor",     "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 ---- 0x5", l_xor, 0, Arith),
    op!("l.mul",     "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-11 ---- 0x6", l_mul, 0, Arith),
    op!("l.sll",     "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 00-- 0x8", l_sll, 0, Shift),
    op!("l.srl",     "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 01-- 0x8", l_srl, 0, Shift),
    op!("l.sra",     "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 10-- 0x8", l_sra, 0, Shift),
    op!("l.ror",     "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 11-- 0x8", _, 0, Shift),
    op!("l.div",     "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-11 ---- 0x9", l_div, 0, Arith),
    op!("l.divu",    "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-11 ---- 0xA", l_divu, 0, Arith),
    op!("l.mulu",    "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-11 ---- 0xB", _, 0, Arith),
    op!("l.exths",   "rD,rA",        "11 0x8  DDDDD AAAAA ---- --00 00-- 0xC", l_exths, 0, Extend),
    op!("l.extbs",   "rD,rA",        "11 0x8  DDDDD AAAAA ---- --00 01-- 0xC", l_extbs, 0, Extend),
    op!("l.exthz",   "rD,rA",        "11 0x8  DDDDD AAAAA ---- --00 10-- 0xC", l_exthz, 0, Extend),
    op!("l.extbz",   "rD,rA",        "11 0x8  DDDDD AAAAA ---- --00 11-- 0xC", l_extbz, 0, Extend),
    op!("l.extws",   "rD,rA",        "11 0x8  DDDDD AAAAA ---- --00 00-- 0xD", l_extws, 0, Extend),
    op!("l.extwz",   "rD,rA",        "11 0x8  DDDDD AAAAA ---- --00 01-- 0xD", l_extwz, 0, Extend),
    op!("l.cmov",    "rD,rA,rB",     "11 0x8  DDDDD AAAAA BBBB B-00 ---- 0xE", l_cmov, READS_FLAG, Move),
    op!("l.ff1",     "rD,rA",        "11 0x8  DDDDD AAAAA ---- --00 ---- 0xF", l_ff1, 0, Arith),
    op!("l.fl1",     "rD,rA",        "11 0x8  DDDDD AAAAA ---- --01 ---- 0xF", l_fl1, 0, Arith),

    op!("l.sfeq",    "rA,rB",        "11 0x9  00000 AAAAA BBBB B--- ---- ----", l_sfeq, WRITES_FLAG, Compare),
    op!("l.sfne",    "rA,rB",        "11 0x9  00001 AAAAA BBBB B--- ---- ----", l_sfne, WRITES_FLAG, Compare),
    op!("l.sfgtu",   "rA,rB",        "11 0x9  00010 AAAAA BBBB B--- ---- ----", l_sfgtu, WRITES_FLAG, Compare),
    op!("l.sfgeu",   "rA,rB",        "11 0x9  00011 AAAAA BBBB B--- ---- ----", l_sfgeu, WRITES_FLAG, Compare),
    op!("l.sfltu",   "rA,rB",        "11 0x9  00100 AAAAA BBBB B--- ---- ----", l_sfltu, WRITES_FLAG, Compare),
    op!("l.sfleu",   "rA,rB",        "11 0x9  00101 AAAAA BBBB B--- ---- ----", l_sfleu, WRITES_FLAG, Compare),
    op!("l.sfgts",   "rA,rB",        "11 0x9  01010 AAAAA BBBB B--- ---- ----", l_sfgts, WRITES_FLAG, Compare),
    op!("l.sfges",   "rA,rB",        "11 0x9  01011 AAAAA BBBB B--- ---- ----", l_sfges, WRITES_FLAG, Compare),
    op!("l.sflts",   "rA,rB",        "11 0x9  01100 AAAAA BBBB B--- ---- ----", l_sflts, WRITES_FLAG, Compare),
    op!("l.sfles",   "rA,rB",        "11 0x9  01101 AAAAA BBBB B--- ---- ----", l_sfles, WRITES_FLAG, Compare),

    op!("l.cust5",   "rD,rA,rB,L,K", "11 0xC  DDDDD AAAAA BBBB BLLL LLLK KKKK", _, 0, Unknown),
    op!("l.cust6",   "",             "11 0xD  ----- ----- ---- ---- ---- ----", _, 0, Unknown),
    op!("l.cust7",   "",             "11 0xE  ----- ----- ---- ---- ---- ----", _, 0, Unknown),
    op!("l.cust8",   "",             "11 0xF  ----- ----- ---- ---- ---- ----", _, 0, Unknown),
];
