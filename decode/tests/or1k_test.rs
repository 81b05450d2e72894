use or1k_decode::{or1k, InsnCategory, OperandKind};

fn name_of(raw: u32) -> Option<&'static str> {
    let tables = or1k();
    tables.decode(raw).map(|index| tables.spec(index).unwrap().name)
}

fn disasm(raw: u32) -> String {
    or1k().disassemble(raw).map(|d| d.to_string()).unwrap_or_else(|| "<invalid>".into())
}

#[test]
fn test_or1k_table_compiles() {
    let tables = or1k();
    assert_eq!(tables.len(), or1k_decode::OR1K_OPCODES.len());
    assert!(tables.automaton().depth() >= 2);
    assert!(tables.letters().get('N').unwrap().signed);
}

#[test]
fn test_addi() {
    let raw = 0x9C64_0010;
    assert_eq!(name_of(raw), Some("l.addi"));
    assert_eq!(disasm(raw), "l.addi r3,r4,0x10");

    let tables = or1k();
    let operands = tables.extract(raw, tables.decode(raw).unwrap());
    assert_eq!(operands.len(), 3);
    assert_eq!(operands.destination().map(|d| d.value), Some(3));
    assert_eq!(operands[1].kind, OperandKind::Register);
    assert_eq!(operands[2].kind, OperandKind::Immediate);
    assert!(operands[2].signed);

    // l.addi r1,r1,-4
    assert_eq!(disasm(0x9C21_FFFC), "l.addi r1,r1,-0x4");
}

#[test]
fn test_register_round_trip() {
    let tables = or1k();
    let index = tables.find("l.add").unwrap();
    for reg in 0..32u32 {
        let raw = 0xE000_0000 | (reg << 21) | (31 - reg) << 16 | reg << 11;
        assert_eq!(tables.decode(raw), Some(index));
        let operands = tables.extract(raw, index);
        assert_eq!(operands[0].value, reg);
        assert_eq!(operands[1].value, 31 - reg);
        assert_eq!(operands[2].value, reg);
    }
}

#[test]
fn test_store_with_negative_offset() {
    // l.sw -4(r1),r9
    let raw = 0xD7E1_4FFC;
    assert_eq!(name_of(raw), Some("l.sw"));
    assert_eq!(disasm(raw), "l.sw -0x4(r1),r9");

    let tables = or1k();
    let operands = tables.extract(raw, tables.decode(raw).unwrap());
    let displacement = operands.displacement().unwrap();
    assert_eq!(displacement.as_signed(), -4);
    assert_eq!(displacement.base, 1);
}

#[test]
fn test_load() {
    assert_eq!(disasm(0x8461_0008), "l.lwz r3,0x8(r1)");
}

#[test]
fn test_mtspr_split_immediate() {
    // l.mtspr r0,r3,0x1234: K is split over bits 25..21 and 10..0
    let raw = 0xC040_1A34;
    assert_eq!(disasm(raw), "l.mtspr r0,r3,0x1234");
}

#[test]
fn test_jump_offsets() {
    assert_eq!(disasm(0x0000_0010), "l.j 0x10");
    assert_eq!(disasm(0x03FF_FFFF), "l.j -0x1");
    assert_eq!(disasm(0x0200_0000), "l.j -0x2000000");

    let tables = or1k();
    let bf = tables.spec(tables.find("l.bf").unwrap()).unwrap();
    assert!(bf.has_delay_slot());
    assert_eq!(bf.category, InsnCategory::Branch);
    assert_eq!(name_of(0x1000_0000), Some("l.bf"));
}

#[test]
fn test_compare_immediate() {
    assert_eq!(disasm(0xBC03_FFFF), "l.sfeqi r3,-0x1");
}

#[test]
fn test_nop_and_system() {
    assert_eq!(disasm(0x1500_0000), "l.nop 0x0");
    assert_eq!(disasm(0x1500_0001), "l.nop 0x1");
    assert_eq!(disasm(0x2000_0005), "l.sys 0x5");
    assert_eq!(disasm(0x2100_0005), "l.trap 0x5");
    assert_eq!(disasm(0x2400_0000), "l.rfe");
    assert_eq!(disasm(0x27FF_FFFF), "l.rfe");
}

#[test]
fn test_movhi_and_macrc_share_a_major_opcode() {
    assert_eq!(disasm(0x18A0_DEAD), "l.movhi r5,0xdead");
    assert_eq!(disasm(0x18A1_0000), "l.macrc r5");
    // Same path as l.macrc, but its low half must be zero
    assert_eq!(name_of(0x18A1_0001), None);
}

#[test]
fn test_custom_slots() {
    assert_eq!(disasm(0x7000_0000), "l.cust1");
    assert_eq!(name_of(0x7123_ABCD), Some("l.cust1"));
    assert_eq!(name_of(0xFC00_0000), Some("l.cust8"));
    assert_eq!(disasm(0xF022_1864), "l.cust5 r1,r2,r3,0x3,0x4");
}

#[test]
fn test_reserved_words_are_invalid() {
    // Unassigned major opcode 0x07 and the vector space at 0x0A
    assert_eq!(name_of(0x1C00_0000), None);
    assert_eq!(name_of(0x2800_0000), None);
    // l.sys-like word with non-zero reserved bits
    assert_eq!(name_of(0x2020_0005), None);
    assert!(or1k().disassemble(0x1C00_0000).is_none());
}

#[test]
fn test_invalid_is_deterministic() {
    let tables = or1k();
    for _ in 0..3 {
        assert_eq!(tables.decode(0x1C00_0000), None);
        assert_eq!(tables.decode(0x18A1_0001), None);
    }
}

#[test]
fn test_lookup_api() {
    let tables = or1k();
    let index = tables.find("l.sw").unwrap();
    let field = tables.field_mask(index).unwrap();
    assert_eq!(field.mask, 0xFC00_0000);
    assert_eq!(field.value, 0xD400_0000);
    assert_eq!(tables.operand_count(index), Some(2));
    assert_eq!(tables.program(index).unwrap().len(), 4);

    assert_eq!(tables.find("l.bogus"), None);
    assert_eq!(tables.spec(tables.len()), None);
    assert_eq!(tables.operand_count(tables.len()), None);
    assert!(tables.extract(0, tables.len()).is_empty());
}

#[test]
fn test_flat_form_agrees() {
    let tables = or1k();
    let flat = tables.automaton().serialize();
    for raw in [0x9C64_0010, 0xD7E1_4FFC, 0x1C00_0000, 0x18A1_0001, 0x7000_0000, 0xF022_1864] {
        assert_eq!(or1k_decode::walk_flat(&flat, raw), tables.automaton().walk(raw));
    }
}
