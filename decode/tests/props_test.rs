use or1k_decode::{or1k, OperandKind, Template};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2048,
        .. ProptestConfig::default()
    })]

    /// Any word carrying an opcode's fixed bits decodes to that opcode
    #[test]
    fn fixed_bits_select_their_opcode(index in 0..or1k().len(), noise in any::<u32>()) {
        let tables = or1k();
        let field = tables.field_mask(index).unwrap();
        let raw = (noise & !field.mask) | field.value;
        prop_assert_eq!(tables.decode(raw), Some(index), "raw={:#010x}", raw);
    }

    /// Flipping bits an opcode does not fix never changes the decode result
    #[test]
    fn free_bits_do_not_matter(raw in any::<u32>(), noise in any::<u32>()) {
        let tables = or1k();
        if let Some(index) = tables.decode(raw) {
            let field = tables.field_mask(index).unwrap();
            prop_assert_eq!(tables.decode(raw ^ (noise & !field.mask)), Some(index));
        }
    }

    /// The flat form follows the same path as the arena
    #[test]
    fn flat_walk_agrees(raw in any::<u32>()) {
        let automaton = or1k().automaton();
        let flat = automaton.serialize();
        prop_assert_eq!(or1k_decode::walk_flat(&flat, raw), automaton.walk(raw));
    }

    /// A store's split immediate comes back as the signed offset that was encoded
    #[test]
    fn store_offsets_round_trip(offset in any::<i16>(), base in 0u32..32, src in 0u32..32) {
        let tables = or1k();
        let index = tables.find("l.sw").unwrap();
        let template = Template::parse(tables.spec(index).unwrap().template).unwrap();
        let raw = template.field().value;
        let raw = template.insert(raw, 'I', offset as u16 as u32);
        let raw = template.insert(raw, 'A', base);
        let raw = template.insert(raw, 'B', src);

        prop_assert_eq!(tables.decode(raw), Some(index));
        let operands = tables.extract(raw, index);
        prop_assert_eq!(operands[0].kind, OperandKind::Displacement);
        prop_assert_eq!(operands[0].as_signed(), i32::from(offset));
        prop_assert_eq!(operands[0].base, base);
        prop_assert_eq!(operands[1].value, src);
    }
}
