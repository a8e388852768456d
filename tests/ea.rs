//! Effective-address invariants: `is_memory`, `has_extra`, word counts.

use m68k_cycles::Reg;
use m68k_cycles::ea::{Ea, IndexField, IndexSize, Other};

fn all_eas() -> Vec<Ea> {
    let d0 = Reg::data(0);
    let a0 = Reg::addr(0);
    let idx = IndexField {
        index: Reg::data(1),
        size: IndexSize::Word,
        scale: 1,
        disp: 4,
    };
    vec![
        Ea::Dn(d0),
        Ea::An(a0),
        Ea::Ind(a0),
        Ea::IndPostInc(a0),
        Ea::IndPreDec(a0),
        Ea::IndDisp(a0, 100),
        Ea::IndIndex(a0, idx),
        Ea::Other(Other::AbsWord(0x1000)),
        Ea::Other(Other::AbsLong(0x0010_0000)),
        Ea::Other(Other::PcDisp(8)),
        Ea::Other(Other::PcIndex(idx)),
        Ea::Other(Other::Immediate(42)),
    ]
}

#[test]
fn is_memory_matches_the_spec_predicate() {
    for ea in all_eas() {
        let expected = !matches!(ea, Ea::Dn(_) | Ea::An(_) | Ea::Other(Other::Immediate(_)));
        assert_eq!(ea.is_memory(), expected, "{ea}");
    }
}

#[test]
fn has_extra_matches_modes_that_carry_payload() {
    let a0 = Reg::addr(0);
    assert!(!Ea::Dn(Reg::data(0)).has_extra());
    assert!(!Ea::An(a0).has_extra());
    assert!(!Ea::Ind(a0).has_extra());
    assert!(!Ea::IndPostInc(a0).has_extra());
    assert!(!Ea::IndPreDec(a0).has_extra());
    assert!(Ea::IndDisp(a0, 4).has_extra());
    assert!(Ea::Other(Other::Immediate(1)).has_extra());
    assert!(Ea::Other(Other::AbsWord(1)).has_extra());
}

#[test]
fn encoded_word_count_register_modes_are_free() {
    let a0 = Reg::addr(0);
    assert_eq!(Ea::Dn(Reg::data(0)).encoded_word_count(true), 0);
    assert_eq!(Ea::An(a0).encoded_word_count(true), 0);
    assert_eq!(Ea::Ind(a0).encoded_word_count(true), 0);
    assert_eq!(Ea::IndPostInc(a0).encoded_word_count(true), 0);
    assert_eq!(Ea::IndPreDec(a0).encoded_word_count(true), 0);
}

#[test]
fn encoded_word_count_displacement_and_index_modes_cost_one_word() {
    let a0 = Reg::addr(0);
    let idx = IndexField {
        index: Reg::data(1),
        size: IndexSize::Word,
        scale: 1,
        disp: 4,
    };
    assert_eq!(Ea::IndDisp(a0, 4).encoded_word_count(false), 1);
    assert_eq!(Ea::IndIndex(a0, idx).encoded_word_count(false), 1);
    assert_eq!(Ea::Other(Other::AbsWord(4)).encoded_word_count(false), 1);
    assert_eq!(Ea::Other(Other::PcDisp(4)).encoded_word_count(false), 1);
    assert_eq!(Ea::Other(Other::PcIndex(idx)).encoded_word_count(false), 1);
}

#[test]
fn encoded_word_count_abs_long_is_two_words_regardless_of_operand_size() {
    assert_eq!(Ea::Other(Other::AbsLong(1)).encoded_word_count(false), 2);
    assert_eq!(Ea::Other(Other::AbsLong(1)).encoded_word_count(true), 2);
}

#[test]
fn encoded_word_count_immediate_follows_operand_size() {
    assert_eq!(Ea::Other(Other::Immediate(1)).encoded_word_count(false), 1);
    assert_eq!(Ea::Other(Other::Immediate(1)).encoded_word_count(true), 2);
}

#[test]
fn brief_extension_word_only_on_ind_index() {
    let a0 = Reg::addr(0);
    let idx = IndexField {
        index: Reg::data(2),
        size: IndexSize::Long,
        scale: 4,
        disp: -8,
    };
    let ea = Ea::IndIndex(a0, idx);
    assert_eq!(ea.brief_extension_word(), Some(idx));
    assert_eq!(Ea::Ind(a0).brief_extension_word(), None);
    // d8(pc,Xn) has no addressable base register to report.
    assert_eq!(Ea::Other(Other::PcIndex(idx)).brief_extension_word(), None);
}

#[test]
fn base_and_index_reg_accessors() {
    let a0 = Reg::addr(0);
    let d1 = Reg::data(1);
    let idx = IndexField {
        index: d1,
        size: IndexSize::Word,
        scale: 2,
        disp: 0,
    };
    let ea = Ea::IndIndex(a0, idx);
    assert_eq!(ea.base_reg(), Some(a0));
    assert_eq!(ea.index_reg(), Some(d1));
    assert_eq!(Ea::Dn(d1).base_reg(), None);
    assert_eq!(Ea::Dn(d1).index_reg(), None);
}

#[test]
fn display_renders_canonical_syntax() {
    let a0 = Reg::addr(0);
    assert_eq!(Ea::Dn(Reg::data(3)).to_string(), "d3");
    assert_eq!(Ea::Ind(a0).to_string(), "(a0)");
    assert_eq!(Ea::IndPostInc(a0).to_string(), "(a0)+");
    assert_eq!(Ea::IndPreDec(a0).to_string(), "-(a0)");
    assert_eq!(Ea::IndDisp(a0, 8).to_string(), "8(a0)");
    assert_eq!(Ea::Other(Other::Immediate(5)).to_string(), "#5");
}
