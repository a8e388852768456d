//! Register identifier space: encoding, classification, parsing.

use m68k_cycles::Reg;

#[test]
fn data_registers_occupy_low_indices() {
    for n in 0..8 {
        let r = Reg::data(n);
        assert_eq!(r.index(), n);
        assert!(r.is_dreg());
        assert!(!r.is_areg());
        assert!(!r.is_pc());
    }
}

#[test]
fn address_registers_occupy_high_indices() {
    for n in 0..8 {
        let r = Reg::addr(n);
        assert_eq!(r.index(), 8 + n);
        assert!(r.is_areg());
        assert!(!r.is_dreg());
    }
}

#[test]
fn pc_is_index_16() {
    let pc = Reg::pc();
    assert_eq!(pc.index(), 16);
    assert!(pc.is_pc());
    assert!(!pc.is_areg());
    assert!(!pc.is_dreg());
}

#[test]
fn is_areg_matches_the_spec_bit_test() {
    for idx in 0..=16u8 {
        let expected = idx & 0b1_1000 == 0b0_1000;
        let r = if idx < 8 {
            Reg::data(idx)
        } else if idx < 16 {
            Reg::addr(idx - 8)
        } else {
            Reg::pc()
        };
        assert_eq!(r.is_areg(), expected, "index {idx}");
    }
}

#[test]
fn parse_round_trips_through_display() {
    for n in 0..8 {
        assert_eq!(Reg::parse(&format!("d{n}")), Some(Reg::data(n)));
        assert_eq!(Reg::parse(&format!("D{n}")), Some(Reg::data(n)));
        assert_eq!(Reg::parse(&format!("a{n}")), Some(Reg::addr(n)));
    }
    assert_eq!(Reg::parse("pc"), Some(Reg::pc()));
    assert_eq!(Reg::parse("PC"), Some(Reg::pc()));
}

#[test]
fn parse_rejects_garbage() {
    assert_eq!(Reg::parse("d8"), None);
    assert_eq!(Reg::parse("a9"), None);
    assert_eq!(Reg::parse("x0"), None);
    assert_eq!(Reg::parse("d"), None);
    assert_eq!(Reg::parse("d10"), None);
    assert_eq!(Reg::parse(""), None);
}

#[test]
fn display_round_trip() {
    assert_eq!(Reg::data(3).to_string(), "d3");
    assert_eq!(Reg::addr(5).to_string(), "a5");
    assert_eq!(Reg::pc().to_string(), "pc");
}
