//! End-to-end acceptance scenarios: whole kernels through the parser and
//! both cost models, matching the documented expected values.

use m68k_cycles::cpu_model::{CpuModel, CycleTriple};
use m68k_cycles::model020::{cost, Model020};
use m68k_cycles::model060::Model060;
use m68k_cycles::parser::{parse_line, parse_program};

#[test]
fn moveq_alone() {
    let instructions = parse_program("moveq #1,d0\n").unwrap();
    assert_eq!(cost(&instructions[0]).unwrap(), CycleTriple::new(0, 2, 3));

    let mut cpu = Model060::new();
    let avg = cpu.simulate(&instructions, 0, false).unwrap();
    assert!((avg - 1.0).abs() < f64::EPSILON);
}

#[test]
fn move_l_then_add_l_reading_the_same_register_pairs_via_forwarding() {
    let instructions = parse_program("move.l d0,d1\nadd.l d1,d2\n").unwrap();
    let mut cpu = Model060::new();
    let avg = cpu.simulate(&instructions, 0, false).unwrap();
    assert!((avg - 1.0).abs() < f64::EPSILON);
}

#[test]
fn move_l_then_load_through_the_written_address_register_stalls() {
    let instructions = parse_program("move.l d0,a0\nmove.l (a0),d1\n").unwrap();
    let mut cpu = Model060::new();
    let avg = cpu.simulate(&instructions, 0, false).unwrap();
    // 1 (move) + 2 (change/use stall) + 1 (move) = 4 total cycles.
    assert!((avg - 4.0).abs() < f64::EPSILON);
}

#[test]
fn lea_is_not_in_the_opcode_table() {
    let err = parse_line("lea 4(a0),a1", 1).unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("lea"), "error should name the opcode: {rendered}");
}

#[test]
fn muls_l_cost_composes_base_table_with_the_word_immediate_fetch() {
    let instructions = parse_program("muls.l d0,d1\n").unwrap();
    assert_eq!(cost(&instructions[0]).unwrap(), CycleTriple::new(41, 45, 47));
}

#[test]
fn bra_is_zero_cycles_on_060_and_assumed_taken_on_020() {
    let instructions = parse_program("bra lbl\n").unwrap();
    assert_eq!(cost(&instructions[0]).unwrap(), CycleTriple::new(3, 6, 9));

    let mut cpu = Model060::new();
    let avg = cpu.simulate(&instructions, 0, false).unwrap();
    assert!((avg - 0.0).abs() < f64::EPSILON);
}

#[test]
fn a_small_accumulation_loop_simulates_without_error_on_both_models() {
    let text = "\
        moveq #0,d0\n\
        move.l (a0)+,d1\n\
        add.l d1,d0\n\
        dbra d2,loop\n\
    ";
    let instructions = parse_program(text).unwrap();

    let mut m020 = Model020::new();
    let total020 = m020.simulate(&instructions, 0, false).unwrap();
    assert!(total020 > 0.0);

    let mut m060 = Model060::new();
    let total060 = m060.simulate(&instructions, 3, false).unwrap();
    assert!(total060 > 0.0);
}
