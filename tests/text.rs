mod common;

use std::fmt::Write;

use common::osd;
use max7456::{
    registers::{Dmm, Register},
    textmode::display_address,
    TextMode,
};

#[test]
fn render_text_sequence() {
    let (mut osd, chip) = osd();
    osd.render_text(b"AB", 5, 2, true, false).unwrap();

    let chip = chip.borrow();
    assert_eq!(
        chip.writes(),
        vec![
            (0x04, 0x11),
            (0x05, 0x00),
            (0x06, 65),
            (0x07, b'A'),
            (0x07, b'B'),
            (0x07, 0xFF),
        ]
    );
    assert_eq!(chip.text_at(65, 3), vec![b'A', b'B', 0]);
    assert_eq!(chip.violations, 0);
}

#[test]
fn attributes_are_set_per_run() {
    let (mut osd, chip) = osd();
    osd.render_text(b"x", 0, 0, true, true).unwrap();
    osd.render_text(b"y", 0, 1, false, true).unwrap();

    let writes = chip.borrow().writes();
    assert_eq!(writes[0], (0x04, 0x19));
    assert_eq!(writes[5], (0x04, 0x09));
}

#[test]
fn lower_rows_use_address_bit_8() {
    let (mut osd, chip) = osd();
    osd.print_str("END", 27, 15, false, false).unwrap();

    let chip = chip.borrow();
    let address = display_address(27, 15);
    assert_eq!(address, 477);
    assert_eq!(&chip.writes()[1..3], &[(0x05, 0x01), (0x06, (477 - 256) as u8)]);
    assert_eq!(chip.text_at(477, 3), b"END".to_vec());
}

#[test]
fn text_stops_at_the_end_marker() {
    let (mut osd, chip) = osd();
    osd.render_glyphs(&[1, 2, 0xFF, 3], 0, 0, false, false)
        .unwrap();

    let chip = chip.borrow();
    assert_eq!(chip.text_at(0, 4), vec![1, 2, 0, 0]);
    assert_eq!(chip.writes().len(), 3 + 2 + 1);
}

#[test]
fn single_glyph() {
    let (mut osd, chip) = osd();
    osd.render_glyph(0xF0, 29, 12, false, false).unwrap();
    assert_eq!(chip.borrow().display[389], 0xF0);
}

#[test]
fn numbers() {
    let (mut osd, chip) = osd();
    osd.render_number(3.14, 0, 0, 3, 4, false, false).unwrap();
    osd.render_number(-1.5, 0, 1, 3, 1, false, false).unwrap();
    osd.render_number(-1.5, 0, 2, 2, 1, false, false).unwrap();

    let chip = chip.borrow();
    assert_eq!(chip.text_at(0, 8), b"003.1400".to_vec());
    assert_eq!(chip.text_at(30, 6), b"-01.5\0".to_vec());
    assert_eq!(chip.text_at(60, 5), b"-1.5\0".to_vec());
}

#[test]
fn wide_numbers_run_into_the_next_row() {
    let (mut osd, chip) = osd();
    osd.render_number(1.0, 0, 3, 20, 20, false, false).unwrap();

    let chip = chip.borrow();
    let mut expected = b"00000000000000000001.".to_vec();
    expected.extend_from_slice(&[b'0'; 20]);
    assert_eq!(chip.text_at(90, 41), expected);
    assert_eq!(chip.text_at(131, 1), vec![0]);
}

#[test]
fn text_runs_leave_auto_increment_off() {
    let (mut osd, chip) = osd();
    osd.render_text(b"A", 0, 0, true, true).unwrap();
    assert!(!osd.registers().dmm.flag(Dmm::AUTO_INCREMENT));

    chip.borrow_mut().clear_log();
    osd.clear_screen().unwrap();
    assert_eq!(chip.borrow().writes(), vec![(0x04, 0x1C)]);
}

#[test]
fn unicode_becomes_question_marks() {
    let (mut osd, chip) = osd();
    osd.print_str("20°C", 0, 0, false, false).unwrap();
    assert_eq!(chip.borrow().text_at(0, 4), b"20?C".to_vec());
}

#[test]
fn write_macro_wraps_lines() {
    let (mut osd, chip) = osd();
    osd.set_position(28, 0);
    write!(osd, "ABCD\nE").unwrap();

    let chip = chip.borrow();
    assert_eq!(chip.text_at(28, 4), b"ABCD".to_vec());
    assert_eq!(chip.display[60], b'E');
    assert_eq!((osd.pos(), osd.row()), (1, 2));
}

#[test]
fn carriage_return_goes_back_to_column_zero() {
    let (mut osd, chip) = osd();
    osd.set_position(0, 3);
    write!(osd, "abc\rX").unwrap();
    assert_eq!(chip.borrow().text_at(90, 3), b"Xbc".to_vec());
}

#[test]
fn cursor_wraps_after_the_last_row() {
    let (mut osd, _chip) = osd();
    osd.set_position(0, 15);
    writeln!(osd, "last").unwrap();
    assert_eq!((osd.pos(), osd.row()), (0, 0));

    // out of range positions are ignored
    osd.set_position(30, 1);
    osd.set_position(2, 16);
    assert_eq!((osd.pos(), osd.row()), (0, 0));
}

#[test]
fn cls_clears_and_homes() {
    let (mut osd, chip) = osd();
    osd.set_position(4, 4);
    write!(osd, "x").unwrap();
    osd.cls().unwrap();

    assert_eq!((osd.pos(), osd.row()), (0, 0));
    assert!(chip.borrow().display.iter().all(|b| *b == 0));
}
