//! End-to-end internal WRITE statements driven through the public API.

use fortio::io_api::{begin_internal_formatted_output, end_io_statement, output_integer64};
use fortio::io_error::Iostat;
use fortio::io_stmt::InternalFormattedOutput;

/// Run one statement over a blank buffer of `LEN` bytes and return the
/// buffer contents.
fn write_statement<const LEN: usize>(format: &str, values: &[i64]) -> [u8; LEN] {
    let mut buffer = [0u8; LEN];
    let mut io = begin_internal_formatted_output(&mut buffer, format, file!(), line!() as i32);
    for &value in values {
        assert!(
            output_integer64(&mut io, value),
            "output of {value} under {format} reported failure"
        );
    }
    assert_eq!(end_io_statement(io), Iostat::Ok, "{format} did not end cleanly");
    buffer
}

#[test]
fn hollerith_literals_and_hex() {
    let got: [u8; 32] = write_statement(
        "(12HHELLO, WORLD,2X,I3,1X,'0x',Z8)",
        &[678, 0xFEEDFACE],
    );
    let mut expected = [b' '; 32];
    expected[..28].copy_from_slice(b"HELLO, WORLD  678 0xFEEDFACE");
    assert_eq!(got, expected);
}

#[test]
fn minimum_digits_pad_with_zeros() {
    let got: [u8; 5] = write_statement("(I5.3)", &[7]);
    assert_eq!(&got, b"  007");
}

#[test]
fn zero_with_zero_digits_is_a_blank_field() {
    let got: [u8; 5] = write_statement("(I5.0)", &[0]);
    assert_eq!(&got, b"     ");
}

#[test]
fn sign_plus_survives_format_reversion() {
    let got: [u8; 8] = write_statement("(SP,I4)", &[7, -3]);
    assert_eq!(&got, b"  +7  -3");
}

#[test]
fn hexadecimal_field() {
    let got: [u8; 4] = write_statement("(Z4)", &[255]);
    assert_eq!(&got, b"  FF");
}

#[test]
fn grouped_edits_interleave_their_literals() {
    let got: [u8; 8] = write_statement("(2(I2,','),I2)", &[1, 2, 3]);
    assert_eq!(&got, b" 1, 2, 3");
}

#[test]
fn field_overflow_is_asterisks() {
    let got: [u8; 3] = write_statement("(I3)", &[1234]);
    assert_eq!(&got, b"***");
}

#[test]
fn trailing_edits_are_played_out_at_end() {
    let mut buffer = [0u8; 12];
    let mut io = begin_internal_formatted_output(&mut buffer, "(I2,' done')", file!(), 0);
    assert!(output_integer64(&mut io, 42));
    assert_eq!(end_io_statement(io), Iostat::Ok);
    assert_eq!(&buffer, b"42 done     ");
}

#[test]
fn colon_cuts_off_trailing_edits() {
    let mut buffer = [0u8; 12];
    let mut io = begin_internal_formatted_output(&mut buffer, "(I2,:,' not')", file!(), 0);
    assert!(output_integer64(&mut io, 42));
    assert_eq!(end_io_statement(io), Iostat::Ok);
    assert_eq!(&buffer, b"42          ");
}

#[test]
fn record_overflow_reports_eor() {
    let mut buffer = [0u8; 6];
    let mut io = begin_internal_formatted_output(&mut buffer, "(I4,I4)", file!(), 0);
    assert!(output_integer64(&mut io, 1));
    assert!(!output_integer64(&mut io, 2));
    assert_eq!(end_io_statement(io), Iostat::Eor);
    assert_eq!(&buffer, b"   1  ");
}

#[test]
fn wide_code_units_carry_literals_verbatim() {
    let format: Vec<u16> = "(2HAB,I3)".bytes().map(u16::from).collect();
    let mut buffer = [0u16; 8];
    let mut io = InternalFormattedOutput::new(&mut buffer, &format, file!(), 0);
    assert!(io.output_integer64(-5));
    assert_eq!(io.end_io_statement(), Iostat::Ok);
    let expected: Vec<u16> = "AB -5   ".bytes().map(u16::from).collect();
    assert_eq!(buffer.to_vec(), expected);
}

#[test]
#[should_panic(expected = "Unlimited repetition in FORMAT lacks data edit descriptors")]
fn unlimited_group_without_data_edit_is_fatal() {
    let mut buffer = [0u8; 8];
    let mut io = begin_internal_formatted_output(&mut buffer, "(*(1X))", file!(), 0);
    output_integer64(&mut io, 1);
}
