//! Statement-level entry points for formatted output.
//!
//! These functions mirror the begin/transfer/end shape of a compiled I/O
//! statement: begin hands back an opaque [`Cookie`], each data transfer
//! call edits one value, and ending the statement plays out trailing edits
//! and reports the [`Iostat`]. The cookie's borrow of the buffer replaces
//! the raw pointer and length parameters a C-callable rendition of these
//! entry points would take.
//!
//! ```
//! use fortio::io_api::*;
//! use fortio::io_error::Iostat;
//!
//! let mut buffer = [0u8; 16];
//! let mut io = begin_internal_formatted_output(&mut buffer, "(SP,2I4)", file!(), line!() as i32);
//! assert!(output_integer64(&mut io, 7));
//! assert!(output_integer64(&mut io, -3));
//! assert_eq!(end_io_statement(io), Iostat::Ok);
//! assert_eq!(&buffer, b"  +7  -3        ");
//! ```
use crate::io_error::Iostat;
use crate::io_stmt::InternalFormattedOutput;

/// Opaque handle to an I/O statement in progress.
pub type Cookie<'io> = InternalFormattedOutput<'io, u8>;

/// Begin an internal WRITE: blank-fill `buffer` and prepare to interpret
/// `format` against it. `source_file`/`source_line` name the statement in
/// crash messages; pass `""` and `0` when unknown.
pub fn begin_internal_formatted_output<'io>(
    buffer: &'io mut [u8],
    format: &'io str,
    source_file: &'static str,
    source_line: i32,
) -> Cookie<'io> {
    InternalFormattedOutput::new(buffer, format.as_bytes(), source_file, source_line)
}

/// Edit one integer value under the statement's next data edit descriptor.
/// Returns `false` once the record is full.
pub fn output_integer64(io: &mut Cookie, n: i64) -> bool {
    io.output_integer64(n)
}

/// Reserved: consumes the next data edit descriptor (which must be an `E`
/// edit) and returns `false`.
pub fn output_real64(io: &mut Cookie, value: f64) -> bool {
    io.output_real64(value)
}

/// End the statement, emitting any trailing literal and control edits, and
/// report its status.
pub fn end_io_statement(io: Cookie) -> Iostat {
    io.end_io_statement()
}
