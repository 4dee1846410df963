//! Runtime support for Fortran-style formatted output.
//!
//! This crate interprets FORMAT strings such as `"(2X,I5.3,'K')"` on behalf
//! of a formatted output statement. The interpreter is re-entrant: each
//! request for the next data edit descriptor advances the format, emitting
//! literal text and applying control edits along the way, and stops on the
//! descriptor that tells the caller how to edit its next value.
//!
//! The usual entry points are the statement-level functions in [`io_api`]:
//!
//! ```
//! use fortio::io_api::{begin_internal_formatted_output, output_integer64, end_io_statement};
//! use fortio::io_error::Iostat;
//!
//! let mut buffer = [0u8; 8];
//! let mut io = begin_internal_formatted_output(&mut buffer, "(I5.3)", file!(), line!() as i32);
//! assert!(output_integer64(&mut io, 7));
//! assert_eq!(end_io_statement(io), Iostat::Ok);
//! assert_eq!(&buffer, b"  007   ");
//! ```
//!
//! The interpreter itself ([`scanner::FormatControl`]) is independent of any
//! particular destination: it drives a [`sink::FormatSink`], the capability
//! set of the I/O statement in progress.

pub mod code_unit;
pub mod edit_output;
pub mod format_specs;
pub mod io_api;
pub mod io_error;
pub mod io_stmt;
pub mod scanner;
pub mod sink;
