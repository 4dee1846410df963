//! State of an I/O statement in progress.
//!
//! An internal formatted output statement owns the destination buffer for
//! its lifetime, tracks the position within it, and exposes the sink
//! capabilities the FORMAT interpreter drives. The buffer is one record:
//! writing past its end raises the end-of-record condition, and format
//! reversion continues in place rather than starting a new record.
use crate::code_unit::CodeUnit;
use crate::edit_output;
use crate::format_specs::Modes;
use crate::io_error::{ErrorState, Iostat};
use crate::scanner::FormatControl;
use crate::sink::FormatSink;

/// An internal WRITE with a FORMAT, from begin to end.
///
/// Constructed over a caller-supplied buffer and format; the buffer is
/// blank-filled up front, so everything the format does not touch stays
/// blank. Values are handed in one at a time through the `output_*`
/// methods, and [`end_io_statement`](InternalFormattedOutput::end_io_statement)
/// plays out any trailing edits and reports the statement's status.
pub struct InternalFormattedOutput<'io, C: CodeUnit = u8> {
    common: InternalOutputSink<'io, C>,
    format: FormatControl<'io, C>,
}

impl<'io, C: CodeUnit> InternalFormattedOutput<'io, C> {
    pub fn new(
        buffer: &'io mut [C],
        format: &'io [C],
        source_file: &'static str,
        source_line: i32,
    ) -> Self {
        let mut common = InternalOutputSink {
            buffer,
            at: 0,
            modes: Modes::default(),
            error: ErrorState::new(source_file, source_line),
        };
        common.buffer.fill(C::from_ascii(b' '));
        let nesting = FormatControl::max_parenthesis_nesting(&common, format);
        let format = FormatControl::new(&common, format, nesting as usize + 2);
        Self { common, format }
    }

    /// Edit one integer under the next data edit descriptor.
    pub fn output_integer64(&mut self, n: i64) -> bool {
        match self.format.get_next(&mut self.common, 1) {
            Some(edit) => edit_output::output_integer(&mut self.common, &edit, n),
            None => false,
        }
    }

    /// Edit one real value under the next data edit descriptor. Real
    /// output editing is reserved: an `E` edit fails without emitting,
    /// and any other descriptor crashes.
    pub fn output_real64(&mut self, value: f64) -> bool {
        match self.format.get_next(&mut self.common, 1) {
            Some(edit) => edit_output::output_real(&mut self.common, &edit, value),
            None => false,
        }
    }

    /// Finish the statement: emit trailing literal and control edits up to
    /// a colon or the end of the format, and report the status.
    pub fn end_io_statement(mut self) -> Iostat {
        self.format.finish_output(&mut self.common);
        self.common.error.iostat()
    }
}

/// The sink half of the statement: buffer, position, status, and modes.
/// Split from the format control so the interpreter can borrow both halves
/// at once.
struct InternalOutputSink<'io, C> {
    buffer: &'io mut [C],
    at: usize,
    modes: Modes,
    error: ErrorState,
}

impl<'io, C: CodeUnit> FormatSink<C> for InternalOutputSink<'io, C> {
    fn emit(&mut self, data: &[C]) -> bool {
        if self.at + data.len() > self.buffer.len() {
            self.error.signal_eor();
            if self.at < self.buffer.len() {
                let fit = self.buffer.len() - self.at;
                self.buffer[self.at..].copy_from_slice(&data[..fit]);
                self.at = self.buffer.len();
            }
            false
        } else {
            self.buffer[self.at..self.at + data.len()].copy_from_slice(data);
            self.at += data.len();
            true
        }
    }

    fn handle_slash(&mut self, _n: i32) -> bool {
        // One-record internal unit: record boundaries, including the
        // implied one at format reversion, have nowhere to go.
        true
    }

    fn handle_absolute_position(&mut self, n: i32) -> bool {
        let n = n.max(0) as usize;
        if n >= self.buffer.len() {
            self.error.signal_eor();
            false
        } else {
            self.at = n;
            true
        }
    }

    fn handle_relative_position(&mut self, n: i32) -> bool {
        if n < 0 {
            self.at -= self.at.min(n.unsigned_abs() as usize);
            true
        } else if self.at + n as usize > self.buffer.len() {
            self.error.signal_eor();
            self.at = self.buffer.len();
            false
        } else {
            self.at += n as usize;
            true
        }
    }

    fn modes(&mut self) -> &mut Modes {
        &mut self.modes
    }

    fn crash(&self, message: &str) -> ! {
        self.error.crash(message)
    }
}
