//! The capability surface the FORMAT interpreter drives.

use crate::code_unit::CodeUnit;
use crate::format_specs::Modes;

/// What the current I/O statement lets the FORMAT interpreter do.
///
/// The scanner and the scalar formatters never touch a destination buffer
/// directly; they emit characters and position changes through this trait.
/// The default methods reject every capability with a descriptive crash, so
/// a statement kind only implements what it supports — an output statement
/// overrides [`emit`](FormatSink::emit) and the positioning handlers, an
/// input statement would not.
///
/// `emit` and the positioning handlers return `false` to signal that the
/// current record is full; the interpreter then abandons the operation in
/// progress without emitting anything further.
pub trait FormatSink<C: CodeUnit> {
    fn emit(&mut self, _data: &[C]) -> bool {
        self.crash("Cannot emit data from this FORMAT string")
    }

    fn handle_slash(&mut self, _n: i32) -> bool {
        self.crash("A / control edit descriptor may not appear in this FORMAT string")
    }

    fn handle_absolute_position(&mut self, _n: i32) -> bool {
        self.crash("A Tn control edit descriptor may not appear in this FORMAT string")
    }

    fn handle_relative_position(&mut self, _n: i32) -> bool {
        self.crash("An nX, TLn, or TRn control edit descriptor may not appear in this FORMAT string")
    }

    /// The modal editing state this statement owns.
    fn modes(&mut self) -> &mut Modes;

    /// Report a fatal condition (malformed FORMAT, capability misuse, edit
    /// descriptor and value type mismatch). Does not return; the statement
    /// layer decides what termination means.
    fn crash(&self, message: &str) -> ! {
        panic!("fatal Fortran runtime I/O error: {message}")
    }
}
