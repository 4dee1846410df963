//! The FORMAT interpreter: scanning, group iteration, and control edits.
//!
//! [`FormatControl`] walks a FORMAT string on demand. Each call to
//! [`get_next`](FormatControl::get_next) advances until a data edit
//! descriptor is found, emitting character literals and Hollerith text,
//! applying control edits, and iterating parenthesized groups along the
//! way. The walk is resumable: between calls the scanner rests immediately
//! before the next unparsed character, and an explicit stack of group
//! frames carries the repeat state across calls.
//!
//! Scanning generally assumes the format has survived the pre-pass
//! validator ([`FormatControl::max_parenthesis_nesting`]); what it still
//! checks, it reports through the sink's crash handler.
use crate::code_unit::CodeUnit;
use crate::format_specs::{DataEdit, RoundingMode};
use crate::sink::FormatSink;

/// Sentinel for a group that repeats without bound: the outermost group
/// (format reversion) and any `*(...)` group.
const UNLIMITED: i32 = -1;

/// Stand-in for a code unit outside the ASCII range; matches no format
/// syntax, so such units fall through to the invalid-character crash.
const NON_ASCII: u8 = 0xFF;

/// One active parenthesized group (or synthetic repeat of a lone edit
/// descriptor): where its body starts and how many more iterations remain.
#[derive(Debug, Clone, Copy)]
struct Frame {
    start: u32,
    remaining: i32,
}

/// Re-entrant interpreter for one FORMAT string.
///
/// Lives for the duration of a single I/O statement. The frame stack is
/// sized once at construction; no allocation happens afterwards.
pub struct FormatControl<'f, C> {
    format: &'f [C],
    offset: usize,
    max_height: usize,
    stack: Vec<Frame>,
}

impl<'f, C: CodeUnit> FormatControl<'f, C> {
    /// `max_height` is the validator's maximum nesting depth plus two: one
    /// slot for the frame covering the whole format and one for a repeated
    /// non-parenthesized edit descriptor.
    pub fn new<S: FormatSink<C>>(sink: &S, format: &'f [C], max_height: usize) -> Self {
        if max_height > i8::MAX as usize {
            sink.crash(&format!(
                "internal runtime error: FORMAT nesting depth {max_height} out of range"
            ));
        }
        Self {
            format,
            offset: 0,
            max_height,
            stack: Vec::with_capacity(max_height),
        }
    }

    /// One-pass pre-validation: the deepest `(` nesting in the format,
    /// ignoring parentheses inside character literals and Hollerith text.
    /// Complains through the sink's crash handler on malformed input that
    /// would make the count meaningless.
    pub fn max_parenthesis_nesting<S: FormatSink<C>>(sink: &S, format: &[C]) -> i32 {
        let mut depth = 0i32;
        let mut max_depth = 0i32;
        // Most recently scanned integer field, for Hollerith counts.
        let mut pending: Option<i32> = None;
        let mut seen_significant = false;
        let mut i = 0;
        while i < format.len() {
            let ch = format[i]
                .to_ascii()
                .unwrap_or(NON_ASCII)
                .to_ascii_uppercase();
            if !seen_significant && !matches!(ch, b' ' | b'\t') {
                if ch != b'(' {
                    sink.crash("FORMAT lacks initial '('");
                }
                seen_significant = true;
            }
            match ch {
                b' ' | b'\t' => {}
                b'(' => {
                    depth += 1;
                    max_depth = max_depth.max(depth);
                    pending = None;
                }
                b')' => {
                    depth -= 1;
                    if depth < 0 {
                        sink.crash("FORMAT ')' is not preceded by a matching '('");
                    }
                    pending = None;
                }
                b'\'' | b'"' => {
                    let quote = ch;
                    i += 1;
                    while i < format.len() && format[i].to_ascii() != Some(quote) {
                        i += 1;
                    }
                    if i >= format.len() {
                        sink.crash("FORMAT missing closing quote on character literal");
                    }
                    pending = None;
                }
                b'0'..=b'9' => {
                    let digit = i32::from(ch - b'0');
                    pending = Some(pending.unwrap_or(0).saturating_mul(10).saturating_add(digit));
                }
                b'H' => {
                    let count = pending.take().unwrap_or(0);
                    if count < 1 || i + 1 + count as usize > format.len() {
                        sink.crash("Invalid width on Hollerith in FORMAT");
                    }
                    i += count as usize;
                }
                _ => {
                    pending = None;
                }
            }
            i += 1;
        }
        if !seen_significant {
            sink.crash("FORMAT lacks initial '('");
        }
        if depth != 0 {
            sink.crash("FORMAT missing closing parenthesis");
        }
        max_depth
    }

    /// Advance to the next data edit descriptor and return it.
    ///
    /// Emits literals, applies control edits, and iterates groups on the
    /// way. The returned edit's `repeat` is at most `max_repeat`; when a
    /// repeated descriptor is not consumed in full, the remainder is
    /// rescanned on the following call. Returns `None` when the sink
    /// signals end-of-record before a data edit is reached.
    pub fn get_next<S: FormatSink<C>>(&mut self, sink: &mut S, max_repeat: i32) -> Option<DataEdit> {
        let repeat = self.cue_up_next_data_edit(sink, false)?;

        let start = self.offset;
        let descriptor = self.get_next_char(sink).to_ascii_uppercase();
        let variation = if descriptor == b'E' {
            let second = self.peek_next().to_ascii_uppercase();
            if second.is_ascii_uppercase() {
                self.offset += 1;
                Some(second as char)
            } else {
                None
            }
        } else {
            None
        };

        let width = self.get_int_field(sink, 0);
        let modes = *sink.modes();
        let mut digits = None;
        let mut expo_digits = None;
        if self.peek_next() == b'.' {
            self.offset += 1;
            digits = Some(self.get_int_field(sink, 0));
            let ch = self.peek_next();
            if ch == b'e' || ch == b'E' || ch == b'd' || ch == b'D' {
                self.offset += 1;
                expo_digits = Some(self.get_int_field(sink, 0));
            }
        }

        // A repeat count on a non-parenthesized edit descriptor becomes a
        // synthetic frame whose start rescans the descriptor alone.
        if repeat > 1 {
            if self.stack.len() >= self.max_height {
                sink.crash("FORMAT stack overflow: too many nested parentheses");
            }
            self.stack.push(Frame {
                start: start as u32,
                remaining: repeat,
            });
        }
        let mut edit_repeat = 1;
        if self.stack.len() > 1 {
            let top = self.stack.len() - 1;
            let Frame {
                start: frame_start,
                remaining,
            } = self.stack[top];
            let parenthesized = self
                .format
                .get(frame_start as usize)
                .map_or(false, |&unit| unit.to_ascii() == Some(b'('));
            if !parenthesized {
                if remaining > max_repeat {
                    edit_repeat = max_repeat;
                    self.stack[top].remaining = remaining - max_repeat;
                    self.offset = frame_start as usize; // same descriptor next time
                } else {
                    edit_repeat = remaining;
                    self.stack.pop();
                }
            }
        }

        Some(DataEdit {
            descriptor: descriptor as char,
            variation,
            width,
            digits,
            expo_digits,
            repeat: edit_repeat,
            modes,
        })
    }

    /// Emit any trailing literal and control edits after the last data
    /// item, stopping at a `:`, at a data edit descriptor, or at the end
    /// of the FORMAT. Calling it again once the format is exhausted emits
    /// nothing further.
    pub fn finish_output<S: FormatSink<C>>(&mut self, sink: &mut S) {
        let _ = self.cue_up_next_data_edit(sink, true);
    }

    /// Locate the next data edit descriptor, handling everything else on
    /// the way. Returns its repeat count (default 1) with the scanner
    /// positioned at the descriptor letter; `Some(0)` when stop-at-colon
    /// processing reached a `:` or the end of the format; `None` when the
    /// sink signaled end-of-record.
    fn cue_up_next_data_edit<S: FormatSink<C>>(&mut self, sink: &mut S, stop: bool) -> Option<i32> {
        let mut unlimited_loop_check: Option<usize> = None;
        loop {
            let mut repeat: Option<i32> = None;
            let mut unlimited = false;
            let mut ch = match self.next_significant(sink, stop) {
                Some(ch) => ch,
                None => return Some(0),
            };
            // Commas are separators; missing ones are the validator's
            // complaint, not ours. A colon ends stop-mode processing.
            while ch == b',' || ch == b':' {
                if stop && ch == b':' {
                    return Some(0);
                }
                ch = match self.next_significant(sink, stop) {
                    Some(ch) => ch,
                    None => return Some(0),
                };
            }
            if ch == b'-' || ch == b'+' || ch.is_ascii_digit() {
                repeat = Some(self.get_int_field(sink, ch));
                ch = match self.next_significant(sink, stop) {
                    Some(ch) => ch,
                    None => return Some(0),
                };
            } else if ch == b'*' {
                unlimited = true;
                ch = match self.next_significant(sink, stop) {
                    Some(ch) => ch,
                    None => return Some(0),
                };
                if ch != b'(' {
                    sink.crash("Invalid FORMAT: '*' may appear only before '('");
                }
            }
            if ch == b'(' {
                if self.stack.len() >= self.max_height {
                    sink.crash("FORMAT stack overflow: too many nested parentheses");
                }
                let start = self.offset - 1; // the '('
                let remaining = if unlimited || self.stack.is_empty() {
                    unlimited_loop_check = Some(start + 1);
                    UNLIMITED
                } else if let Some(repeat) = repeat {
                    // A non-positive group repeat is forced to one for
                    // error recovery.
                    repeat.max(1) - 1
                } else {
                    0
                };
                self.stack.push(Frame {
                    start: start as u32,
                    remaining,
                });
            } else if self.stack.is_empty() {
                sink.crash("FORMAT lacks initial '('");
            } else if ch == b')' {
                if self.stack.len() == 1 {
                    if stop {
                        return Some(0); // end of FORMAT and no data items remain
                    }
                    // Implied / before the rightmost ')'.
                    if !sink.handle_slash(1) {
                        return None;
                    }
                }
                let top = self.stack.len() - 1;
                let Frame { start, remaining } = self.stack[top];
                if remaining == UNLIMITED {
                    self.offset = start as usize + 1;
                    if unlimited_loop_check == Some(self.offset) {
                        sink.crash("Unlimited repetition in FORMAT lacks data edit descriptors");
                    }
                } else if remaining > 0 {
                    self.stack[top].remaining = remaining - 1;
                    self.offset = start as usize + 1;
                } else {
                    self.stack.pop();
                }
            } else if ch == b'\'' || ch == b'"' {
                let quote = ch;
                let start = self.offset;
                while self.offset < self.format.len()
                    && self.format[self.offset].to_ascii() != Some(quote)
                {
                    self.offset += 1;
                }
                if self.offset >= self.format.len() {
                    sink.crash("FORMAT missing closing quote on character literal");
                }
                self.offset += 1; // past the closing quote
                let mut chars = self.offset - start;
                // A doubled quote keeps the first of the pair in the output
                // and treats the second as opening another literal.
                let doubled = self
                    .format
                    .get(self.offset)
                    .map_or(false, |&unit| unit.to_ascii() == Some(quote));
                if !doubled {
                    chars -= 1;
                }
                if !sink.emit(&self.format[start..start + chars]) {
                    return None;
                }
            } else if ch == b'H' {
                // 9HHOLLERITH
                let count = repeat.unwrap_or(0);
                if count < 1 || self.offset + count as usize > self.format.len() {
                    sink.crash("Invalid width on Hollerith in FORMAT");
                }
                if !sink.emit(&self.format[self.offset..self.offset + count as usize]) {
                    return None;
                }
                self.offset += count as usize;
            } else if ch.is_ascii_uppercase() {
                let start = self.offset - 1; // the descriptor letter
                let mut next = self.peek_next().to_ascii_uppercase();
                if next.is_ascii_uppercase() {
                    self.offset += 1;
                } else {
                    next = 0;
                }
                if ch == b'E'
                    || (next == 0
                        && matches!(ch, b'A' | b'I' | b'B' | b'O' | b'Z' | b'F' | b'D' | b'G'))
                {
                    // Data edit descriptor found; get_next rescans it.
                    self.offset = start;
                    return Some(match repeat {
                        Some(repeat) if repeat > 0 => repeat,
                        _ => 1,
                    });
                }
                if ch == b'T' {
                    // Tn, TLn, TRn
                    repeat = Some(self.get_int_field(sink, 0));
                }
                if !handle_control(sink, ch, next, repeat) {
                    return None;
                }
            } else if ch == b'/' {
                let n = match repeat {
                    Some(repeat) if repeat > 0 => repeat,
                    _ => 1,
                };
                if !sink.handle_slash(n) {
                    return None;
                }
            } else {
                sink.crash(&format!("Invalid character '{}' in FORMAT", ch as char));
            }
        }
    }

    /// Scan an integer field: an optional sign and a run of digits. May be
    /// primed with a first character the caller already consumed.
    fn get_int_field<S: FormatSink<C>>(&mut self, sink: &S, first_ch: u8) -> i32 {
        let mut primed = first_ch != 0;
        let mut ch = if primed { first_ch } else { self.peek_next() };
        if ch != b'-' && ch != b'+' && !ch.is_ascii_digit() {
            sink.crash(&format!(
                "Invalid FORMAT: integer expected at '{}'",
                ch as char
            ));
        }
        let negate = ch == b'-';
        if negate || ch == b'+' {
            if !primed {
                self.offset += 1;
            }
            primed = false;
            ch = self.peek_next();
        }
        let mut result: i32 = 0;
        while ch.is_ascii_digit() {
            let digit = i32::from(ch - b'0');
            if result > i32::MAX / 10 - digit {
                sink.crash("FORMAT integer field out of range");
            }
            result = 10 * result + digit;
            if primed {
                primed = false;
            } else {
                self.offset += 1;
            }
            ch = self.peek_next();
        }
        if negate {
            result = -result;
            if result > 0 {
                sink.crash("FORMAT integer field out of range");
            }
        }
        result
    }

    /// Next significant character, upper-cased, with blanks skipped. `None`
    /// only at end of format in stop mode; otherwise running off the end is
    /// a crash.
    fn next_significant<S: FormatSink<C>>(&mut self, sink: &S, stop: bool) -> Option<u8> {
        self.skip_blanks();
        if self.offset >= self.format.len() {
            if stop {
                return None;
            }
            sink.crash("FORMAT missing closing parenthesis");
        }
        Some(self.get_next_char(sink).to_ascii_uppercase())
    }

    fn get_next_char<S: FormatSink<C>>(&mut self, sink: &S) -> u8 {
        self.skip_blanks();
        match self.format.get(self.offset) {
            Some(&unit) => {
                self.offset += 1;
                unit.to_ascii().unwrap_or(NON_ASCII)
            }
            None => sink.crash("FORMAT missing closing parenthesis"),
        }
    }

    /// The next unconsumed character (blanks skipped), or NUL at the end of
    /// the format.
    fn peek_next(&mut self) -> u8 {
        self.skip_blanks();
        self.format
            .get(self.offset)
            .map_or(0, |&unit| unit.to_ascii().unwrap_or(NON_ASCII))
    }

    /// Blanks are insignificant in a FORMAT outside character literals and
    /// Hollerith text.
    fn skip_blanks(&mut self) {
        while let Some(unit) = self.format.get(self.offset) {
            match unit.to_ascii() {
                Some(b' ') | Some(b'\t') => self.offset += 1,
                _ => break,
            }
        }
    }
}

/// Apply one control edit descriptor: mutate the sink's modal state or hand
/// a position change through. `repeat` is the integer field that preceded
/// (or, for `T`, followed) the descriptor. Returns `false` when a
/// positioning handler signals end-of-record.
fn handle_control<C: CodeUnit, S: FormatSink<C>>(
    sink: &mut S,
    ch: u8,
    next: u8,
    repeat: Option<i32>,
) -> bool {
    let n = match repeat {
        Some(repeat) if repeat > 0 => repeat,
        _ => 1,
    };
    match (ch, next) {
        (b'B', b'N') => sink.modes().blank_zero = false,
        (b'B', b'Z') => sink.modes().blank_zero = true,
        (b'D', b'C') => sink.modes().decimal_comma = true,
        (b'D', b'P') => sink.modes().decimal_comma = false,
        // kP keeps the sign of its field.
        (b'P', 0) => sink.modes().scale = repeat.unwrap_or(1),
        (b'R', b'N') => sink.modes().rounding = RoundingMode::TiesToEven,
        (b'R', b'Z') => sink.modes().rounding = RoundingMode::ToZero,
        (b'R', b'U') => sink.modes().rounding = RoundingMode::Up,
        (b'R', b'D') => sink.modes().rounding = RoundingMode::Down,
        (b'R', b'C') => sink.modes().rounding = RoundingMode::TiesAwayFromZero,
        (b'S', b'P') => sink.modes().sign_plus = true,
        (b'S', 0) | (b'S', b'S') => sink.modes().sign_plus = false,
        (b'X', 0) => return sink.handle_relative_position(n),
        (b'T', 0) => return sink.handle_absolute_position(n),
        (b'T', b'L') => return sink.handle_relative_position(-n),
        (b'T', b'R') => return sink.handle_relative_position(n),
        _ => {
            if next != 0 {
                sink.crash(&format!(
                    "Unknown '{}{}' edit descriptor in FORMAT",
                    ch as char, next as char
                ));
            } else {
                sink.crash(&format!("Unknown '{}' edit descriptor in FORMAT", ch as char));
            }
        }
    }
    true
}
