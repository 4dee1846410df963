//! Scalar formatters: apply a data edit descriptor to one output value.
use crate::code_unit::CodeUnit;
use crate::format_specs::DataEdit;
use crate::sink::FormatSink;

/// Edit a 64-bit integer under `I`, `B`, `O`, `Z`, or `G` and emit the
/// field through the sink.
///
/// Returns `false` when the sink signals end-of-record mid-field. A field
/// too wide for a positive `w` is emitted as `w` asterisks, which still
/// counts as success.
pub fn output_integer<C: CodeUnit, S: FormatSink<C>>(
    sink: &mut S,
    edit: &DataEdit,
    n: i64,
) -> bool {
    // i64::MIN has no i64 negation; go through the unsigned magnitude.
    let magnitude = n.unsigned_abs();
    let mut itoa_buf = itoa::Buffer::new();
    let rendered: String;
    // A zero magnitude renders no digits at all here; the single '0' of an
    // ordinary zero comes from the leading-zeroes rule below.
    let digits: &[u8] = match edit.descriptor {
        'I' | 'G' => {
            if magnitude == 0 {
                b""
            } else {
                itoa_buf.format(magnitude).as_bytes()
            }
        }
        'B' => {
            rendered = if magnitude == 0 {
                String::new()
            } else {
                format!("{magnitude:b}")
            };
            rendered.as_bytes()
        }
        'O' => {
            rendered = if magnitude == 0 {
                String::new()
            } else {
                format!("{magnitude:o}")
            };
            rendered.as_bytes()
        }
        'Z' => {
            rendered = if magnitude == 0 {
                String::new()
            } else {
                format!("{magnitude:X}")
            };
            rendered.as_bytes()
        }
        _ => sink.crash(&format!(
            "Data edit descriptor '{}' does not correspond to an INTEGER data item",
            edit.descriptor
        )),
    };

    let digit_count = digits.len() as i32;
    let mut sign_chars = i32::from(n < 0 || edit.modes.sign_plus);
    let mut width = edit.width;
    let mut leading_zeroes = 0;
    if edit.digits.map_or(false, |m| digit_count <= m) {
        let m = edit.digits.unwrap();
        if m == 0 && n == 0 {
            // Iw.0 with a zero value: the field is entirely blank, one
            // blank wide for I0.0, and SP does not apply.
            sign_chars = 0;
            width = width.max(1);
        } else {
            leading_zeroes = m - digit_count;
        }
    } else if n == 0 {
        leading_zeroes = 1;
    }

    let total = sign_chars + leading_zeroes + digit_count;
    if width > 0 && total > width {
        return emit_repeated(sink, b'*', width);
    }
    if total < width && !emit_repeated(sink, b' ', width - total) {
        return false;
    }
    if sign_chars > 0 && !emit_ascii(sink, if n < 0 { b"-" } else { b"+" }) {
        return false;
    }
    if leading_zeroes > 0 && !emit_repeated(sink, b'0', leading_zeroes) {
        return false;
    }
    emit_ascii(sink, digits)
}

/// Edit a 64-bit real value. Real output editing is not implemented in
/// this runtime: only the `E` family reaches the reserved failure return,
/// and every other descriptor is the usual type-mismatch crash.
pub fn output_real<C: CodeUnit, S: FormatSink<C>>(
    sink: &mut S,
    edit: &DataEdit,
    _value: f64,
) -> bool {
    match edit.descriptor {
        'E' => false,
        _ => sink.crash(&format!(
            "Data edit descriptor '{}' does not correspond to a REAL data item",
            edit.descriptor
        )),
    }
}

fn emit_repeated<C: CodeUnit, S: FormatSink<C>>(sink: &mut S, byte: u8, count: i32) -> bool {
    let chunk = [C::from_ascii(byte); 32];
    let mut remaining = count.max(0) as usize;
    while remaining > 0 {
        let len = remaining.min(chunk.len());
        if !sink.emit(&chunk[..len]) {
            return false;
        }
        remaining -= len;
    }
    true
}

fn emit_ascii<C: CodeUnit, S: FormatSink<C>>(sink: &mut S, bytes: &[u8]) -> bool {
    // Base-2 editing of a 64-bit magnitude plus a sign is the widest text
    // a scalar formatter produces in one piece.
    let mut units = [C::from_ascii(b' '); 66];
    for (unit, &byte) in units.iter_mut().zip(bytes) {
        *unit = C::from_ascii(byte);
    }
    sink.emit(&units[..bytes.len()])
}
