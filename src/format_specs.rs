//! Represent FORMAT edit descriptors and modal editing state as Rust types.
//!
//! The scanner in [`crate::scanner`] produces one [`DataEdit`] per request;
//! the scalar formatters in [`crate::edit_output`] consume them. A
//! `DataEdit` carries a snapshot of the [`Modes`] that were in force when it
//! was produced, so control edits earlier in the format (`SP`, `BZ`, `kP`,
//! ...) affect the value being edited without any further coordination.
use std::fmt::Display;

/// Rounding to apply when a real value cannot be represented exactly in the
/// requested field. Selected by the `RN`, `RZ`, `RU`, `RD`, and `RC`
/// control edit descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    TiesToEven,
    ToZero,
    Up,
    Down,
    TiesAwayFromZero,
}

impl Default for RoundingMode {
    fn default() -> Self {
        RoundingMode::TiesToEven
    }
}

/// The modal editing state of one I/O statement.
///
/// Owned by the statement's sink and mutated only by control edit
/// descriptors; every [`DataEdit`] captures a copy at the moment it is
/// produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modes {
    /// `BZ` in force: blanks in numeric input fields count as zeros.
    pub blank_zero: bool,
    /// `DC` in force: a comma is the decimal symbol.
    pub decimal_comma: bool,
    /// `SP` in force: non-negative numeric output carries an explicit `+`.
    pub sign_plus: bool,
    pub rounding: RoundingMode,
    /// The `kP` scale factor.
    pub scale: i32,
}

/// One data edit descriptor, ready to apply to a scalar value.
///
/// `descriptor` is the upper-cased descriptor letter (`I`, `B`, `O`, `Z`,
/// `F`, `E`, `D`, `G`, `A`, ...). `variation` is the second letter of the
/// `EN`, `ES`, and `EX` forms. `digits` is the `.m` (or `.d`) field and
/// `expo_digits` the trailing exponent-width field of the real edits.
///
/// `repeat` tells the caller how many consecutive values may be edited
/// under this descriptor before asking the scanner again; it never exceeds
/// the `max_repeat` the caller passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataEdit {
    pub descriptor: char,
    pub variation: Option<char>,
    pub width: i32,
    pub digits: Option<i32>,
    pub expo_digits: Option<i32>,
    pub repeat: i32,
    pub modes: Modes,
}

impl Display for DataEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor)?;
        if let Some(v) = self.variation {
            write!(f, "{v}")?;
        }
        write!(f, "{}", self.width)?;
        if let Some(d) = self.digits {
            write!(f, ".{d}")?;
        }
        if let Some(e) = self.expo_digits {
            write!(f, "E{e}")?;
        }
        Ok(())
    }
}
