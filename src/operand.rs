//! Joining message operands
//!
//! A message built from several operands is their concatenation, with a
//! single space inserted between two neighbours when neither of them is a
//! string. So `sprint!("port", 8080)` is `"port8080"` and `sprint!(1, 2, "x")`
//! is `"1 2x"`.

use std::fmt::{self, Display, Write as _};

/// A value that can be part of a log message
pub trait Operand: Display {
    /// Strings are joined to their neighbours without a separator
    fn is_string(&self) -> bool {
        false
    }
}

impl Operand for str {
    fn is_string(&self) -> bool {
        true
    }
}

impl Operand for String {
    fn is_string(&self) -> bool {
        true
    }
}

impl<T: Operand + ?Sized> Operand for &T {
    fn is_string(&self) -> bool {
        (**self).is_string()
    }
}

macro_rules! impl_operand {
    ($($t:ty),* $(,)?) => {
        $(impl Operand for $t {})*
    };
}

impl_operand!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl Operand for crate::Level {}

impl Operand for fmt::Arguments<'_> {}

/// Concatenate operands into one message
pub fn sprint(operands: &[&dyn Operand]) -> String {
    let mut out = String::new();
    let mut prev_is_string = true;
    for (i, operand) in operands.iter().enumerate() {
        let is_string = operand.is_string();
        if i > 0 && !is_string && !prev_is_string {
            out.push(' ');
        }
        let _ = write!(out, "{}", operand);
        prev_is_string = is_string;
    }
    out
}

/// Build a message from several operands
///
/// ```
/// use leveled_log::sprint;
///
/// assert_eq!(sprint!("retries:", 3), "retries:3");
/// assert_eq!(sprint!(1, 2, "x"), "1 2x");
/// ```
#[macro_export]
macro_rules! sprint {
    ($($operand:expr),* $(,)?) => {
        $crate::operand::sprint(&[$(&$operand as &dyn $crate::Operand),*])
    };
}
