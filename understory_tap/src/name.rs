// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler names and their canonical string form.
//!
//! Handlers are keyed by string, but callers may name them with numbers,
//! booleans, "no value", or anything printable. [`Name`] captures that input
//! and [`Name::into_key`] applies the stringification rule exactly once, at the
//! registry boundary:
//!
//! | Input | Key |
//! |---|---|
//! | `Str(s)` / `Display(s)` | `s` |
//! | `Null` (also `None`) | `"null"` |
//! | `Undefined` (also `()`) | `"undefined"` |
//! | `Bool(b)` | `"true"` / `"false"` |
//! | `Number(NaN)` | `"NaN"` |
//! | `Number(±inf)` | `"Infinity"` / `"-Infinity"` |
//! | `Number(-0.0)` | `"0"` |
//! | `Number(x)`, `1e-6 <= \|x\| < 1e21` | shortest round-trip decimal, no trailing `.0` |
//! | `Number(x)`, otherwise | shortest round-trip mantissa with a signed exponent, e.g. `"1e+21"`, `"1.5e-7"` |
//!
//! ```
//! use understory_tap::name::Name;
//! assert_eq!(Name::from(None::<&str>).into_key(), "null");
//! assert_eq!(Name::from(42).into_key(), "42");
//! assert_eq!(Name::from(2.5).into_key(), "2.5");
//! assert_eq!(Name::display('x').into_key(), "x");
//! ```

use alloc::format;
use alloc::string::{String, ToString};

/// A handler name before coercion to its string key.
#[derive(Clone, Debug, PartialEq)]
pub enum Name {
    /// A string, used verbatim.
    Str(String),
    /// A number.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// An explicit "no value".
    Null,
    /// A missing value.
    Undefined,
    /// A pre-rendered value such as a date; see [`Name::display`].
    Display(String),
}

impl Name {
    /// Name a handler after any printable value, e.g. a timestamp.
    pub fn display(value: impl core::fmt::Display) -> Self {
        Self::Display(value.to_string())
    }

    /// Apply the stringification rule.
    pub fn into_key(self) -> String {
        match self {
            Self::Str(s) | Self::Display(s) => s,
            other => other.to_string(),
        }
    }
}

impl core::fmt::Display for Name {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Str(s) | Self::Display(s) => f.write_str(s),
            Self::Null => f.write_str("null"),
            Self::Undefined => f.write_str("undefined"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if n.is_nan() => f.write_str("NaN"),
            Self::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Number(n) if *n == 0.0 => f.write_str("0"),
            Self::Number(n) if (1e-6..1e21).contains(&n.abs()) => write!(f, "{n}"),
            Self::Number(n) => {
                let exp = format!("{n:e}");
                match exp.split_once('e') {
                    Some((mantissa, e)) if !e.starts_with('-') => write!(f, "{mantissa}e+{e}"),
                    _ => f.write_str(&exp),
                }
            }
        }
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<&String> for Name {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<char> for Name {
    fn from(c: char) -> Self {
        Self::Str(c.to_string())
    }
}

impl From<bool> for Name {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<()> for Name {
    fn from((): ()) -> Self {
        Self::Undefined
    }
}

impl<T: Into<Self>> From<Option<T>> for Name {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Name {
                fn from(n: $t) -> Self {
                    Self::Number(f64::from(n))
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, i16, i32, u8, u16, u32);

macro_rules! impl_from_wide_integer {
    ($($t:ty),*) => {
        $(
            // Wide integers are not exactly representable as f64; keep their digits.
            impl From<$t> for Name {
                fn from(n: $t) -> Self {
                    Self::Display(n.to_string())
                }
            }
        )*
    };
}

impl_from_wide_integer!(i64, u64, i128, u128, isize, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_verbatim() {
        assert_eq!(Name::from("test3.1").into_key(), "test3.1");
        assert_eq!(Name::from(String::from("")).into_key(), "");
        assert_eq!(Name::from('a').into_key(), "a");
    }

    #[test]
    fn absent_values_have_fixed_keys() {
        assert_eq!(Name::Null.into_key(), "null");
        assert_eq!(Name::from(None::<u32>).into_key(), "null");
        assert_eq!(Name::from(()).into_key(), "undefined");
        assert_eq!(Name::from(Some("x")).into_key(), "x");
    }

    #[test]
    fn numbers_follow_the_rule() {
        assert_eq!(Name::from(1).into_key(), "1");
        assert_eq!(Name::from(-7_i8).into_key(), "-7");
        assert_eq!(Name::from(1.5_f32).into_key(), "1.5");
        assert_eq!(Name::from(-0.0).into_key(), "0");
        assert_eq!(Name::from(f64::NAN).into_key(), "NaN");
        assert_eq!(Name::from(f64::INFINITY).into_key(), "Infinity");
        assert_eq!(Name::from(f64::NEG_INFINITY).into_key(), "-Infinity");
        assert_eq!(Name::from(u64::MAX).into_key(), "18446744073709551615");
        assert_eq!(Name::from(3_usize).into_key(), "3");
    }

    #[test]
    fn extreme_numbers_use_exponent_form() {
        assert_eq!(Name::from(1e20).into_key(), "100000000000000000000");
        assert_eq!(Name::from(1e21).into_key(), "1e+21");
        assert_eq!(Name::from(-1.5e300).into_key(), "-1.5e+300");
        assert_eq!(Name::from(0.000001).into_key(), "0.000001");
        assert_eq!(Name::from(1e-7).into_key(), "1e-7");
        assert_eq!(Name::from(-2.5e-9).into_key(), "-2.5e-9");
    }

    #[test]
    fn booleans_and_display() {
        assert_eq!(Name::from(true).into_key(), "true");
        assert_eq!(Name::from(false).into_key(), "false");
        assert_eq!(Name::display(2026).into_key(), "2026");
    }
}
