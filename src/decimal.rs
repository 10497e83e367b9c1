//! Fixed-point decimal numbers
//!
//! `3.1` parsed through an f64 becomes `3.0999999999999996`. For money and
//! reconciliation data that is unacceptable, so [`Decimal`] stores numbers as
//! an `i128` mantissa and a power-of-ten exponent, kept normalized (no
//! trailing zeros on the mantissa): `100.0000` and `100` are the same value.
//!
//! The type is deliberately small: parse, display, compare. It does not do
//! arithmetic. Infinities are not representable; fields that meet them fall
//! back to floats.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a decimal literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid decimal literal")]
pub struct ParseDecimalError;

/// An exact decimal number: `mantissa * 10^exponent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    exponent: i32,
}

impl Decimal {
    /// Build from raw parts, normalizing trailing zeros away
    #[must_use]
    pub fn new(mantissa: i128, exponent: i32) -> Self {
        let mut d = Self { mantissa, exponent };
        d.normalize();
        d
    }

    fn normalize(&mut self) {
        if self.mantissa == 0 {
            self.exponent = 0;
            return;
        }
        while self.mantissa % 10 == 0 {
            self.mantissa /= 10;
            self.exponent += 1;
        }
    }

    /// Approximate float view, used for range checks and cross-type equality
    #[must_use]
    pub fn to_f64(self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let m = self.mantissa as f64;
        m * 10f64.powi(self.exponent)
    }

    /// True when the value has no fractional part
    #[must_use]
    pub const fn is_integral(self) -> bool {
        self.exponent >= 0
    }

    /// Exact integer value, if the number is integral and fits
    #[must_use]
    pub fn to_i128(self) -> Option<i128> {
        if self.exponent < 0 {
            return None;
        }
        let scale = 10i128.checked_pow(u32::try_from(self.exponent).ok()?)?;
        self.mantissa.checked_mul(scale)
    }

    /// Exponent of the leading digit, e.g. 2 for `123.4`
    fn adjusted_exponent(self) -> i32 {
        let digits = digit_count(self.mantissa);
        self.exponent + digits - 1
    }
}

fn digit_count(mantissa: i128) -> i32 {
    let mut n = mantissa.unsigned_abs();
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

impl From<i64> for Decimal {
    fn from(i: i64) -> Self {
        Self::new(i128::from(i), 0)
    }
}

impl From<i128> for Decimal {
    fn from(i: i128) -> Self {
        Self::new(i, 0)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (mantissa_part, exp_part) = match s.find(['e', 'E']) {
            Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
            None => (s, None),
        };

        let mut exponent: i32 = match exp_part {
            Some(e) => {
                let e = e.strip_prefix('+').unwrap_or(e);
                e.parse().map_err(|_| ParseDecimalError)?
            },
            None => 0,
        };

        let (int_part, frac_part) = match mantissa_part.find('.') {
            Some(pos) => (&mantissa_part[..pos], &mantissa_part[pos + 1..]),
            None => (mantissa_part, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseDecimalError);
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ParseDecimalError);
        }

        let mut mantissa: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(b - b'0')))
                .ok_or(ParseDecimalError)?;
        }
        exponent = exponent
            .checked_sub(i32::try_from(frac_part.len()).map_err(|_| ParseDecimalError)?)
            .ok_or(ParseDecimalError)?;

        if negative {
            mantissa = -mantissa;
        }
        Ok(Self::new(mantissa, exponent))
    }
}

impl fmt::Display for Decimal {
    /// Plain notation for moderate magnitudes, scientific otherwise,
    /// mirroring the conventions of spreadsheet tools
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let adjusted = self.adjusted_exponent();
        if self.exponent <= 0 && adjusted >= -6 && adjusted < 21 {
            return self.fmt_plain(f);
        }
        if self.exponent > 0 && adjusted < 21 {
            return self.fmt_plain(f);
        }
        self.fmt_scientific(f)
    }
}

impl Decimal {
    fn fmt_plain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa < 0 {
            write!(f, "-")?;
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        if self.exponent >= 0 {
            write!(f, "{digits}")?;
            for _ in 0..self.exponent {
                write!(f, "0")?;
            }
            return Ok(());
        }
        let frac_len = self.exponent.unsigned_abs() as usize;
        if digits.len() > frac_len {
            let split = digits.len() - frac_len;
            write!(f, "{}.{}", &digits[..split], &digits[split..])
        } else {
            write!(f, "0.")?;
            for _ in 0..(frac_len - digits.len()) {
                write!(f, "0")?;
            }
            write!(f, "{digits}")
        }
    }

    fn fmt_scientific(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa < 0 {
            write!(f, "-")?;
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        let adjusted = self.adjusted_exponent();
        if digits.len() > 1 {
            write!(f, "{}.{}", &digits[..1], &digits[1..])?;
        } else {
            write!(f, "{digits}")?;
        }
        if adjusted >= 0 {
            write!(f, "E+{adjusted}")
        } else {
            write!(f, "E{adjusted}")
        }
    }
}
