//! Numeric fields
//!
//! All four types share the same string cleanup (thousands separators,
//! accounting-style and Excel-style negatives) and the same range checks;
//! they differ in what they output: floats, exact decimals, whole numbers,
//! or percentages scaled to fractions.

use std::str::FromStr;

use crate::decimal::Decimal;
use crate::errors::ValidationError;
use crate::field::FieldType;
use crate::value::{is_na, Value};

/// Strip the formatting spreadsheets wrap numbers in:
/// thousands separators, `(1000)` and `- 1000 -` negatives
fn clean_number(s: &str) -> String {
    let s = s.replace(',', "");
    if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        return format!("-{inner}");
    }
    if let Some(inner) = s.strip_prefix("- ").and_then(|r| r.strip_suffix(" -")) {
        return format!("-{inner}");
    }
    s
}

/// Range constraints shared by the numeric fields
#[derive(Debug, Clone, Copy)]
pub struct Range {
    min: f64,
    max: f64,
    allow_min: bool,
    allow_max: bool,
    allow_zero: bool,
}

impl Default for Range {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            allow_min: true,
            allow_max: true,
            allow_zero: true,
        }
    }
}

impl Range {
    /// String representation of the allowed domain, e.g. "]-1, 1] non-zero"
    fn domain_str(&self) -> String {
        let lbracket = if self.allow_min { '[' } else { ']' };
        let rbracket = if self.allow_max { ']' } else { '[' };
        let mut msg = format!("{lbracket}{}, {}{rbracket}", self.min, self.max);
        if !self.allow_zero {
            msg.push_str(" non-zero");
        }
        msg
    }

    fn check(&self, num: f64, value: &Value, field: Option<&str>) -> Result<(), ValidationError> {
        let out_of_range = (!self.allow_zero && num == 0.0)
            || (self.allow_min && num < self.min)
            || (!self.allow_min && num <= self.min)
            || (self.allow_max && num > self.max)
            || (!self.allow_max && num >= self.max);
        if out_of_range {
            return Err(ValidationError::out_of_domain(field, value.clone(), self.domain_str()));
        }
        Ok(())
    }
}

macro_rules! range_setters {
    () => {
        /// Minimum allowable value
        #[must_use]
        pub const fn min_value(mut self, min: f64) -> Self {
            self.range.min = min;
            self
        }

        /// Maximum allowable value
        #[must_use]
        pub const fn max_value(mut self, max: f64) -> Self {
            self.range.max = max;
            self
        }

        /// If true (default), `value == min_value` is accepted
        #[must_use]
        pub const fn allow_min(mut self, allow: bool) -> Self {
            self.range.allow_min = allow;
            self
        }

        /// If true (default), `value == max_value` is accepted
        #[must_use]
        pub const fn allow_max(mut self, allow: bool) -> Self {
            self.range.allow_max = allow;
            self
        }

        /// If false, zero is rejected
        #[must_use]
        pub const fn allow_zero(mut self, allow: bool) -> Self {
            self.range.allow_zero = allow;
            self
        }
    };
}

/// Convert to f64, with the shared string cleanup
fn to_f64(value: &Value, field: Option<&str>, expect: &str) -> Result<f64, ValidationError> {
    match value {
        Value::Int(i) => {
            #[allow(clippy::cast_precision_loss)]
            let f = *i as f64;
            Ok(f)
        },
        Value::Float(f) => Ok(*f),
        Value::Decimal(d) => Ok(d.to_f64()),
        Value::Str(s) => clean_number(s)
            .parse()
            .map_err(|_| ValidationError::malformed(field, value.clone(), expect)),
        v => Err(ValidationError::wrong_type(field, v.clone(), expect)),
    }
}

/// Any number: `"1,000.1"`, `"(500)"`, `"- 500 -"`, `"1.2e-3"`, `"inf"`
#[derive(Debug, Clone, Copy, Default)]
pub struct Float {
    range: Range,
}

impl Float {
    /// New float field with an unbounded range
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    range_setters!();
}

impl FieldType for Float {
    fn name(&self) -> &str {
        "float"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        let num = to_f64(&value, field, "number")?;
        let out = Value::Float(num);
        self.range.check(num, &out, field)?;
        Ok(out)
    }

    fn describe(&self) -> String {
        format!("Any number in the domain {}", self.range.domain_str())
    }

    fn default_value(&self) -> Value {
        Value::Float(f64::NAN)
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(*self)
    }
}

/// Any number, converted to an exact [`Decimal`]: much heavier than a float
/// but `3.1` stays `3.1` instead of becoming `3.0999999999999996`
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalField {
    range: Range,
}

impl DecimalField {
    /// New decimal field with an unbounded range
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    range_setters!();
}

fn is_infinite_token(s: &str) -> bool {
    let s = s.strip_prefix(['-', '+']).unwrap_or(s);
    s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("infinity")
}

impl FieldType for DecimalField {
    fn name(&self) -> &str {
        "decimal"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        let out = match &value {
            Value::Decimal(d) => Value::Decimal(*d),
            Value::Int(i) => Value::Decimal(Decimal::from(*i)),
            // Infinity has no exact representation; degrade to float
            Value::Float(f) if f.is_infinite() => Value::Float(*f),
            // Round-trip through the shortest display form so that 0.1
            // parses as 0.1, not as its binary expansion
            Value::Float(f) => Decimal::from_str(&f.to_string())
                .map(Value::Decimal)
                .map_err(|_| ValidationError::malformed(field, value.clone(), "number"))?,
            Value::Str(s) => {
                let cleaned = clean_number(s);
                if is_infinite_token(&cleaned) {
                    let num: f64 = cleaned
                        .parse()
                        .map_err(|_| ValidationError::malformed(field, value.clone(), "number"))?;
                    Value::Float(num)
                } else {
                    Decimal::from_str(&cleaned)
                        .map(Value::Decimal)
                        .map_err(|_| ValidationError::malformed(field, value.clone(), "number"))?
                }
            },
            v => return Err(ValidationError::wrong_type(field, v.clone(), "number")),
        };
        let num = out.as_f64().unwrap_or(f64::NAN);
        self.range.check(num, &out, field)?;
        Ok(out)
    }

    fn describe(&self) -> String {
        format!("Any number in the domain {}", self.range.domain_str())
    }

    fn default_value(&self) -> Value {
        Value::Float(f64::NAN)
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(*self)
    }
}

/// A whole number.
///
/// Accepts anything an integer parser takes, plus floats and decimals with a
/// zero fractional part (`"1000.0"`, `"1.2e1"`). Conversion never goes
/// through an f64, so 16-digit identifiers survive exactly. `inf`/`-inf`
/// are accepted but stay floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer {
    range: Range,
}

impl Integer {
    /// New integer field with an unbounded range
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    range_setters!();
}

fn decimal_to_int(d: Decimal, raw: &Value, field: Option<&str>) -> Result<Value, ValidationError> {
    let malformed = || ValidationError::malformed(field, raw.clone(), "integer");
    let i = d.to_i128().ok_or_else(malformed)?;
    let i = i64::try_from(i).map_err(|_| malformed())?;
    Ok(Value::Int(i))
}

impl FieldType for Integer {
    fn name(&self) -> &str {
        "integer"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        let out = match &value {
            Value::Int(i) => Value::Int(*i),
            Value::Float(f) if f.is_infinite() => Value::Float(*f),
            Value::Float(f) => {
                if f.fract() == 0.0 {
                    decimal_to_int(
                        Decimal::from_str(&f.to_string())
                            .map_err(|_| ValidationError::malformed(field, value.clone(), "integer"))?,
                        &value,
                        field,
                    )?
                } else {
                    return Err(ValidationError::malformed(field, value.clone(), "integer"));
                }
            },
            Value::Decimal(d) => decimal_to_int(*d, &value, field)?,
            Value::Str(s) => {
                let cleaned = clean_number(s);
                if let Ok(i) = cleaned.parse::<i64>() {
                    Value::Int(i)
                } else if is_infinite_token(&cleaned) {
                    let num: f64 = cleaned
                        .parse()
                        .map_err(|_| ValidationError::malformed(field, value.clone(), "integer"))?;
                    Value::Float(num)
                } else {
                    let d = Decimal::from_str(&cleaned)
                        .map_err(|_| ValidationError::malformed(field, value.clone(), "integer"))?;
                    decimal_to_int(d, &value, field)?
                }
            },
            v => return Err(ValidationError::wrong_type(field, v.clone(), "integer")),
        };
        let num = out.as_f64().unwrap_or(f64::NAN);
        self.range.check(num, &out, field)?;
        Ok(out)
    }

    fn describe(&self) -> String {
        format!("Any whole number in the domain {}", self.range.domain_str())
    }

    fn default_value(&self) -> Value {
        Value::Float(f64::NAN)
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(*self)
    }
}

/// Percentage: `"5%"` and `"0.05"` both come out as `0.05`.
///
/// Nothing stops a source from writing "35" where it meant "35%" or "0.35";
/// set `min_value`/`max_value` to catch the obvious cases.
#[derive(Debug, Clone, Copy, Default)]
pub struct Percentage {
    range: Range,
}

impl Percentage {
    /// New percentage field with an unbounded range
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    range_setters!();
}

impl FieldType for Percentage {
    fn name(&self) -> &str {
        "percentage"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        let num = match &value {
            Value::Str(s) => {
                let cleaned = clean_number(s);
                if let Some(stripped) = cleaned.strip_suffix('%') {
                    let stripped = stripped.trim();
                    if is_na(stripped) {
                        // "nan%" and bare "%" are blank cells
                        return Ok(Value::Null);
                    }
                    let num: f64 = stripped.parse().map_err(|_| {
                        ValidationError::malformed(field, value.clone(), "percentage")
                    })?;
                    num / 100.0
                } else {
                    cleaned.parse().map_err(|_| {
                        ValidationError::malformed(field, value.clone(), "percentage")
                    })?
                }
            },
            v => to_f64(v, field, "percentage")?,
        };
        let out = Value::Float(num);
        self.range.check(num, &out, field)?;
        Ok(out)
    }

    fn describe(&self) -> String {
        format!("Percentage, e.g. 5% or 0.05, in the domain {}", self.range.domain_str())
    }

    fn default_value(&self) -> Value {
        Value::Float(f64::NAN)
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(*self)
    }
}
