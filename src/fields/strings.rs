//! String fields

use regex::Regex;

use crate::errors::ValidationError;
use crate::field::FieldType;
use crate::value::Value;

/// Any string value, after the standard trimming
#[derive(Debug, Clone, Copy, Default)]
pub struct StringField;

impl StringField {
    /// New string field
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FieldType for StringField {
    fn name(&self) -> &str {
        "string"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        match value {
            Value::Str(_) => Ok(value),
            v => Err(ValidationError::wrong_type(field, v, "string")),
        }
    }

    fn describe(&self) -> String {
        "Any string value, stripped of leading and trailing whitespace".to_string()
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(*self)
    }
}

/// A string matching a regular expression, anchored at the start
#[derive(Debug, Clone)]
pub struct RegexField {
    pattern: String,
    regex: Regex,
}

impl RegexField {
    /// Compile the pattern; fails on invalid regex syntax
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        // Anchor at the start, leaving the user's pattern untouched in
        // error messages
        let regex = Regex::new(&format!(r"\A(?:{pattern})"))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The original pattern string
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl FieldType for RegexField {
    fn name(&self) -> &str {
        "regex"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        match value {
            Value::Str(ref s) => {
                if self.regex.is_match(s) {
                    Ok(value)
                } else {
                    Err(ValidationError::malformed(field, value, format!("'{}'", self.pattern)))
                }
            },
            v => Err(ValidationError::wrong_type(field, v, "string")),
        }
    }

    fn describe(&self) -> String {
        format!("Any string value matching the regular expression {}", self.pattern)
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(self.clone())
    }
}

/// Letters-only ISO code, e.g. for a country or currency.
/// Case-insensitive on input, uppercased on output.
#[derive(Debug, Clone, Copy)]
pub struct IsoCodeAlpha {
    chars: usize,
}

impl Default for IsoCodeAlpha {
    fn default() -> Self {
        Self { chars: 3 }
    }
}

impl IsoCodeAlpha {
    /// New ISO code field expecting `chars` letters
    #[must_use]
    pub const fn new(chars: usize) -> Self {
        Self { chars }
    }
}

impl FieldType for IsoCodeAlpha {
    fn name(&self) -> &str {
        "iso-code"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        match value {
            Value::Str(ref s) => {
                let upper = s.to_uppercase();
                if upper.len() == self.chars && upper.bytes().all(|b| b.is_ascii_uppercase()) {
                    Ok(Value::Str(upper))
                } else {
                    Err(ValidationError::malformed(field, value, self.describe()))
                }
            },
            v => Err(ValidationError::wrong_type(field, v, "string")),
        }
    }

    fn describe(&self) -> String {
        format!("{} letters ISO code (case insensitive)", self.chars)
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(*self)
    }
}
