//! Boolean field

use crate::errors::ValidationError;
use crate::field::FieldType;
use crate::fields::Integer;
use crate::value::Value;

/// A boolean: any string spelling of true/false or yes/no, or a number
/// equal to exactly 0 or 1 (including oddities like `"+1.000"`)
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl Boolean {
    /// New boolean field
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FieldType for Boolean {
    fn name(&self) -> &str {
        "boolean"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        match &value {
            Value::Bool(b) => return Ok(Value::Bool(*b)),
            Value::Str(s) => match s.to_uppercase().as_str() {
                "T" | "Y" | "YES" | "TRUE" => return Ok(Value::Bool(true)),
                "F" | "N" | "NO" | "FALSE" => return Ok(Value::Bool(false)),
                _ => {},
            },
            Value::Int(_) | Value::Float(_) | Value::Decimal(_) => {},
            v => return Err(ValidationError::wrong_type(field, v.clone(), "boolean")),
        }

        // Everything left is a number or a string that might spell one.
        // Run it through the integer parser to normalize "1", "+1.000",
        // "-0.0e0" and friends down to 0 or 1.
        match Integer::new().validate(value.clone(), field) {
            Ok(Value::Int(0)) => Ok(Value::Bool(false)),
            Ok(Value::Int(1)) => Ok(Value::Bool(true)),
            Ok(Value::Int(_)) => Err(ValidationError::malformed(field, value, "boolean")),
            // e.g. inf: numeric, but in no way a boolean
            Ok(_) => Err(ValidationError::wrong_type(field, value, "boolean")),
            Err(_) => match &value {
                Value::Str(_) | Value::Int(_) => {
                    Err(ValidationError::malformed(field, value, "boolean"))
                },
                _ => Err(ValidationError::wrong_type(field, value, "boolean")),
            },
        }
    }

    fn describe(&self) -> String {
        "Boolean (true/false, yes/no, 0/1)".to_string()
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(*self)
    }
}
