//! The field pipeline
//!
//! A [`Field`] is a typed validator ([`FieldType`]) plus the settings shared
//! by every field: `required`, `default`, `unique`, and an optional free-text
//! description. Parsing a cell runs a fixed pipeline:
//!
//! 1. **preprocess** - strings are trimmed; blank-cell tokens ("", "N/A",
//!    "NaN", ...) and NaN values become [`Value::Null`];
//! 2. **validate** - the [`FieldType`] converts and checks the value; it is
//!    only invoked for non-null values;
//! 3. **postprocess** - a null value either fails (required) or becomes the
//!    default (not required, and the default bypasses the uniqueness check);
//!    unique fields then reject values they have already accepted.
//!
//! Seen values live behind a shared handle so another field's [`Domain`] can
//! validate against them while a file is being read (cross-reference
//! columns).
//!
//! [`Domain`]: crate::fields::Domain

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::errors::ValidationError;
use crate::value::{is_na, Value};

/// Shared, live set of values a unique field has accepted so far
pub type SharedValues = Arc<RwLock<HashSet<Value>>>;

/// A typed validator: the part of a field that differs per type.
///
/// Implementations receive preprocessed, non-null values and either return
/// the reformatted value or fail. Returning [`Value::Null`] is allowed and
/// means "treat as blank" (e.g. a percentage field receiving `"nan%"`).
pub trait FieldType: Send + Sync {
    /// Short type name, e.g. "float"
    fn name(&self) -> &str;

    /// Validate and reformat a preprocessed, non-null value
    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError>;

    /// One-line description of what the field accepts
    fn describe(&self) -> String;

    /// Default value handed out for blank cells when the field is not
    /// required. Numeric fields override this to NaN.
    fn default_value(&self) -> Value {
        Value::Null
    }

    /// Clone into a fresh box; used when a schema is cloned for a new run
    fn clone_box(&self) -> Box<dyn FieldType>;
}

/// A named, configured field
pub struct Field {
    kind: Box<dyn FieldType>,
    name: Option<String>,
    required: bool,
    default: Value,
    description: Option<String>,
    unique: bool,
    seen: Option<SharedValues>,
}

impl Field {
    /// Wrap a validator with default settings: required, not unique,
    /// with the validator's own default value
    #[must_use]
    pub fn new(kind: impl FieldType + 'static) -> Self {
        let default = kind.default_value();
        Self {
            kind: Box::new(kind),
            name: None,
            required: true,
            default,
            description: None,
            unique: false,
            seen: None,
        }
    }

    /// Set whether a blank cell is an error (true, the default) or is
    /// replaced by the default value
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Replace the value handed out for blank cells when not required
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// Attach a free-text description, shown in the generated documentation
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reject values that have already been accepted by this field
    #[must_use]
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self.seen = unique.then(|| Arc::new(RwLock::new(HashSet::new())));
        self
    }

    /// Set the field name used in error messages
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The field name, when set
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether blank cells are an error
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Whether repeated values are an error
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    /// The value handed out for blank cells when not required
    #[must_use]
    pub const fn default_value(&self) -> &Value {
        &self.default
    }

    /// Handle onto the live set of values this field has accepted.
    /// Only present on unique fields. Share it with
    /// [`Domain::shared`](crate::fields::Domain::shared) to make another
    /// field accept only values this one has already seen.
    #[must_use]
    pub fn seen_values(&self) -> Option<SharedValues> {
        self.seen.clone()
    }

    /// Initial cleanup of a raw input value: trim strings, and turn
    /// blank-cell tokens and NaNs into [`Value::Null`]
    #[must_use]
    pub fn preprocess(value: Value) -> Value {
        match value {
            Value::Str(s) => {
                let trimmed = s.trim();
                if is_na(trimmed) {
                    Value::Null
                } else if trimmed.len() == s.len() {
                    Value::Str(s)
                } else {
                    Value::Str(trimmed.to_string())
                }
            },
            v if v.is_null() => Value::Null,
            v => v,
        }
    }

    /// Run the full pipeline on one raw value
    pub fn parse(&self, value: impl Into<Value>) -> Result<Value, ValidationError> {
        let value = Self::preprocess(value.into());
        let value = if value.is_null() {
            Value::Null
        } else {
            self.kind.validate(value, self.name.as_deref())?
        };
        self.postprocess(value)
    }

    fn postprocess(&self, value: Value) -> Result<Value, ValidationError> {
        if value.is_null() {
            if self.required {
                return Err(ValidationError::missing(self.name.as_deref()));
            }
            // Defaults bypass the uniqueness check
            return Ok(self.default.clone());
        }

        if let Some(seen) = &self.seen {
            let mut seen = seen.write().unwrap_or_else(PoisonError::into_inner);
            if !seen.insert(value.clone()) {
                return Err(ValidationError::duplicate(self.name.as_deref(), value));
            }
        }

        Ok(value)
    }

    /// Full human-readable documentation block for this field
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

/// Cloning a field resets its uniqueness state: the clone starts with an
/// empty seen-value set, so a schema can be reused across files without
/// leaking duplicates from one run into the next.
impl Clone for Field {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone_box(),
            name: self.name.clone(),
            required: self.required,
            default: self.default.clone(),
            description: self.description.clone(),
            unique: self.unique,
            seen: self.unique.then(|| Arc::new(RwLock::new(HashSet::new()))),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("kind", &self.kind.name())
            .field("name", &self.name)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("unique", &self.unique)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name\n    {}", self.name.as_deref().unwrap_or("(unnamed)"))?;
        writeln!(f, "Type\n    {}", self.kind.name())?;
        writeln!(f, "Required\n    {}", self.required)?;
        if !self.required {
            writeln!(f, "Default\n    {}", self.default)?;
        }
        writeln!(f, "Unique\n    {}", self.unique)?;
        writeln!(f, "Description")?;
        for line in self.kind.describe().lines() {
            writeln!(f, "    {}", line.trim())?;
        }
        if let Some(description) = &self.description {
            writeln!(f)?;
            for line in description.lines() {
                writeln!(f, "    {}", line.trim())?;
            }
        }
        Ok(())
    }
}
