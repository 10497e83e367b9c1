//! Schema files
//!
//! Field schemas can be declared in TOML and loaded at runtime; this is what
//! the CLI feeds on. A schema file looks like:
//!
//! ```toml
//! [fields.owner]
//! type = "string"
//! unique = true
//!
//! [fields.price]
//! type = "float"
//! min_value = 0.0
//!
//! [fields.currency]
//! type = "iso-code"
//! required = false
//! default = "GBP"
//!
//! [rename]
//! owner = "user"
//! ```
//!
//! Fields are built in name order. Cross-field domains (one field feeding on
//! another's seen values) cannot be expressed in TOML; build such schemas in
//! code instead.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::field::Field;
use crate::fields::{
    Boolean, DecimalField, Domain, Float, Integer, IsoCodeAlpha, Percentage, RegexField,
    StringField, Timestamp,
};
use crate::reader::{Schema, SchemaError};
use crate::value::Value;

/// Errors loading or interpreting a schema file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("cannot read schema file {}: {source}", .path.display())]
    Io {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid TOML, or declares unknown keys
    #[error("invalid schema file {}: {source}", .path.display())]
    Parse {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// A field declaration is inconsistent
    #[error("field '{field}': {message}")]
    Invalid {
        /// Name of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// The rename table refers to unknown fields
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A parsed schema file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Field declarations, keyed by field name
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,

    /// Output renames: input column name to output row key
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
}

/// The type of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeName {
    /// [`Float`]
    Float,
    /// [`DecimalField`]
    Decimal,
    /// [`Integer`]
    Integer,
    /// [`Percentage`]
    Percentage,
    /// [`StringField`]
    String,
    /// [`RegexField`]
    Regex,
    /// [`IsoCodeAlpha`]
    IsoCode,
    /// [`Boolean`]
    Boolean,
    /// [`Timestamp`]
    Timestamp,
    /// [`Domain`]
    Domain,
}

/// One field declaration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// Field type
    #[serde(rename = "type")]
    pub type_name: TypeName,

    /// Whether a blank cell is an error (default true)
    #[serde(default = "default_true")]
    pub required: bool,

    /// Value substituted for blank cells when not required
    #[serde(default)]
    pub default: Option<toml::Value>,

    /// Free-text description, shown by `describe`
    #[serde(default)]
    pub description: Option<String>,

    /// Whether repeated values are an error (default false)
    #[serde(default)]
    pub unique: bool,

    /// Minimum allowable value (numeric fields)
    #[serde(default)]
    pub min_value: Option<f64>,

    /// Maximum allowable value (numeric fields)
    #[serde(default)]
    pub max_value: Option<f64>,

    /// Accept `value == min_value` (numeric fields, default true)
    #[serde(default)]
    pub allow_min: Option<bool>,

    /// Accept `value == max_value` (numeric fields, default true)
    #[serde(default)]
    pub allow_max: Option<bool>,

    /// Accept zero (numeric fields, default true)
    #[serde(default)]
    pub allow_zero: Option<bool>,

    /// Regular expression (regex fields)
    #[serde(default)]
    pub pattern: Option<String>,

    /// Number of letters (iso-code fields, default 3)
    #[serde(default)]
    pub chars: Option<usize>,

    /// strftime output format (timestamp fields)
    #[serde(default)]
    pub format: Option<String>,

    /// Day-first reading of ambiguous dates (timestamp fields, default true)
    #[serde(default)]
    pub dayfirst: Option<bool>,

    /// Year-first reading of ambiguous dates (timestamp fields)
    #[serde(default)]
    pub yearfirst: Option<bool>,

    /// Permitted values (domain fields)
    #[serde(default)]
    pub choices: Option<Vec<toml::Value>>,

    /// Case-sensitive choice matching (domain fields, default true)
    #[serde(default)]
    pub case_sensitive: Option<bool>,
}

const fn default_true() -> bool {
    true
}

macro_rules! apply_range {
    ($spec:expr, $ctor:expr) => {{
        let mut f = $ctor;
        if let Some(v) = $spec.min_value {
            f = f.min_value(v);
        }
        if let Some(v) = $spec.max_value {
            f = f.max_value(v);
        }
        if let Some(v) = $spec.allow_min {
            f = f.allow_min(v);
        }
        if let Some(v) = $spec.allow_max {
            f = f.allow_max(v);
        }
        if let Some(v) = $spec.allow_zero {
            f = f.allow_zero(v);
        }
        f
    }};
}

impl SchemaFile {
    /// Load and parse a schema file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build a runnable [`Schema`] out of the declarations
    pub fn build(&self) -> Result<Schema, ConfigError> {
        let mut schema = Schema::new();
        for (name, spec) in &self.fields {
            schema = schema.field(name, spec.build(name)?);
        }
        for (from, to) in &self.rename {
            schema = schema.rename(from, to);
        }
        // Surface bad renames at load time rather than at read time
        schema.check_renames()?;
        Ok(schema)
    }
}

impl FieldSpec {
    fn invalid(name: &str, message: impl Into<String>) -> ConfigError {
        ConfigError::Invalid {
            field: name.to_string(),
            message: message.into(),
        }
    }

    /// Build a [`Field`] out of this declaration
    pub fn build(&self, name: &str) -> Result<Field, ConfigError> {
        let field = match self.type_name {
            TypeName::Float => Field::new(apply_range!(self, Float::new())),
            TypeName::Decimal => Field::new(apply_range!(self, DecimalField::new())),
            TypeName::Integer => Field::new(apply_range!(self, Integer::new())),
            TypeName::Percentage => Field::new(apply_range!(self, Percentage::new())),
            TypeName::String => Field::new(StringField::new()),
            TypeName::Regex => {
                let pattern = self
                    .pattern
                    .as_deref()
                    .ok_or_else(|| Self::invalid(name, "regex fields need a 'pattern'"))?;
                let regex = RegexField::new(pattern)
                    .map_err(|e| Self::invalid(name, format!("invalid pattern: {e}")))?;
                Field::new(regex)
            },
            TypeName::IsoCode => Field::new(IsoCodeAlpha::new(self.chars.unwrap_or(3))),
            TypeName::Boolean => Field::new(Boolean::new()),
            TypeName::Timestamp => {
                let mut ts = Timestamp::new()
                    .dayfirst(self.dayfirst.unwrap_or(true))
                    .yearfirst(self.yearfirst.unwrap_or(false));
                if let Some(format) = &self.format {
                    ts = ts.format(format.clone());
                }
                Field::new(ts)
            },
            TypeName::Domain => {
                let choices = self
                    .choices
                    .as_ref()
                    .ok_or_else(|| Self::invalid(name, "domain fields need 'choices'"))?;
                let mut domain = Domain::new(choices.iter().cloned().map(Value::from));
                if !self.case_sensitive.unwrap_or(true) {
                    domain = domain.case_insensitive();
                }
                Field::new(domain)
            },
        };

        let mut field = field.required(self.required).unique(self.unique);
        if let Some(default) = &self.default {
            field = field.with_default(Value::from(default.clone()));
        }
        if let Some(description) = &self.description {
            field = field.with_description(description.clone());
        }
        Ok(field)
    }
}
