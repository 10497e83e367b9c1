//! Built-in field types
//!
//! Each type implements [`FieldType`](crate::field::FieldType) and is wrapped
//! in a [`Field`](crate::field::Field) to pick up the shared settings
//! (required/default/unique):
//!
//! ```
//! use fuzzyfields::{Field, Float, Value};
//!
//! let price = Field::new(Float::new().min_value(0.0)).named("price");
//! assert_eq!(price.parse("(1,000.10)").unwrap_err().to_string(),
//!            "Field price: value '-1000.1' is not acceptable (choices: [0, inf])");
//! assert_eq!(price.parse("1,000.10").unwrap(), Value::Float(1000.1));
//! ```

mod boolean;
mod domain;
mod numbers;
mod strings;
mod timestamp;

pub use boolean::Boolean;
pub use domain::Domain;
pub use numbers::{DecimalField, Float, Integer, Percentage};
pub use strings::{IsoCodeAlpha, RegexField, StringField};
pub use timestamp::{Timestamp, TimestampOutput};
