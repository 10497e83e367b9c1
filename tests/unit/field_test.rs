//! Tests for the field pipeline: preprocess, defaults, uniqueness

use fuzzyfields::{Field, FieldType, ValidationError, Value};

/// Stub validator that checks the input is 'foo' and returns 'bar'
#[derive(Debug, Clone, Copy)]
struct FooBar;

impl FieldType for FooBar {
    fn name(&self) -> &str {
        "foobar"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        match value {
            Value::Str(ref s) if s == "foo" => Ok(Value::Str("bar".to_string())),
            Value::Str(_) => Err(ValidationError::malformed(field, value, "foo")),
            v => Err(ValidationError::wrong_type(field, v, "foo")),
        }
    }

    fn describe(&self) -> String {
        "Must be 'foo'".to_string()
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(*self)
    }
}

/// Stub validator that accepts anything
#[derive(Debug, Clone, Copy)]
struct Anything;

impl FieldType for Anything {
    fn name(&self) -> &str {
        "anything"
    }

    fn validate(&self, value: Value, _field: Option<&str>) -> Result<Value, ValidationError> {
        Ok(value)
    }

    fn describe(&self) -> String {
        "Anything goes".to_string()
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(*self)
    }
}

#[test]
fn parse_trims_and_validates() {
    let ff = Field::new(FooBar);
    assert_eq!(ff.parse("  foo  ").unwrap(), Value::Str("bar".to_string()));

    let err = ff.parse(Value::Array(vec![])).unwrap_err();
    assert_eq!(err.to_string(), "Invalid field type: expected foo, got '[]'");

    let err = ff.parse("other").unwrap_err();
    assert_eq!(err.to_string(), "Malformed field: expected foo, got 'other'");

    let err = ff.parse("N/A").unwrap_err();
    assert_eq!(err.to_string(), "Missing or blank field");
}

#[test]
fn field_name_appears_in_errors() {
    let ff = Field::new(FooBar).named("x");
    let err = ff.parse(Value::Array(vec![])).unwrap_err();
    assert_eq!(err.to_string(), "Field x: Invalid field type: expected foo, got '[]'");

    let err = ff.parse("other").unwrap_err();
    assert_eq!(err.to_string(), "Field x: Malformed field: expected foo, got 'other'");

    let err = ff.parse(Value::Null).unwrap_err();
    assert_eq!(err.to_string(), "Field x: Missing or blank field");
}

#[test]
fn default_bypasses_uniqueness() {
    let ff = Field::new(Anything).required(false).unique(true).with_default(123);
    assert_eq!(ff.parse(1).unwrap(), Value::Int(1));
    assert_eq!(ff.parse("   N/A   ").unwrap(), Value::Int(123));
    // The default value does not trigger the uniqueness check
    assert_eq!(ff.parse("   N/A   ").unwrap(), Value::Int(123));

    let err = ff.parse(1).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate value: '1'");
}

#[test]
fn null_values() {
    let ff = Field::new(Anything).required(false);
    assert_eq!(ff.parse(" N/A ").unwrap(), Value::Null);
    assert_eq!(ff.parse("  ").unwrap(), Value::Null);
    assert_eq!(ff.parse(f64::NAN).unwrap(), Value::Null);
    assert_eq!(ff.parse(Value::Null).unwrap(), Value::Null);
}

#[test]
fn na_spellings_are_blank() {
    let ff = Field::new(Anything).required(false).with_default("blank");
    for token in ["", "N/A", "NA", "NULL", "NaN", "n/a", "nan", "null", "N.A.", "#N/A"] {
        assert_eq!(ff.parse(token).unwrap(), Value::Str("blank".to_string()), "token {token:?}");
    }
    // Similar-looking strings are not blank
    assert_eq!(ff.parse("None").unwrap(), Value::Str("None".to_string()));
}

#[test]
fn unique_tracks_cross_type_numerics() {
    let ff = Field::new(Anything).unique(true);
    assert!(ff.parse(1).is_ok());
    // Float and int hit the same key
    let err = ff.parse(1.0).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate value: '1'");
    assert!(ff.parse(2).is_ok());
}

#[test]
fn unique_tracks_arrays() {
    let ff = Field::new(Anything).unique(true);
    let a = Value::Array(vec![Value::Int(1), Value::Int(2)]);
    let b = Value::Array(vec![Value::Int(1), Value::Int(3)]);
    assert!(ff.parse(a.clone()).is_ok());
    assert!(ff.parse(b).is_ok());
    let err = ff.parse(a).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate value: '[1, 2]'");
}

#[test]
fn clone_resets_seen_values() {
    let ff1 = Field::new(Anything).unique(true);
    ff1.parse(1).unwrap();

    let ff2 = ff1.clone();
    assert!(ff2.is_unique());
    // The clone starts from an empty seen set
    assert!(ff2.parse(1).is_ok());
    // ...and the original still remembers
    assert!(ff1.parse(1).is_err());
}

#[test]
fn seen_values_handle_is_live() {
    let ff = Field::new(Anything).unique(true);
    let seen = ff.seen_values().unwrap();
    assert!(seen.read().unwrap().is_empty());
    ff.parse("x").unwrap();
    assert!(seen.read().unwrap().contains(&Value::Str("x".to_string())));
}

#[test]
fn non_unique_fields_have_no_seen_values() {
    let ff = Field::new(Anything);
    assert!(ff.seen_values().is_none());
}

#[test]
fn describe_block() {
    let ff = Field::new(FooBar).named("x").with_description("my first foo");
    let expect = "Name\n    x\n\
                  Type\n    foobar\n\
                  Required\n    true\n\
                  Unique\n    false\n\
                  Description\n    Must be 'foo'\n\
                  \n    my first foo\n";
    assert_eq!(ff.describe(), expect);
}

#[test]
fn describe_block_with_default() {
    let ff = Field::new(FooBar).named("z").required(false).with_default("baz").unique(true);
    let expect = "Name\n    z\n\
                  Type\n    foobar\n\
                  Required\n    false\n\
                  Default\n    baz\n\
                  Unique\n    true\n\
                  Description\n    Must be 'foo'\n";
    assert_eq!(ff.describe(), expect);
}
