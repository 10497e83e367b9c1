//! Tests for the numeric fields

use fuzzyfields::{Decimal, DecimalField, Field, Float, Integer, Percentage, Value};
use test_case::test_case;

fn float_field() -> Field {
    Field::new(Float::new())
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test_case("1000.1", 1000.1 ; "plain")]
#[test_case("-1,000.1", -1000.1 ; "thousands separator")]
#[test_case("(1,000.1)", -1000.1 ; "accounting negative")]
#[test_case("- 1,000.1 -", -1000.1 ; "excel negative")]
#[test_case("-1,234.5e-6", -1234.5e-6 ; "scientific")]
#[test_case("-1,234.5E-06", -1234.5e-6 ; "scientific uppercase")]
#[test_case("1,234E006", 1234.0e6 ; "scientific no dot")]
#[test_case("- 1,234.5e-6 -", -1234.5e-6 ; "excel negative scientific")]
#[test_case("(1,234.5e-6)", -1234.5e-6 ; "accounting negative scientific")]
fn float_parsing(input: &str, expect: f64) {
    assert_eq!(float_field().parse(input).unwrap(), Value::Float(expect));
}

#[test]
fn float_infinities() {
    let ff = float_field();
    assert_eq!(ff.parse("inf").unwrap(), Value::Float(f64::INFINITY));
    assert_eq!(ff.parse("-inf").unwrap(), Value::Float(f64::NEG_INFINITY));
    assert_eq!(ff.parse("- inf -").unwrap(), Value::Float(f64::NEG_INFINITY));
    assert_eq!(ff.parse("(inf)").unwrap(), Value::Float(f64::NEG_INFINITY));
}

#[test]
fn float_errors() {
    let ff = float_field();
    let err = ff.parse(Value::Array(vec![])).unwrap_err();
    assert_eq!(err.to_string(), "Invalid field type: expected number, got '[]'");
    let err = ff.parse("Foo").unwrap_err();
    assert_eq!(err.to_string(), "Malformed field: expected number, got 'Foo'");
}

#[test_case("1000.1", "1000.1" ; "plain")]
#[test_case("-1,000.1", "-1000.1" ; "thousands separator")]
#[test_case("(1,000.1)", "-1000.1" ; "accounting negative")]
#[test_case("- 1,000.1 -", "-1000.1" ; "excel negative")]
#[test_case("-1,234.5e-6", "-1234.5e-6" ; "scientific")]
#[test_case("-1,234E006", "-1234e6" ; "scientific no dot")]
fn decimal_parsing(input: &str, expect: &str) {
    let ff = Field::new(DecimalField::new());
    assert_eq!(ff.parse(input).unwrap(), Value::Decimal(dec(expect)));
}

#[test]
fn decimal_infinities_degrade_to_float() {
    let ff = Field::new(DecimalField::new());
    assert_eq!(ff.parse("inf").unwrap(), Value::Float(f64::INFINITY));
    assert_eq!(ff.parse("(inf)").unwrap(), Value::Float(f64::NEG_INFINITY));
}

#[test]
fn decimal_errors() {
    let ff = Field::new(DecimalField::new());
    let err = ff.parse(Value::Array(vec![])).unwrap_err();
    assert_eq!(err.to_string(), "Invalid field type: expected number, got '[]'");
    let err = ff.parse("Foo").unwrap_err();
    assert_eq!(err.to_string(), "Malformed field: expected number, got 'Foo'");
}

#[test]
fn decimal_does_not_round_trip_through_floats() {
    let ff = Field::new(DecimalField::new());
    // 3.1 as an f64 is 3.100000000000000088...; the decimal must stay 3.1
    assert_eq!(ff.parse("3.1").unwrap().to_string(), "3.1");
    assert_eq!(ff.parse(3.1).unwrap().to_string(), "3.1");
}

#[test_case("1000.0", 1000 ; "trailing zero fraction")]
#[test_case("1000", 1000 ; "plain")]
#[test_case("1,000", 1000 ; "thousands separator")]
#[test_case("-1000", -1000 ; "negative")]
#[test_case("- 1000 -", -1000 ; "excel negative")]
#[test_case("(1000.0)", -1000 ; "accounting negative")]
#[test_case("1.2e1", 12 ; "scientific")]
#[test_case("(120.e-1)", -12 ; "accounting scientific")]
#[test_case("- 120.e-1 -", -12 ; "excel scientific")]
fn integer_parsing(input: &str, expect: i64) {
    let ff = Field::new(Integer::new());
    assert_eq!(ff.parse(input).unwrap(), Value::Int(expect));
}

#[test]
fn integer_infinities_stay_float() {
    let ff = Field::new(Integer::new());
    for (input, expect) in [
        ("inf", f64::INFINITY),
        ("-inf", f64::NEG_INFINITY),
        ("- inf -", f64::NEG_INFINITY),
        ("(inf)", f64::NEG_INFINITY),
    ] {
        let out = ff.parse(input).unwrap();
        assert!(matches!(out, Value::Float(f) if f == expect), "input {input:?} gave {out:?}");
    }
}

#[test]
fn integer_errors() {
    let ff = Field::new(Integer::new());
    let err = ff.parse(Value::Array(vec![])).unwrap_err();
    assert_eq!(err.to_string(), "Invalid field type: expected integer, got '[]'");
    let err = ff.parse("Foo").unwrap_err();
    assert_eq!(err.to_string(), "Malformed field: expected integer, got 'Foo'");
    let err = ff.parse(3.5).unwrap_err();
    assert_eq!(err.to_string(), "Malformed field: expected integer, got '3.5'");
    let err = ff.parse("3.5").unwrap_err();
    assert_eq!(err.to_string(), "Malformed field: expected integer, got '3.5'");
}

#[test_case("9999999999999999" ; "digit string")]
#[test_case("999999999999999.9e1" ; "scientific string")]
fn integer_precision(input: &str) {
    // 16-digit identifiers do not survive an f64 round-trip; the integer
    // conversion must not lose them
    let expect = 9_999_999_999_999_999i64;
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let through_float = (input.parse::<f64>().unwrap_or(expect as f64)) as i64;
    assert_ne!(through_float, expect);

    let ff = Field::new(Integer::new());
    assert_eq!(ff.parse(input).unwrap(), Value::Int(expect));

    let ff = Field::new(DecimalField::new());
    assert_eq!(ff.parse(input).unwrap(), Value::Decimal(Decimal::from(expect)));
}

#[test]
fn output_types() {
    // Whatever the input type, each field returns its own output type
    let inputs = || {
        vec![
            Value::Str("1".to_string()),
            Value::Str("1.0".to_string()),
            Value::Int(1),
            Value::Float(1.0),
            Value::Decimal(dec("1")),
        ]
    };
    for value in inputs() {
        let out = Field::new(Float::new()).parse(value.clone()).unwrap();
        assert!(matches!(out, Value::Float(f) if f == 1.0), "float from {value:?}");

        let out = Field::new(Integer::new()).parse(value.clone()).unwrap();
        assert!(matches!(out, Value::Int(1)), "integer from {value:?}");

        let out = Field::new(DecimalField::new()).parse(value.clone()).unwrap();
        assert!(matches!(out, Value::Decimal(d) if d == dec("1")), "decimal from {value:?}");

        let out = Field::new(Percentage::new()).parse(value.clone()).unwrap();
        assert!(matches!(out, Value::Float(f) if f == 1.0), "percentage from {value:?}");
    }
}

#[test]
fn percentage_parsing() {
    let ff = Field::new(Percentage::new());
    assert_eq!(ff.parse("-0.052").unwrap(), Value::Float(-0.052));
    assert_eq!(ff.parse("- 0.052 -").unwrap(), Value::Float(-0.052));
    assert_eq!(ff.parse("(0.052)").unwrap(), Value::Float(-0.052));
    // Only the % sign triggers the division, sidestepping -5.2/100 rounding
    assert_eq!(ff.parse("-5.2%").unwrap(), Value::Float(-5.2 / 100.0));
    assert_eq!(ff.parse("-5.2 %").unwrap(), Value::Float(-5.2 / 100.0));
    assert_eq!(ff.parse("- 5.2% -").unwrap(), Value::Float(-5.2 / 100.0));
    assert_eq!(ff.parse("(5.2%)").unwrap(), Value::Float(-5.2 / 100.0));
    assert_eq!(ff.parse(-0.052).unwrap(), Value::Float(-0.052));
    assert_eq!(ff.parse(dec("-0.052")).unwrap(), Value::Float(-0.052));
}

#[test]
fn percentage_errors() {
    let ff = Field::new(Percentage::new());
    let err = ff.parse(Value::Array(vec![])).unwrap_err();
    assert_eq!(err.to_string(), "Invalid field type: expected percentage, got '[]'");
    let err = ff.parse("Foo").unwrap_err();
    assert_eq!(err.to_string(), "Malformed field: expected percentage, got 'Foo'");
}

#[test_case("nan%" ; "nan percent")]
#[test_case("%" ; "bare percent")]
#[test_case("N/A%" ; "na percent")]
#[test_case("N.A.%" ; "na dots percent")]
fn percentage_blank_spellings(input: &str) {
    let ff = Field::new(Percentage::new());
    let err = ff.parse(input).unwrap_err();
    assert_eq!(err.to_string(), "Missing or blank field");

    let ff = Field::new(Percentage::new()).required(false);
    let out = ff.parse(input).unwrap();
    assert!(matches!(out, Value::Float(f) if f.is_nan()));
}

#[test]
fn numeric_defaults_are_nan() {
    // Unlike other fields, numbers default to NaN rather than null
    for field in [
        Field::new(Float::new()),
        Field::new(Integer::new()),
        Field::new(DecimalField::new()),
        Field::new(Percentage::new()),
    ] {
        let field = field.required(false);
        for blank in [Value::Null, Value::Str("N/A".to_string()), Value::Float(f64::NAN)] {
            let out = field.parse(blank).unwrap();
            assert!(matches!(out, Value::Float(f) if f.is_nan()));
        }
    }

    // ...unless overridden
    let ff = Field::new(Float::new()).required(false).with_default(Value::Null);
    assert_eq!(ff.parse("N/A").unwrap(), Value::Null);
}

#[test]
fn range_checks() {
    let ff = Field::new(Float::new().min_value(0.0).max_value(100.0));
    assert_eq!(ff.parse("50").unwrap(), Value::Float(50.0));
    assert_eq!(ff.parse("0").unwrap(), Value::Float(0.0));
    assert_eq!(ff.parse("100").unwrap(), Value::Float(100.0));

    let err = ff.parse("-1").unwrap_err();
    assert_eq!(err.to_string(), "value '-1' is not acceptable (choices: [0, 100])");
    let err = ff.parse("150").unwrap_err();
    assert_eq!(err.to_string(), "value '150' is not acceptable (choices: [0, 100])");
}

#[test]
fn range_checks_strict_and_nonzero() {
    let ff = Field::new(Float::new().min_value(-1.0).max_value(1.0).allow_min(false).allow_zero(false));
    assert!(ff.parse("0.5").is_ok());
    let err = ff.parse("-1").unwrap_err();
    assert_eq!(err.to_string(), "value '-1' is not acceptable (choices: ]-1, 1] non-zero)");
    let err = ff.parse("0").unwrap_err();
    assert_eq!(err.to_string(), "value '0' is not acceptable (choices: ]-1, 1] non-zero)");
    assert!(ff.parse("1").is_ok());
}

#[test]
fn range_applies_to_integers_and_percentages() {
    let ff = Field::new(Integer::new().min_value(1.0));
    assert!(ff.parse("5").is_ok());
    assert!(ff.parse("0").is_err());

    // Keep percentages in [0, 1] to catch "35" written for "35%"
    let ff = Field::new(Percentage::new().min_value(0.0).max_value(1.0));
    assert!(ff.parse("35%").is_ok());
    assert!(ff.parse("35").is_err());
}
