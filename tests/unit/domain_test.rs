//! Tests for the domain field

use fuzzyfields::{Decimal, Domain, Field, Integer, StringField, Value};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn mixed_choices() {
    let choices = vec![
        Value::Str("foo".to_string()),
        Value::Bool(false),
        Value::Array(vec![Value::Int(1)]),
    ];
    let ff = Field::new(Domain::new(choices)).required(false).with_default("stub");

    // The default does not go through domain validation
    assert_eq!(ff.parse("N/A").unwrap(), Value::Str("stub".to_string()));

    assert_eq!(ff.parse("foo").unwrap(), Value::Str("foo".to_string()));
    assert_eq!(ff.parse(false).unwrap(), Value::Bool(false));
    assert_eq!(
        ff.parse(Value::Array(vec![Value::Int(1)])).unwrap(),
        Value::Array(vec![Value::Int(1)])
    );

    // Out of domain; input case is preserved in the message
    let err = ff.parse("hEllo").unwrap_err();
    assert_eq!(err.to_string(), "value 'hEllo' is not acceptable (choices: [1],false,foo)");

    // Out of domain because of case sensitivity
    let err = ff.parse("Foo").unwrap_err();
    assert_eq!(err.to_string(), "value 'Foo' is not acceptable (choices: [1],false,foo)");
}

#[test]
fn case_insensitive_returns_choice_casing() {
    let ff = Field::new(Domain::new(["Foo"]).case_insensitive());
    assert_eq!(ff.parse("Foo").unwrap(), Value::Str("Foo".to_string()));
    assert_eq!(ff.parse("foo").unwrap(), Value::Str("Foo".to_string()));
    assert_eq!(ff.parse("FOO").unwrap(), Value::Str("Foo".to_string()));

    // The message keeps the input's casing
    let err = ff.parse("hEllo").unwrap_err();
    assert_eq!(err.to_string(), "value 'hEllo' is not acceptable (choices: Foo)");
}

#[test]
fn numeric_choices_return_canonical_representation() {
    let ff = Field::new(Domain::new([Value::Int(1), Value::Float(2.0)]));

    // Cross-type lookup returns the representation listed in the choices
    assert_eq!(ff.parse(1.0).unwrap(), Value::Int(1));
    assert_eq!(ff.parse(" 1.0e0 ").unwrap(), Value::Int(1));
    assert_eq!(ff.parse(dec("2")).unwrap(), Value::Float(2.0));
    assert_eq!(ff.parse("2").unwrap(), Value::Float(2.0));

    let err = ff.parse(3).unwrap_err();
    assert_eq!(err.to_string(), "value '3' is not acceptable (choices: 1,2)");
}

#[test]
fn long_choice_lists_are_truncated() {
    let a = "A".repeat(80);
    let b = "B".repeat(80);
    let c = "C".repeat(80);
    let ff = Field::new(Domain::new([a.clone(), b.clone(), c]));

    let err = ff.parse("D").unwrap_err();
    let expect = format!("value 'D' is not acceptable (choices: {a},{b},{}...)", "C".repeat(38));
    assert_eq!(err.to_string(), expect);
}

#[test]
fn shared_domain_follows_live_values() {
    let id = Field::new(StringField::new()).named("id").unique(true);
    let crossref = Field::new(Domain::shared(id.seen_values().unwrap())).named("crossref");

    // Nothing seen yet
    let err = crossref.parse("a01").unwrap_err();
    assert_eq!(err.to_string(), "Field crossref: value 'a01' is not acceptable (choices: )");

    id.parse("a01").unwrap();
    id.parse("a02").unwrap();

    assert_eq!(crossref.parse("a01").unwrap(), Value::Str("a01".to_string()));
    assert_eq!(crossref.parse("a02").unwrap(), Value::Str("a02".to_string()));
    assert!(crossref.parse("a03").is_err());
}

#[test]
fn shared_domain_with_numeric_values() {
    let id = Field::new(Integer::new()).named("id").unique(true);
    let crossref = Field::new(Domain::shared(id.seen_values().unwrap())).named("crossref");

    id.parse("1000").unwrap();

    // String spellings of seen numbers match
    assert_eq!(crossref.parse("1,000").unwrap(), Value::Int(1000));
    assert_eq!(crossref.parse(1000.0).unwrap(), Value::Int(1000));
    assert!(crossref.parse("999").is_err());
}

#[test]
fn describe_lists_choices() {
    use fuzzyfields::FieldType;

    let domain = Domain::new(["b", "a"]);
    assert_eq!(domain.describe(), "Any of: a,b");

    let id = Field::new(StringField::new()).unique(true);
    let shared = Domain::shared(id.seen_values().unwrap());
    assert_eq!(shared.describe(), "Choice from a domain (dynamically defined at runtime)");
}
