//! Wire format tests: exact output shapes and how they read back.

use serde::Serialize;
use serde_classjson::{classjson, to_string, Deserializer, Number, Record, TypeRegistry, Value};
use std::collections::BTreeMap;

#[derive(Serialize, Default)]
#[allow(non_snake_case)]
struct Address {
    City: String,
    Country: String,
}

#[derive(Serialize, Default)]
#[allow(non_snake_case)]
struct Person {
    Name: String,
    Age: i32,
    Address: Option<Address>,
}

#[derive(Serialize, Default)]
struct Marker;

#[derive(Serialize, Default)]
struct Sparse {
    first: Option<i32>,
    second: Option<String>,
}

fn parse(text: &str) -> Value {
    Deserializer::new(&TypeRegistry::new())
        .deserialize(text)
        .unwrap()
}

// Serializing

#[test]
fn test_scalars() {
    assert_eq!(to_string(&42).unwrap(), "42");
    assert_eq!(to_string(&-7i8).unwrap(), "-7");
    assert_eq!(to_string(&true).unwrap(), "true");
    assert_eq!(to_string(&false).unwrap(), "false");
    assert_eq!(to_string("Hi").unwrap(), r#""Hi""#);
    assert_eq!(to_string(&'x').unwrap(), r#""x""#);
    assert_eq!(to_string(&()).unwrap(), "null");
    assert_eq!(to_string(&None::<i32>).unwrap(), "null");
}

#[test]
fn test_floats_use_point() {
    assert_eq!(to_string(&1.5).unwrap(), "1.5");
    assert_eq!(to_string(&1.0).unwrap(), "1.0");
    assert_eq!(to_string(&-0.25f32).unwrap(), "-0.25");
    assert_eq!(to_string(&1e21).unwrap(), "1000000000000000000000.0");
}

#[test]
fn test_sequences() {
    assert_eq!(to_string(&[1, 2, 3]).unwrap(), "[1, 2, 3]");
    assert_eq!(to_string(&Vec::<i32>::new()).unwrap(), "[]");
    assert_eq!(to_string(&(1, "a", true)).unwrap(), r#"[1, "a", true]"#);
    assert_eq!(
        to_string(&vec![vec![1], vec![], vec![2, 3]]).unwrap(),
        "[[1], [], [2, 3]]"
    );
}

#[test]
fn test_mappings() {
    let mut map = BTreeMap::new();
    map.insert("A", 1);
    map.insert("B", 2);
    assert_eq!(to_string(&map).unwrap(), r#"{"A": 1, "B": 2}"#);
    assert_eq!(to_string(&BTreeMap::<String, i32>::new()).unwrap(), "{}");

    let mut numbered = BTreeMap::new();
    numbered.insert(1, "one");
    assert_eq!(to_string(&numbered).unwrap(), r#"{"1": "one"}"#);
}

#[test]
fn test_person_record() {
    let person = Person {
        Name: "Sonya".to_string(),
        Age: 20,
        Address: Some(Address {
            City: "Vladivostok".to_string(),
            Country: "Russia".to_string(),
        }),
    };
    assert_eq!(
        to_string(&person).unwrap(),
        r#"{"class": "Person", "Name": "Sonya", "Age": 20, "Address": {"class": "Address", "City": "Vladivostok", "Country": "Russia"}}"#
    );
}

#[test]
fn test_record_fields_never_omitted() {
    assert_eq!(
        to_string(&Sparse::default()).unwrap(),
        r#"{"class": "Sparse", "first": null, "second": null}"#
    );
    assert_eq!(to_string(&Marker).unwrap(), r#"{"class": "Marker"}"#);
}

#[test]
fn test_string_escaping() {
    assert_eq!(
        to_string("quote\" slash\\ tab\t nl\n bell\u{7}").unwrap(),
        r#""quote\" slash\\ tab\t nl\n bell\u0007""#
    );
    assert_eq!(to_string("Ünïcödé ✓").unwrap(), "\"Ünïcödé ✓\"");
}

#[test]
fn test_value_display_matches_serializer() {
    let mut record = Record::new("Point");
    record.push_field("x", Value::from(1));
    record.push_field("y", Value::from(2.0));

    let value = classjson!({ "points": [null], "count": 1 });
    assert_eq!(value.to_string(), r#"{"points": [null], "count": 1}"#);
    assert_eq!(
        Value::from(record).to_string(),
        r#"{"class": "Point", "x": 1, "y": 2.0}"#
    );
}

// Deserializing

#[test]
fn test_parse_null_and_scalars() {
    assert_eq!(parse("null"), Value::Null);
    assert_eq!(parse("42"), Value::Number(Number::Integer(42)));
    assert_eq!(parse("-42"), Value::Number(Number::Integer(-42)));
    assert_eq!(parse("2.5"), Value::Number(Number::Float(2.5)));
    assert_eq!(parse("true"), Value::Bool(true));
    assert_eq!(parse("False"), Value::Bool(false));
    assert_eq!(parse(r#""Hi""#), Value::from("Hi"));
    assert_eq!(parse(r#""""#), Value::from(""));
}

#[test]
fn test_parse_mapping() {
    let value = parse(r#"{"A": 1, "B": 2}"#);
    let map = value.as_object().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("A"), Some(&Value::Number(Number::Integer(1))));
    assert_eq!(map.get("B"), Some(&Value::Number(Number::Integer(2))));
}

#[test]
fn test_parse_empty_compounds() {
    assert_eq!(parse("[]"), Value::Array(vec![]));
    assert_eq!(parse("{}"), classjson!({}));
    assert_eq!(parse("[ ]"), Value::Array(vec![]));
}

#[test]
fn test_parse_tolerates_whitespace() {
    assert_eq!(parse("  [ 1 ,2 , 3 ]\n"), classjson!([1, 2, 3]));
    assert_eq!(
        parse("{ \"a\" :1,  b: \"x\" }"),
        classjson!({ "a": 1, "b": "x" })
    );
}

#[test]
fn test_quoted_members_stay_strings() {
    let value = parse(r#"{"n": "42", "t": "true", "z": "null"}"#);
    assert_eq!(value.get("n"), Some(&Value::from("42")));
    assert_eq!(value.get("t"), Some(&Value::from("true")));
    assert_eq!(value.get("z"), Some(&Value::from("null")));
}

#[test]
fn test_parse_nested_arrays() {
    assert_eq!(
        parse("[[1, 2], [], [[3]]]"),
        classjson!([[1, 2], [], [[3]]])
    );
}

#[test]
fn test_parse_strings_with_structure_characters() {
    let value = parse(r#"["a, b", "{c}", "[d]", "e: f", "g\"h"]"#);
    assert_eq!(value, classjson!(["a, b", "{c}", "[d]", "e: f", "g\"h"]));
}

#[test]
fn test_parse_unicode_escapes() {
    assert_eq!(parse(r#""\u0041\u00e9""#), Value::from("Aé"));
    assert_eq!(parse(r#""\ud83d\ude00""#), Value::from("😀"));
    assert!(Deserializer::new(&TypeRegistry::new())
        .deserialize(r#""\ud83d""#)
        .unwrap_err()
        .is_format());
}

#[test]
fn test_trailing_comma_is_tolerated() {
    assert_eq!(parse("[1, 2,]"), classjson!([1, 2]));
    assert_eq!(parse(r#"{"a": 1,}"#), classjson!({ "a": 1 }));
}

#[test]
fn test_class_tag_must_be_a_string() {
    let err = Deserializer::new(&TypeRegistry::new())
        .deserialize(r#"{"class": 5}"#)
        .unwrap_err();
    assert!(err.is_format());
}
