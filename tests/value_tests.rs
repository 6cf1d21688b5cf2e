//! Tests for the ITF value model: wire decoding, round-trips, normalization,
//! and diagnostic rendering.

use indexmap::IndexMap;
use quint_connect::{Value, ValueError};
use serde_json::json;

fn parse(json: &str) -> Value {
    Value::from_json(&serde_json::from_str(json).unwrap()).unwrap()
}

fn record(pairs: &[(&str, Value)]) -> Value {
    Value::Record(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<IndexMap<_, _>>(),
    )
}

#[test]
fn deserialize_primitives() {
    assert_eq!(parse("true"), Value::Bool(true));
    assert_eq!(parse("false"), Value::Bool(false));
    assert_eq!(parse("42"), Value::Int(42));
    assert_eq!(parse("-7"), Value::Int(-7));
    assert_eq!(parse("\"hello\""), Value::Str("hello".into()));
}

#[test]
fn deserialize_bigint() {
    assert_eq!(parse(r##"{"#bigint": "12345"}"##), Value::BigInt("12345".into()));
}

#[test]
fn deserialize_list() {
    assert_eq!(
        parse("[1, 2]"),
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn deserialize_tuple() {
    assert_eq!(
        parse(r##"{"#tup": [1, true]}"##),
        Value::Tuple(vec![Value::Int(1), Value::Bool(true)])
    );
}

#[test]
fn deserialize_set() {
    assert_eq!(
        parse(r##"{"#set": [1, 2]}"##),
        Value::Set(vec![Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn deserialize_map() {
    assert_eq!(
        parse(r##"{"#map": [["a", 1]]}"##),
        Value::Map(vec![(Value::Str("a".into()), Value::Int(1))])
    );
}

#[test]
fn deserialize_record_strips_meta() {
    let result = parse(r##"{"#meta": {}, "x": 1, "y": 2}"##);
    assert_eq!(
        result,
        record(&[("x", Value::Int(1)), ("y", Value::Int(2))])
    );
}

#[test]
fn marker_dispatch_requires_single_key() {
    // A two-key object is a record even when its keys collide with markers.
    let result = parse(r##"{"#bigint": "5", "#tup": []}"##);
    assert_eq!(
        result,
        record(&[
            ("#bigint", Value::Str("5".into())),
            ("#tup", Value::List(vec![])),
        ])
    );
}

#[test]
fn rejects_floats_and_nulls() {
    let float = Value::from_json(&json!(1.5));
    assert!(matches!(float, Err(ValueError::UnsupportedNumber { .. })));

    let null = Value::from_json(&serde_json::Value::Null);
    assert!(matches!(null, Err(ValueError::UnsupportedJson { .. })));
}

#[test]
fn rejects_malformed_marker_payloads() {
    let bigint = Value::from_json(&json!({"#bigint": 5}));
    assert!(matches!(bigint, Err(ValueError::MarkerPayload { .. })));

    let tup = Value::from_json(&json!({"#tup": 5}));
    assert!(matches!(tup, Err(ValueError::MarkerPayload { .. })));

    let entry = Value::from_json(&json!({"#map": [[1, 2, 3]]}));
    assert!(matches!(entry, Err(ValueError::MapEntry { .. })));
}

#[test]
fn round_trips() {
    let values = [
        Value::Bool(true),
        Value::Int(-3),
        Value::Str("s".into()),
        Value::BigInt("999".into()),
        Value::List(vec![Value::Int(1)]),
        Value::Tuple(vec![Value::Int(1), Value::Str("a".into())]),
        Value::Set(vec![Value::BigInt("12345678901234567890".into())]),
        Value::Map(vec![(
            Value::Tuple(vec![Value::Int(1), Value::Int(2)]),
            Value::Bool(false),
        )]),
        record(&[
            ("a", Value::Int(1)),
            ("b", Value::Set(vec![Value::Tuple(vec![])])),
        ]),
    ];
    for v in values {
        assert_eq!(v, Value::from_json(&v.to_json()).unwrap(), "{v}");
    }
}

#[test]
fn normalize_scalars_matches_wire_form() {
    for v in [Value::Bool(true), Value::Int(42), Value::Str("x".into())] {
        assert_eq!(v.normalized().unwrap(), v.to_json());
    }
}

#[test]
fn normalize_bigint() {
    assert_eq!(
        Value::BigInt("42".into()).normalized().unwrap(),
        json!(42)
    );

    let huge = "99999999999999999999999999";
    assert_eq!(
        Value::BigInt(huge.into()).normalized().unwrap(),
        serde_json::Value::Number(huge.parse().unwrap())
    );

    let garbage = Value::BigInt("not-a-number".into()).normalized();
    assert!(matches!(garbage, Err(ValueError::InvalidBigInt { .. })));
}

#[test]
fn normalize_flattens_tuples_and_sets() {
    let v = Value::Tuple(vec![Value::Int(1), Value::Set(vec![Value::Int(2)])]);
    assert_eq!(v.normalized().unwrap(), json!([1, [2]]));
}

#[test]
fn normalize_map_keys() {
    let v = Value::Map(vec![
        (Value::Int(1), Value::Str("one".into())),
        (Value::BigInt("2".into()), Value::Str("two".into())),
        (Value::Bool(true), Value::Str("yes".into())),
        (Value::Str("k".into()), Value::Str("v".into())),
    ]);
    assert_eq!(
        v.normalized().unwrap(),
        json!({"1": "one", "2": "two", "true": "yes", "k": "v"})
    );
}

#[test]
fn normalize_rejects_composite_map_keys() {
    let v = Value::Map(vec![(Value::Tuple(vec![]), Value::Int(1))]);
    assert!(matches!(
        v.normalized(),
        Err(ValueError::UnsupportedKeyType { kind: "tuple" })
    ));
}

#[test]
fn normalize_records_recursively() {
    let v = record(&[
        ("n", Value::BigInt("7".into())),
        ("xs", Value::Set(vec![Value::Int(1)])),
    ]);
    assert_eq!(v.normalized().unwrap(), json!({"n": 7, "xs": [1]}));
}

#[test]
fn display_sum_type_variants() {
    let unit = record(&[("tag", Value::Str("Stop".into())), ("value", Value::Tuple(vec![]))]);
    assert_eq!(unit.to_string(), "Stop");

    let tuple = record(&[
        ("tag", Value::Str("Pair".into())),
        ("value", Value::Tuple(vec![Value::Int(1), Value::Int(2)])),
    ]);
    assert_eq!(tuple.to_string(), "Pair(1, 2)");

    let some = record(&[("tag", Value::Str("Some".into())), ("value", Value::Int(5))]);
    assert_eq!(some.to_string(), "Some(5)");
}

#[test]
fn display_collections() {
    assert_eq!(
        Value::List(vec![Value::Int(1), Value::Int(2)]).to_string(),
        "List(1, 2)"
    );
    assert_eq!(Value::Set(vec![Value::Str("a".into())]).to_string(), "Set(\"a\")");
    assert_eq!(
        Value::Map(vec![(Value::Int(1), Value::Bool(true))]).to_string(),
        "Map(1 -> true)"
    );
    assert_eq!(
        record(&[("x", Value::Int(1)), ("y", Value::Int(2))]).to_string(),
        "{ x: 1, y: 2 }"
    );
}

#[test]
fn into_option_unwraps_some() {
    let some = record(&[("tag", Value::Str("Some".into())), ("value", Value::Int(5))]);
    assert_eq!(some.into_option(), Some(Value::Int(5)));
}

#[test]
fn into_option_drops_none() {
    let none = record(&[("tag", Value::Str("None".into()))]);
    assert_eq!(none.into_option(), None);
}

#[test]
fn into_option_passes_through_non_options() {
    let rec = record(&[("tag", Value::Str("Move".into())), ("other", Value::Int(1))]);
    assert_eq!(rec.clone().into_option(), Some(rec));

    assert_eq!(Value::Int(3).into_option(), Some(Value::Int(3)));
}
