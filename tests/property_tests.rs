//! Property-based tests for the round-trip guarantees.
//!
//! Integers come back as `i64` (or a big integer past that) and decimals as
//! `f64`, so each property reads the text back into the type it started as.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_classjson::{from_str, to_string, Deserializer, TypeRegistry, Value};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct Item {
    name: String,
    count: i64,
    tags: Vec<String>,
    parent: Option<Box<Item>>,
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register_type::<Item>()
        .expect("Item serializes as a struct");
    registry
}

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_string(value) {
        Ok(serialized) => match from_str::<T, _>(&serialized, &registry()) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

fn item_strategy() -> impl Strategy<Value = Item> {
    let leaf = (
        ".*",
        any::<i64>(),
        prop::collection::vec(".*", 0..4),
    )
        .prop_map(|(name, count, tags)| Item {
            name,
            count,
            tags,
            parent: None,
        });
    leaf.prop_recursive(3, 8, 1, |inner| {
        (".*", any::<i64>(), inner).prop_map(|(name, count, parent)| Item {
            name,
            count,
            tags: vec![],
            parent: Some(Box::new(parent)),
        })
    })
}

proptest! {
    #[test]
    fn prop_i32(n in any::<i32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(&b));
    }

    #[test]
    fn prop_f64_finite(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(roundtrip(&f));
    }

    #[test]
    fn prop_string(s in any::<String>()) {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_structural_string(s in "[\\[\\]{}\",:\\\\ a-z]{0,24}") {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_nested_vec(v in prop::collection::vec(prop::collection::vec(any::<i16>(), 0..4), 0..6)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option_string(opt in proptest::option::of(".*")) {
        prop_assert!(roundtrip(&opt));
    }

    #[test]
    fn prop_map(m in prop::collection::btree_map(".*", any::<i32>(), 0..8)) {
        prop_assert!(roundtrip(&m));
    }

    #[test]
    fn prop_tuple_i32_bool(t in (any::<i32>(), any::<bool>())) {
        prop_assert!(roundtrip(&t));
    }

    #[test]
    fn prop_record(item in item_strategy()) {
        prop_assert!(roundtrip(&item));
    }

    #[test]
    fn prop_value_text_is_stable(m in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..8)) {
        let text = to_string(&m).unwrap();
        let value: Value = Deserializer::new(&TypeRegistry::new()).deserialize(&text).unwrap();
        prop_assert_eq!(value.to_string(), text);
    }
}

#[test]
fn test_btree_map_serializes_in_key_order() {
    let m: BTreeMap<String, i32> = [("b".to_string(), 2), ("a".to_string(), 1)]
        .into_iter()
        .collect();
    assert_eq!(to_string(&m).unwrap(), r#"{"a": 1, "b": 2}"#);
}
