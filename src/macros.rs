/// Builds a [`Value`](crate::Value) from a literal.
///
/// Objects built this way are plain objects even when they contain a `class`
/// key; use [`Record`](crate::Record) to build records.
///
/// # Panics
///
/// Panics if an interpolated expression fails to serialize, for example a
/// map with non-scalar keys.
///
/// ```rust
/// use serde_classjson::classjson;
///
/// let value = classjson!({ "name": "Alice", "tags": ["a", "b"], "boss": null });
/// assert_eq!(value.to_string(), r#"{"name": "Alice", "tags": ["a", "b"], "boss": null}"#);
/// ```
#[macro_export]
macro_rules! classjson {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::classjson!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ObjectMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ObjectMap::new();
        $(
            object.insert($key.to_string(), $crate::classjson!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Any other expression goes through its Serialize impl.
    ($s:expr) => {
        $crate::to_value(&$s).expect("classjson! value failed to serialize")
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, ObjectMap, Value};

    #[test]
    fn test_classjson_macro_primitives() {
        assert_eq!(classjson!(null), Value::Null);
        assert_eq!(classjson!(true), Value::Bool(true));
        assert_eq!(classjson!(false), Value::Bool(false));
        assert_eq!(classjson!(42), Value::Number(Number::Integer(42)));
        assert_eq!(classjson!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(classjson!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_classjson_macro_arrays() {
        assert_eq!(classjson!([]), Value::Array(vec![]));
        assert_eq!(
            classjson!([1, [2], null]),
            Value::Array(vec![
                Value::from(1),
                Value::Array(vec![Value::from(2)]),
                Value::Null,
            ])
        );
    }

    #[test]
    fn test_classjson_macro_objects() {
        assert_eq!(classjson!({}), Value::Object(ObjectMap::new()));

        let obj = classjson!({
            "name": "Alice",
            "age": 30
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("name"), Some(&Value::from("Alice")));
                assert_eq!(map.get("age"), Some(&Value::from(30)));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_classjson_macro_expressions() {
        let tags = vec!["a", "b"];
        assert_eq!(
            classjson!({ "tags": tags, "n": (1 + 2) }).to_string(),
            r#"{"tags": ["a", "b"], "n": 3}"#
        );
    }

    #[test]
    #[should_panic(expected = "classjson! value failed to serialize")]
    fn test_classjson_macro_panics_on_unserializable() {
        let mut grid = std::collections::BTreeMap::new();
        grid.insert(vec![0, 0], 1);
        let _ = classjson!(grid);
    }
}
