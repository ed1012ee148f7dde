//! # serde_classjson
//!
//! A Serde-compatible, JSON-like text format whose structs carry their type
//! name, so that they can be rebuilt as records on the way back in.
//!
//! ## What does it look like?
//!
//! Scalars, sequences and maps look like JSON with a space after every `:`
//! and `,`. A struct becomes an object whose first key is `class`:
//!
//! ```text
//! {"class": "Person", "Name": "Sonya", "Age": 20, "Address": {"class": "Address", "City": "Vladivostok", "Country": "Russia"}}
//! ```
//!
//! ## Key Features
//!
//! - **Serde Compatible**: any `T: Serialize` can be written
//! - **Ordered Output**: map entries and struct fields keep their order
//! - **Explicit Type Registry**: `class` tags only resolve to types the caller
//!   registered, never to arbitrary types named by the input
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_classjson::{from_str, to_string, TypeRegistry};
//!
//! #[derive(Serialize, Deserialize, Default, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, r#"{"class": "User", "id": 123, "name": "Alice", "active": true}"#);
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_type::<User>().unwrap();
//!
//! let user_back: User = from_str(&text, &registry).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic Values
//!
//! ```rust
//! use serde_classjson::{classjson, Deserializer, TypeRegistry};
//!
//! let data = classjson!({ "A": 1, "B": [true, null] });
//! assert_eq!(data.to_string(), r#"{"A": 1, "B": [true, null]}"#);
//!
//! let registry = TypeRegistry::new();
//! let parsed = Deserializer::new(&registry).deserialize(&data.to_string()).unwrap();
//! assert_eq!(parsed, data);
//! ```
//!
//! ## Numbers
//!
//! Parsed integers become `i64` (wider literals keep every digit as a big
//! integer) and parsed decimals become `f64`. Floats are written with a `.`
//! even when whole, so `1.0` reads back as a float rather than an integer.

pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod registry;
pub mod ser;
mod split;
pub mod value;

pub use de::{Deserializer, ValueDeserializer};
pub use error::{Error, Result};
pub use map::ObjectMap;
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH};
pub use registry::{RecordType, TypeRegistry, TypeResolver};
pub use ser::{Serializer, ValueSerializer};
pub use value::{Number, Record, Value, CLASS_KEY};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` to a string.
///
/// # Examples
///
/// ```rust
/// use serde_classjson::to_string;
/// use std::collections::BTreeMap;
///
/// assert_eq!(to_string(&vec![1, 2, 3]).unwrap(), "[1, 2, 3]");
///
/// let map: BTreeMap<&str, i32> = [("A", 1), ("B", 2)].into_iter().collect();
/// assert_eq!(to_string(&map).unwrap(), r#"{"A": 1, "B": 2}"#);
/// ```
///
/// # Errors
///
/// Returns an error if a map key is not a string or scalar, or if a
/// `Serialize` implementation reports one.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new();
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// Structs become [`Value::Record`]s.
///
/// # Examples
///
/// ```rust
/// use serde_classjson::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.as_record().unwrap().class(), "Point");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` into a writer.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from text, resolving `class` tags
/// through `registry`.
///
/// # Examples
///
/// ```rust
/// use serde_classjson::{from_str, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// let numbers: Vec<i64> = from_str("[1, 2, 3]", &registry).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if the text is malformed, names an unregistered record
/// type, or does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T, R>(s: &str, registry: &R) -> Result<T>
where
    T: DeserializeOwned,
    R: TypeResolver + ?Sized,
{
    let value = Deserializer::new(registry).deserialize(s)?;
    from_value(value)
}

/// Deserialize an instance of type `T` from an I/O stream.
///
/// # Errors
///
/// Returns an error if reading fails or the text cannot be deserialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<Rd, T, R>(mut reader: Rd, registry: &R) -> Result<T>
where
    Rd: io::Read,
    T: DeserializeOwned,
    R: TypeResolver + ?Sized,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string, registry)
}

/// Deserialize an instance of type `T` from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or cannot be
/// deserialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T, R>(v: &[u8], registry: &R) -> Result<T>
where
    T: DeserializeOwned,
    R: TypeResolver + ?Sized,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s, registry)
}

/// Deserialize an instance of type `T` from a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_classjson::{classjson, from_value};
/// use std::collections::HashMap;
///
/// let map: HashMap<String, i32> = from_value(classjson!({ "A": 1 })).unwrap();
/// assert_eq!(map["A"], 1);
/// ```
///
/// # Errors
///
/// Returns an error if the value does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}
