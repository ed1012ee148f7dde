//! Dynamic value representation.
//!
//! This module provides the [`Value`] enum, the tree both halves of the format
//! work on: the serializer can build it from any `T: Serialize` and render it,
//! the deserializer parses text into it.
//!
//! ## Core Types
//!
//! - [`Value`]: null, bool, number, string, array, object or record
//! - [`Number`]: integers, floats, arbitrary-precision integers and the
//!   non-finite float values
//! - [`Record`]: a named type tag plus its fields in declaration order
//!
//! ## Usage Patterns
//!
//! ```rust
//! use serde_classjson::{Record, Value};
//!
//! let mut person = Record::new("Person");
//! person.push_field("Name", Value::from("Sonya"));
//! person.push_field("Age", Value::from(20));
//!
//! let value = Value::Record(person);
//! assert_eq!(
//!     value.to_string(),
//!     r#"{"class": "Person", "Name": "Sonya", "Age": 20}"#
//! );
//! ```

use crate::ObjectMap;
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Reserved key that carries a record's type name on the wire.
pub const CLASS_KEY: &str = "class";

/// Newtype name under which integers wider than 128 bits pass through serde
/// as their decimal digits.
pub(crate) const BIGINT_TOKEN: &str = "$serde_classjson::private::BigInt";

/// A dynamically-typed representation of any value the format can express.
///
/// # Examples
///
/// ```rust
/// use serde_classjson::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(ObjectMap),
    Record(Record),
}

/// A numeric value.
///
/// Integers that fit in 64 bits are [`Number::Integer`]; integer literals
/// beyond that range keep every digit as [`Number::BigInt`]. Non-finite floats
/// have their own variants so that `Float` always holds a finite value.
///
/// # Examples
///
/// ```rust
/// use serde_classjson::Number;
///
/// assert!(Number::Integer(42).is_integer());
/// assert_eq!(Number::from_f64(f64::NAN), Number::NaN);
/// assert_eq!(Number::Float(3.5).as_f64(), 3.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
    BigInt(BigInt),
    Infinity,
    NegativeInfinity,
    NaN,
}

impl Number {
    /// Wraps an `f64`, mapping NaN and the infinities to their own variants.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Number::NaN
        } else if value == f64::INFINITY {
            Number::Infinity
        } else if value == f64::NEG_INFINITY {
            Number::NegativeInfinity
        } else {
            Number::Float(value)
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::BigInt(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns `true` if this is Infinity, -Infinity or NaN.
    #[inline]
    #[must_use]
    pub const fn is_special(&self) -> bool {
        matches!(
            self,
            Number::Infinity | Number::NegativeInfinity | Number::NaN
        )
    }

    /// Converts this number to an `i64` if it is integral and in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// assert_eq!(Number::Infinity.as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::BigInt(bi) => i64::try_from(bi).ok(),
            Number::Float(f) => {
                // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Converts this number to an `f64`, rounding big integers.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
            Number::BigInt(bi) => bi.to_string().parse().unwrap_or(f64::NAN),
            Number::Infinity => f64::INFINITY,
            Number::NegativeInfinity => f64::NEG_INFINITY,
            Number::NaN => f64::NAN,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        crate::ser::write_number(&mut out, self);
        f.write_str(&out)
    }
}

macro_rules! number_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::Integer(value as i64)
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

number_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(BigInt::from(value)),
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        match i64::try_from(&value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(value),
        }
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::from_f64(value as f64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
    }
}

/// A structured record: a type name plus named fields in declaration order.
///
/// On the wire a record is an object whose first key is `class`.
///
/// # Examples
///
/// ```rust
/// use serde_classjson::{Record, Value};
///
/// let mut address = Record::new("Address");
/// address.push_field("City", Value::from("Vladivostok"));
///
/// assert_eq!(address.class(), "Address");
/// assert!(address.set("City", Value::from("Moscow")));
/// assert!(!address.set("Zip", Value::from("690000")));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    class: String,
    fields: ObjectMap,
}

impl Record {
    /// Creates a record with no fields.
    #[must_use]
    pub fn new(class: impl Into<String>) -> Self {
        Record {
            class: class.into(),
            fields: ObjectMap::new(),
        }
    }

    #[must_use]
    pub fn with_fields(class: impl Into<String>, fields: ObjectMap) -> Self {
        Record {
            class: class.into(),
            fields,
        }
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[must_use]
    pub fn fields(&self) -> &ObjectMap {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Assigns an existing field. Returns `false`, leaving the record
    /// untouched, if the record has no field with that name.
    pub fn set(&mut self, field: &str, value: Value) -> bool {
        match self.fields.get_mut(field) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Sets a field, appending it after the existing ones if the record does
    /// not have it yet. An existing field keeps its position.
    pub fn push_field(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    #[must_use]
    pub fn into_fields(self) -> ObjectMap {
        self.fields
    }

    /// The record in its wire shape: `class` first, then the fields.
    pub(crate) fn into_tagged_map(self) -> ObjectMap {
        let mut map = ObjectMap::with_capacity(self.fields.len() + 1);
        map.insert(CLASS_KEY.to_string(), Value::String(self.class));
        for (key, value) in self.fields {
            map.insert(key, value);
        }
        map
    }
}

/// Turns collected map entries into a record when they lead with a string
/// `class` entry, the same shape the text parser would promote.
pub(crate) fn record_or_object(mut map: ObjectMap) -> Value {
    let leads_with_class = matches!(
        map.iter().next(),
        Some((key, Value::String(_))) if key == CLASS_KEY
    );
    if leads_with_class {
        if let Some(Value::String(class)) = map.remove(CLASS_KEY) {
            return Value::Record(Record::with_fields(class, map));
        }
    }
    Value::Object(map)
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integral number that fits in an `i64`, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::{Number, Value};
    ///
    /// assert_eq!(Value::Number(Number::Integer(42)).as_i64(), Some(42));
    /// assert_eq!(Value::Number(Number::Float(42.5)).as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Looks up a key in an object or a field in a record.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::classjson;
    ///
    /// let value = classjson!({ "A": 1 });
    /// assert_eq!(value.get("A").and_then(|v| v.as_i64()), Some(1));
    /// assert!(value.get("B").is_none());
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(obj) => obj.get(key),
            Value::Record(record) => record.get(key),
            _ => None,
        }
    }
}

/// Renders the value in its wire form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(64);
        crate::ser::write_value(&mut out, self);
        f.write_str(&out)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::Number(Number::BigInt(bi)) => {
                if let Ok(i) = i128::try_from(bi) {
                    serializer.serialize_i128(i)
                } else if let Ok(u) = u128::try_from(bi) {
                    serializer.serialize_u128(u)
                } else {
                    serializer.serialize_newtype_struct(BIGINT_TOKEN, &bi.to_string())
                }
            }
            Value::Number(Number::Infinity) => serializer.serialize_f64(f64::INFINITY),
            Value::Number(Number::NegativeInfinity) => {
                serializer.serialize_f64(f64::NEG_INFINITY)
            }
            Value::Number(Number::NaN) => serializer.serialize_f64(f64::NAN),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.fields.len() + 1))?;
                map.serialize_entry(CLASS_KEY, &record.class)?;
                for (k, v) in &record.fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(value)))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(BigInt::from(value))))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(BigInt::from(value))))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from_f64(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ObjectMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(record_or_object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| crate::Error::custom(format!("expected integer, found {:?}", value)))
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            _ => Err(crate::Error::custom(format!(
                "expected number, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected bool, found {:?}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {:?}",
                value
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ObjectMap> for Value {
    fn from(value: ObjectMap) -> Self {
        Value::Object(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
