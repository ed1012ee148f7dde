//! Deserialization.
//!
//! This module provides the [`Deserializer`] that parses text into a
//! [`Value`], rebuilding records through a [`TypeResolver`], and the bridge
//! that turns a [`Value`] into any `T: Deserialize`.
//!
//! ## Classification
//!
//! A literal is classified by its first and last characters:
//!
//! - `null`
//! - `"..."` is a string
//! - `[...]` is an array, split at top-level commas
//! - `{...}` is an object, or a record when one of its keys is `class`
//! - anything else must parse as a boolean or a number
//!
//! ## Usage
//!
//! ```rust
//! use serde_classjson::{Deserializer, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new();
//! let value = Deserializer::new(&registry)
//!     .deserialize(r#"{"A": 1, "B": [true, null]}"#)
//!     .unwrap();
//!
//! assert_eq!(value.get("A"), Some(&Value::from(1)));
//! ```

use crate::split::{split_member, split_top_level};
use crate::{
    Error, Number, ObjectMap, ParseOptions, Result, TypeRegistry, TypeResolver, Value, CLASS_KEY,
};
use num_bigint::BigInt;
use serde::de::{self, Deserializer as _, IntoDeserializer};
use serde::forward_to_deserialize_any;
use tracing::{debug, trace};

/// The text deserializer.
///
/// Holds the record type registry and parse options; each call to
/// [`Deserializer::deserialize`] is independent.
pub struct Deserializer<'r, R: TypeResolver + ?Sized = TypeRegistry> {
    registry: &'r R,
    options: ParseOptions,
}

impl<'r, R: TypeResolver + ?Sized> Deserializer<'r, R> {
    /// Creates a deserializer that resolves `class` tags through `registry`,
    /// with default [`ParseOptions`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::{Deserializer, TypeRegistry, Value};
    ///
    /// let registry = TypeRegistry::new();
    /// let value = Deserializer::new(&registry).deserialize("[1, 2]").unwrap();
    /// assert_eq!(value, Value::Array(vec![Value::from(1), Value::from(2)]));
    /// ```
    pub fn new(registry: &'r R) -> Self {
        Deserializer {
            registry,
            options: ParseOptions::default(),
        }
    }

    /// Replaces the parse options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::{Deserializer, ParseOptions, TypeRegistry};
    ///
    /// let registry = TypeRegistry::new();
    /// let deserializer = Deserializer::new(&registry)
    ///     .with_options(ParseOptions::new().with_max_depth(1));
    /// assert!(deserializer.deserialize("[1]").is_ok());
    /// assert!(deserializer.deserialize("[[1]]").is_err());
    /// ```
    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// The options this deserializer parses with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses one complete literal into a [`Value`].
    ///
    /// # Errors
    ///
    /// - [`Error::Format`] if some part of the text matches no literal shape
    /// - [`Error::TypeResolution`] if a `class` tag is not in the registry
    /// - [`Error::DepthLimitExceeded`] if nesting exceeds the configured limit
    pub fn deserialize(&self, text: &str) -> Result<Value> {
        self.parse_value(text.trim(), 0)
    }

    fn parse_value(&self, text: &str, depth: usize) -> Result<Value> {
        if text == "null" {
            return Ok(Value::Null);
        }
        if is_wrapped(text, '"', '"') {
            return self.parse_string(text).map(Value::String);
        }
        if is_wrapped(text, '[', ']') {
            return self.parse_array(text, self.descend(depth)?);
        }
        if is_wrapped(text, '{', '}') {
            return self.parse_object(text, self.descend(depth)?);
        }
        parse_primitive(text)
    }

    fn descend(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(Error::depth_limit_exceeded(self.options.max_depth));
        }
        Ok(depth)
    }

    fn parse_string(&self, text: &str) -> Result<String> {
        let inner = &text[1..text.len() - 1];
        if self.options.unescape {
            unescape(inner, text)
        } else {
            Ok(inner.to_string())
        }
    }

    fn parse_array(&self, text: &str, depth: usize) -> Result<Value> {
        let body = &text[1..text.len() - 1];
        split_top_level(body)
            .into_iter()
            .map(|element| {
                if element.is_empty() {
                    return Err(Error::format("empty array element", text));
                }
                self.parse_value(element, depth)
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn parse_object(&self, text: &str, depth: usize) -> Result<Value> {
        let body = &text[1..text.len() - 1];
        let mut members = Vec::new();

        for fragment in split_top_level(body) {
            if fragment.is_empty() {
                return Err(Error::format("empty object member", text));
            }
            let (raw_key, raw_value) = split_member(fragment)
                .ok_or_else(|| Error::format("expected ':' in object member", fragment))?;
            members.push((self.parse_key(raw_key)?, raw_value));
        }

        if members.iter().any(|(key, _)| key == CLASS_KEY) {
            return self.build_record(members, depth);
        }

        let mut map = ObjectMap::with_capacity(members.len());
        for (key, raw_value) in members {
            let value = self.parse_value(raw_value, depth)?;
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    /// Keys lose one layer of quotes; bare keys are taken as written.
    fn parse_key(&self, raw: &str) -> Result<String> {
        if is_wrapped(raw, '"', '"') {
            self.parse_string(raw)
        } else if raw.is_empty() {
            Err(Error::format("empty object key", raw))
        } else {
            Ok(raw.to_string())
        }
    }

    fn build_record(&self, mut members: Vec<(String, &str)>, depth: usize) -> Result<Value> {
        let class_at = members
            .iter()
            .position(|(key, _)| key == CLASS_KEY)
            .ok_or_else(|| Error::custom("record without class tag"))?;
        let (_, raw_class) = members.remove(class_at);

        let class = match self.parse_value(raw_class, depth)? {
            Value::String(class) => class,
            _ => return Err(Error::format("class tag must be a string", raw_class)),
        };

        let record_type = self.registry.resolve(&class).ok_or_else(|| {
            debug!(class = %class, "class tag did not resolve");
            Error::type_resolution(&class)
        })?;
        debug!(class = %class, "resolved record type");

        let mut record = record_type.instantiate();
        for (key, raw_value) in members {
            if record_type.has_field(&key) {
                let value = self.parse_value(raw_value, depth)?;
                record.push_field(key, value);
            } else {
                trace!(class = %class, field = %key, "skipping unknown record field");
            }
        }
        Ok(Value::Record(record))
    }
}

fn is_wrapped(text: &str, open: char, close: char) -> bool {
    text.len() >= 2 && text.starts_with(open) && text.ends_with(close)
}

/// Booleans, then 64-bit integers, then integer literals too wide for 64
/// bits, then floats. The first parse that succeeds wins.
fn parse_primitive(text: &str) -> Result<Value> {
    if text.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if text.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Value::Number(Number::Integer(i)));
    }
    if is_integer_literal(text) {
        if let Ok(bi) = text.parse::<BigInt>() {
            return Ok(Value::Number(Number::BigInt(bi)));
        }
    }
    if let Ok(f) = text.parse::<f64>() {
        return Ok(Value::Number(Number::from_f64(f)));
    }
    Err(Error::format("unrecognized literal", text))
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Decodes the backslash escapes of a string literal's inner text.
/// `literal` is the full quoted text, used for error messages.
fn unescape(inner: &str, literal: &str) -> Result<String> {
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => return Err(Error::format("unescaped quote inside string", literal)),
            '\\' => match chars.next() {
                Some('"') => result.push('"'),
                Some('\\') => result.push('\\'),
                Some('/') => result.push('/'),
                Some('b') => result.push('\u{0008}'),
                Some('f') => result.push('\u{000C}'),
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('u') => result.push(unicode_escape(&mut chars, literal)?),
                Some(_) => return Err(Error::format("invalid escape sequence", literal)),
                None => return Err(Error::format("unterminated escape sequence", literal)),
            },
            _ => result.push(ch),
        }
    }
    Ok(result)
}

/// Reads the `XXXX` of a `\uXXXX` escape, pairing UTF-16 surrogates.
fn unicode_escape(chars: &mut std::str::Chars<'_>, literal: &str) -> Result<char> {
    let unit = hex4(chars, literal)?;
    let code_point = match unit {
        0xD800..=0xDBFF => {
            if chars.next() != Some('\\') || chars.next() != Some('u') {
                return Err(Error::format("unpaired surrogate in unicode escape", literal));
            }
            let low = hex4(chars, literal)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(Error::format("invalid low surrogate in unicode escape", literal));
            }
            0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
        }
        0xDC00..=0xDFFF => {
            return Err(Error::format("unpaired surrogate in unicode escape", literal))
        }
        _ => unit,
    };
    char::from_u32(code_point).ok_or_else(|| Error::format("invalid unicode code point", literal))
}

fn hex4(chars: &mut std::str::Chars<'_>, literal: &str) -> Result<u32> {
    let mut value = 0;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|ch| ch.to_digit(16))
            .ok_or_else(|| Error::format("expected 4 hex digits in unicode escape", literal))?;
        value = value * 16 + digit;
    }
    Ok(value)
}

/// Deserializes any `T` from an already-parsed [`Value`].
///
/// Records present their fields as a map, so a Rust struct reads the same
/// fields whether the text carried a `class` tag or not.
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl IntoDeserializer<'_, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

fn visit_big_int<'de, V>(bi: BigInt, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    if let Ok(u) = u64::try_from(&bi) {
        visitor.visit_u64(u)
    } else if let Ok(i) = i128::try_from(&bi) {
        visitor.visit_i128(i)
    } else if let Ok(u) = u128::try_from(&bi) {
        visitor.visit_u128(u)
    } else {
        visitor.visit_string(bi.to_string())
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Value::Number(Number::Float(f)) => visitor.visit_f64(f),
            Value::Number(Number::BigInt(bi)) => visit_big_int(bi, visitor),
            Value::Number(Number::Infinity) => visitor.visit_f64(f64::INFINITY),
            Value::Number(Number::NegativeInfinity) => visitor.visit_f64(f64::NEG_INFINITY),
            Value::Number(Number::NaN) => visitor.visit_f64(f64::NAN),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            Value::Record(record) => {
                visitor.visit_map(MapDeserializer::new(record.into_tagged_map()))
            }
        }
    }

    /// A struct reads a record's fields without the `class` entry, so
    /// `#[serde(deny_unknown_fields)]` types still accept their own records.
    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Record(record) => visitor.visit_map(MapDeserializer::new(record.into_fields())),
            other => ValueDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Record(record) if record.fields().is_empty() => visitor.visit_unit(),
            other => ValueDeserializer::new(other).deserialize_any(visitor),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer::new(variant, None)),
            Value::Record(record) => {
                let variant = record.class().to_string();
                let fields = Value::Object(record.into_fields());
                visitor.visit_enum(EnumDeserializer::new(variant, Some(fields)))
            }
            Value::Object(obj) if obj.len() == 1 => {
                let (variant, value) = obj
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::custom("expected a single-entry object for enum"))?;
                visitor.visit_enum(EnumDeserializer::new(variant, Some(value)))
            }
            other => Err(Error::custom(format!(
                "expected enum as string, record or single-entry object, found {:?}",
                other
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit seq tuple tuple_struct map identifier
        ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: ObjectMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl EnumDeserializer {
    fn new(variant: String, value: Option<Value>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        let visitor = VariantDeserializer { value: self.value };
        Ok((variant, visitor))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("Expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(obj)) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}
