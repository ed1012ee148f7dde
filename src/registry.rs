//! Record type registry.
//!
//! A record's `class` tag is only ever resolved against types the caller has
//! registered up front. Nothing is constructed from a name the registry does
//! not list.
//!
//! ## Examples
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_classjson::{RecordType, TypeRegistry, TypeResolver};
//!
//! #[derive(Serialize, Deserialize, Default)]
//! #[allow(non_snake_case)]
//! struct Address {
//!     City: String,
//!     Country: String,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(RecordType::of::<Address>().unwrap());
//! registry.register(RecordType::new("Tag", ["Label"]));
//!
//! let address = registry.resolve("Address").unwrap();
//! assert_eq!(address.fields().collect::<Vec<_>>(), vec!["City", "Country"]);
//! assert!(registry.resolve("Person").is_none());
//! ```

use crate::{Error, ObjectMap, Record, Result, Value};
use indexmap::IndexSet;
use serde::de::{self, DeserializeOwned};
use serde::{forward_to_deserialize_any, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Resolves a class tag to the record type it names.
///
/// The deserializer only reads through this trait, so an implementation
/// shared between threads needs nothing beyond `Sync`.
pub trait TypeResolver {
    fn resolve(&self, name: &str) -> Option<&RecordType>;
}

impl<R: TypeResolver + ?Sized> TypeResolver for &R {
    fn resolve(&self, name: &str) -> Option<&RecordType> {
        (**self).resolve(name)
    }
}

/// A constructible record type: its name, its settable fields in
/// declaration order, and the value each field starts with.
///
/// A declared field may have no starting value. A fresh instance then lacks
/// that field until the text assigns it.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordType {
    name: String,
    fields: IndexSet<String>,
    template: ObjectMap,
}

impl RecordType {
    /// Declares a record type whose fields all start out as `null`.
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: IndexSet<String> = fields.into_iter().map(Into::into).collect();
        let template = fields
            .iter()
            .map(|field| (field.clone(), Value::Null))
            .collect();
        RecordType {
            name: name.into(),
            fields,
            template,
        }
    }

    /// Derives a record type from a Rust struct.
    ///
    /// `T::default()` plays the role of the no-argument constructor: its
    /// serialized form supplies the type name and each field's starting
    /// value. The settable fields are the ones `T`'s `Deserialize` impl asks
    /// for, so fields the default leaves out (`skip_serializing_if` and the
    /// like) are still assigned when the text carries them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde::{Deserialize, Serialize};
    /// use serde_classjson::RecordType;
    ///
    /// #[derive(Serialize, Deserialize, Default)]
    /// struct Tagged {
    ///     id: u32,
    ///     #[serde(skip_serializing_if = "Option::is_none")]
    ///     label: Option<String>,
    /// }
    ///
    /// let record_type = RecordType::of::<Tagged>().unwrap();
    /// assert_eq!(record_type.fields().collect::<Vec<_>>(), vec!["id", "label"]);
    /// assert!(record_type.instantiate().get("label").is_none());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if `T` does not serialize as a struct.
    pub fn of<T>() -> Result<Self>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let record = match crate::to_value(&T::default())? {
            Value::Record(record) => record,
            other => {
                return Err(Error::unsupported_type(&format!(
                    "record types must serialize as structs, found {:?}",
                    other
                )))
            }
        };

        let mut record_type = Self::from_record(record);
        if let Some(declared) = declared_fields::<T>() {
            let mut fields: IndexSet<String> = declared.iter().map(|f| f.to_string()).collect();
            fields.extend(record_type.fields.drain(..));
            record_type.fields = fields;
        }
        Ok(record_type)
    }

    /// Uses an existing record as the template for new instances.
    #[must_use]
    pub fn from_record(record: Record) -> Self {
        let name = record.class().to_string();
        let template = record.into_fields();
        RecordType {
            name,
            fields: template.keys().cloned().collect(),
            template,
        }
    }

    /// Sets the starting value of a field, declaring it if it is new.
    #[must_use]
    pub fn with_default(mut self, field: impl Into<String>, value: Value) -> Self {
        let field = field.into();
        self.fields.insert(field.clone());
        self.template.insert(field, value);
        self
    }

    /// Declares a settable field with no starting value.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Whether text may assign `field` on an instance of this type.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// Builds a fresh instance with every field that has a starting value
    /// set to it.
    #[must_use]
    pub fn instantiate(&self) -> Record {
        Record::with_fields(self.name.clone(), self.template.clone())
    }
}

/// An allow-list of record types keyed by their simple name.
///
/// # Examples
///
/// ```rust
/// use serde_classjson::{RecordType, TypeRegistry};
///
/// let registry = TypeRegistry::new()
///     .with(RecordType::new("Point", ["x", "y"]))
///     .with(RecordType::new("Line", ["from", "to"]));
/// assert_eq!(registry.len(), 2);
/// assert!(registry.contains("Point"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, RecordType>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record type, replacing and returning any type already
    /// registered under the same name.
    pub fn register(&mut self, record_type: RecordType) -> Option<RecordType> {
        debug!(
            class = record_type.name(),
            fields = record_type.fields.len(),
            "registered record type"
        );
        self.types.insert(record_type.name.clone(), record_type)
    }

    /// Registers the record type derived from `T`, see [`RecordType::of`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde::{Deserialize, Serialize};
    /// use serde_classjson::TypeRegistry;
    ///
    /// #[derive(Serialize, Deserialize, Default)]
    /// struct Point { x: i32, y: i32 }
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register_type::<Point>().unwrap();
    /// assert!(registry.contains("Point"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if `T` does not serialize as a struct.
    pub fn register_type<T>(&mut self) -> Result<&mut Self>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        self.register(RecordType::of::<T>()?);
        Ok(self)
    }

    /// Builder form of [`TypeRegistry::register`].
    #[must_use]
    pub fn with(mut self, record_type: RecordType) -> Self {
        self.register(record_type);
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, name: &str) -> Option<&RecordType> {
        self.types.get(name)
    }
}

/// The field names `T`'s `Deserialize` impl passes to `deserialize_struct`,
/// or `None` if `T` does not deserialize as a struct.
fn declared_fields<T: DeserializeOwned>() -> Option<&'static [&'static str]> {
    let mut declared = None;
    // Always fails; only the captured names matter.
    let _ = T::deserialize(FieldNames {
        declared: &mut declared,
    });
    declared
}

/// A deserializer that records the field list of the struct asking for it
/// and produces nothing.
struct FieldNames<'a> {
    declared: &'a mut Option<&'static [&'static str]>,
}

impl<'de, 'a> de::Deserializer<'de> for FieldNames<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("field names are only known for structs"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        *self.declared = Some(fields);
        Err(Error::custom("struct field names captured"))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}
