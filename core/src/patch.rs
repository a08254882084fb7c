//! Sparse partial-update payloads.
//!
//! # Design
//! A PATCH body must only carry the fields the caller meant to change. A
//! patch model is a zero-sized marker type declaring one typed [`Field`]
//! selector per mutable property (see [`patch_model!`](crate::patch_model)).
//! [`PatchBuilder`] records assignments keyed by the selector's wire name, so
//! "never assigned" and "assigned `null`/`false`/`[]`" stay distinct all the
//! way to the serialized body.
//!
//! Selectors carry both the model and the value type, so assigning a field of
//! another model or a value of the wrong type does not compile. The
//! name-keyed [`PatchBuilder::try_set`] path validates against
//! [`PatchModel::FIELDS`] instead.
//!
//! Values are encoded with `serde_json`, so a patch carries exactly the
//! encoding the DTOs use. An assignment whose value fails to encode is left
//! out of the payload and recorded; serializing the builder then fails, which
//! surfaces as [`ApiError::SerializationError`] from the `build_*` call.
//!
//! `materialize` is a read: the builder keeps its assignments and can be sent
//! again or cleared explicitly.

use std::fmt;
use std::marker::PhantomData;

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Schema descriptor for a patch model.
pub trait PatchModel {
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Wire names of every field the model declares.
    const FIELDS: &'static [&'static str];

    fn has_field(name: &str) -> bool {
        Self::FIELDS.contains(&name)
    }
}

/// A typed reference to one field of the patch model `T` holding values of
/// type `V`.
pub struct Field<T, V> {
    name: &'static str,
    _marker: PhantomData<fn() -> (T, V)>,
}

impl<T, V> Field<T, V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Wire name of the field.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T, V> Clone for Field<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Field<T, V> {}

impl<T, V> fmt::Debug for Field<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// Collects field assignments for the patch model `T`.
pub struct PatchBuilder<T> {
    fields: Map<String, Value>,
    encode_error: Option<String>,
    _model: PhantomData<fn() -> T>,
}

impl<T: PatchModel> PatchBuilder<T> {
    pub fn new() -> Self {
        Self {
            fields: Map::new(),
            encode_error: None,
            _model: PhantomData,
        }
    }

    /// Assign `value` to `field`, replacing any earlier assignment.
    pub fn set<V: Serialize>(mut self, field: Field<T, V>, value: V) -> Self {
        self.assign(field, value);
        self
    }

    /// Non-consuming form of [`set`](Self::set).
    ///
    /// A value that fails to encode is not added; the first such failure is
    /// kept and reported when the builder is serialized.
    pub fn assign<V: Serialize>(&mut self, field: Field<T, V>, value: V) -> &mut Self {
        match serde_json::to_value(&value) {
            Ok(value) => {
                self.fields.insert(field.name().to_string(), value);
            }
            Err(e) => {
                self.fields.remove(field.name());
                self.encode_error
                    .get_or_insert_with(|| format!("field `{}`: {e}", field.name()));
            }
        }
        self
    }

    /// Assign a raw JSON value by wire name.
    ///
    /// Fails with [`ApiError::InvalidField`] when `T` declares no such field.
    /// The value is not checked against the field's type.
    pub fn try_set(mut self, name: &str, value: impl Into<Value>) -> Result<Self, ApiError> {
        if !T::has_field(name) {
            return Err(ApiError::InvalidField {
                model: T::NAME,
                field: name.to_string(),
            });
        }
        self.fields.insert(name.to_string(), value.into());
        Ok(self)
    }

    /// Drop the assignment for `field`, if any.
    pub fn remove<V>(&mut self, field: Field<T, V>) -> Option<Value> {
        self.fields.remove(field.name())
    }

    pub fn is_set<V>(&self, field: Field<T, V>) -> bool {
        self.fields.contains_key(field.name())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.encode_error = None;
    }

    /// The first encoding failure since the last [`clear`](Self::clear).
    pub fn encode_error(&self) -> Option<&str> {
        self.encode_error.as_deref()
    }

    /// The payload: exactly the assigned fields, keyed by wire name.
    pub fn materialize(&self) -> Map<String, Value> {
        self.fields.clone()
    }
}

impl<T: PatchModel> Default for PatchBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PatchBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            encode_error: self.encode_error.clone(),
            _model: PhantomData,
        }
    }
}

impl<T: PatchModel> fmt::Debug for PatchBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchBuilder")
            .field("model", &T::NAME)
            .field("fields", &self.fields)
            .field("encode_error", &self.encode_error)
            .finish()
    }
}

impl<T> Serialize for PatchBuilder<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.encode_error {
            Some(message) => Err(S::Error::custom(message)),
            None => self.fields.serialize(serializer),
        }
    }
}

/// Declare a patch model: a marker type with one `Field` constant per field.
///
/// ```
/// enclave_core::patch_model! {
///     /// Example model.
///     pub struct WidgetPatch {
///         NAME: String => "name",
///         COLOUR: Option<String> => "colour",
///     }
/// }
///
/// let payload = enclave_core::PatchBuilder::<WidgetPatch>::new()
///     .set(WidgetPatch::COLOUR, None)
///     .materialize();
/// assert_eq!(payload["colour"], serde_json::Value::Null);
/// ```
#[macro_export]
macro_rules! patch_model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $model:ident {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty => $wire:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis struct $model;

        impl $model {
            $(
                $(#[$field_meta])*
                pub const $field: $crate::patch::Field<$model, $ty> = $crate::patch::Field::new($wire);
            )*
        }

        impl $crate::patch::PatchModel for $model {
            const NAME: &'static str = stringify!($model);
            const FIELDS: &'static [&'static str] = &[$($wire),*];
        }
    };
}
