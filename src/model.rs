//! Base behaviour shared by every generated model.
//!
//! A model is a thin typed view over its [`FieldStore`]. Getters decode the
//! stored value for their key on each call and setters encode into the store,
//! so the store is the only state. Equality, serialization and validation all
//! operate on the raw store.

use crate::{
    codec::WireCodec,
    errors::{Error, FieldPath, Result},
    schema::ModelSchema,
    store::{FieldState, FieldStore, RawDocument, WireValue},
    validate,
};

/// Decoded tri-state value of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Value(value) => Field::Value(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Value(value) => Field::Value(f(value)),
        }
    }

    /// Collapses `Absent` and `Null` into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Value(value) => Some(value),
            Field::Absent | Field::Null => None,
        }
    }
}

impl<T> From<Field<T>> for Option<T> {
    fn from(field: Field<T>) -> Self {
        field.into_option()
    }
}

/// Decodes the tri-state value stored under `key`.
pub fn read_field<T: WireCodec>(store: &FieldStore, key: &str) -> Result<Field<T>> {
    match store.get(key) {
        FieldState::Absent => Ok(Field::Absent),
        FieldState::PresentNull => Ok(Field::Null),
        FieldState::PresentValue(value) => T::decode(value)
            .map(Field::Value)
            .map_err(|err| err.under_key(key)),
    }
}

/// Decodes a required, non-null field.
pub fn read_required<T: WireCodec>(store: &FieldStore, key: &str) -> Result<T> {
    match read_field(store, key)? {
        Field::Value(value) => Ok(value),
        Field::Absent => Err(Error::MissingRequiredField {
            key: key.to_string(),
            path: FieldPath::root().key(key),
        }),
        Field::Null => Err(Error::UnexpectedNull {
            path: FieldPath::root().key(key),
        }),
    }
}

/// Decodes an optional field; `Absent` and `Null` both read as `None`.
pub fn read_optional<T: WireCodec>(store: &FieldStore, key: &str) -> Result<Option<T>> {
    read_field(store, key).map(Field::into_option)
}

/// Typed view over a [`FieldStore`]. Implemented by [`model_type!`](crate::model_type).
pub trait Model: Sized {
    const SCHEMA: &'static ModelSchema;

    fn from_store(store: FieldStore) -> Self;

    fn store(&self) -> &FieldStore;

    fn store_mut(&mut self) -> &mut FieldStore;

    fn into_store(self) -> FieldStore;

    /// Adopts a parsed document verbatim, unknown keys included.
    fn from_document(doc: RawDocument) -> Self {
        Self::from_store(FieldStore::from_document(doc))
    }

    fn from_json(value: WireValue) -> Result<Self> {
        FieldStore::from_value(value).map(Self::from_store)
    }

    fn from_json_str(json: &str) -> Result<Self> {
        let value: WireValue = serde_json::from_str(json)?;
        Self::from_json(value)
    }

    fn to_json(&self) -> WireValue {
        self.store().to_value()
    }

    fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self.store())?)
    }

    /// Checks required fields and enum members, stopping at the first
    /// violation.
    fn validate(&self) -> Result<()> {
        validate::validate_document(self.store().as_document(), Self::SCHEMA)
    }

    fn field<T: WireCodec>(&self, key: &str) -> Result<Field<T>> {
        read_field(self.store(), key)
    }

    fn required<T: WireCodec>(&self, key: &str) -> Result<T> {
        read_required(self.store(), key)
    }

    fn optional<T: WireCodec>(&self, key: &str) -> Result<Option<T>> {
        read_optional(self.store(), key)
    }

    fn set<T: WireCodec>(&mut self, key: &str, value: T) {
        self.store_mut().set_value(key, value.encode());
    }

    fn set_null(&mut self, key: &str) {
        self.store_mut().set_null(key);
    }

    fn unset(&mut self, key: &str) {
        self.store_mut().unset(key);
    }

    /// Keys present in the store but not declared by the schema.
    fn extra_keys(&self) -> Vec<&str> {
        self.store()
            .keys()
            .filter(|key| Self::SCHEMA.field(key).is_none())
            .collect()
    }
}

/// Declares a model struct backed by a [`FieldStore`].
///
/// The generated type gets structural equality over its store, transparent
/// serde impls and a [`WireCodec`] impl; typed accessors are written in a
/// separate `impl` block using the [`Model`] helpers.
#[macro_export]
macro_rules! model_type {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            schema: $schema:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name {
            store: $crate::store::FieldStore,
        }

        impl $crate::model::Model for $name {
            const SCHEMA: &'static $crate::schema::ModelSchema = &$schema;

            fn from_store(store: $crate::store::FieldStore) -> Self {
                Self { store }
            }

            fn store(&self) -> &$crate::store::FieldStore {
                &self.store
            }

            fn store_mut(&mut self) -> &mut $crate::store::FieldStore {
                &mut self.store
            }

            fn into_store(self) -> $crate::store::FieldStore {
                self.store
            }
        }

        impl $crate::codec::WireCodec for $name {
            fn decode(value: &$crate::store::WireValue) -> $crate::errors::Result<Self> {
                <Self as $crate::model::Model>::from_json(value.clone())
            }

            fn encode(self) -> $crate::store::WireValue {
                self.store.into_value()
            }
        }
    };
}
