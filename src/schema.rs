//! Static field descriptors emitted alongside each generated model.
//!
//! Descriptors are plain data: the validation engine and the structural
//! union matcher walk them over raw documents without decoding anything.

use crate::{open_enum::SymbolTable, store::WireValue, union::UnionSchema};

/// Declared wire type of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Any,
    String,
    Number,
    Boolean,
    Enum(&'static SymbolTable),
    Model(&'static ModelSchema),
    Union(&'static UnionSchema),
    List(&'static FieldKind),
    Map(&'static FieldKind),
}

impl FieldKind {
    /// Shallow wire-kind check used for structural union matching.
    pub fn accepts(&self, value: &WireValue) -> bool {
        match self {
            FieldKind::Any => true,
            FieldKind::String | FieldKind::Enum(_) => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Model(_) | FieldKind::Union(_) | FieldKind::Map(_) => value.is_object(),
            FieldKind::List(_) => value.is_array(),
        }
    }

    /// Human-readable name for shape errors.
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::Any => "any value",
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum(table) => table.name,
            FieldKind::Model(schema) => schema.name,
            FieldKind::Union(schema) => schema.name,
            FieldKind::List(_) => "array",
            FieldKind::Map(_) => "object",
        }
    }
}

/// One declared field of a model.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldSpec {
    pub const fn required(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            required: true,
            nullable: false,
        }
    }

    pub const fn optional(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            required: false,
            nullable: false,
        }
    }

    /// Marks the field as accepting an explicit `null`.
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Name and declared fields of a model, in schema order.
#[derive(Debug, Clone, Copy)]
pub struct ModelSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ModelSchema {
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    static NAMES: FieldKind = FieldKind::String;

    #[test]
    fn shallow_kind_checks() {
        assert!(FieldKind::String.accepts(&json!("x")));
        assert!(!FieldKind::String.accepts(&json!(1)));
        assert!(FieldKind::Number.accepts(&json!(1.5)));
        assert!(FieldKind::List(&NAMES).accepts(&json!(["a"])));
        assert!(FieldKind::Map(&NAMES).accepts(&json!({"a": "b"})));
        assert!(FieldKind::Any.accepts(&json!(null)));
    }

    #[test]
    fn builders_set_flags() {
        let field = FieldSpec::optional("external_price_id", FieldKind::String).nullable();
        assert!(!field.required);
        assert!(field.nullable);
        let field = FieldSpec::required("item_id", FieldKind::String);
        assert!(field.required);
        assert!(!field.nullable);
    }
}
