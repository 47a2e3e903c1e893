//! Explicit, fail-fast validation of raw documents against their schemas.
//!
//! Validation walks declared fields in schema order (not store order) so the
//! reported violation is reproducible. It never mutates the store and is
//! never run implicitly by decode or encode.

use crate::{
    errors::{Error, FieldPath, Result},
    schema::{FieldKind, ModelSchema},
    store::{wire_kind, RawDocument, WireValue},
    union::{Resolution, UnionSchema},
};

/// Validates a model document, returning the first violation.
pub fn validate_document(doc: &RawDocument, schema: &ModelSchema) -> Result<()> {
    let result = validate_fields(doc, schema, &FieldPath::root());
    #[cfg(feature = "tracing")]
    if let Err(err) = &result {
        tracing::debug!(model = schema.name, error = %err, "validation failed");
    }
    result
}

/// Validates the declared fields of `doc` located at `path`.
pub fn validate_fields(doc: &RawDocument, schema: &ModelSchema, path: &FieldPath) -> Result<()> {
    for field in schema.fields {
        let field_path = path.key(field.key);
        match doc.get(field.key) {
            None if field.required => {
                return Err(Error::MissingRequiredField {
                    key: field.key.to_string(),
                    path: field_path,
                });
            }
            None => {}
            Some(WireValue::Null) if field.required && !field.nullable => {
                return Err(Error::UnexpectedNull { path: field_path });
            }
            Some(WireValue::Null) => {}
            Some(value) => validate_value(value, &field.kind, &field_path)?,
        }
    }
    Ok(())
}

/// Validates a single present value of the given kind.
///
/// Scalars are accepted as-is; enums are checked against their symbol
/// table; models, unions, lists and maps are walked recursively.
pub fn validate_value(value: &WireValue, kind: &FieldKind, path: &FieldPath) -> Result<()> {
    // Null elements inside lists and maps are not checked against the kind.
    if value.is_null() {
        return Ok(());
    }
    match kind {
        FieldKind::Any | FieldKind::String | FieldKind::Number | FieldKind::Boolean => Ok(()),
        FieldKind::Enum(table) => table.check(value, path),
        FieldKind::Model(schema) => match value {
            WireValue::Object(doc) => validate_fields(doc, schema, path),
            other => Err(shape_error(kind, other, path)),
        },
        FieldKind::Union(schema) => match value {
            WireValue::Object(doc) => validate_union(doc, schema, path),
            other => Err(shape_error(kind, other, path)),
        },
        FieldKind::List(element) => match value {
            WireValue::Array(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(index, item)| validate_value(item, element, &path.index(index))),
            other => Err(shape_error(kind, other, path)),
        },
        FieldKind::Map(element) => match value {
            WireValue::Object(entries) => entries
                .iter()
                .try_for_each(|(key, item)| validate_value(item, element, &path.key(key.as_str()))),
            other => Err(shape_error(kind, other, path)),
        },
    }
}

/// Resolves a union document and validates only the selected member.
pub fn validate_union(doc: &RawDocument, schema: &UnionSchema, path: &FieldPath) -> Result<()> {
    let resolution = schema.resolve(doc).map_err(|err| err.rebase(path))?;
    validate_resolved(doc, schema, resolution, path)
}

/// Validates a union document whose member is already known.
///
/// The catch-all member always fails with [`Error::UnrecognizedVariant`].
pub fn validate_resolved(
    doc: &RawDocument,
    schema: &UnionSchema,
    resolution: Resolution,
    path: &FieldPath,
) -> Result<()> {
    let member = match resolution {
        Resolution::Member(index) => schema.members.get(index),
        Resolution::Unknown => None,
    };
    match member {
        Some(member) => validate_fields(doc, member.schema, path),
        None => Err(Error::UnrecognizedVariant {
            union_name: schema.name,
            discriminant: schema.discriminant_of(doc).cloned().unwrap_or(WireValue::Null),
            path: path.clone(),
        }),
    }
}

fn shape_error(kind: &FieldKind, found: &WireValue, path: &FieldPath) -> Error {
    Error::MalformedWireShape {
        expected: kind.describe().to_string(),
        found: wire_kind(found),
        path: path.clone(),
    }
}
