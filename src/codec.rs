//! Conversion between wire values and the logical types typed accessors
//! expose.
//!
//! Decoding borrows the stored value and never changes it. A value of the
//! wrong wire kind fails with [`Error::MalformedWireShape`]; unknown enum
//! values and unknown union members decode without error.

use std::collections::BTreeMap;

use crate::{
    errors::{Error, Result},
    open_enum::OpenEnum,
    store::{wire_kind, WireValue},
};

/// A logical type that can be read from and written to a [`WireValue`].
pub trait WireCodec: Sized {
    fn decode(value: &WireValue) -> Result<Self>;

    fn encode(self) -> WireValue;
}

impl WireCodec for WireValue {
    fn decode(value: &WireValue) -> Result<Self> {
        Ok(value.clone())
    }

    fn encode(self) -> WireValue {
        self
    }
}

impl WireCodec for String {
    fn decode(value: &WireValue) -> Result<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::malformed("string", wire_kind(value)))
    }

    fn encode(self) -> WireValue {
        WireValue::String(self)
    }
}

impl WireCodec for bool {
    fn decode(value: &WireValue) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| Error::malformed("boolean", wire_kind(value)))
    }

    fn encode(self) -> WireValue {
        WireValue::Bool(self)
    }
}

impl WireCodec for i64 {
    /// Accepts integral floats such as `30.0`, which the wire may use for
    /// whole numbers.
    fn decode(value: &WireValue) -> Result<Self> {
        value
            .as_i64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|n| {
                        n.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(n)
                    })
                    .map(|n| n as i64)
            })
            .ok_or_else(|| Error::malformed("integer", wire_kind(value)))
    }

    fn encode(self) -> WireValue {
        WireValue::from(self)
    }
}

impl WireCodec for f64 {
    fn decode(value: &WireValue) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| Error::malformed("number", wire_kind(value)))
    }

    /// Non-finite values have no wire form and encode as `null`.
    fn encode(self) -> WireValue {
        WireValue::from(self)
    }
}

impl<T: WireCodec> WireCodec for Option<T> {
    fn decode(value: &WireValue) -> Result<Self> {
        match value {
            WireValue::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }

    fn encode(self) -> WireValue {
        self.map_or(WireValue::Null, T::encode)
    }
}

impl<T: WireCodec> WireCodec for Vec<T> {
    fn decode(value: &WireValue) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| Error::malformed("array", wire_kind(value)))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| T::decode(item).map_err(|err| err.under_index(index)))
            .collect()
    }

    fn encode(self) -> WireValue {
        WireValue::Array(self.into_iter().map(T::encode).collect())
    }
}

impl<T: WireCodec> WireCodec for BTreeMap<String, T> {
    fn decode(value: &WireValue) -> Result<Self> {
        let entries = value
            .as_object()
            .ok_or_else(|| Error::malformed("object", wire_kind(value)))?;
        entries
            .iter()
            .map(|(key, item)| {
                T::decode(item)
                    .map(|decoded| (key.clone(), decoded))
                    .map_err(|err| err.under_key(key))
            })
            .collect()
    }

    fn encode(self) -> WireValue {
        WireValue::Object(
            self.into_iter()
                .map(|(key, item)| (key, item.encode()))
                .collect(),
        )
    }
}

impl<S> WireCodec for OpenEnum<S>
where
    S: crate::open_enum::EnumSymbol,
{
    /// Always succeeds; membership is checked by [`OpenEnum::validate`].
    fn decode(value: &WireValue) -> Result<Self> {
        Ok(OpenEnum::from_raw(value.clone()))
    }

    fn encode(self) -> WireValue {
        self.into_raw()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scalar_kind_mismatch_is_malformed() {
        let err = String::decode(&json!(12)).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedWireShape { ref expected, found: "number", .. } if expected == "string"
        ));
        assert!(i64::decode(&json!(1.5)).is_err());
        assert!(i64::decode(&json!("30")).is_err());
        assert_eq!(i64::decode(&json!(30.0)).unwrap(), 30);
        assert_eq!(f64::decode(&json!(2)).unwrap(), 2.0);
    }

    #[test]
    fn list_errors_point_at_element() {
        let err = Vec::<String>::decode(&json!(["a", "b", 3])).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "$[2]");
    }

    #[test]
    fn map_errors_point_at_entry() {
        let err = BTreeMap::<String, String>::decode(&json!({"ok": "x", "bad": false})).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "$.bad");
    }

    #[test]
    fn option_maps_null() {
        assert_eq!(Option::<String>::decode(&json!(null)).unwrap(), None);
        assert_eq!(
            Option::<String>::decode(&json!("x")).unwrap(),
            Some("x".to_string())
        );
        assert_eq!(Option::<String>::None.encode(), json!(null));
    }

    #[test]
    fn metadata_map_encodes_nullable_values() {
        let mut metadata = BTreeMap::new();
        metadata.insert("region".to_string(), Some("emea".to_string()));
        metadata.insert("cleared".to_string(), None);
        assert_eq!(
            metadata.encode(),
            json!({"cleared": null, "region": "emea"})
        );
    }
}
