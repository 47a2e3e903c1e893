//! Explicit validation: first violation in schema order, full paths, no
//! mutation.

use billing_models::generated::{Cadence, NewSubscription, Price, PriceFields, UnitPrice};
use billing_models::{Error, Model, Union};
use serde_json::json;

fn unit_price() -> serde_json::Value {
    json!({
        "model_type": "unit",
        "unit_config": {"unit_amount": "1.00"},
        "cadence": "monthly",
        "item_id": "item_1",
        "name": "Seats"
    })
}

#[test]
fn complete_document_is_valid() {
    let price = Price::from_json(unit_price()).unwrap();
    assert!(price.validate().is_ok());
}

#[test]
fn first_violation_follows_schema_order() {
    // `name` is missing and `cadence` is unknown; `cadence` is declared first.
    let mut doc = unit_price();
    doc["cadence"] = json!("biannual_xyz");
    doc.as_object_mut().unwrap().remove("name");
    let price = Price::from_json(doc).unwrap();
    match price.validate() {
        Err(Error::UnrecognizedEnumValue { path, .. }) => assert_eq!(path.to_string(), "$.cadence"),
        other => panic!("expected UnrecognizedEnumValue, got {other:?}"),
    }
}

#[test]
fn missing_required_field_is_reported_by_key() {
    let mut doc = unit_price();
    doc.as_object_mut().unwrap().remove("item_id");
    let price = UnitPrice::from_json(doc).unwrap();
    let err = price.validate().unwrap_err();
    assert!(matches!(err, Error::MissingRequiredField { ref key, .. } if key == "item_id"));
    assert_eq!(err.to_string(), "$.item_id: missing required field `item_id`");
}

#[test]
fn explicit_null_in_required_field_is_rejected() {
    let mut doc = unit_price();
    doc["name"] = json!(null);
    let err = UnitPrice::from_json(doc).unwrap().validate().unwrap_err();
    match err {
        Error::UnexpectedNull { path } => assert_eq!(path.to_string(), "$.name"),
        other => panic!("expected UnexpectedNull, got {other:?}"),
    }
}

#[test]
fn null_in_nullable_optional_field_is_valid() {
    let mut doc = unit_price();
    doc["external_price_id"] = json!(null);
    doc["fixed_price_quantity"] = json!(null);
    assert!(UnitPrice::from_json(doc).unwrap().validate().is_ok());
}

#[test]
fn unknown_extra_keys_do_not_fail_validation() {
    let mut doc = unit_price();
    doc["dimensional_price_group"] = json!({"id": "grp_1"});
    assert!(UnitPrice::from_json(doc).unwrap().validate().is_ok());
}

#[test]
fn validating_twice_gives_the_same_result_and_leaves_the_store_alone() {
    let mut doc = unit_price();
    doc["cadence"] = json!("biannual_xyz");
    let price = UnitPrice::from_json(doc.clone()).unwrap();
    let first = price.validate().unwrap_err().to_string();
    let second = price.validate().unwrap_err().to_string();
    assert_eq!(first, second);
    assert_eq!(price.to_json(), doc);
}

#[test]
fn fixing_a_field_makes_the_model_valid() {
    let mut doc = unit_price();
    doc["cadence"] = json!("biannual_xyz");
    let mut price = UnitPrice::from_json(doc).unwrap();
    assert!(price.validate().is_err());
    price.set_cadence(Cadence::Annual);
    assert!(price.validate().is_ok());
}

#[test]
fn nested_union_members_are_validated_in_place() {
    let subscription = NewSubscription::from_json(json!({
        "customer": {"customer_id": "cus_1"},
        "add_prices": [unit_price(), {"model_type": "grouped_tiered", "name": "New"}]
    }))
    .unwrap();
    match subscription.validate() {
        Err(Error::UnrecognizedVariant { union_name, discriminant, path }) => {
            assert_eq!(union_name, "Price");
            assert_eq!(discriminant, json!("grouped_tiered"));
            assert_eq!(path.to_string(), "$.add_prices[1]");
        }
        other => panic!("expected UnrecognizedVariant, got {other:?}"),
    }
}

#[test]
fn wrong_shape_for_nested_model_is_malformed() {
    let subscription = NewSubscription::from_json(json!({
        "customer": {"customer_id": "cus_1"},
        "metadata": ["not", "a", "map"]
    }))
    .unwrap();
    match subscription.validate() {
        Err(Error::MalformedWireShape { found, path, .. }) => {
            assert_eq!(found, "array");
            assert_eq!(path.to_string(), "$.metadata");
        }
        other => panic!("expected MalformedWireShape, got {other:?}"),
    }
}

#[test]
fn missing_nested_union_is_reported() {
    let subscription = NewSubscription::from_json(json!({"plan_id": "plan_1"})).unwrap();
    assert!(matches!(
        subscription.validate(),
        Err(Error::MissingRequiredField { key, .. }) if key == "customer"
    ));
}

#[test]
fn two_missing_fields_report_only_the_first_declared() {
    let mut doc = unit_price();
    let fields = doc.as_object_mut().unwrap();
    fields.remove("name");
    fields.remove("item_id");
    let price = UnitPrice::from_json(doc).unwrap();
    match price.validate() {
        Err(Error::MissingRequiredField { key, .. }) => assert_eq!(key, "item_id"),
        other => panic!("expected MissingRequiredField, got {other:?}"),
    }
}
