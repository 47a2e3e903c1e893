//! Price adjustments and the strict [`Adjustment`] union.
//!
//! Unlike [`Price`](super::Price), `Adjustment` has no catch-all member: an
//! `adjustment_type` this SDK does not know fails decoding.

use crate::{
    errors::Result,
    model::Model,
    schema::{FieldKind, FieldSpec, ModelSchema},
    union::{Union, UnionMember, UnionSchema, UnknownMemberPolicy},
};

/// Accessors shared by every adjustment member.
pub trait AdjustmentFields: Model {
    /// Price ids the adjustment applies to.
    fn applies_to_price_ids(&self) -> Result<Vec<String>> {
        self.required("applies_to_price_ids")
    }

    fn set_applies_to_price_ids(&mut self, price_ids: Vec<String>) -> &mut Self {
        self.set("applies_to_price_ids", price_ids);
        self
    }

    fn reason(&self) -> Result<Option<String>> {
        self.optional("reason")
    }

    fn set_reason(&mut self, reason: impl Into<String>) -> &mut Self {
        self.set("reason", reason.into());
        self
    }
}

crate::model_type! {
    /// Discount expressed as a fraction of the price.
    pub struct PercentageDiscount {
        schema: ModelSchema {
            name: "PercentageDiscount",
            fields: &[
                FieldSpec::required("adjustment_type", FieldKind::String),
                FieldSpec::required("applies_to_price_ids", FieldKind::List(&FieldKind::String)),
                FieldSpec::required("percentage_discount", FieldKind::Number),
                FieldSpec::optional("reason", FieldKind::String).nullable(),
            ],
        },
    }
}

impl AdjustmentFields for PercentageDiscount {}

impl PercentageDiscount {
    pub fn new(price_ids: Vec<String>, percentage_discount: f64) -> Self {
        let mut adjustment = Self::default();
        adjustment.set_applies_to_price_ids(price_ids);
        adjustment.set("percentage_discount", percentage_discount);
        adjustment
    }

    /// Fraction between 0 and 1.
    pub fn percentage_discount(&self) -> Result<f64> {
        self.required("percentage_discount")
    }
}

crate::model_type! {
    /// Discount of a fixed amount.
    pub struct AmountDiscount {
        schema: ModelSchema {
            name: "AmountDiscount",
            fields: &[
                FieldSpec::required("adjustment_type", FieldKind::String),
                FieldSpec::required("amount_discount", FieldKind::String),
                FieldSpec::required("applies_to_price_ids", FieldKind::List(&FieldKind::String)),
                FieldSpec::optional("reason", FieldKind::String).nullable(),
            ],
        },
    }
}

impl AdjustmentFields for AmountDiscount {}

impl AmountDiscount {
    pub fn new(price_ids: Vec<String>, amount_discount: impl Into<String>) -> Self {
        let mut adjustment = Self::default();
        adjustment.set("amount_discount", amount_discount.into());
        adjustment.set_applies_to_price_ids(price_ids);
        adjustment
    }

    pub fn amount_discount(&self) -> Result<String> {
        self.required("amount_discount")
    }
}

crate::model_type! {
    /// Floor on the amount billed for the adjusted prices.
    pub struct Minimum {
        schema: ModelSchema {
            name: "Minimum",
            fields: &[
                FieldSpec::required("adjustment_type", FieldKind::String),
                FieldSpec::required("applies_to_price_ids", FieldKind::List(&FieldKind::String)),
                FieldSpec::required("item_id", FieldKind::String),
                FieldSpec::required("minimum_amount", FieldKind::String),
                FieldSpec::optional("reason", FieldKind::String).nullable(),
            ],
        },
    }
}

impl AdjustmentFields for Minimum {}

impl Minimum {
    pub fn new(
        price_ids: Vec<String>,
        item_id: impl Into<String>,
        minimum_amount: impl Into<String>,
    ) -> Self {
        let mut adjustment = Self::default();
        adjustment.set_applies_to_price_ids(price_ids);
        adjustment.set("item_id", item_id.into());
        adjustment.set("minimum_amount", minimum_amount.into());
        adjustment
    }

    /// Item the true-up line is billed against.
    pub fn item_id(&self) -> Result<String> {
        self.required("item_id")
    }

    pub fn minimum_amount(&self) -> Result<String> {
        self.required("minimum_amount")
    }
}

crate::model_type! {
    /// Cap on the amount billed for the adjusted prices.
    pub struct Maximum {
        schema: ModelSchema {
            name: "Maximum",
            fields: &[
                FieldSpec::required("adjustment_type", FieldKind::String),
                FieldSpec::required("applies_to_price_ids", FieldKind::List(&FieldKind::String)),
                FieldSpec::required("maximum_amount", FieldKind::String),
                FieldSpec::optional("reason", FieldKind::String).nullable(),
            ],
        },
    }
}

impl AdjustmentFields for Maximum {}

impl Maximum {
    pub fn new(price_ids: Vec<String>, maximum_amount: impl Into<String>) -> Self {
        let mut adjustment = Self::default();
        adjustment.set_applies_to_price_ids(price_ids);
        adjustment.set("maximum_amount", maximum_amount.into());
        adjustment
    }

    pub fn maximum_amount(&self) -> Result<String> {
        self.required("maximum_amount")
    }
}

pub const ADJUSTMENT_SCHEMA: UnionSchema = UnionSchema {
    name: "Adjustment",
    discriminant: Some("adjustment_type"),
    members: &[
        UnionMember::tagged(
            "PercentageDiscount",
            "percentage_discount",
            PercentageDiscount::SCHEMA,
        ),
        UnionMember::tagged("AmountDiscount", "amount_discount", AmountDiscount::SCHEMA),
        UnionMember::tagged("Minimum", "minimum", Minimum::SCHEMA),
        UnionMember::tagged("Maximum", "maximum", Maximum::SCHEMA),
    ],
    unknown: UnknownMemberPolicy::Reject,
};

crate::union_type! {
    /// An adjustment applied to one or more prices of a subscription.
    pub enum Adjustment(ADJUSTMENT_SCHEMA) {
        PercentageDiscount(PercentageDiscount),
        AmountDiscount(AmountDiscount),
        Minimum(Minimum),
        Maximum(Maximum),
    }
}

impl Adjustment {
    pub fn adjustment_type(&self) -> Option<&str> {
        self.tag()
    }

    pub fn applies_to_price_ids(&self) -> Result<Vec<String>> {
        crate::model::read_required(self.store(), "applies_to_price_ids")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::Error;

    #[test]
    fn known_adjustment_types_resolve() {
        let adjustment = Adjustment::from_json(json!({
            "adjustment_type": "minimum",
            "applies_to_price_ids": ["price_1"],
            "item_id": "item_1",
            "minimum_amount": "100.00"
        }))
        .unwrap();
        match &adjustment {
            Adjustment::Minimum(minimum) => {
                assert_eq!(minimum.minimum_amount().unwrap(), "100.00");
                assert_eq!(minimum.reason().unwrap(), None);
            }
            other => panic!("expected Minimum, got {other:?}"),
        }
        assert!(adjustment.validate().is_ok());
    }

    #[test]
    fn unknown_adjustment_type_is_rejected() {
        let err = Adjustment::from_json(json!({
            "adjustment_type": "usage_discount",
            "applies_to_price_ids": []
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MalformedWireShape { .. }));
    }

    #[test]
    fn constructor_and_wrap_produce_a_valid_document() {
        let mut discount = PercentageDiscount::new(vec!["price_1".into()], 0.25);
        discount.set_reason("launch promo");
        let adjustment = Adjustment::from(discount);
        assert_eq!(adjustment.adjustment_type(), Some("percentage_discount"));
        assert_eq!(adjustment.applies_to_price_ids().unwrap(), vec!["price_1"]);
        assert!(adjustment.validate().is_ok());
    }
}
