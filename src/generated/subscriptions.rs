//! Subscription creation request.

use std::collections::BTreeMap;

use crate::{
    errors::Result,
    model::{Field, Model},
    open_enum::{EnumSymbol, OpenEnum},
    schema::{FieldKind, FieldSpec, ModelSchema},
    union::{UnionMember, UnionSchema, UnknownMemberPolicy},
};

use super::{adjustments::Adjustment, pricing::Price};

crate::open_enum! {
    /// Which date the subscription's billing periods are anchored to.
    pub enum BillingCycleAlignment {
        Unchanged => "unchanged",
        PlanChangeDate => "plan_change_date",
        StartDate => "start_date",
    }
}

crate::model_type! {
    /// Customer referenced by its billing id.
    pub struct CustomerById {
        schema: ModelSchema {
            name: "CustomerById",
            fields: &[FieldSpec::required("customer_id", FieldKind::String)],
        },
    }
}

impl CustomerById {
    pub fn new(customer_id: impl Into<String>) -> Self {
        let mut customer = Self::default();
        customer.set("customer_id", customer_id.into());
        customer
    }

    pub fn customer_id(&self) -> Result<String> {
        self.required("customer_id")
    }
}

crate::model_type! {
    /// Customer referenced by the caller's own identifier.
    pub struct CustomerByExternalId {
        schema: ModelSchema {
            name: "CustomerByExternalId",
            fields: &[FieldSpec::required("external_customer_id", FieldKind::String)],
        },
    }
}

impl CustomerByExternalId {
    pub fn new(external_customer_id: impl Into<String>) -> Self {
        let mut customer = Self::default();
        customer.set("external_customer_id", external_customer_id.into());
        customer
    }

    pub fn external_customer_id(&self) -> Result<String> {
        self.required("external_customer_id")
    }
}

/// `CustomerRef` has no discriminant key; a document is matched against
/// `ById` first, so one carrying both ids resolves to `ById`.
pub const CUSTOMER_REF_SCHEMA: UnionSchema = UnionSchema {
    name: "CustomerRef",
    discriminant: None,
    members: &[
        UnionMember::structural("ById", CustomerById::SCHEMA),
        UnionMember::structural("ByExternalId", CustomerByExternalId::SCHEMA),
    ],
    unknown: UnknownMemberPolicy::Reject,
};

crate::union_type! {
    /// Reference to an existing customer.
    pub enum CustomerRef(CUSTOMER_REF_SCHEMA) {
        ById(CustomerById),
        ByExternalId(CustomerByExternalId),
    }
}

impl CustomerRef {
    pub fn by_id(customer_id: impl Into<String>) -> Self {
        CustomerById::new(customer_id).into()
    }

    pub fn by_external_id(external_customer_id: impl Into<String>) -> Self {
        CustomerByExternalId::new(external_customer_id).into()
    }
}

crate::model_type! {
    /// Body of a create-subscription request.
    pub struct NewSubscription {
        schema: ModelSchema {
            name: "NewSubscription",
            fields: &[
                FieldSpec::required("customer", FieldKind::Union(&CUSTOMER_REF_SCHEMA)),
                FieldSpec::optional("plan_id", FieldKind::String).nullable(),
                FieldSpec::optional("external_plan_id", FieldKind::String).nullable(),
                FieldSpec::optional("auto_collection", FieldKind::Boolean).nullable(),
                FieldSpec::optional("net_terms", FieldKind::Number).nullable(),
                FieldSpec::optional(
                    "billing_cycle_alignment",
                    FieldKind::Enum(&BillingCycleAlignment::TABLE),
                )
                .nullable(),
                FieldSpec::optional(
                    "add_prices",
                    FieldKind::List(&FieldKind::Union(&super::pricing::PRICE_SCHEMA)),
                )
                .nullable(),
                FieldSpec::optional(
                    "add_adjustments",
                    FieldKind::List(&FieldKind::Union(&super::adjustments::ADJUSTMENT_SCHEMA)),
                )
                .nullable(),
                FieldSpec::optional("metadata", FieldKind::Map(&FieldKind::String)).nullable(),
            ],
        },
    }
}

impl NewSubscription {
    pub fn new(customer: impl Into<CustomerRef>) -> Self {
        let mut subscription = Self::default();
        subscription.set_customer(customer);
        subscription
    }

    pub fn customer(&self) -> Result<CustomerRef> {
        self.required("customer")
    }

    pub fn set_customer(&mut self, customer: impl Into<CustomerRef>) -> &mut Self {
        self.set("customer", customer.into());
        self
    }

    /// Tri-state: absent leaves the plan to `external_plan_id`.
    pub fn plan_id(&self) -> Result<Field<String>> {
        self.field("plan_id")
    }

    pub fn set_plan_id(&mut self, plan_id: impl Into<String>) -> &mut Self {
        self.set("plan_id", plan_id.into());
        self
    }

    pub fn clear_plan_id(&mut self) -> &mut Self {
        self.set_null("plan_id");
        self
    }

    pub fn unset_plan_id(&mut self) -> &mut Self {
        self.unset("plan_id");
        self
    }

    pub fn external_plan_id(&self) -> Result<Field<String>> {
        self.field("external_plan_id")
    }

    pub fn set_external_plan_id(&mut self, external_plan_id: impl Into<String>) -> &mut Self {
        self.set("external_plan_id", external_plan_id.into());
        self
    }

    /// `None` inherits the customer's setting.
    pub fn auto_collection(&self) -> Result<Option<bool>> {
        self.optional("auto_collection")
    }

    pub fn set_auto_collection(&mut self, auto_collection: bool) -> &mut Self {
        self.set("auto_collection", auto_collection);
        self
    }

    pub fn net_terms(&self) -> Result<Option<i64>> {
        self.optional("net_terms")
    }

    pub fn set_net_terms(&mut self, net_terms: i64) -> &mut Self {
        self.set("net_terms", net_terms);
        self
    }

    pub fn billing_cycle_alignment(&self) -> Result<Option<OpenEnum<BillingCycleAlignment>>> {
        self.optional("billing_cycle_alignment")
    }

    pub fn set_billing_cycle_alignment(
        &mut self,
        alignment: impl Into<OpenEnum<BillingCycleAlignment>>,
    ) -> &mut Self {
        self.set("billing_cycle_alignment", alignment.into());
        self
    }

    pub fn add_prices(&self) -> Result<Option<Vec<Price>>> {
        self.optional("add_prices")
    }

    pub fn set_add_prices(&mut self, prices: Vec<Price>) -> &mut Self {
        self.set("add_prices", prices);
        self
    }

    /// Appends one price, keeping any already present.
    pub fn push_price(&mut self, price: impl Into<Price>) -> Result<&mut Self> {
        let mut prices = self.add_prices()?.unwrap_or_default();
        prices.push(price.into());
        Ok(self.set_add_prices(prices))
    }

    pub fn add_adjustments(&self) -> Result<Option<Vec<Adjustment>>> {
        self.optional("add_adjustments")
    }

    pub fn set_add_adjustments(&mut self, adjustments: Vec<Adjustment>) -> &mut Self {
        self.set("add_adjustments", adjustments);
        self
    }

    /// Metadata entries; a `None` value is sent as `null` and deletes the key.
    pub fn metadata(&self) -> Result<Option<BTreeMap<String, Option<String>>>> {
        self.optional("metadata")
    }

    pub fn set_metadata(&mut self, metadata: BTreeMap<String, Option<String>>) -> &mut Self {
        self.set("metadata", metadata);
        self
    }
}
