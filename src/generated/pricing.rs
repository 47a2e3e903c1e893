//! Price shapes and the [`Price`] union keyed on `model_type`.

use std::collections::BTreeMap;

use crate::{
    errors::Result,
    model::{read_optional, read_required, Field, Model},
    open_enum::{EnumSymbol, OpenEnum},
    schema::{FieldKind, FieldSpec, ModelSchema},
    union::{Union, UnionMember, UnionSchema, UnknownMemberPolicy},
};

crate::open_enum! {
    /// How often a price is billed.
    pub enum Cadence {
        OneTime => "one_time",
        Monthly => "monthly",
        Quarterly => "quarterly",
        SemiAnnual => "semi_annual",
        Annual => "annual",
        Custom => "custom",
    }
}

impl Cadence {
    /// Length of one billing period in months, for fixed cadences.
    pub fn months(self) -> Option<u32> {
        match self {
            Cadence::Monthly => Some(1),
            Cadence::Quarterly => Some(3),
            Cadence::SemiAnnual => Some(6),
            Cadence::Annual => Some(12),
            Cadence::OneTime | Cadence::Custom => None,
        }
    }
}

// ============================================================================
// Pricing model configurations
// ============================================================================

crate::model_type! {
    /// Configuration for `unit` pricing.
    pub struct UnitConfig {
        schema: ModelSchema {
            name: "UnitConfig",
            fields: &[FieldSpec::required("unit_amount", FieldKind::String)],
        },
    }
}

impl UnitConfig {
    pub fn new(unit_amount: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.set_unit_amount(unit_amount);
        config
    }

    /// Rate per unit of usage, as a decimal string.
    pub fn unit_amount(&self) -> Result<String> {
        self.required("unit_amount")
    }

    pub fn set_unit_amount(&mut self, unit_amount: impl Into<String>) -> &mut Self {
        self.set("unit_amount", unit_amount.into());
        self
    }
}

crate::model_type! {
    /// One tier of a `tiered` price.
    pub struct Tier {
        schema: ModelSchema {
            name: "Tier",
            fields: &[
                FieldSpec::required("first_unit", FieldKind::Number),
                FieldSpec::required("unit_amount", FieldKind::String),
                FieldSpec::optional("last_unit", FieldKind::Number).nullable(),
            ],
        },
    }
}

impl Tier {
    pub fn new(first_unit: f64, unit_amount: impl Into<String>) -> Self {
        let mut tier = Self::default();
        tier.set("first_unit", first_unit);
        tier.set("unit_amount", unit_amount.into());
        tier
    }

    pub fn first_unit(&self) -> Result<f64> {
        self.required("first_unit")
    }

    pub fn unit_amount(&self) -> Result<String> {
        self.required("unit_amount")
    }

    /// Exclusive upper bound; `None` for the open-ended last tier.
    pub fn last_unit(&self) -> Result<Option<f64>> {
        self.optional("last_unit")
    }

    pub fn set_last_unit(&mut self, last_unit: Option<f64>) -> &mut Self {
        match last_unit {
            Some(last_unit) => self.set("last_unit", last_unit),
            None => self.set_null("last_unit"),
        }
        self
    }
}

crate::model_type! {
    /// Configuration for `tiered` pricing.
    pub struct TieredConfig {
        schema: ModelSchema {
            name: "TieredConfig",
            fields: &[FieldSpec::required(
                "tiers",
                FieldKind::List(&FieldKind::Model(Tier::SCHEMA)),
            )],
        },
    }
}

impl TieredConfig {
    pub fn new(tiers: Vec<Tier>) -> Self {
        let mut config = Self::default();
        config.set("tiers", tiers);
        config
    }

    pub fn tiers(&self) -> Result<Vec<Tier>> {
        self.required("tiers")
    }
}

crate::model_type! {
    /// One tier of a `bulk` price.
    pub struct BulkTier {
        schema: ModelSchema {
            name: "BulkTier",
            fields: &[
                FieldSpec::required("unit_amount", FieldKind::String),
                FieldSpec::optional("maximum_units", FieldKind::Number).nullable(),
            ],
        },
    }
}

impl BulkTier {
    pub fn new(unit_amount: impl Into<String>, maximum_units: Option<f64>) -> Self {
        let mut tier = Self::default();
        tier.set("unit_amount", unit_amount.into());
        if let Some(maximum_units) = maximum_units {
            tier.set("maximum_units", maximum_units);
        }
        tier
    }

    pub fn unit_amount(&self) -> Result<String> {
        self.required("unit_amount")
    }

    pub fn maximum_units(&self) -> Result<Option<f64>> {
        self.optional("maximum_units")
    }
}

crate::model_type! {
    /// Configuration for `bulk` pricing.
    pub struct BulkConfig {
        schema: ModelSchema {
            name: "BulkConfig",
            fields: &[FieldSpec::required(
                "tiers",
                FieldKind::List(&FieldKind::Model(BulkTier::SCHEMA)),
            )],
        },
    }
}

impl BulkConfig {
    pub fn new(tiers: Vec<BulkTier>) -> Self {
        let mut config = Self::default();
        config.set("tiers", tiers);
        config
    }

    pub fn tiers(&self) -> Result<Vec<BulkTier>> {
        self.required("tiers")
    }
}

crate::model_type! {
    /// Event property filter applied before bulk tiers.
    pub struct BulkFilter {
        schema: ModelSchema {
            name: "BulkFilter",
            fields: &[
                FieldSpec::required("property_key", FieldKind::String),
                FieldSpec::required("property_value", FieldKind::String),
            ],
        },
    }
}

impl BulkFilter {
    pub fn new(property_key: impl Into<String>, property_value: impl Into<String>) -> Self {
        let mut filter = Self::default();
        filter.set("property_key", property_key.into());
        filter.set("property_value", property_value.into());
        filter
    }

    pub fn property_key(&self) -> Result<String> {
        self.required("property_key")
    }

    pub fn property_value(&self) -> Result<String> {
        self.required("property_value")
    }
}

crate::model_type! {
    /// One tier of a `bulk_with_filters` price.
    pub struct BulkWithFiltersTier {
        schema: ModelSchema {
            name: "BulkWithFiltersTier",
            fields: &[
                FieldSpec::required("unit_amount", FieldKind::String),
                FieldSpec::optional("tier_lower_bound", FieldKind::String).nullable(),
            ],
        },
    }
}

impl BulkWithFiltersTier {
    pub fn new(unit_amount: impl Into<String>, tier_lower_bound: Option<String>) -> Self {
        let mut tier = Self::default();
        tier.set("unit_amount", unit_amount.into());
        if let Some(bound) = tier_lower_bound {
            tier.set("tier_lower_bound", bound);
        }
        tier
    }

    pub fn unit_amount(&self) -> Result<String> {
        self.required("unit_amount")
    }

    pub fn tier_lower_bound(&self) -> Result<Option<String>> {
        self.optional("tier_lower_bound")
    }
}

crate::model_type! {
    /// Configuration for `bulk_with_filters` pricing.
    pub struct BulkWithFiltersConfig {
        schema: ModelSchema {
            name: "BulkWithFiltersConfig",
            fields: &[
                FieldSpec::required(
                    "filters",
                    FieldKind::List(&FieldKind::Model(BulkFilter::SCHEMA)),
                ),
                FieldSpec::required(
                    "tiers",
                    FieldKind::List(&FieldKind::Model(BulkWithFiltersTier::SCHEMA)),
                ),
            ],
        },
    }
}

impl BulkWithFiltersConfig {
    pub fn new(filters: Vec<BulkFilter>, tiers: Vec<BulkWithFiltersTier>) -> Self {
        let mut config = Self::default();
        config.set("filters", filters);
        config.set("tiers", tiers);
        config
    }

    pub fn filters(&self) -> Result<Vec<BulkFilter>> {
        self.required("filters")
    }

    pub fn tiers(&self) -> Result<Vec<BulkWithFiltersTier>> {
        self.required("tiers")
    }
}

// ============================================================================
// Price members
// ============================================================================

/// Field list shared by every price member, with its pricing configuration
/// declared under `$config_key`.
macro_rules! price_schema {
    ($name:literal, $config_key:literal, $config:ty) => {
        ModelSchema {
            name: $name,
            fields: &[
                FieldSpec::required("cadence", FieldKind::Enum(&Cadence::TABLE)),
                FieldSpec::required($config_key, FieldKind::Model(<$config as Model>::SCHEMA)),
                FieldSpec::required("item_id", FieldKind::String),
                FieldSpec::required("model_type", FieldKind::String),
                FieldSpec::required("name", FieldKind::String),
                FieldSpec::optional("billable_metric_id", FieldKind::String).nullable(),
                FieldSpec::optional("billed_in_advance", FieldKind::Boolean).nullable(),
                FieldSpec::optional("currency", FieldKind::String),
                FieldSpec::optional("external_price_id", FieldKind::String).nullable(),
                FieldSpec::optional("fixed_price_quantity", FieldKind::Number).nullable(),
                FieldSpec::optional("metadata", FieldKind::Map(&FieldKind::String)).nullable(),
            ],
        }
    };
}

/// Accessors shared by every price member.
pub trait PriceFields: Model {
    fn cadence(&self) -> Result<OpenEnum<Cadence>> {
        self.required("cadence")
    }

    fn set_cadence(&mut self, cadence: impl Into<OpenEnum<Cadence>>) -> &mut Self {
        self.set("cadence", cadence.into());
        self
    }

    fn item_id(&self) -> Result<String> {
        self.required("item_id")
    }

    fn set_item_id(&mut self, item_id: impl Into<String>) -> &mut Self {
        self.set("item_id", item_id.into());
        self
    }

    fn name(&self) -> Result<String> {
        self.required("name")
    }

    fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.set("name", name.into());
        self
    }

    fn currency(&self) -> Result<Option<String>> {
        self.optional("currency")
    }

    fn set_currency(&mut self, currency: impl Into<String>) -> &mut Self {
        self.set("currency", currency.into());
        self
    }

    fn billable_metric_id(&self) -> Result<Field<String>> {
        self.field("billable_metric_id")
    }

    fn set_billable_metric_id(&mut self, billable_metric_id: impl Into<String>) -> &mut Self {
        self.set("billable_metric_id", billable_metric_id.into());
        self
    }

    fn billed_in_advance(&self) -> Result<Option<bool>> {
        self.optional("billed_in_advance")
    }

    fn set_billed_in_advance(&mut self, billed_in_advance: bool) -> &mut Self {
        self.set("billed_in_advance", billed_in_advance);
        self
    }

    /// Tri-state: absent, explicitly null, or set.
    fn external_price_id(&self) -> Result<Field<String>> {
        self.field("external_price_id")
    }

    fn set_external_price_id(&mut self, external_price_id: impl Into<String>) -> &mut Self {
        self.set("external_price_id", external_price_id.into());
        self
    }

    /// Sends an explicit `null`, clearing the value server-side.
    fn clear_external_price_id(&mut self) -> &mut Self {
        self.set_null("external_price_id");
        self
    }

    /// Omits the field from the request entirely.
    fn unset_external_price_id(&mut self) -> &mut Self {
        self.unset("external_price_id");
        self
    }

    fn fixed_price_quantity(&self) -> Result<Option<f64>> {
        self.optional("fixed_price_quantity")
    }

    fn set_fixed_price_quantity(&mut self, quantity: f64) -> &mut Self {
        self.set("fixed_price_quantity", quantity);
        self
    }

    /// Metadata entries; a `None` value is sent as `null` and deletes the key.
    fn metadata(&self) -> Result<Option<BTreeMap<String, Option<String>>>> {
        self.optional("metadata")
    }

    fn set_metadata(&mut self, metadata: BTreeMap<String, Option<String>>) -> &mut Self {
        self.set("metadata", metadata);
        self
    }
}

crate::model_type! {
    /// A price charging a flat rate per unit.
    pub struct UnitPrice {
        schema: price_schema!("UnitPrice", "unit_config", UnitConfig),
    }
}

impl PriceFields for UnitPrice {}

impl UnitPrice {
    pub fn unit_config(&self) -> Result<UnitConfig> {
        self.required("unit_config")
    }

    pub fn set_unit_config(&mut self, config: UnitConfig) -> &mut Self {
        self.set("unit_config", config);
        self
    }
}

crate::model_type! {
    /// A price whose per-unit rate changes across usage tiers.
    pub struct TieredPrice {
        schema: price_schema!("TieredPrice", "tiered_config", TieredConfig),
    }
}

impl PriceFields for TieredPrice {}

impl TieredPrice {
    pub fn tiered_config(&self) -> Result<TieredConfig> {
        self.required("tiered_config")
    }

    pub fn set_tiered_config(&mut self, config: TieredConfig) -> &mut Self {
        self.set("tiered_config", config);
        self
    }
}

crate::model_type! {
    /// A price where total volume selects one rate for all units.
    pub struct BulkPrice {
        schema: price_schema!("BulkPrice", "bulk_config", BulkConfig),
    }
}

impl PriceFields for BulkPrice {}

impl BulkPrice {
    pub fn bulk_config(&self) -> Result<BulkConfig> {
        self.required("bulk_config")
    }

    pub fn set_bulk_config(&mut self, config: BulkConfig) -> &mut Self {
        self.set("bulk_config", config);
        self
    }
}

crate::model_type! {
    /// A bulk price applied only to events matching property filters.
    pub struct BulkWithFiltersPrice {
        schema: price_schema!(
            "BulkWithFiltersPrice",
            "bulk_with_filters_config",
            BulkWithFiltersConfig
        ),
    }
}

impl PriceFields for BulkWithFiltersPrice {}

impl BulkWithFiltersPrice {
    pub fn bulk_with_filters_config(&self) -> Result<BulkWithFiltersConfig> {
        self.required("bulk_with_filters_config")
    }

    pub fn set_bulk_with_filters_config(&mut self, config: BulkWithFiltersConfig) -> &mut Self {
        self.set("bulk_with_filters_config", config);
        self
    }
}

// ============================================================================
// Price union
// ============================================================================

/// Members of [`Price`], selected by `model_type`. Documents with a
/// `model_type` this SDK does not know are kept as [`Price::Unknown`].
pub const PRICE_SCHEMA: UnionSchema = UnionSchema {
    name: "Price",
    discriminant: Some("model_type"),
    members: &[
        UnionMember::tagged("Unit", "unit", UnitPrice::SCHEMA),
        UnionMember::tagged("Tiered", "tiered", TieredPrice::SCHEMA),
        UnionMember::tagged("Bulk", "bulk", BulkPrice::SCHEMA),
        UnionMember::tagged(
            "BulkWithFilters",
            "bulk_with_filters",
            BulkWithFiltersPrice::SCHEMA,
        ),
    ],
    unknown: UnknownMemberPolicy::CatchAll,
};

crate::union_type! {
    /// A price of any pricing model.
    pub enum Price(PRICE_SCHEMA) {
        Unit(UnitPrice),
        Tiered(TieredPrice),
        Bulk(BulkPrice),
        BulkWithFilters(BulkWithFiltersPrice),
    }
    unknown Unknown;
}

impl Price {
    /// Raw `model_type` of the active member.
    pub fn model_type(&self) -> Option<&str> {
        self.tag()
    }

    pub fn cadence(&self) -> Result<OpenEnum<Cadence>> {
        read_required(self.store(), "cadence")
    }

    pub fn item_id(&self) -> Result<String> {
        read_required(self.store(), "item_id")
    }

    pub fn name(&self) -> Result<String> {
        read_required(self.store(), "name")
    }

    pub fn currency(&self) -> Result<Option<String>> {
        read_optional(self.store(), "currency")
    }
}
