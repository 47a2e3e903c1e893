//! Models for the billing API, declared with the binding-layer macros.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use billing_models::generated::{Cadence, NewSubscription, Price, PriceFields};
//! use billing_models::{Model, Union};
//! ```

mod adjustments;
mod pricing;
mod subscriptions;

pub use adjustments::{
    Adjustment, AdjustmentFields, AmountDiscount, Maximum, Minimum, PercentageDiscount,
    ADJUSTMENT_SCHEMA,
};
pub use pricing::{
    BulkConfig, BulkFilter, BulkPrice, BulkTier, BulkWithFiltersConfig, BulkWithFiltersPrice,
    BulkWithFiltersTier, Cadence, Price, PriceFields, Tier, TieredConfig, TieredPrice, UnitConfig,
    UnitPrice, PRICE_SCHEMA,
};
pub use subscriptions::{
    BillingCycleAlignment, CustomerByExternalId, CustomerById, CustomerRef, NewSubscription,
    CUSTOMER_REF_SCHEMA,
};
