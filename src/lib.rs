//! Typed, forward-compatible models for the billing API.
//!
//! Every model keeps the exact document it was decoded from, so fields,
//! enum values and union members added to the API after this SDK shipped
//! survive a decode/encode round trip. Typed accessors read through to that
//! document; nothing is checked until [`Model::validate`] or
//! [`Union::validate`] is called.
//!
//! ```rust,ignore
//! use billing_models::generated::{Cadence, Price};
//! use billing_models::Union;
//!
//! let price: Price = serde_json::from_str(body)?;
//! if price.is_unknown() {
//!     // A pricing model newer than this SDK; still re-encodes verbatim.
//! }
//! price.validate()?;
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod codec;
pub mod errors;
pub mod generated;
pub mod model;
pub mod open_enum;
pub mod schema;
pub mod store;
pub mod union;
pub mod validate;

pub use codec::WireCodec;
pub use errors::{Error, FieldPath, PathSegment, Result};
pub use model::{Field, Model};
pub use open_enum::{EnumSymbol, OpenEnum, SymbolTable};
pub use schema::{FieldKind, FieldSpec, ModelSchema};
pub use store::{FieldState, FieldStore, RawDocument, WireValue};
pub use union::{Resolution, Union, UnionMember, UnionSchema, UnknownMember, UnknownMemberPolicy};
