//! Discriminated unions with forward-compatible member resolution.
//!
//! A union document is resolved to exactly one member, either by reading a
//! shared discriminant key or, for unions without one, by matching the
//! document against each member's declared shape in declaration order.
//! Once resolved the active member never changes; replacing it means
//! constructing a new union value.

use crate::{
    errors::{Error, FieldPath, Result},
    schema::ModelSchema,
    store::{wire_kind, FieldStore, RawDocument, WireValue},
};

/// What to do with a document whose member cannot be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownMemberPolicy {
    /// Keep the document opaquely in an `UnknownMember`. Validation rejects
    /// it later with [`Error::UnrecognizedVariant`].
    CatchAll,
    /// Fail decoding with [`Error::MalformedWireShape`].
    Reject,
}

/// One registered member of a union.
#[derive(Debug, Clone, Copy)]
pub struct UnionMember {
    /// Name of the member; matches the Rust variant name.
    pub name: &'static str,
    /// Discriminant value selecting this member, for discriminated unions.
    pub tag: Option<&'static str>,
    pub schema: &'static ModelSchema,
}

impl UnionMember {
    pub const fn tagged(name: &'static str, tag: &'static str, schema: &'static ModelSchema) -> Self {
        Self {
            name,
            tag: Some(tag),
            schema,
        }
    }

    pub const fn structural(name: &'static str, schema: &'static ModelSchema) -> Self {
        Self {
            name,
            tag: None,
            schema,
        }
    }
}

/// Static description of a union: its members, in declaration order, and how
/// a document selects one of them.
#[derive(Debug, Clone, Copy)]
pub struct UnionSchema {
    pub name: &'static str,
    /// Key shared by all members holding the member tag. `None` means the
    /// union is resolved structurally.
    pub discriminant: Option<&'static str>,
    pub members: &'static [UnionMember],
    pub unknown: UnknownMemberPolicy,
}

/// Outcome of resolving a document against a [`UnionSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Index into [`UnionSchema::members`].
    Member(usize),
    /// No member matched and the schema keeps unknown documents.
    Unknown,
}

impl UnionSchema {
    pub fn member(&self, name: &str) -> Option<&UnionMember> {
        self.members.iter().find(|member| member.name == name)
    }

    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|member| member.name == name)
    }

    /// Raw discriminant of `doc`, if the union declares a discriminant key.
    pub fn discriminant_of<'a>(&self, doc: &'a RawDocument) -> Option<&'a WireValue> {
        self.discriminant.and_then(|key| doc.get(key))
    }

    /// Selects the member `doc` belongs to.
    ///
    /// Discriminated unions match the discriminant value exactly. Structural
    /// unions accept the first member, in declaration order, whose declared
    /// fields are shape-compatible with the document; that order is the
    /// tie-break when several members fit.
    pub fn resolve(&self, doc: &RawDocument) -> Result<Resolution> {
        match self.discriminant {
            Some(key) => self.resolve_tagged(key, doc),
            None => self.resolve_structural(doc),
        }
    }

    fn resolve_tagged(&self, key: &str, doc: &RawDocument) -> Result<Resolution> {
        let tag = doc.get(key).and_then(WireValue::as_str);
        if let Some(tag) = tag {
            if let Some(index) = self
                .members
                .iter()
                .position(|member| member.tag == Some(tag))
            {
                return Ok(Resolution::Member(index));
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            union = self.name,
            discriminant = key,
            value = ?doc.get(key),
            "unrecognized union discriminant"
        );
        self.unresolved(|| format!("{} with a known `{key}`", self.name))
    }

    fn resolve_structural(&self, doc: &RawDocument) -> Result<Resolution> {
        let matched = self
            .members
            .iter()
            .position(|member| shape_matches(member.schema, doc));
        match matched {
            Some(index) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    union = self.name,
                    member = self.members[index].name,
                    "resolved union member by shape"
                );
                Ok(Resolution::Member(index))
            }
            None => self.unresolved(|| format!("a document matching one of {}", self.member_names())),
        }
    }

    fn unresolved(&self, expected: impl FnOnce() -> String) -> Result<Resolution> {
        match self.unknown {
            UnknownMemberPolicy::CatchAll => {
                #[cfg(feature = "tracing")]
                tracing::debug!(union = self.name, "keeping document as unknown member");
                Ok(Resolution::Unknown)
            }
            UnknownMemberPolicy::Reject => Err(Error::malformed(expected(), "object")),
        }
    }

    fn member_names(&self) -> String {
        let names: Vec<&str> = self.members.iter().map(|member| member.name).collect();
        format!("{} ({})", self.name, names.join(", "))
    }

    /// Writes the member's tag into its store under the discriminant key.
    pub fn stamp(&self, member_name: &str, store: &mut FieldStore) {
        let tag = self.member(member_name).and_then(|member| member.tag);
        if let (Some(key), Some(tag)) = (self.discriminant, tag) {
            store.set_value(key, tag);
        }
    }
}

/// Shallow check that `doc` can be decoded as a model with `schema`.
pub fn shape_matches(schema: &ModelSchema, doc: &RawDocument) -> bool {
    schema.fields.iter().all(|field| match doc.get(field.key) {
        None => !field.required,
        Some(WireValue::Null) => field.nullable || !field.required,
        Some(value) => field.kind.accepts(value),
    })
}

/// A resolved union value. Implemented by [`union_type!`](crate::union_type).
pub trait Union: Sized {
    const SCHEMA: &'static UnionSchema;

    /// Wraps `store` as the member at `index`; `None` if no such member.
    fn from_member(index: usize, store: FieldStore) -> Option<Self>;

    /// Wraps `store` as the catch-all member, if the union has one.
    fn from_unknown(store: FieldStore) -> Option<Self>;

    /// Store of the active member.
    fn store(&self) -> &FieldStore;

    fn into_store(self) -> FieldStore;

    /// Index of the active member, `None` for the catch-all.
    fn member_index(&self) -> Option<usize>;

    /// Resolves a parsed document to its member.
    fn resolve(doc: RawDocument) -> Result<Self> {
        let resolution = Self::SCHEMA.resolve(&doc)?;
        let store = FieldStore::from_document(doc);
        let resolved = match resolution {
            Resolution::Member(index) => Self::from_member(index, store),
            Resolution::Unknown => Self::from_unknown(store),
        };
        resolved.ok_or_else(|| Error::malformed(format!("a member of {}", Self::SCHEMA.name), "object"))
    }

    fn from_json(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Object(doc) => Self::resolve(doc),
            other => Err(Error::malformed(Self::SCHEMA.name, wire_kind(&other))),
        }
    }

    /// Copy of the active member's store with its tag written in.
    ///
    /// The tag always follows the variant, so a member built or edited
    /// through the enum variant encodes as that same member.
    fn to_store(&self) -> FieldStore {
        let mut store = self.store().clone();
        stamp_active(Self::SCHEMA, self.member_index(), &mut store);
        store
    }

    /// Consuming form of [`Union::to_store`].
    fn into_wire_store(self) -> FieldStore {
        let index = self.member_index();
        let mut store = self.into_store();
        stamp_active(Self::SCHEMA, index, &mut store);
        store
    }

    fn to_json(&self) -> WireValue {
        self.to_store().into_value()
    }

    /// Name of the active member, `"Unknown"` for the catch-all.
    fn member_name(&self) -> &'static str {
        self.member_index()
            .and_then(|index| Self::SCHEMA.members.get(index))
            .map_or("Unknown", |member| member.name)
    }

    /// Raw discriminant of the active member.
    fn discriminant(&self) -> Option<&WireValue> {
        Self::SCHEMA.discriminant_of(self.store().as_document())
    }

    /// Tag of the active member; the raw discriminant for the catch-all.
    fn tag(&self) -> Option<&str> {
        match self.member_index() {
            Some(index) => Self::SCHEMA.members.get(index).and_then(|member| member.tag),
            None => self.discriminant().and_then(WireValue::as_str),
        }
    }

    fn is_unknown(&self) -> bool {
        self.member_index().is_none()
    }

    /// Validates the active member only.
    fn validate(&self) -> Result<()> {
        let resolution = match self.member_index() {
            Some(index) => Resolution::Member(index),
            None => Resolution::Unknown,
        };
        let store = self.to_store();
        crate::validate::validate_resolved(
            store.as_document(),
            Self::SCHEMA,
            resolution,
            &FieldPath::root(),
        )
    }
}

fn stamp_active(schema: &UnionSchema, index: Option<usize>, store: &mut FieldStore) {
    if let Some(member) = index.and_then(|index| schema.members.get(index)) {
        schema.stamp(member.name, store);
    }
}

crate::model_type! {
    /// A union member this SDK version does not know, kept verbatim.
    pub struct UnknownMember {
        schema: ModelSchema {
            name: "UnknownMember",
            fields: &[],
        },
    }
}

/// Declares a union enum over existing member models.
///
/// ```ignore
/// union_type! {
///     pub enum Price(PRICE_SCHEMA) {
///         Unit(UnitPrice),
///         Tiered(TieredPrice),
///     }
///     unknown Unknown;
/// }
/// ```
///
/// Variant names must equal the member names in the schema const. The
/// optional `unknown` clause adds a catch-all variant and must be present
/// exactly when the schema uses [`UnknownMemberPolicy::CatchAll`].
#[macro_export]
macro_rules! union_type {
    (@unknown $store:ident) => {{
        let _ = $store;
        None
    }};
    (@unknown $store:ident $unknown:ident) => {
        Some(Self::$unknown(
            <$crate::union::UnknownMember as $crate::model::Model>::from_store($store),
        ))
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($schema:path) {
            $( $(#[$variant_meta:meta])* $variant:ident($member:ty) ),+ $(,)?
        }
        $(unknown $unknown:ident;)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant($member), )+
            $(
                /// Member not known to this SDK version, kept verbatim.
                $unknown($crate::union::UnknownMember),
            )?
        }

        impl $crate::union::Union for $name {
            const SCHEMA: &'static $crate::union::UnionSchema = &$schema;

            fn from_member(index: usize, store: $crate::store::FieldStore) -> Option<Self> {
                let name = Self::SCHEMA.members.get(index)?.name;
                $(
                    if name == stringify!($variant) {
                        return Some(Self::$variant(
                            <$member as $crate::model::Model>::from_store(store),
                        ));
                    }
                )+
                None
            }

            fn from_unknown(store: $crate::store::FieldStore) -> Option<Self> {
                $crate::union_type!(@unknown store $($unknown)?)
            }

            fn store(&self) -> &$crate::store::FieldStore {
                match self {
                    $( Self::$variant(member) => $crate::model::Model::store(member), )+
                    $( Self::$unknown(member) => $crate::model::Model::store(member), )?
                }
            }

            fn into_store(self) -> $crate::store::FieldStore {
                match self {
                    $( Self::$variant(member) => $crate::model::Model::into_store(member), )+
                    $( Self::$unknown(member) => $crate::model::Model::into_store(member), )?
                }
            }

            fn member_index(&self) -> Option<usize> {
                match self {
                    $( Self::$variant(_) => Self::SCHEMA.member_index(stringify!($variant)), )+
                    $( Self::$unknown(_) => None, )?
                }
            }
        }

        $(
            impl From<$member> for $name {
                fn from(mut member: $member) -> Self {
                    <Self as $crate::union::Union>::SCHEMA.stamp(
                        stringify!($variant),
                        $crate::model::Model::store_mut(&mut member),
                    );
                    Self::$variant(member)
                }
            }
        )+

        // Equal when the same member is active and the stamped stores match.
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                <Self as $crate::union::Union>::member_index(self)
                    == <Self as $crate::union::Union>::member_index(other)
                    && <Self as $crate::union::Union>::to_store(self)
                        == <Self as $crate::union::Union>::to_store(other)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                ::serde::Serialize::serialize(
                    &<Self as $crate::union::Union>::to_store(self),
                    serializer,
                )
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
                let doc = <$crate::store::RawDocument as ::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::union::Union>::resolve(doc).map_err(::serde::de::Error::custom)
            }
        }

        impl $crate::codec::WireCodec for $name {
            fn decode(value: &$crate::store::WireValue) -> $crate::errors::Result<Self> {
                <Self as $crate::union::Union>::from_json(value.clone())
            }

            fn encode(self) -> $crate::store::WireValue {
                <Self as $crate::union::Union>::into_wire_store(self).into_value()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        model::Model,
        schema::{FieldKind, FieldSpec},
    };

    crate::model_type! {
        struct Card {
            schema: ModelSchema {
                name: "Card",
                fields: &[
                    FieldSpec::required("kind", FieldKind::String),
                    FieldSpec::required("last4", FieldKind::String),
                ],
            },
        }
    }

    crate::model_type! {
        struct Ach {
            schema: ModelSchema {
                name: "Ach",
                fields: &[
                    FieldSpec::required("kind", FieldKind::String),
                    FieldSpec::required("routing_number", FieldKind::String),
                ],
            },
        }
    }

    const METHOD_SCHEMA: UnionSchema = UnionSchema {
        name: "PaymentMethod",
        discriminant: Some("kind"),
        members: &[
            UnionMember::tagged("Card", "card", Card::SCHEMA),
            UnionMember::tagged("Ach", "ach", Ach::SCHEMA),
        ],
        unknown: UnknownMemberPolicy::CatchAll,
    };

    crate::union_type! {
        enum PaymentMethod(METHOD_SCHEMA) {
            Card(Card),
            Ach(Ach),
        }
        unknown Unknown;
    }

    const STRICT_SCHEMA: UnionSchema = UnionSchema {
        name: "StrictMethod",
        discriminant: Some("kind"),
        members: &[UnionMember::tagged("Card", "card", Card::SCHEMA)],
        unknown: UnknownMemberPolicy::Reject,
    };

    crate::union_type! {
        enum StrictMethod(STRICT_SCHEMA) {
            Card(Card),
        }
    }

    const WALLET_SCHEMA: UnionSchema = UnionSchema {
        name: "Wallet",
        discriminant: None,
        members: &[
            UnionMember::structural("Card", Card::SCHEMA),
            UnionMember::structural("Ach", Ach::SCHEMA),
        ],
        unknown: UnknownMemberPolicy::CatchAll,
    };

    crate::union_type! {
        enum Wallet(WALLET_SCHEMA) {
            Card(Card),
            Ach(Ach),
        }
        unknown Other;
    }

    fn doc(value: WireValue) -> RawDocument {
        match value {
            WireValue::Object(doc) => doc,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn resolves_by_discriminant() {
        let method = PaymentMethod::resolve(doc(json!({"kind": "ach", "routing_number": "1"})))
            .unwrap();
        assert!(matches!(method, PaymentMethod::Ach(_)));
        assert_eq!(method.member_name(), "Ach");
        assert_eq!(method.discriminant(), Some(&json!("ach")));
    }

    #[test]
    fn unknown_discriminant_falls_back_to_catch_all() {
        let raw = json!({"kind": "crypto", "wallet": "0xabc"});
        let method = PaymentMethod::from_json(raw.clone()).unwrap();
        assert!(method.is_unknown());
        assert_eq!(method.member_name(), "Unknown");
        assert_eq!(method.to_json(), raw);
        assert!(matches!(
            method.validate(),
            Err(Error::UnrecognizedVariant { union_name: "PaymentMethod", .. })
        ));
    }

    #[test]
    fn missing_discriminant_is_unrecognized() {
        let method = PaymentMethod::from_json(json!({"last4": "4242"})).unwrap();
        assert!(method.is_unknown());
    }

    #[test]
    fn reject_policy_fails_decode() {
        let err = StrictMethod::from_json(json!({"kind": "ach"})).unwrap_err();
        assert!(matches!(err, Error::MalformedWireShape { .. }));
    }

    #[test]
    fn from_variant_stamps_tag() {
        let mut card = Card::default();
        card.store_mut().set_value("last4", "4242");
        let method = PaymentMethod::from(card);
        assert_eq!(method.to_json(), json!({"last4": "4242", "kind": "card"}));
        let decoded: PaymentMethod = serde_json::from_value(method.to_json()).unwrap();
        assert_eq!(decoded, method);
    }

    #[test]
    fn stamping_overwrites_a_stale_tag() {
        let card = Card::from_json(json!({"kind": "ach", "last4": "1"})).unwrap();
        let method = PaymentMethod::from(card);
        assert_eq!(method.discriminant(), Some(&json!("card")));
    }

    #[test]
    fn variant_constructor_encodes_with_its_tag() {
        let card = Card::from_json(json!({"last4": "4242"})).unwrap();
        let method = PaymentMethod::Card(card);
        assert_eq!(method.tag(), Some("card"));
        assert_eq!(method.to_json(), json!({"last4": "4242", "kind": "card"}));
        assert!(method.validate().is_ok());

        let decoded: PaymentMethod =
            serde_json::from_str(&serde_json::to_string(&method).unwrap()).unwrap();
        assert_eq!(decoded.member_name(), "Card");
        assert_eq!(decoded, method);
    }

    #[test]
    fn structural_catch_all_keeps_unmatched_documents() {
        let wallet = Wallet::from_json(json!({"kind": "ach", "routing_number": "1"})).unwrap();
        assert!(matches!(wallet, Wallet::Ach(_)));

        let raw = json!({"kind": "crypto", "address": "0xabc"});
        let wallet = Wallet::from_json(raw.clone()).unwrap();
        assert!(matches!(wallet, Wallet::Other(_)));
        assert_eq!(wallet.member_name(), "Unknown");
        assert_eq!(wallet.tag(), None);
        assert_eq!(wallet.to_json(), raw);
        match wallet.validate() {
            Err(Error::UnrecognizedVariant {
                union_name,
                discriminant,
                ..
            }) => {
                assert_eq!(union_name, "Wallet");
                assert_eq!(discriminant, WireValue::Null);
            }
            other => panic!("expected UnrecognizedVariant, got {other:?}"),
        }
    }

    #[test]
    fn shape_matching_checks_required_keys_and_kinds() {
        assert!(shape_matches(
            Card::SCHEMA,
            &doc(json!({"kind": "card", "last4": "4242"}))
        ));
        assert!(!shape_matches(Card::SCHEMA, &doc(json!({"kind": "card"}))));
        assert!(!shape_matches(
            Card::SCHEMA,
            &doc(json!({"kind": "card", "last4": 4242}))
        ));
    }
}
