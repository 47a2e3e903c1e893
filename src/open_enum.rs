//! Open enumerations that carry unknown wire values losslessly.
//!
//! An [`OpenEnum`] stores the raw value it was decoded from and compares and
//! serializes by that raw value. Membership in the known symbol
//! set is only checked by [`OpenEnum::validate`], so a value added to the API
//! after this SDK shipped still decodes and re-encodes untouched.
//!
//! ```ignore
//! use billing_models::{open_enum, OpenEnum};
//!
//! open_enum! {
//!     /// How often a price is billed.
//!     pub enum Cadence {
//!         Monthly => "monthly",
//!         Annual => "annual",
//!     }
//! }
//!
//! let known: OpenEnum<Cadence> = Cadence::Annual.into();
//! let unknown = OpenEnum::<Cadence>::from_raw("biannual_xyz");
//! assert!(known.validate().is_ok());
//! assert!(unknown.validate().is_err());
//! ```

use std::{fmt, marker::PhantomData};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    errors::{Error, FieldPath, Result},
    store::WireValue,
};

/// Static symbol table of an open enum: its name and canonical wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolTable {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

impl SymbolTable {
    pub fn contains(&self, raw: &WireValue) -> bool {
        raw.as_str()
            .is_some_and(|value| self.values.contains(&value))
    }

    /// Checks `raw` against the table, reporting failures at `path`.
    pub fn check(&self, raw: &WireValue, path: &FieldPath) -> Result<()> {
        if self.contains(raw) {
            return Ok(());
        }
        Err(Error::UnrecognizedEnumValue {
            enum_name: self.name,
            raw: raw.clone(),
            path: path.clone(),
        })
    }
}

/// Known members of an open enum. Implemented by [`open_enum!`].
pub trait EnumSymbol: Copy + Eq + fmt::Debug + 'static {
    const TABLE: SymbolTable;
    const MEMBERS: &'static [Self];

    /// Canonical wire string of this member.
    fn as_str(self) -> &'static str;

    /// Exact, case-sensitive lookup of a wire string.
    fn from_wire(value: &str) -> Option<Self> {
        Self::MEMBERS
            .iter()
            .copied()
            .find(|member| member.as_str() == value)
    }
}

/// A scalar that accepts any raw value and validates membership on demand.
pub struct OpenEnum<S> {
    raw: WireValue,
    _symbol: PhantomData<S>,
}

impl<S: EnumSymbol> OpenEnum<S> {
    pub fn from_symbol(symbol: S) -> Self {
        Self::from_raw(symbol.as_str())
    }

    /// Wraps an arbitrary wire value. Never fails.
    pub fn from_raw(raw: impl Into<WireValue>) -> Self {
        Self {
            raw: raw.into(),
            _symbol: PhantomData,
        }
    }

    pub fn raw(&self) -> &WireValue {
        &self.raw
    }

    pub fn into_raw(self) -> WireValue {
        self.raw
    }

    /// The raw value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        self.raw.as_str()
    }

    pub fn try_resolve(&self) -> Option<S> {
        self.raw.as_str().and_then(S::from_wire)
    }

    pub fn is_known(&self) -> bool {
        self.try_resolve().is_some()
    }

    /// Fails with [`Error::UnrecognizedEnumValue`] when the raw value is not
    /// a member of `S`. Pure and idempotent.
    pub fn validate(&self) -> Result<()> {
        S::TABLE.check(&self.raw, &FieldPath::root())
    }
}

// Manual impls: derives would add bounds on `S`.
impl<S> Clone for OpenEnum<S> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            _symbol: PhantomData,
        }
    }
}

impl<S> fmt::Debug for OpenEnum<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpenEnum").field(&self.raw).finish()
    }
}

impl<S> PartialEq for OpenEnum<S> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<S> Eq for OpenEnum<S> {}

impl<S: EnumSymbol> PartialEq<S> for OpenEnum<S> {
    fn eq(&self, other: &S) -> bool {
        self.raw.as_str() == Some(other.as_str())
    }
}

impl<S> fmt::Display for OpenEnum<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            WireValue::String(value) => f.write_str(value),
            other => write!(f, "{other}"),
        }
    }
}

impl<S: EnumSymbol> From<S> for OpenEnum<S> {
    fn from(symbol: S) -> Self {
        Self::from_symbol(symbol)
    }
}

impl<S> Serialize for OpenEnum<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de, S> Deserialize<'de> for OpenEnum<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = WireValue::deserialize(deserializer)?;
        Ok(Self {
            raw,
            _symbol: PhantomData,
        })
    }
}

/// Declares a symbol enum and its [`EnumSymbol`] table.
///
/// Each member maps to its canonical wire string; the generated type is
/// meant to be used through [`OpenEnum`].
#[macro_export]
macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$member_meta:meta])* $member:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$member_meta])* $member, )+
        }

        impl $crate::open_enum::EnumSymbol for $name {
            const TABLE: $crate::open_enum::SymbolTable = $crate::open_enum::SymbolTable {
                name: stringify!($name),
                values: &[$($wire),+],
            };
            const MEMBERS: &'static [Self] = &[$($name::$member),+];

            fn as_str(self) -> &'static str {
                match self {
                    $( $name::$member => $wire, )+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::open_enum::EnumSymbol::as_str(*self))
            }
        }
    };
}
