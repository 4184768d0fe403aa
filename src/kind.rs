//! Closed set of wire value kinds used in argument schemas.
//!
//! Each registry entry declares one [`ArgKind`] per argument position.
//! The validator matches them against the CBOR item type reported by
//! the decode cursor before the handler ever runs. The set is closed:
//! there is no wildcard kind, and indefinite-length container variants
//! never match (the engine only accepts definite-length items).

use minicbor::data::Type;

/// Expected wire kind of one argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Null,
    Bool,
    /// A CBOR simple value other than bool/null/undefined.
    Simple,
    /// Any integer, either major type.
    SignedInteger,
    UnsignedInteger,
    NegativeInteger,
    HalfFloat,
    Float,
    Double,
    TextString,
    ByteString,
    Array,
    Map,
}

impl ArgKind {
    /// Does a CBOR item of type `ty` satisfy this kind?
    pub fn matches(self, ty: Type) -> bool {
        match self {
            Self::Null => matches!(ty, Type::Null),
            Self::Bool => matches!(ty, Type::Bool),
            Self::Simple => matches!(ty, Type::Simple),
            Self::SignedInteger => matches!(
                ty,
                Type::U8
                    | Type::U16
                    | Type::U32
                    | Type::U64
                    | Type::I8
                    | Type::I16
                    | Type::I32
                    | Type::I64
                    | Type::Int
            ),
            Self::UnsignedInteger => {
                matches!(ty, Type::U8 | Type::U16 | Type::U32 | Type::U64)
            }
            // Major type 1 only; minicbor reports I* for negative heads
            // and Int for negatives below i64::MIN.
            Self::NegativeInteger => {
                matches!(ty, Type::I8 | Type::I16 | Type::I32 | Type::I64 | Type::Int)
            }
            Self::HalfFloat => matches!(ty, Type::F16),
            Self::Float => matches!(ty, Type::F32),
            Self::Double => matches!(ty, Type::F64),
            Self::TextString => matches!(ty, Type::String),
            Self::ByteString => matches!(ty, Type::Bytes),
            Self::Array => matches!(ty, Type::Array),
            Self::Map => matches!(ty, Type::Map),
        }
    }
}
