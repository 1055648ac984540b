//! This module defines the canonical, type-safe representation of the numeric
//! element kinds understood by every ordering backend.

use crate::error::OrderingError;
use arrow_schema::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The element kind of a numeric array.
///
/// Every backend agrees on this set. Index results are always one of the integer
/// kinds; `Int64` is the default index dtype.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DType {
    #[serde(rename = "int32")]
    Int32,
    #[default]
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "uint32")]
    UInt32,
    #[serde(rename = "uint64")]
    UInt64,
    #[serde(rename = "float32")]
    Float32,
    #[serde(rename = "float64")]
    Float64,
}

impl DType {
    /// Converts an Arrow `DataType` into a `DType`.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, OrderingError> {
        match arrow_type {
            ArrowDataType::Int32 => Ok(Self::Int32),
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::UInt32 => Ok(Self::UInt32),
            ArrowDataType::UInt64 => Ok(Self::UInt64),
            ArrowDataType::Float32 => Ok(Self::Float32),
            ArrowDataType::Float64 => Ok(Self::Float64),
            dt => Err(OrderingError::UnsupportedType(format!(
                "Cannot convert Arrow type {:?} to DType",
                dt
            ))),
        }
    }

    /// Converts a `DType` back into an Arrow `DataType`.
    pub fn to_arrow_type(&self) -> ArrowDataType {
        match self {
            Self::Int32 => ArrowDataType::Int32,
            Self::Int64 => ArrowDataType::Int64,
            Self::UInt32 => ArrowDataType::UInt32,
            Self::UInt64 => ArrowDataType::UInt64,
            Self::Float32 => ArrowDataType::Float32,
            Self::Float64 => ArrowDataType::Float64,
        }
    }

    /// Returns `true` for the signed and unsigned integer kinds.
    pub fn is_integer(&self) -> bool {
        !self.is_float()
    }

    /// Returns `true` if the data type is a signed integer.
    pub fn is_signed_int(&self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }

    /// Returns `true` if the data type is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Fails with `InvalidDtype` unless `self` is an integer kind.
    pub fn ensure_integer(&self, role: &str) -> Result<(), OrderingError> {
        if self.is_integer() {
            Ok(())
        } else {
            Err(OrderingError::InvalidDtype(format!(
                "{} must be an integer dtype, got {}",
                role, self
            )))
        }
    }

    /// The dtype two operands are compared in.
    ///
    /// Follows the usual numeric promotion lattice: mixing a float with anything
    /// else widens to `Float64`; same-signedness integers take the wider
    /// width; signed with `UInt32` widens to `Int64`; signed with `UInt64` has no
    /// exact integer home and goes to `Float64`.
    pub fn promote(self, other: DType) -> DType {
        use DType::*;
        if self == other {
            return self;
        }
        match (self, other) {
            (a, b) if a.is_float() || b.is_float() => Float64,
            (Int32, Int64) | (Int64, Int32) => Int64,
            (UInt32, UInt64) | (UInt64, UInt32) => UInt64,
            (a, UInt32) | (UInt32, a) if a.is_signed_int() => Int64,
            _ => Float64,
        }
    }

    /// Canonical lower-case name, matching the serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = OrderingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int32" => Ok(Self::Int32),
            "int64" => Ok(Self::Int64),
            "uint32" => Ok(Self::UInt32),
            "uint64" => Ok(Self::UInt64),
            "float32" => Ok(Self::Float32),
            "float64" => Ok(Self::Float64),
            other => Err(OrderingError::InvalidDtype(format!(
                "unknown dtype name '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_roundtrip_for_all_kinds() {
        for dtype in [
            DType::Int32,
            DType::Int64,
            DType::UInt32,
            DType::UInt64,
            DType::Float32,
            DType::Float64,
        ] {
            assert_eq!(DType::from_arrow_type(&dtype.to_arrow_type()).unwrap(), dtype);
            assert_eq!(dtype.name().parse::<DType>().unwrap(), dtype);
        }
    }

    #[test]
    fn test_unsupported_arrow_type_is_rejected() {
        let result = DType::from_arrow_type(&ArrowDataType::Utf8);
        assert!(matches!(result, Err(OrderingError::UnsupportedType(_))));
    }

    #[test]
    fn test_promotion_lattice() {
        assert_eq!(DType::Int32.promote(DType::Int64), DType::Int64);
        assert_eq!(DType::UInt32.promote(DType::Int32), DType::Int64);
        assert_eq!(DType::Int64.promote(DType::UInt32), DType::Int64);
        assert_eq!(DType::UInt64.promote(DType::UInt32), DType::UInt64);
        assert_eq!(DType::UInt64.promote(DType::Int64), DType::Float64);
        assert_eq!(DType::Float32.promote(DType::Float32), DType::Float32);
        assert_eq!(DType::Float32.promote(DType::Int32), DType::Float64);
        assert_eq!(DType::UInt32.promote(DType::UInt64), DType::UInt64);
    }

    #[test]
    fn test_ensure_integer() {
        assert!(DType::UInt32.ensure_integer("ret_dtype").is_ok());
        let err = DType::Float64.ensure_integer("ret_dtype").unwrap_err();
        assert!(matches!(err, OrderingError::InvalidDtype(msg) if msg.contains("ret_dtype")));
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&DType::UInt64).unwrap();
        assert_eq!(json, "\"uint64\"");
        let parsed: DType = serde_json::from_str("\"float32\"").unwrap();
        assert_eq!(parsed, DType::Float32);
    }
}
