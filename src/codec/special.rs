//! Tagged encoding of non-finite floats

use super::FieldValue;
use crate::types::{JsonObject, JsonValue};
use serde_json::Number;

/// Key of the tagged object used for non-finite numbers
pub const SPECIAL_VALUE_KEY: &str = "specialValue";

/// The three IEEE-754 values JSON cannot carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialValue {
    /// Positive infinity
    Infinity,
    /// Negative infinity
    NegInfinity,
    /// Not a number
    NaN,
}

impl SpecialValue {
    /// Classify a float, `None` when it is finite
    pub fn classify(value: f64) -> Option<Self> {
        if value.is_nan() {
            Some(Self::NaN)
        } else if value == f64::INFINITY {
            Some(Self::Infinity)
        } else if value == f64::NEG_INFINITY {
            Some(Self::NegInfinity)
        } else {
            None
        }
    }

    /// Parse a wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Infinity" => Some(Self::Infinity),
            "-Infinity" => Some(Self::NegInfinity),
            "NaN" => Some(Self::NaN),
            _ => None,
        }
    }

    /// Wire tag for this value
    pub fn tag(self) -> &'static str {
        match self {
            Self::Infinity => "Infinity",
            Self::NegInfinity => "-Infinity",
            Self::NaN => "NaN",
        }
    }

    /// Native float for this value
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Infinity => f64::INFINITY,
            Self::NegInfinity => f64::NEG_INFINITY,
            Self::NaN => f64::NAN,
        }
    }

    /// Tagged wire object for this value
    pub fn to_wire(self) -> JsonValue {
        let mut object = JsonObject::new();
        object.insert(
            SPECIAL_VALUE_KEY.to_string(),
            JsonValue::String(self.tag().to_string()),
        );
        JsonValue::Object(object)
    }
}

/// Encode a float for the wire
///
/// Finite values become plain JSON numbers; non-finite ones become tagged
/// objects.
pub fn encode_float(value: f64) -> JsonValue {
    match SpecialValue::classify(value) {
        Some(special) => special.to_wire(),
        // from_f64 only rejects non-finite input
        None => Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number),
    }
}

/// Recognise a tagged special value
///
/// Only an object whose single key is `specialValue` holding one of the
/// three known tags qualifies.
pub fn decode_special(value: &JsonValue) -> Option<f64> {
    let JsonValue::Object(object) = value else {
        return None;
    };
    if object.len() != 1 {
        return None;
    }
    object
        .get(SPECIAL_VALUE_KEY)
        .and_then(JsonValue::as_str)
        .and_then(SpecialValue::from_tag)
        .map(SpecialValue::to_f64)
}

/// Encode a field value for the wire
pub fn encode(value: &FieldValue) -> JsonValue {
    value.encode()
}

/// Decode a wire value into a field value, resolving tagged specials
pub fn decode(value: JsonValue) -> FieldValue {
    FieldValue::decode(value)
}
