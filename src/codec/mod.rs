//! Special-value codec
//!
//! JSON has no representation for infinities or NaN. Airtable transmits them
//! as tagged objects, `{"specialValue": "Infinity"}`, and this module maps
//! between that form and native `f64` values.
//!
//! [`FieldValue`] is the closed set of cell values a flat row may hold. Its
//! serde implementations go through the codec, so a `FieldValue` serialized
//! to JSON is always wire-safe.

mod special;
mod value;

pub use special::{decode, decode_special, encode, encode_float, SpecialValue, SPECIAL_VALUE_KEY};
pub use value::FieldValue;
