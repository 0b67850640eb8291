//! Record matching
//!
//! Pairs rows that have no Airtable id with rows that do, by comparing a set
//! of key fields, so updates can be sent for data that arrived without ids.

use crate::codec::FieldValue;
use crate::error::{Error, Result};
use crate::records::{FlatRow, RECORD_ID_FIELD};
use crate::types::JsonValue;
use serde::Serialize;
use tracing::{debug, info};

/// Result of [`match_record_ids`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchOutcome {
    /// Rows that found exactly one partner, now carrying `at_record_id`
    pub matched: Vec<FlatRow>,
    /// Key tuples with no partner, one per unmatched row
    pub missing_keys: Vec<FlatRow>,
    /// Rows that found no partner, unchanged
    pub unmatched: Vec<FlatRow>,
}

impl MatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// Copy `at_record_id` from `rows_with_id` onto `rows_without_id`
///
/// Rows are paired when every field in `keys` holds an equal value on both
/// sides. Numbers compare numerically, so `1` matches `1.0`, and null matches
/// null. A key absent from a row on either side is an error, as is a key tuple
/// shared by more than one identified row. Output order follows
/// `rows_without_id`.
pub fn match_record_ids(
    rows_without_id: Vec<FlatRow>,
    rows_with_id: &[FlatRow],
    keys: &[String],
) -> Result<MatchOutcome> {
    if keys.is_empty() {
        return Err(Error::invalid_value("keys", "at least one match key is required"));
    }

    let known = rows_with_id
        .iter()
        .enumerate()
        .map(|(i, row)| key_values(row, keys, i))
        .collect::<Result<Vec<_>>>()?;

    let mut outcome = MatchOutcome::default();
    for (i, mut row) in rows_without_id.into_iter().enumerate() {
        let wanted = key_values(&row, keys, i)?;
        let partners: Vec<usize> = known
            .iter()
            .enumerate()
            .filter(|(_, candidate)| tuples_equal(candidate, &wanted))
            .map(|(j, _)| j)
            .collect();

        match partners.as_slice() {
            [] => {
                outcome.missing_keys.push(key_tuple(&row, keys));
                outcome.unmatched.push(row);
            }
            [partner] => {
                let id = rows_with_id[*partner]
                    .get(RECORD_ID_FIELD)
                    .filter(|v| !v.is_null())
                    .cloned()
                    .ok_or_else(|| Error::MissingRecordId {
                        index: *partner,
                        field: RECORD_ID_FIELD.to_string(),
                    })?;
                row.insert(RECORD_ID_FIELD.to_string(), id);
                outcome.matched.push(row);
            }
            _ => {
                let values: Vec<JsonValue> = wanted.iter().map(|v| v.encode()).collect();
                return Err(Error::AmbiguousMatch {
                    keys: keys.to_vec(),
                    count: partners.len(),
                    values: JsonValue::Array(values).to_string(),
                });
            }
        }
    }

    if outcome.is_complete() {
        debug!("Matched all {} rows on {:?}", outcome.matched.len(), keys);
    } else {
        info!(
            "Matched {} rows on {:?}, {} without a partner",
            outcome.matched.len(),
            keys,
            outcome.unmatched.len()
        );
    }

    Ok(outcome)
}

/// A row's values for `keys`, in key order
fn key_values<'a>(row: &'a FlatRow, keys: &[String], index: usize) -> Result<Vec<&'a FieldValue>> {
    keys.iter()
        .map(|key| {
            row.get(key).ok_or_else(|| Error::MissingMatchKey {
                index,
                key: key.clone(),
            })
        })
        .collect()
}

fn tuples_equal(left: &[&FieldValue], right: &[&FieldValue]) -> bool {
    left.iter().zip(right).all(|(a, b)| values_equal(a, b))
}

/// Value equality with integers and floats compared numerically
#[allow(clippy::float_cmp, clippy::cast_precision_loss)]
fn values_equal(left: &FieldValue, right: &FieldValue) -> bool {
    match (left, right) {
        (FieldValue::Integer(i), FieldValue::Float(f))
        | (FieldValue::Float(f), FieldValue::Integer(i)) => *f == *i as f64,
        _ => left == right,
    }
}

fn key_tuple(row: &FlatRow, keys: &[String]) -> FlatRow {
    keys.iter()
        .filter_map(|key| row.get(key).map(|value| (key.clone(), value.clone())))
        .collect()
}
