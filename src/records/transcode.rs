//! Conversion between wire records and flat rows

use super::types::{FlatRow, WireBatch, WireRecord, RECORD_ID_FIELD};
use crate::codec::FieldValue;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use tracing::debug;

/// Flatten wire records into rows
///
/// With `keep_id`, each row also carries the record id under
/// [`RECORD_ID_FIELD`]. Records that have no id get no pseudo-field.
pub fn from_wire(records: Vec<WireRecord>, keep_id: bool) -> Result<Vec<FlatRow>> {
    records
        .into_iter()
        .map(|record| {
            let mut row = FlatRow::new();
            if keep_id {
                if record.fields.contains_key(RECORD_ID_FIELD) {
                    return Err(Error::ReservedFieldCollision {
                        field: RECORD_ID_FIELD.to_string(),
                    });
                }
                if let Some(id) = record.id {
                    row.insert(RECORD_ID_FIELD.to_string(), FieldValue::String(id));
                }
            }
            for (name, value) in record.fields {
                row.insert(name, FieldValue::decode(value));
            }
            Ok(row)
        })
        .collect()
}

/// Build wire records from rows
///
/// Null values are dropped unless `keep_none` is set, in which case they are
/// sent so Airtable clears the field. New records come back as a bare list
/// without ids. Existing records must carry [`RECORD_ID_FIELD`] and come back
/// wrapped in a `records` container.
pub fn to_wire(rows: &[FlatRow], keep_none: bool, is_new: bool) -> Result<WireBatch> {
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let mut fields = JsonObject::new();
        let mut id = None;

        for (name, value) in row {
            if name == RECORD_ID_FIELD {
                id = Some(value);
                continue;
            }
            if value.is_null() && !keep_none {
                continue;
            }
            reject_unsupported(name, value)?;
            fields.insert(name.clone(), value.encode());
        }

        if is_new {
            if id.is_some() {
                debug!("Dropping {} from new record at index {}", RECORD_ID_FIELD, index);
            }
            records.push(WireRecord::new(fields));
        } else {
            let id = id
                .and_then(FieldValue::as_str)
                .ok_or_else(|| Error::MissingRecordId {
                    index,
                    field: RECORD_ID_FIELD.to_string(),
                })?;
            records.push(WireRecord::with_id(id, fields));
        }
    }

    Ok(if is_new {
        WireBatch::List(records)
    } else {
        WireBatch::Container { records }
    })
}

/// Whether a value looks like an attachment cell
///
/// Attachments are objects carrying `url` or `filename`, or a list made up
/// entirely of such objects.
pub fn is_attachment(value: &FieldValue) -> bool {
    match value {
        FieldValue::Object(object) => is_attachment_object(object),
        FieldValue::Array(items) => is_attachment_list(items),
        _ => false,
    }
}

fn is_attachment_list(items: &[JsonValue]) -> bool {
    !items.is_empty()
        && items
            .iter()
            .all(|item| item.as_object().is_some_and(is_attachment_object))
}

fn is_attachment_object(object: &JsonObject) -> bool {
    object.contains_key("url") || object.contains_key("filename")
}

fn reject_unsupported(name: &str, value: &FieldValue) -> Result<()> {
    if is_attachment(value) {
        return Err(Error::unsupported(
            name,
            "attachment fields cannot be written",
        ));
    }
    Ok(())
}
