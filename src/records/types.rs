//! Wire and flat record types

use crate::codec::FieldValue;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pseudo-field holding a record's Airtable id inside a flat row
pub const RECORD_ID_FIELD: &str = "at_record_id";

/// One record as a flat map of field name to value
pub type FlatRow = BTreeMap<String, FieldValue>;

/// A record in Airtable's own format
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireRecord {
    /// Assigned by Airtable; absent for records not yet created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub fields: JsonObject,
    #[serde(
        rename = "createdTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_time: Option<String>,
}

impl WireRecord {
    /// A record that does not exist remotely yet
    pub fn new(fields: JsonObject) -> Self {
        Self {
            id: None,
            fields,
            created_time: None,
        }
    }

    /// A reference to an existing record
    pub fn with_id(id: impl Into<String>, fields: JsonObject) -> Self {
        Self {
            id: Some(id.into()),
            fields,
            created_time: None,
        }
    }
}

/// A batch of wire records as accepted by create and update
///
/// New records are a bare list; updates are wrapped in a `records` container.
/// Both shapes are accepted when reading caller-supplied JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireBatch {
    Container { records: Vec<WireRecord> },
    List(Vec<WireRecord>),
}

impl WireBatch {
    /// Parse caller-supplied JSON in either shape
    pub fn from_json(value: JsonValue) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            Error::decode(format!(
                "expected a list of records or an object with 'records': {e}"
            ))
        })
    }

    pub fn records(&self) -> &[WireRecord] {
        match self {
            Self::Container { records } | Self::List(records) => records,
        }
    }

    pub fn into_records(self) -> Vec<WireRecord> {
        match self {
            Self::Container { records } | Self::List(records) => records,
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// One page of a list-records response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub records: Vec<WireRecord>,
    /// Present while more pages remain
    #[serde(default)]
    pub offset: Option<String>,
}

/// `{"records": [...]}` body shared by write responses and request payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

impl<T> RecordsEnvelope<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }
}

/// Entry of a delete response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedRecord {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
}
