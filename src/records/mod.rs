//! Record transcoding
//!
//! Converts between Airtable's nested record format
//! (`{"id": "rec…", "fields": {…}}`) and flat rows, one map per row with the
//! record id carried under the reserved [`RECORD_ID_FIELD`] key.
//!
//! Attachment fields are not supported and are rejected on the way out.

mod transcode;
mod types;

pub use transcode::{from_wire, is_attachment, to_wire};
pub use types::{
    DeletedRecord, FlatRow, ListResponse, RecordsEnvelope, WireBatch, WireRecord, RECORD_ID_FIELD,
};
