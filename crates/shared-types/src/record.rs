//! Persisted signature records and the in-memory signature book

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roster::ResidentId;

/// The persisted result of one resident's signing action.
///
/// At most one record exists per resident; re-signing overwrites the previous
/// record wholesale (no history, no partial-field merge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    pub resident_id: ResidentId,
    pub full_name: String,
    pub date_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Base64-encoded PNG of the trimmed signature raster.
    pub signature_png: String,
    pub signed_at: DateTime<Utc>,
}

/// All collected signatures, keyed by resident id.
///
/// A `BTreeMap` so that any iteration over the book itself is ordered; the
/// assembler nevertheless iterates the roster, not the book.
pub type SignatureBook = BTreeMap<ResidentId, SignatureRecord>;
