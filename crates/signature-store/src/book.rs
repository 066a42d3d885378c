//! The signature book: one serialized mapping under one well-known key

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use tracing::warn;

use shared_types::{ResidentId, SignatureBook, SignatureRecord};

use crate::blob::BlobStore;
use crate::error::StoreError;

/// Well-known key the whole book is persisted under. Versioned so that data
/// written with an older indexing convention is never silently misread.
pub const SIGNATURES_KEY: &str = "apartment_signatures_v2";

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Load the full book into memory.
///
/// The store is advisory: a missing or unparseable blob yields an empty book
/// rather than an error, and records keyed outside the roster are dropped.
pub fn load_book(store: &dyn BlobStore) -> Result<SignatureBook, StoreError> {
    let Some(bytes) = store.get(SIGNATURES_KEY)? else {
        return Ok(SignatureBook::new());
    };

    let raw: BTreeMap<u32, SignatureRecord> = match serde_json::from_slice(&bytes) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("signature book failed to parse, starting empty: {}", e);
            return Ok(SignatureBook::new());
        }
    };

    let mut book = SignatureBook::new();
    for (key, record) in raw {
        match ResidentId::new(key) {
            Ok(id) => {
                book.insert(id, record);
            }
            Err(e) => warn!("dropping signature record with invalid key: {}", e),
        }
    }
    Ok(book)
}

/// Persist the whole book as one blob. Last writer wins.
pub fn save_book(store: &dyn BlobStore, book: &SignatureBook) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(book)?;
    store.put(SIGNATURES_KEY, &bytes)
}

/// What the signing flow hands over: form fields plus the trimmed signature
/// raster produced by the capture surface.
#[derive(Debug, Clone)]
pub struct SignatureSubmission {
    pub resident_id: ResidentId,
    pub full_name: String,
    pub date_value: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// PNG bytes of the trimmed signature.
    pub signature_png: Vec<u8>,
}

/// The upsert protocol: validate, build the record, replace any previous
/// record for this resident, persist the whole book.
///
/// Validation failures leave both the in-memory book and the store untouched.
/// A storage failure after the insert is reported, but the in-memory book
/// keeps the new record for the rest of the session (best-effort policy).
pub fn record_signature(
    book: &mut SignatureBook,
    store: &dyn BlobStore,
    submission: SignatureSubmission,
) -> Result<SignatureRecord, StoreError> {
    let full_name = submission.full_name.trim();
    if full_name.is_empty() {
        return Err(StoreError::Validation("full name is required".into()));
    }
    if submission.date_value.trim().is_empty() {
        return Err(StoreError::Validation("date is required".into()));
    }
    if submission.signature_png.is_empty() {
        return Err(StoreError::Validation("signature is required".into()));
    }
    if !submission.signature_png.starts_with(&PNG_MAGIC) {
        return Err(StoreError::Validation(
            "signature image is not a PNG".into(),
        ));
    }

    let record = SignatureRecord {
        resident_id: submission.resident_id,
        full_name: full_name.to_string(),
        date_value: submission.date_value.trim().to_string(),
        email: normalize_optional(submission.email),
        phone: normalize_optional(submission.phone),
        signature_png: BASE64.encode(&submission.signature_png),
        signed_at: Utc::now(),
    };

    book.insert(submission.resident_id, record.clone());
    save_book(store, book)?;

    Ok(record)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use capture_core::{PointerPoint, SignatureCanvas};
    use pretty_assertions::assert_eq;

    fn drawn_signature() -> Vec<u8> {
        let mut canvas = SignatureCanvas::new();
        canvas.begin(PointerPoint::new(100.0, 60.0));
        canvas.extend(PointerPoint::new(500.0, 220.0));
        canvas.end();
        canvas.to_trimmed_image().unwrap()
    }

    fn submission(id: u32) -> SignatureSubmission {
        SignatureSubmission {
            resident_id: ResidentId::new(id).unwrap(),
            full_name: "Jane Doe".to_string(),
            date_value: "2024-01-15".to_string(),
            email: None,
            phone: None,
            signature_png: drawn_signature(),
        }
    }

    #[test]
    fn test_load_missing_blob_is_empty_book() {
        let store = MemoryBlobStore::new();
        assert!(load_book(&store).unwrap().is_empty());
    }

    #[test]
    fn test_load_garbage_blob_degrades_to_empty() {
        let store = MemoryBlobStore::new();
        store.put(SIGNATURES_KEY, b"{not json").unwrap();
        assert!(load_book(&store).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_keys_are_dropped_on_load() {
        let store = MemoryBlobStore::new();
        let mut book = SignatureBook::new();
        let record = record_signature(&mut book, &store, submission(5)).unwrap();

        // splice an out-of-range entry into the persisted blob
        let mut raw: serde_json::Value =
            serde_json::from_slice(&store.get(SIGNATURES_KEY).unwrap().unwrap()).unwrap();
        let mut bad = serde_json::to_value(&record).unwrap();
        bad["residentId"] = serde_json::json!(99);
        raw["99"] = bad;
        store
            .put(SIGNATURES_KEY, raw.to_string().as_bytes())
            .unwrap();

        let loaded = load_book(&store).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key(&ResidentId::new(5).unwrap()));
    }

    #[test]
    fn test_record_signature_persists_and_reloads() {
        let store = MemoryBlobStore::new();
        let mut book = SignatureBook::new();
        let record = record_signature(&mut book, &store, submission(5)).unwrap();

        assert_eq!(record.full_name, "Jane Doe");
        assert_eq!(record.date_value, "2024-01-15");
        assert!(!record.signature_png.is_empty());

        let reloaded = load_book(&store).unwrap();
        assert_eq!(reloaded, book);
    }

    #[test]
    fn test_upsert_is_idempotent_with_later_timestamp() {
        let store = MemoryBlobStore::new();
        let mut book = SignatureBook::new();

        let first = record_signature(&mut book, &store, submission(5)).unwrap();
        let second = record_signature(&mut book, &store, submission(5)).unwrap();

        assert_eq!(book.len(), 1);
        assert!(second.signed_at >= first.signed_at);

        let stored = &book[&ResidentId::new(5).unwrap()];
        assert_eq!(stored.signed_at, second.signed_at);
    }

    #[test]
    fn test_resigning_replaces_whole_record() {
        let store = MemoryBlobStore::new();
        let mut book = SignatureBook::new();
        record_signature(&mut book, &store, submission(5)).unwrap();

        let mut replacement = submission(5);
        replacement.full_name = "John Doe".to_string();
        replacement.phone = Some("050-1234567".to_string());
        record_signature(&mut book, &store, replacement).unwrap();

        let stored = &book[&ResidentId::new(5).unwrap()];
        assert_eq!(stored.full_name, "John Doe");
        assert_eq!(stored.phone.as_deref(), Some("050-1234567"));
    }

    #[test]
    fn test_missing_name_fails_validation_and_store_untouched() {
        let store = MemoryBlobStore::new();
        let mut book = SignatureBook::new();

        let mut bad = submission(5);
        bad.full_name = "   ".to_string();
        let err = record_signature(&mut book, &store, bad).unwrap_err();

        assert!(err.is_validation());
        assert!(book.is_empty());
        assert_eq!(store.get(SIGNATURES_KEY).unwrap(), None);
    }

    #[test]
    fn test_missing_date_fails_validation() {
        let store = MemoryBlobStore::new();
        let mut book = SignatureBook::new();

        let mut bad = submission(5);
        bad.date_value = String::new();
        assert!(record_signature(&mut book, &store, bad)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_empty_signature_fails_validation() {
        let store = MemoryBlobStore::new();
        let mut book = SignatureBook::new();

        let mut bad = submission(5);
        bad.signature_png = Vec::new();
        assert!(record_signature(&mut book, &store, bad)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_non_png_signature_fails_validation() {
        let store = MemoryBlobStore::new();
        let mut book = SignatureBook::new();

        let mut bad = submission(5);
        bad.signature_png = b"<svg></svg>".to_vec();
        assert!(record_signature(&mut book, &store, bad)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_signed_scenario_resident_five() {
        // id=5, "Jane Doe", "2024-01-15", diagonal stroke
        let store = MemoryBlobStore::new();
        let mut book = SignatureBook::new();
        record_signature(&mut book, &store, submission(5)).unwrap();

        let record = &book[&ResidentId::new(5).unwrap()];
        assert_eq!(record.full_name, "Jane Doe");
        assert_eq!(record.date_value, "2024-01-15");

        // the stored image decodes back to a non-degenerate trimmed raster
        let png = BASE64.decode(&record.signature_png).unwrap();
        let decoded = image_dimensions(&png);
        assert!(decoded.0 > 1 && decoded.1 > 1);
    }

    fn image_dimensions(png: &[u8]) -> (u32, u32) {
        // width/height live in the PNG IHDR chunk at fixed offsets
        let w = u32::from_be_bytes(png[16..20].try_into().unwrap());
        let h = u32::from_be_bytes(png[20..24].try_into().unwrap());
        (w, h)
    }
}
