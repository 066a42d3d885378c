//! The uploaded base document

use crate::blob::BlobStore;
use crate::error::StoreError;

/// Well-known key the uploaded PDF is stored under.
pub const BASE_DOCUMENT_KEY: &str = "uploaded-pdf";

/// Upload cap, matching what the admin upload form promises.
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

const PDF_HEADER: &[u8] = b"%PDF-";

/// Store the uploaded base document after checking it looks like a PDF and
/// fits the size cap. The blob is read-only to the rest of the system; the
/// assembler composes a new document and never mutates this one.
pub fn save_base_document(store: &dyn BlobStore, bytes: &[u8]) -> Result<(), StoreError> {
    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(StoreError::Validation(format!(
            "document is {} bytes, maximum is {}",
            bytes.len(),
            MAX_DOCUMENT_BYTES
        )));
    }
    if !bytes.starts_with(PDF_HEADER) {
        return Err(StoreError::Validation(
            "only PDF documents are accepted".into(),
        ));
    }
    store.put(BASE_DOCUMENT_KEY, bytes)
}

pub fn load_base_document(store: &dyn BlobStore) -> Result<Option<Vec<u8>>, StoreError> {
    store.get(BASE_DOCUMENT_KEY)
}
