//! Persistence for collected signatures
//!
//! Everything the system stores goes through one generic key-value blob
//! store: the signature book (a single serialized mapping), the uploaded base
//! document, and the notification log. The store is advisory rather than
//! transactional - a book that fails to parse degrades to an empty book
//! instead of failing the caller.

pub mod blob;
pub mod book;
pub mod document;
pub mod error;
pub mod notifications;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use book::{load_book, record_signature, save_book, SignatureSubmission, SIGNATURES_KEY};
pub use document::{
    load_base_document, save_base_document, BASE_DOCUMENT_KEY, MAX_DOCUMENT_BYTES,
};
pub use error::StoreError;
pub use notifications::{
    append_notification, clear_notifications, list_notifications, NOTIFICATIONS_KEY,
};
