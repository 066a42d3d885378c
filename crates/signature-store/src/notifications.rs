//! Append-only notification log for the administrator

use tracing::warn;

use shared_types::Notification;

use crate::blob::BlobStore;
use crate::error::StoreError;

/// Well-known key for the notification log.
pub const NOTIFICATIONS_KEY: &str = "notifications";

/// List logged notifications, oldest first. An unparseable log degrades to
/// empty, same as the signature book.
pub fn list_notifications(store: &dyn BlobStore) -> Result<Vec<Notification>, StoreError> {
    let Some(bytes) = store.get(NOTIFICATIONS_KEY)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_slice(&bytes) {
        Ok(log) => Ok(log),
        Err(e) => {
            warn!("notification log failed to parse, starting empty: {}", e);
            Ok(Vec::new())
        }
    }
}

/// Append one entry and persist the whole log.
pub fn append_notification(
    store: &dyn BlobStore,
    notification: Notification,
) -> Result<(), StoreError> {
    let mut log = list_notifications(store)?;
    log.push(notification);
    store.put(NOTIFICATIONS_KEY, &serde_json::to_vec(&log)?)
}

/// Wholesale clear on acknowledgment.
pub fn clear_notifications(store: &dyn BlobStore) -> Result<(), StoreError> {
    store.put(NOTIFICATIONS_KEY, b"[]")
}
