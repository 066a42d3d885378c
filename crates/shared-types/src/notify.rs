//! Admin-facing log of signing events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roster::ResidentId;

/// One entry in the append-only signing event log.
///
/// The log is advisory: it exists so the administrator notices new signatures
/// between visits, and it is cleared wholesale on acknowledgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    /// The event recorded when a resident completes the signing flow.
    pub fn signed(resident_id: ResidentId, full_name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message: format!("Apartment {} - {} signed", resident_id, full_name),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_message_names_apartment_and_resident() {
        let n = Notification::signed(ResidentId::new(7).unwrap(), "Jane Doe");
        assert_eq!(n.message, "Apartment 7 - Jane Doe signed");
    }

    #[test]
    fn test_notification_ids_are_unique() {
        let id = ResidentId::new(1).unwrap();
        let a = Notification::signed(id, "A");
        let b = Notification::signed(id, "A");
        assert_ne!(a.id, b.id);
    }
}
