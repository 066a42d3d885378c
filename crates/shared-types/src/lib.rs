pub mod notify;
pub mod record;
pub mod roster;

pub use notify::Notification;
pub use record::{SignatureBook, SignatureRecord};
pub use roster::{Resident, ResidentId, ResidentIdError, Roster, ROSTER_SIZE};
