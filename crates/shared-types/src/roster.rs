//! The fixed roster of apartments and the resident identifier convention
//!
//! Resident ids are ONE-BASED everywhere: storage keys, the `?apt=` URL
//! parameter, API paths and assembly order all speak the same `1..=N` ids.
//! The zero-based form only exists as `ResidentId::index` for vector lookups.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of apartments eligible to sign.
pub const ROSTER_SIZE: u32 = 32;

/// One-based apartment identifier, valid range `1..=ROSTER_SIZE`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ResidentId(u32);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResidentIdError {
    #[error("resident id is not a number: {0:?}")]
    NotANumber(String),

    #[error("resident id {0} is outside 1..={ROSTER_SIZE}")]
    OutOfRange(u32),
}

impl ResidentId {
    pub fn new(id: u32) -> Result<Self, ResidentIdError> {
        if (1..=ROSTER_SIZE).contains(&id) {
            Ok(Self(id))
        } else {
            Err(ResidentIdError::OutOfRange(id))
        }
    }

    /// Parse the textual form carried by the `?apt=` query parameter.
    pub fn parse(raw: &str) -> Result<Self, ResidentIdError> {
        let id: u32 = raw
            .trim()
            .parse()
            .map_err(|_| ResidentIdError::NotANumber(raw.to_string()))?;
        Self::new(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based position of this resident in the roster.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl std::fmt::Display for ResidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One roster entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resident {
    pub id: ResidentId,
    pub label: String,
}

/// The fixed, ordered list of residents eligible to sign.
///
/// Immutable after construction; iteration order is roster order, which is
/// what makes assembly output reproducible.
#[derive(Debug, Clone)]
pub struct Roster {
    residents: Vec<Resident>,
}

impl Roster {
    /// The whole building, apartments `1..=ROSTER_SIZE`.
    pub fn building() -> Self {
        let residents = (1..=ROSTER_SIZE)
            .map(|n| Resident {
                id: ResidentId(n),
                label: format!("Apartment {}", n),
            })
            .collect();
        Self { residents }
    }

    pub fn len(&self) -> usize {
        self.residents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resident> {
        self.residents.iter()
    }

    pub fn get(&self, id: ResidentId) -> Option<&Resident> {
        self.residents.get(id.index())
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::building()
    }
}
