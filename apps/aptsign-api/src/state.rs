//! Application state for the Aptsign API

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use anyhow::Result;
use tracing::info;

use shared_types::{Roster, SignatureBook};
use signature_store::{load_book, BlobStore, FileBlobStore};

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    /// Shared admin password. Informational gating only, not a security
    /// boundary: it is compared in plaintext and shipped to every operator.
    pub admin_password: String,
    /// Base URL used when generating signing links.
    pub public_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        Self {
            port,
            data_dir: std::env::var("APTSIGN_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            admin_password: std::env::var("APTSIGN_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123".to_string()),
            public_url: std::env::var("APTSIGN_PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
        }
    }
}

pub struct AppState {
    pub config: Config,
    pub roster: Roster,
    pub blobs: Box<dyn BlobStore>,
    /// The signature book, loaded fully into memory on startup and persisted
    /// through `blobs` after every mutation.
    pub book: RwLock<SignatureBook>,
    /// Tokens minted by the admin login, valid for the process lifetime.
    pub admin_tokens: RwLock<HashSet<String>>,
    /// Reentrancy guard: only one export runs at a time.
    pub export_guard: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let blobs = FileBlobStore::open(&config.data_dir)?;
        Self::with_store(config, Box::new(blobs))
    }

    /// Build state on top of any blob store (tests use the in-memory one).
    pub fn with_store(config: Config, blobs: Box<dyn BlobStore>) -> Result<Self> {
        let book = load_book(blobs.as_ref())?;
        info!("loaded signature book with {} records", book.len());

        Ok(Self {
            config,
            roster: Roster::building(),
            blobs,
            book: RwLock::new(book),
            admin_tokens: RwLock::new(HashSet::new()),
            export_guard: Mutex::new(()),
        })
    }
}
