//! Paws Core: domain types and port traits
//!
//! This crate defines the hexagonal boundary of the Pawsibilities discovery
//! core: domain types, error types, the text matching rules, and the port
//! traits that adapters implement.
//!
//! **No concrete implementations live here**, only contracts.

// ── Modules ──────────────────────────────────────────────────────────

pub mod error;
pub mod matching;
pub mod ports;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────

pub use error::{ApiError, DiscoveryError, DraftError};
pub use matching::{any_label_contains, contains_ignore_case, eq_ignore_case};
pub use ports::{EventSink, FavoritePort, InterestPort, LabelSourcePort, PetCatalogPort};
pub use types::*;
