//! # Tracing Event Sink
//!
//! Implements [`EventSink`] via the `tracing` crate.
//!
//! Events are emitted at these levels:
//! - `DEBUG`: filter recomputation (fires on every keystroke in a UI)
//! - `INFO`: catalog loads, favorite and interest changes, label results
//! - `WARN`: favorite rollbacks
//! - `ERROR`: surfaced failures
//!
//! ```text
//! 2026-10-17T10:30:00Z  INFO catalog loaded count=42
//! 2026-10-17T10:30:02Z  INFO favorite toggled pet_id=64f1 favorite=true
//! 2026-10-17T10:30:03Z  WARN favorite reverted pet_id=64f1 favorite=false error="unexpected status 500: boom"
//! ```
//!
//! This module is only available when the `observe-tracing` feature is enabled (default).

use paws_core::{ports::EventSink, types::DiscoveryEvent};

/// Event sink that emits [`DiscoveryEvent`]s as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn emit(&self, event: DiscoveryEvent) {
        match event {
            DiscoveryEvent::CatalogLoaded { count } => {
                tracing::info!(count, "catalog loaded");
            }
            DiscoveryEvent::FilterApplied { visible, total } => {
                tracing::debug!(visible, total, "filter applied");
            }
            DiscoveryEvent::FavoriteToggled { pet_id, favorite } => {
                tracing::info!(pet_id = %pet_id, favorite, "favorite toggled");
            }
            DiscoveryEvent::FavoriteConfirmed { pet_id, favorite } => {
                tracing::debug!(pet_id = %pet_id, favorite, "favorite confirmed");
            }
            DiscoveryEvent::FavoriteReverted { pet_id, favorite, error } => {
                tracing::warn!(pet_id = %pet_id, favorite, error = %error, "favorite reverted");
            }
            DiscoveryEvent::InterestRecorded { pet_id } => {
                tracing::info!(pet_id = %pet_id, "interest recorded");
            }
            DiscoveryEvent::LabelsReceived { count } => {
                tracing::info!(count, "image labels received");
            }
            DiscoveryEvent::SpeciesInferred { species, breed } => {
                tracing::info!(species = %species, breed = %breed, "species inferred");
            }
            DiscoveryEvent::NoLabelsMatched => {
                tracing::info!("no label matched a known species");
            }
            DiscoveryEvent::Error { error } => {
                tracing::error!(error = %error, "discovery error");
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use paws_core::types::PetId;

    use super::*;

    #[test]
    fn emit_all_variants_no_panic() {
        let sink = TracingEventSink::new();

        let events = vec![
            DiscoveryEvent::CatalogLoaded { count: 3 },
            DiscoveryEvent::FilterApplied { visible: 1, total: 3 },
            DiscoveryEvent::FavoriteToggled { pet_id: PetId::from("p1"), favorite: true },
            DiscoveryEvent::FavoriteConfirmed { pet_id: PetId::from("p1"), favorite: true },
            DiscoveryEvent::FavoriteReverted {
                pet_id: PetId::from("p1"),
                favorite: false,
                error: "timeout".into(),
            },
            DiscoveryEvent::InterestRecorded { pet_id: PetId::from("p2") },
            DiscoveryEvent::LabelsReceived { count: 4 },
            DiscoveryEvent::SpeciesInferred { species: "dog".into(), breed: "Beagle".into() },
            DiscoveryEvent::NoLabelsMatched,
            DiscoveryEvent::Error { error: "something went wrong".into() },
        ];

        for event in events {
            sink.emit(event);
        }
    }

    #[test]
    fn is_object_safe_as_event_sink() {
        let sink: Arc<dyn EventSink> = Arc::new(TracingEventSink::new());
        sink.emit(DiscoveryEvent::NoLabelsMatched);
    }
}
