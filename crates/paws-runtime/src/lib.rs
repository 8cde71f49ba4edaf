//! # Paws Runtime
//!
//! Client-side discovery flow for the Pawsibilities adoption marketplace.
//!
//! ## Overview
//!
//! - **Catalog**: cached pet list plus the view derived from it
//! - **Filter**: pure search/gender/color filtering
//! - **Favorites**: optimistic favorite toggling with rollback
//! - **Inference**: first-match species/breed guess from image labels
//! - **Layers**: optional deadlines on remote ports
//!
//! This crate depends **only** on [`paws_core`] port traits, never on
//! concrete adapters.
//!
//! ## Example
//!
//! ```rust,ignore
//! use paws_runtime::{DiscoveryRuntime, RuntimeBuilder};
//! use paws_core::types::{Session, UserRole};
//!
//! let runtime = RuntimeBuilder::new()
//!     .with_catalog(catalog)
//!     .with_favorites(favorites)
//!     .with_interest(interest)
//!     .with_labels(labels)
//!     .with_events(events)
//!     .with_session(Session::logged_in("user-1", UserRole::Adopter))
//!     .build()?;
//!
//! runtime.load_catalog().await?;
//! runtime.set_query("poodle");
//! let shown = runtime.visible();
//! ```

pub mod catalog;
pub mod favorites;
pub mod filter;
pub mod inference;
pub mod layers;

use std::sync::{Arc, Mutex, MutexGuard};

pub use paws_core as core;
use paws_core::{
    error::DiscoveryError,
    ports::{EventSink, FavoritePort, InterestPort, LabelSourcePort, PetCatalogPort},
    types::{
        AdopterSummary, DiscoveryEvent, FavoriteChange, FavoriteSet, ImagePayload, InterestAck,
        LabelSet, OwnerProfile, Pet, PetDraft, PetId, Session, SpeciesBreedTable, SpeciesGuess,
        UserId,
    },
};

pub use crate::{
    catalog::PetCatalog, favorites::FavoriteController, filter::filter_pets,
    inference::infer_species, layers::TimeoutLayer,
};

// ── Builder ──────────────────────────────────────────────────────────

/// Explicit wiring for a [`DiscoveryRuntime`].
#[derive(Default)]
pub struct RuntimeBuilder {
    catalog: Option<Arc<dyn PetCatalogPort>>,
    favorites: Option<Arc<dyn FavoritePort>>,
    interest: Option<Arc<dyn InterestPort>>,
    labels: Option<Arc<dyn LabelSourcePort>>,
    events: Option<Arc<dyn EventSink>>,
    session: Session,
    species: SpeciesBreedTable,
    timeout: Option<TimeoutLayer>,
}

impl std::fmt::Debug for RuntimeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeBuilder")
            .field("has_catalog", &self.catalog.is_some())
            .field("has_favorites", &self.favorites.is_some())
            .field("has_interest", &self.interest.is_some())
            .field("has_labels", &self.labels.is_some())
            .field("has_events", &self.events.is_some())
            .field("session", &self.session)
            .field("species", &self.species.entries().len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RuntimeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn PetCatalogPort>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn with_favorites(mut self, favorites: Arc<dyn FavoritePort>) -> Self {
        self.favorites = Some(favorites);
        self
    }

    #[must_use]
    pub fn with_interest(mut self, interest: Arc<dyn InterestPort>) -> Self {
        self.interest = Some(interest);
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Arc<dyn LabelSourcePort>) -> Self {
        self.labels = Some(labels);
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn with_species_table(mut self, species: SpeciesBreedTable) -> Self {
        self.species = species;
        self
    }

    #[must_use]
    pub fn with_timeout_layer(mut self, layer: TimeoutLayer) -> Self {
        self.timeout = Some(layer);
        self
    }

    /// Consume the builder and produce a ready-to-use runtime.
    ///
    /// # Errors
    /// [`DiscoveryError::Config`] when a required port is missing.
    pub fn build(self) -> Result<DiscoveryRuntime, DiscoveryError> {
        let catalog_port =
            self.catalog.ok_or_else(|| DiscoveryError::Config("missing catalog port".to_string()))?;
        let mut favorites = self
            .favorites
            .ok_or_else(|| DiscoveryError::Config("missing favorite port".to_string()))?;
        let interest = self
            .interest
            .ok_or_else(|| DiscoveryError::Config("missing interest port".to_string()))?;
        let mut labels =
            self.labels.ok_or_else(|| DiscoveryError::Config("missing label source".to_string()))?;
        let events =
            self.events.ok_or_else(|| DiscoveryError::Config("missing event sink".to_string()))?;

        if let Some(layer) = self.timeout {
            favorites = layer.wrap_favorites(favorites);
            labels = layer.wrap_labels(labels);
        }

        let favorite_ctl =
            FavoriteController::new(self.session.user_id.clone(), favorites, events.clone());

        Ok(DiscoveryRuntime {
            catalog_port,
            interest,
            labels,
            events,
            session: self.session,
            species: self.species,
            catalog: Mutex::new(PetCatalog::new()),
            favorites: favorite_ctl,
        })
    }
}

// ── Runtime ──────────────────────────────────────────────────────────

/// Result of running the image assistant over a picked image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSuggestion {
    pub guess: SpeciesGuess,
    /// Hosted copy of the uploaded image, when the backend reports one.
    pub image_url: Option<String>,
}

/// The discovery flow: catalog, filters, favorites, interest and the
/// new-pet assistant, bound to one [`Session`].
pub struct DiscoveryRuntime {
    catalog_port: Arc<dyn PetCatalogPort>,
    interest: Arc<dyn InterestPort>,
    labels: Arc<dyn LabelSourcePort>,
    events: Arc<dyn EventSink>,
    session: Session,
    species: SpeciesBreedTable,
    catalog: Mutex<PetCatalog>,
    favorites: FavoriteController,
}

impl std::fmt::Debug for DiscoveryRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryRuntime").field("session", &self.session).finish_non_exhaustive()
    }
}

impl DiscoveryRuntime {
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn species_table(&self) -> &SpeciesBreedTable {
        &self.species
    }

    fn require_user(&self) -> Result<&UserId, DiscoveryError> {
        self.session.user_id.as_ref().ok_or(DiscoveryError::NotLoggedIn)
    }

    fn catalog(&self) -> MutexGuard<'_, PetCatalog> {
        self.catalog.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ── Catalog & filters ────────────────────────────────────────

    /// Fetch the catalog and replace the local cache, keeping filters.
    ///
    /// # Errors
    /// The port error; the previous cache is kept.
    pub async fn load_catalog(&self) -> Result<usize, DiscoveryError> {
        let pets = match self.catalog_port.list_pets().await {
            Ok(pets) => pets,
            Err(err) => {
                self.events.emit(DiscoveryEvent::Error { error: err.to_string() });
                return Err(err.into());
            }
        };
        let count = pets.len();
        self.catalog().replace(pets);
        self.events.emit(DiscoveryEvent::CatalogLoaded { count });
        Ok(count)
    }

    /// Currently displayed pets.
    #[must_use]
    pub fn visible(&self) -> Vec<Pet> {
        self.catalog().visible().to_vec()
    }

    #[must_use]
    pub fn pet(&self, id: &PetId) -> Option<Pet> {
        self.catalog().get(id).cloned()
    }

    pub fn set_query(&self, query: impl Into<String>) -> usize {
        self.filter_with(|catalog| catalog.set_query(query))
    }

    pub fn set_gender(&self, gender: Option<String>) -> usize {
        self.filter_with(|catalog| catalog.set_gender(gender))
    }

    pub fn set_color(&self, color: Option<String>) -> usize {
        self.filter_with(|catalog| catalog.set_color(color))
    }

    pub fn reset_filters(&self) -> usize {
        self.filter_with(PetCatalog::reset_filters)
    }

    fn filter_with(&self, update: impl FnOnce(&mut PetCatalog)) -> usize {
        let (visible, total) = {
            let mut catalog = self.catalog();
            update(&mut catalog);
            (catalog.visible().len(), catalog.len())
        };
        self.events.emit(DiscoveryEvent::FilterApplied { visible, total });
        visible
    }

    /// Look up the owner of a cached pet.
    ///
    /// # Errors
    /// [`DiscoveryError::PetNotFound`] if the pet is not cached, or the port error.
    pub async fn owner_of(&self, pet_id: &PetId) -> Result<OwnerProfile, DiscoveryError> {
        let owner = self
            .pet(pet_id)
            .map(|p| p.owner)
            .ok_or_else(|| DiscoveryError::PetNotFound(pet_id.clone()))?;
        Ok(self.catalog_port.owner_profile(&owner).await?)
    }

    // ── Favorites ────────────────────────────────────────────────

    /// Optimistically toggle a favorite; see [`FavoriteController::toggle`].
    ///
    /// # Errors
    /// `NotLoggedIn` or `UpdateFailed` (after rollback).
    pub async fn toggle_favorite(&self, pet_id: &PetId) -> Result<FavoriteChange, DiscoveryError> {
        self.favorites.toggle(pet_id).await
    }

    #[must_use]
    pub fn favorites(&self) -> FavoriteSet {
        self.favorites.favorites()
    }

    /// Re-seed the favorite mirror from the backend.
    ///
    /// # Errors
    /// `NotLoggedIn` or the port error.
    pub async fn refresh_favorites(&self) -> Result<Vec<Pet>, DiscoveryError> {
        self.favorites.refresh().await
    }

    // ── Interest ─────────────────────────────────────────────────

    /// Register the session user as interested in a pet.
    ///
    /// # Errors
    /// `NotLoggedIn` or the port error.
    pub async fn express_interest(&self, pet_id: &PetId) -> Result<InterestAck, DiscoveryError> {
        let user_id = self.require_user()?;
        let ack = self.interest.express_interest(user_id, pet_id).await?;
        self.catalog().record_interest(pet_id, user_id);
        self.events.emit(DiscoveryEvent::InterestRecorded { pet_id: pet_id.clone() });
        Ok(ack)
    }

    /// # Errors
    /// The port error.
    pub async fn interested_adopters(
        &self,
        pet_id: &PetId,
    ) -> Result<Vec<AdopterSummary>, DiscoveryError> {
        Ok(self.interest.interested_adopters(pet_id).await?)
    }

    // ── Owner listings ───────────────────────────────────────────

    /// Pets posted by the session user.
    ///
    /// # Errors
    /// `NotLoggedIn` or the port error.
    pub async fn my_pets(&self) -> Result<Vec<Pet>, DiscoveryError> {
        let user_id = self.require_user()?;
        Ok(self.catalog_port.list_owner_pets(user_id).await?)
    }

    /// # Errors
    /// The port error; the cache is only updated on success.
    pub async fn set_availability(&self, pet_id: &PetId, available: bool) -> Result<(), DiscoveryError> {
        self.catalog_port.set_availability(pet_id, available).await?;
        self.catalog().set_availability(pet_id, available);
        Ok(())
    }

    /// # Errors
    /// The port error; the cache is only updated on success.
    pub async fn delete_pet(&self, pet_id: &PetId) -> Result<(), DiscoveryError> {
        self.catalog_port.delete_pet(pet_id).await?;
        self.catalog().remove(pet_id);
        Ok(())
    }

    // ── New-pet assistant ────────────────────────────────────────

    /// Run the heuristic over already known labels and pre-fill `draft`.
    pub fn suggest_from_labels(&self, draft: &mut PetDraft, labels: LabelSet) -> SpeciesGuess {
        let guess = infer_species(labels, &self.species);
        draft.apply_guess(&guess);
        if guess.is_match() {
            self.events.emit(DiscoveryEvent::SpeciesInferred {
                species: guess.species.clone(),
                breed: guess.breed.clone(),
            });
        } else {
            self.events.emit(DiscoveryEvent::NoLabelsMatched);
        }
        guess
    }

    /// Send `image` to the label source and pre-fill `draft` from the result.
    ///
    /// # Errors
    /// The label-source error. `draft` is untouched in that case and can
    /// still be filled in by hand and submitted.
    pub async fn suggest_for_image(
        &self,
        draft: &mut PetDraft,
        image: &ImagePayload,
    ) -> Result<DraftSuggestion, DiscoveryError> {
        let analysis = match self.labels.analyze(image).await {
            Ok(analysis) => analysis,
            Err(err) => {
                self.events.emit(DiscoveryEvent::Error { error: err.to_string() });
                return Err(err.into());
            }
        };
        self.events.emit(DiscoveryEvent::LabelsReceived { count: analysis.labels.len() });
        let guess = self.suggest_from_labels(draft, analysis.labels);
        Ok(DraftSuggestion { guess, image_url: analysis.image_url })
    }

    /// Validate `draft` and post it for the session user.
    ///
    /// # Errors
    /// `NotLoggedIn`, `InvalidDraft`, or the port error.
    pub async fn submit_pet(
        &self,
        draft: &PetDraft,
        image: &ImagePayload,
    ) -> Result<(), DiscoveryError> {
        let user_id = self.require_user()?;
        let pet = draft.validate()?;
        self.catalog_port.create_pet(&pet, user_id, image).await?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
