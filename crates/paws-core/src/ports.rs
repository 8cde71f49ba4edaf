//! Hexagonal port traits for the Pawsibilities discovery core.
//!
//! These are the external collaborators the core talks to: the pet catalog
//! backend, the favorite and interest endpoints, the image-label source and
//! an observability sink. All async traits use `async_trait` for
//! dyn-compatibility.

use crate::{
    error::ApiError,
    types::{
        AdopterSummary, DiscoveryEvent, ImagePayload, InterestAck, LabelAnalysis, NewPet,
        OwnerProfile, Pet, PetId, UserId,
    },
};

// ── Catalog Port ─────────────────────────────────────────────────────

/// Port for reading and managing pet records.
#[async_trait::async_trait]
pub trait PetCatalogPort: Send + Sync {
    /// Fetch every pet listed for adoption.
    async fn list_pets(&self) -> Result<Vec<Pet>, ApiError>;

    /// Fetch the pets posted by one owner.
    async fn list_owner_pets(&self, owner: &UserId) -> Result<Vec<Pet>, ApiError>;

    /// Look up the public profile of an owner.
    async fn owner_profile(&self, owner: &UserId) -> Result<OwnerProfile, ApiError>;

    /// Post a new pet with its picture.
    async fn create_pet(
        &self,
        pet: &NewPet,
        owner: &UserId,
        image: &ImagePayload,
    ) -> Result<(), ApiError>;

    /// Mark a pet available or adopted.
    async fn set_availability(&self, pet: &PetId, available: bool) -> Result<(), ApiError>;

    /// Remove a pet listing.
    async fn delete_pet(&self, pet: &PetId) -> Result<(), ApiError>;
}

// ── Favorite Port ────────────────────────────────────────────────────

/// Port for the remote favorite set.
#[async_trait::async_trait]
pub trait FavoritePort: Send + Sync {
    /// Flip the favorite flag of `pet` for `user`. Only ok / not-ok matters.
    async fn toggle_favorite(&self, user: &UserId, pet: &PetId) -> Result<(), ApiError>;

    /// Fetch the pets `user` has favorited.
    async fn list_favorites(&self, user: &UserId) -> Result<Vec<Pet>, ApiError>;
}

// ── Interest Port ────────────────────────────────────────────────────

/// Port for adopter interest requests.
#[async_trait::async_trait]
pub trait InterestPort: Send + Sync {
    /// Register `user` as interested in `pet`.
    async fn express_interest(&self, user: &UserId, pet: &PetId) -> Result<InterestAck, ApiError>;

    /// List the adopters interested in `pet`.
    async fn interested_adopters(&self, pet: &PetId) -> Result<Vec<AdopterSummary>, ApiError>;
}

// ── Label Source ─────────────────────────────────────────────────────

/// Port for the external image classifier.
#[async_trait::async_trait]
pub trait LabelSourcePort: Send + Sync {
    /// Upload an image and return the labels the classifier produced.
    async fn analyze(&self, image: &ImagePayload) -> Result<LabelAnalysis, ApiError>;
}

// ── Event Sink ───────────────────────────────────────────────────────

/// Port for emitting observability events (fire-and-forget).
pub trait EventSink: Send + Sync {
    /// Emit a discovery event. Must not block.
    fn emit(&self, event: DiscoveryEvent);
}

// ── Tests ────────────────────────────────────────────────────────────
