//! In-memory marketplace backend, implements the catalog, favorite and
//! interest ports via `scc::HashMap`.
//!
//! Mirrors the REST backend's observable behavior closely enough for offline
//! CLI use and for tests: unknown ids answer 404, a repeated interest
//! request answers 400.

use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicU64, Ordering},
};

use paws_core::{
    error::ApiError,
    ports::{FavoritePort, InterestPort, PetCatalogPort},
    types::{
        AdopterSummary, ImagePayload, InterestAck, NewPet, OwnerProfile, Pet, PetId, UserId,
    },
};

#[derive(Debug, Clone)]
struct StoredPet {
    seq: u64,
    pet: Pet,
}

#[derive(Debug, Clone)]
struct StoredUser {
    username: String,
    email: Option<String>,
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status { status: 404, message: format!("{what} not found") }
}

/// Thread-safe, in-memory pet marketplace backed by [`scc::HashMap`].
///
/// Nothing survives a restart.
#[derive(Debug)]
pub struct InMemoryBackend {
    pets: scc::HashMap<PetId, StoredPet>,
    users: scc::HashMap<UserId, StoredUser>,
    favorites: scc::HashMap<UserId, BTreeSet<PetId>>,
    next_seq: AtomicU64,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pets: scc::HashMap::new(),
            users: scc::HashMap::new(),
            favorites: scc::HashMap::new(),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Insert or overwrite a pet record, keeping listing order by first insert.
    pub async fn upsert_pet(&self, pet: Pet) {
        match self.pets.entry_async(pet.id.clone()).await {
            scc::hash_map::Entry::Occupied(mut occ) => {
                occ.get_mut().pet = pet;
            }
            scc::hash_map::Entry::Vacant(vac) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                let _ = vac.insert_entry(StoredPet { seq, pet });
            }
        }
    }

    /// Register a user profile.
    pub async fn upsert_user(
        &self,
        user_id: UserId,
        username: impl Into<String>,
        email: Option<String>,
    ) {
        let user = StoredUser { username: username.into(), email };
        match self.users.entry_async(user_id).await {
            scc::hash_map::Entry::Occupied(mut occ) => {
                *occ.get_mut() = user;
            }
            scc::hash_map::Entry::Vacant(vac) => {
                let _ = vac.insert_entry(user);
            }
        }
    }

    async fn sorted_pets(&self, keep: impl Fn(&Pet) -> bool) -> Vec<Pet> {
        let mut rows = Vec::new();
        self.pets
            .scan_async(|_, stored| {
                if keep(&stored.pet) {
                    rows.push(stored.clone());
                }
            })
            .await;
        rows.sort_by_key(|row| row.seq);
        rows.into_iter().map(|row| row.pet).collect()
    }

    async fn update_pet(&self, id: &PetId, f: impl FnOnce(&mut Pet)) -> Result<(), ApiError> {
        match self.pets.entry_async(id.clone()).await {
            scc::hash_map::Entry::Occupied(mut occ) => {
                f(&mut occ.get_mut().pet);
                Ok(())
            }
            scc::hash_map::Entry::Vacant(_) => Err(not_found("Pet")),
        }
    }

    async fn pet_exists(&self, id: &PetId) -> bool {
        self.pets.read_async(id, |_, _| ()).await.is_some()
    }
}

#[async_trait::async_trait]
impl PetCatalogPort for InMemoryBackend {
    async fn list_pets(&self) -> Result<Vec<Pet>, ApiError> {
        Ok(self.sorted_pets(|_| true).await)
    }

    async fn list_owner_pets(&self, owner: &UserId) -> Result<Vec<Pet>, ApiError> {
        Ok(self.sorted_pets(|pet| &pet.owner == owner).await)
    }

    async fn owner_profile(&self, owner: &UserId) -> Result<OwnerProfile, ApiError> {
        self.users
            .read_async(owner, |id, user| OwnerProfile {
                user_id: id.clone(),
                username: user.username.clone(),
            })
            .await
            .ok_or_else(|| not_found("User"))
    }

    async fn create_pet(
        &self,
        pet: &NewPet,
        owner: &UserId,
        image: &ImagePayload,
    ) -> Result<(), ApiError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let id = PetId::new(format!("pet-{seq}"));
        let record = Pet {
            id: id.clone(),
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            age: pet.age.to_string(),
            gender: pet.gender.clone(),
            size: pet.size.clone(),
            color: pet.color.clone(),
            description: pet.description.clone(),
            available: pet.available,
            owner: owner.clone(),
            interested_adopters: Vec::new(),
            image_url: Some(format!("memory://{id}/{}", image.file_name)),
        };
        self.pets
            .insert_async(id, StoredPet { seq, pet: record })
            .await
            .map_err(|_| ApiError::Status { status: 409, message: "duplicate pet id".into() })
    }

    async fn set_availability(&self, pet: &PetId, available: bool) -> Result<(), ApiError> {
        self.update_pet(pet, |p| p.available = available).await
    }

    async fn delete_pet(&self, pet: &PetId) -> Result<(), ApiError> {
        if self.pets.remove_async(pet).await.is_none() {
            return Err(not_found("Pet"));
        }
        self.favorites
            .retain_async(|_, set| {
                set.remove(pet);
                true
            })
            .await;
        Ok(())
    }
}

#[async_trait::async_trait]
impl FavoritePort for InMemoryBackend {
    async fn toggle_favorite(&self, user: &UserId, pet: &PetId) -> Result<(), ApiError> {
        if !self.pet_exists(pet).await {
            return Err(not_found("Pet"));
        }
        match self.favorites.entry_async(user.clone()).await {
            scc::hash_map::Entry::Occupied(mut occ) => {
                let set = occ.get_mut();
                if !set.remove(pet) {
                    set.insert(pet.clone());
                }
            }
            scc::hash_map::Entry::Vacant(vac) => {
                let _ = vac.insert_entry(BTreeSet::from([pet.clone()]));
            }
        }
        Ok(())
    }

    async fn list_favorites(&self, user: &UserId) -> Result<Vec<Pet>, ApiError> {
        let ids = self.favorites.read_async(user, |_, set| set.clone()).await.unwrap_or_default();
        Ok(self.sorted_pets(|pet| ids.contains(&pet.id)).await)
    }
}

#[async_trait::async_trait]
impl InterestPort for InMemoryBackend {
    async fn express_interest(&self, user: &UserId, pet: &PetId) -> Result<InterestAck, ApiError> {
        let mut duplicate = false;
        self.update_pet(pet, |p| {
            if p.interested_adopters.contains(user) {
                duplicate = true;
            } else {
                p.interested_adopters.push(user.clone());
            }
        })
        .await?;

        if duplicate {
            return Err(ApiError::Status {
                status: 400,
                message: "already interested in this pet".into(),
            });
        }
        Ok(InterestAck { message: "Interest registered".into() })
    }

    async fn interested_adopters(&self, pet: &PetId) -> Result<Vec<AdopterSummary>, ApiError> {
        let ids = self
            .pets
            .read_async(pet, |_, stored| stored.pet.interested_adopters.clone())
            .await
            .ok_or_else(|| not_found("Pet"))?;

        let mut adopters = Vec::with_capacity(ids.len());
        for id in ids {
            let summary = self
                .users
                .read_async(&id, |_, user| AdopterSummary {
                    user_id: id.clone(),
                    username: user.username.clone(),
                    email: user.email.clone(),
                })
                .await
                .unwrap_or_else(|| AdopterSummary {
                    username: id.to_string(),
                    user_id: id.clone(),
                    email: None,
                });
            adopters.push(summary);
        }
        Ok(adopters)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
