//! Pet Catalog Store.
//!
//! Holds the full fetched pet list and the view derived from it by the
//! [filter engine](crate::filter). Every mutation recomputes the view; the
//! view itself is never edited directly.

use paws_core::types::{FilterCriteria, Pet, PetId, UserId};

use crate::filter::filter_pets;

/// Client-side cache of the pet catalog plus its filtered view.
#[derive(Debug, Clone, Default)]
pub struct PetCatalog {
    pets: Vec<Pet>,
    criteria: FilterCriteria,
    visible: Vec<Pet>,
}

impl PetCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already fetched pets, with no filters.
    #[must_use]
    pub fn with_pets(pets: Vec<Pet>) -> Self {
        let mut catalog = Self::new();
        catalog.replace(pets);
        catalog
    }

    /// Replace the whole catalog, keeping the current criteria.
    pub fn replace(&mut self, pets: Vec<Pet>) {
        self.pets = pets;
        self.refresh();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.criteria.query = query.into();
        self.refresh();
    }

    pub fn set_gender(&mut self, gender: Option<String>) {
        self.criteria.gender = gender;
        self.refresh();
    }

    pub fn set_color(&mut self, color: Option<String>) {
        self.criteria.color = color;
        self.refresh();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    /// Clear the search box and both pickers.
    pub fn reset_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    #[must_use]
    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    #[must_use]
    pub fn visible(&self) -> &[Pet] {
        &self.visible
    }

    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn get(&self, id: &PetId) -> Option<&Pet> {
        self.pets.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    /// Mirror a successful availability update. Returns `false` if unknown.
    pub fn set_availability(&mut self, id: &PetId, available: bool) -> bool {
        let found = self.update(id, |pet| pet.available = available);
        if found {
            self.refresh();
        }
        found
    }

    /// Mirror a successful interest request. Returns `false` if unknown.
    pub fn record_interest(&mut self, id: &PetId, adopter: &UserId) -> bool {
        let found = self.update(id, |pet| {
            if !pet.interested_adopters.contains(adopter) {
                pet.interested_adopters.push(adopter.clone());
            }
        });
        if found {
            self.refresh();
        }
        found
    }

    /// Drop a deleted pet. Returns the removed record, if any.
    pub fn remove(&mut self, id: &PetId) -> Option<Pet> {
        let index = self.pets.iter().position(|p| &p.id == id)?;
        let removed = self.pets.remove(index);
        self.refresh();
        Some(removed)
    }

    fn update(&mut self, id: &PetId, f: impl FnOnce(&mut Pet)) -> bool {
        match self.pets.iter_mut().find(|p| &p.id == id) {
            Some(pet) => {
                f(pet);
                true
            }
            None => false,
        }
    }

    fn refresh(&mut self) {
        self.visible = filter_pets(&self.pets, &self.criteria);
    }
}

// ── Tests ────────────────────────────────────────────────────────────
