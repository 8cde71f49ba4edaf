//! # Domain Types
//!
//! Domain types for the Pawsibilities discovery core.
//!
//! - **Identity**: `PetId`, `UserId`, `UserRole`, `Session`
//! - **Catalog**: `Pet`, `FilterCriteria`, `OwnerProfile`, `AdopterSummary`
//! - **Favorites**: `FavoriteSet`, `PendingToggle`, `ToggleOutcome`, `FavoriteChange`
//! - **Inference**: `LabelSet`, `LabelAnalysis`, `SpeciesBreedTable`, `SpeciesGuess`
//! - **Submission**: `PetDraft`, `NewPet`, `ImagePayload`
//! - **Events**: `DiscoveryEvent`
//!
//! Wire shapes live in the adapters; everything here is the validated,
//! backend-agnostic representation.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::error::DraftError;

// ── Identifiers ──────────────────────────────────────────────────────

/// Opaque pet identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(String);

impl PetId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque user identifier (owner or adopter).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// Marketplace role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Adopter,
}

/// Explicit session handed to the runtime at construction.
///
/// `user_id == None` means nobody is logged in; operations that write on
/// behalf of a user refuse to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Option<UserId>,
    pub role: Option<UserRole>,
}

impl Session {
    /// A session with no logged-in user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn logged_in(user_id: impl Into<UserId>, role: UserRole) -> Self {
        Self { user_id: Some(user_id.into()), role: Some(role) }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }
}

// ── Catalog ──────────────────────────────────────────────────────────

/// One adoptable animal, as cached by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: String,
    pub gender: String,
    pub size: String,
    pub color: String,
    pub description: String,
    pub available: bool,
    pub owner: UserId,
    #[serde(default)]
    pub interested_adopters: Vec<UserId>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Search box plus category pickers.
///
/// Empty strings are equivalent to "no constraint" on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: String,
    pub gender: Option<String>,
    pub color: Option<String>,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// The text query, or `None` when it is empty.
    #[must_use]
    pub fn active_query(&self) -> Option<&str> {
        Some(self.query.as_str()).filter(|q| !q.is_empty())
    }

    /// The gender constraint, or `None` when absent or empty.
    #[must_use]
    pub fn active_gender(&self) -> Option<&str> {
        self.gender.as_deref().filter(|g| !g.is_empty())
    }

    /// The color constraint, or `None` when absent or empty.
    #[must_use]
    pub fn active_color(&self) -> Option<&str> {
        self.color.as_deref().filter(|c| !c.is_empty())
    }

    /// Returns `true` when no axis constrains the result.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_query().is_none() && self.active_gender().is_none() && self.active_color().is_none()
    }
}

/// Public profile of a pet owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerProfile {
    pub user_id: UserId,
    pub username: String,
}

/// An adopter who expressed interest in a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdopterSummary {
    pub user_id: UserId,
    pub username: String,
    pub email: Option<String>,
}

/// Backend confirmation after an interest request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestAck {
    pub message: String,
}

// ── Favorites ────────────────────────────────────────────────────────

/// The adopter's local mirror of favorited pet ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    ids: BTreeSet<PetId>,
}

/// First phase of a favorite toggle: the tentative change already applied
/// to a [`FavoriteSet`], waiting for the remote verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggle {
    pub pet_id: PetId,
    pub was_favorite: bool,
    pub now_favorite: bool,
}

/// Remote verdict used to settle a [`PendingToggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Confirmed,
    Rejected,
}

/// Result of a confirmed toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteChange {
    pub pet_id: PetId,
    pub favorite: bool,
}

impl FavoriteSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, pet_id: &PetId) -> bool {
        self.ids.contains(pet_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PetId> {
        self.ids.iter()
    }

    /// Flip membership of `pet_id` and return the pending record needed to
    /// confirm or revert it.
    pub fn begin_toggle(&mut self, pet_id: &PetId) -> PendingToggle {
        let was_favorite = self.contains(pet_id);
        self.set_membership(pet_id, !was_favorite);
        PendingToggle { pet_id: pet_id.clone(), was_favorite, now_favorite: !was_favorite }
    }

    /// Settle a pending toggle and return the resulting membership.
    ///
    /// Only `pending.pet_id` is touched. When several toggles on the same id
    /// are in flight, the last one settled decides the final membership.
    pub fn settle(&mut self, pending: &PendingToggle, outcome: ToggleOutcome) -> bool {
        let favorite = match outcome {
            ToggleOutcome::Confirmed => pending.now_favorite,
            ToggleOutcome::Rejected => pending.was_favorite,
        };
        self.set_membership(&pending.pet_id, favorite);
        favorite
    }

    fn set_membership(&mut self, pet_id: &PetId, favorite: bool) {
        if favorite {
            self.ids.insert(pet_id.clone());
        } else {
            self.ids.remove(pet_id);
        }
    }
}

impl FromIterator<PetId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = PetId>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}

// ── Inference ────────────────────────────────────────────────────────

/// Free-text labels produced by the image classifier for one image.
pub type LabelSet = Vec<String>;

/// Response of the image-label source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelAnalysis {
    /// Where the backend stored the uploaded image, if it reports it.
    pub image_url: Option<String>,
    pub labels: LabelSet,
}

/// One species row of a [`SpeciesBreedTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    pub name: String,
    pub breeds: Vec<String>,
}

/// Ordered species → breeds reference table.
///
/// Row order and breed order are both significant: inference takes the
/// first matching entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesBreedTable {
    entries: Vec<SpeciesEntry>,
}

const DEFAULT_TABLE: &[(&str, &[&str])] = &[
    (
        "dog",
        &[
            "Labrador Retriever",
            "German Shepherd",
            "Golden Retriever",
            "Bulldog",
            "Poodle",
            "Husky",
            "Shih-Tzu",
            "Beagle",
            "Boxer",
            "Chihuahua",
            "Dachshund",
            "Rottweiler",
            "Cocker Spaniel",
            "Doberman",
            "Pomeranian",
            "Schnauzer",
            "Border Collie",
            "Yorkshire Terrier",
            "French Bulldog",
        ],
    ),
    (
        "cat",
        &[
            "Persian",
            "Maine Coon",
            "Siamese",
            "Ragdoll",
            "Bengal",
            "British Shorthair",
            "Abyssinian",
            "Sphynx",
            "Scottish Fold",
            "Russian Blue",
        ],
    ),
    (
        "rabbit",
        &[
            "Netherland Dwarf",
            "Lionhead",
            "Rex",
            "Flemish Giant",
            "Himalayan",
            "Holland Lop",
            "Mini Rex",
            "English Angora",
            "Mini Lop",
        ],
    ),
    (
        "bird",
        &[
            "Parrot",
            "Canary",
            "Cockatiel",
            "Budgerigar",
            "Macaw",
            "Finch",
            "Pigeon",
            "Lovebird",
            "Cockatoo",
            "Conure",
            "African Grey",
            "Quaker Parrot",
        ],
    ),
    (
        "fish",
        &[
            "Goldfish",
            "Betta Fish",
            "Guppy",
            "Angelfish",
            "Cichlid",
            "Neon Tetra",
            "Oscar",
            "Platies",
            "Tetra",
            "Barbs",
            "Koi",
            "Discus",
            "Rainbow Fish",
        ],
    ),
    (
        "reptile",
        &[
            "Turtle",
            "Iguana",
            "Gecko",
            "Chameleon",
            "Bearded Dragon",
            "Snake",
            "Crocodile",
            "Alligator",
            "Lizard",
            "Anole",
            "Skink",
        ],
    ),
    ("hamster", &["Syrian Hamster", "Dwarf Hamster", "Roborovski Hamster", "Campbell's Hamster"]),
];

impl Default for SpeciesBreedTable {
    fn default() -> Self {
        Self::from_entries(DEFAULT_TABLE.iter().map(|(name, breeds)| SpeciesEntry {
            name: (*name).to_string(),
            breeds: breeds.iter().map(|b| (*b).to_string()).collect(),
        }))
    }
}

impl SpeciesBreedTable {
    /// Build a table from rows in declared order.
    #[must_use]
    pub fn from_entries<I: IntoIterator<Item = SpeciesEntry>>(entries: I) -> Self {
        Self { entries: entries.into_iter().collect() }
    }

    #[must_use]
    pub fn entries(&self) -> &[SpeciesEntry] {
        &self.entries
    }

    /// Breeds of `species` in declared order (exact name match).
    #[must_use]
    pub fn breeds_of(&self, species: &str) -> Option<&[String]> {
        self.entries.iter().find(|e| e.name == species).map(|e| e.breeds.as_slice())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Heuristic pre-fill for the submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesGuess {
    /// Detected species key, empty when nothing matched.
    pub species: String,
    /// Detected or default breed, empty when no species matched.
    pub breed: String,
    /// The raw labels, kept for display.
    pub labels: LabelSet,
}

impl SpeciesGuess {
    #[must_use]
    pub fn is_match(&self) -> bool {
        !self.species.is_empty()
    }
}

// ── Submission ───────────────────────────────────────────────────────

/// An image picked on the device, ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImagePayload {
    /// A JPEG payload named `pet.jpg`, the shape the upload endpoints expect.
    #[must_use]
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self { file_name: "pet.jpg".to_string(), content_type: "image/jpeg".to_string(), bytes }
    }
}

/// The new-pet form as the owner edits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetDraft {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: String,
    pub gender: String,
    pub size: String,
    pub color: String,
    pub description: String,
    pub available: bool,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for PetDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            species: String::new(),
            breed: String::new(),
            age: String::new(),
            gender: "Unknown".to_string(),
            size: "Medium".to_string(),
            color: String::new(),
            description: String::new(),
            available: true,
            address: None,
            latitude: None,
            longitude: None,
        }
    }
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: u32,
    pub gender: String,
    pub size: String,
    pub color: String,
    pub description: String,
    pub available: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PetDraft {
    /// Overwrite species and breed with a heuristic guess.
    ///
    /// A guess without a match clears both fields, whatever was there before.
    pub fn apply_guess(&mut self, guess: &SpeciesGuess) {
        self.species.clone_from(&guess.species);
        self.breed.clone_from(&guess.breed);
    }

    /// Restore the pristine form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check required fields and parse the age.
    ///
    /// # Errors
    /// Returns [`DraftError::MissingField`] for the first blank required field
    /// and [`DraftError::InvalidAge`] when age is not a non-negative integer.
    pub fn validate(&self) -> Result<NewPet, DraftError> {
        let required = [
            ("name", &self.name),
            ("species", &self.species),
            ("breed", &self.breed),
            ("age", &self.age),
            ("color", &self.color),
            ("description", &self.description),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(DraftError::MissingField(*field));
        }

        let age = self
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| DraftError::InvalidAge(self.age.trim().to_string()))?;

        Ok(NewPet {
            name: self.name.trim().to_string(),
            species: self.species.trim().to_string(),
            breed: self.breed.trim().to_string(),
            age,
            gender: self.gender.clone(),
            size: self.size.clone(),
            color: self.color.trim().to_string(),
            description: self.description.trim().to_string(),
            available: self.available,
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

// ── Observability Types ──────────────────────────────────────────────

/// An event emitted by the runtime for observability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    CatalogLoaded { count: usize },
    FilterApplied { visible: usize, total: usize },
    FavoriteToggled { pet_id: PetId, favorite: bool },
    FavoriteConfirmed { pet_id: PetId, favorite: bool },
    FavoriteReverted { pet_id: PetId, favorite: bool, error: String },
    InterestRecorded { pet_id: PetId },
    LabelsReceived { count: usize },
    SpeciesInferred { species: String, breed: String },
    NoLabelsMatched,
    Error { error: String },
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_toggle_adds_then_removes() {
        let mut set = FavoriteSet::new();
        let id = PetId::from("p1");

        let first = set.begin_toggle(&id);
        assert!(!first.was_favorite);
        assert!(first.now_favorite);
        assert!(set.contains(&id));

        let second = set.begin_toggle(&id);
        assert!(second.was_favorite);
        assert!(!set.contains(&id));
    }

    #[test]
    fn rejected_toggle_restores_previous_membership() {
        let mut set: FavoriteSet = [PetId::from("a"), PetId::from("b")].into_iter().collect();
        let before = set.clone();

        let pending = set.begin_toggle(&PetId::from("a"));
        assert_ne!(set, before);
        let favorite = set.settle(&pending, ToggleOutcome::Rejected);

        assert!(favorite);
        assert_eq!(set, before);
    }

    #[test]
    fn settle_only_touches_its_own_pet() {
        let mut set = FavoriteSet::new();
        let a = set.begin_toggle(&PetId::from("a"));
        let _b = set.begin_toggle(&PetId::from("b"));

        set.settle(&a, ToggleOutcome::Rejected);

        assert!(!set.contains(&PetId::from("a")));
        assert!(set.contains(&PetId::from("b")));
    }

    #[test]
    fn criteria_treats_empty_strings_as_absent() {
        let criteria = FilterCriteria::new().with_gender("").with_color("");
        assert!(criteria.is_empty());
        assert!(!FilterCriteria::new().with_query("lab").is_empty());
    }

    #[test]
    fn default_table_starts_with_dog_and_cat() {
        let table = SpeciesBreedTable::default();
        let names: Vec<&str> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["dog", "cat", "rabbit", "bird", "fish", "reptile", "hamster"]);
        assert_eq!(table.breeds_of("cat").and_then(|b| b.first()).map(String::as_str), Some("Persian"));
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let draft = PetDraft { name: "Rex".into(), ..PetDraft::default() };
        assert_eq!(draft.validate(), Err(DraftError::MissingField("species")));
    }

    #[test]
    fn validate_parses_age() {
        let draft = PetDraft {
            name: "Rex".into(),
            species: "dog".into(),
            breed: "Boxer".into(),
            age: " 3 ".into(),
            color: "Brown".into(),
            description: "Friendly".into(),
            ..PetDraft::default()
        };
        let pet = draft.validate().unwrap();
        assert_eq!(pet.age, 3);
        assert_eq!(pet.gender, "Unknown");
        assert_eq!(pet.size, "Medium");

        let bad = PetDraft { age: "three".into(), ..draft };
        assert_eq!(bad.validate(), Err(DraftError::InvalidAge("three".into())));
    }

    #[test]
    fn unmatched_guess_clears_draft_fields() {
        let mut draft =
            PetDraft { species: "dog".into(), breed: "Boxer".into(), ..PetDraft::default() };
        draft.apply_guess(&SpeciesGuess::default());
        assert!(draft.species.is_empty());
        assert!(draft.breed.is_empty());
    }
}
