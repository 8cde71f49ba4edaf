//! # Filter Engine
//!
//! Pure functions deriving the displayed pet list from the full catalog and
//! the current [`FilterCriteria`].
//!
//! A pet is kept iff every active criterion matches:
//!
//! - **query**: breed or species contains it (case-insensitive)
//! - **gender**: equals it (case-insensitive)
//! - **color**: equals it (case-insensitive)
//!
//! Inactive (absent or empty) criteria match everything. The output keeps
//! the catalog's relative order, so applying the same criteria to the output
//! again changes nothing.

use paws_core::{
    contains_ignore_case, eq_ignore_case,
    types::{FilterCriteria, Pet},
};

/// Returns `true` when `pet` satisfies every active criterion.
#[must_use]
pub fn matches(pet: &Pet, criteria: &FilterCriteria) -> bool {
    let query_ok = criteria
        .active_query()
        .is_none_or(|q| contains_ignore_case(&pet.breed, q) || contains_ignore_case(&pet.species, q));
    let gender_ok = criteria.active_gender().is_none_or(|g| eq_ignore_case(&pet.gender, g));
    let color_ok = criteria.active_color().is_none_or(|c| eq_ignore_case(&pet.color, c));

    query_ok && gender_ok && color_ok
}

/// Order-preserving subset of `pets` matching `criteria`.
#[must_use]
pub fn filter_pets(pets: &[Pet], criteria: &FilterCriteria) -> Vec<Pet> {
    if criteria.is_empty() {
        return pets.to_vec();
    }
    pets.iter().filter(|pet| matches(pet, criteria)).cloned().collect()
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use paws_core::types::{PetId, UserId};

    use super::*;

    fn pet(id: &str, species: &str, breed: &str, gender: &str, color: &str) -> Pet {
        Pet {
            id: PetId::from(id),
            name: format!("pet-{id}"),
            species: species.to_string(),
            breed: breed.to_string(),
            age: "2".to_string(),
            gender: gender.to_string(),
            size: "Medium".to_string(),
            color: color.to_string(),
            description: String::new(),
            available: true,
            owner: UserId::from("owner-1"),
            interested_adopters: Vec::new(),
            image_url: None,
        }
    }

    fn scenario_catalog() -> Vec<Pet> {
        vec![
            pet("1", "dog", "Poodle", "Female", "White"),
            pet("2", "dog", "Husky", "Male", "Gray"),
            pet("3", "dog", "Poodle", "Male", "Black"),
        ]
    }

    fn ids(pets: &[Pet]) -> Vec<&str> {
        pets.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn empty_criteria_returns_full_catalog() {
        let catalog = scenario_catalog();
        assert_eq!(filter_pets(&catalog, &FilterCriteria::default()), catalog);
    }

    #[test]
    fn empty_catalog_yields_empty_result() {
        let criteria = FilterCriteria::new().with_query("poodle").with_gender("Male");
        assert!(filter_pets(&[], &criteria).is_empty());
    }

    #[test]
    fn query_then_gender_narrows_scenario() {
        let catalog = scenario_catalog();

        let by_query = FilterCriteria::new().with_query("poodle");
        assert_eq!(ids(&filter_pets(&catalog, &by_query)), ["1", "3"]);

        let by_query_and_gender = by_query.with_gender("Male");
        assert_eq!(ids(&filter_pets(&catalog, &by_query_and_gender)), ["3"]);
    }

    #[test]
    fn query_matches_species_as_well_as_breed() {
        let catalog = vec![
            pet("a", "cat", "Siamese", "Female", "Cream"),
            pet("b", "dog", "Beagle", "Male", "Tricolor"),
        ];
        let result = filter_pets(&catalog, &FilterCriteria::new().with_query("CA"));
        assert_eq!(ids(&result), ["a"]);
    }

    #[test]
    fn gender_and_color_use_equality_not_substring() {
        let catalog = vec![
            pet("a", "dog", "Boxer", "Female", "Black"),
            pet("b", "dog", "Boxer", "Male", "black"),
        ];
        let male = filter_pets(&catalog, &FilterCriteria::new().with_gender("male"));
        assert_eq!(ids(&male), ["b"]);

        let black = filter_pets(&catalog, &FilterCriteria::new().with_color("BLACK"));
        assert_eq!(ids(&black), ["a", "b"]);

        let blue = filter_pets(&catalog, &FilterCriteria::new().with_color("Blue"));
        assert!(blue.is_empty());
    }

    #[test]
    fn empty_gender_is_ignored() {
        let catalog = scenario_catalog();
        let criteria = FilterCriteria::new().with_gender("").with_color("");
        assert_eq!(filter_pets(&catalog, &criteria).len(), 3);
    }

    #[test]
    fn result_is_order_preserving_subset() {
        let catalog = scenario_catalog();
        let criteria = FilterCriteria::new().with_gender("Male");
        let result = filter_pets(&catalog, &criteria);

        let mut cursor = catalog.iter();
        for kept in &result {
            assert!(cursor.any(|p| p == kept), "{} out of order or missing", kept.id);
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let catalog = scenario_catalog();
        let criteria = FilterCriteria::new().with_query("o").with_color("black");
        let once = filter_pets(&catalog, &criteria);
        let twice = filter_pets(&once, &criteria);
        assert_eq!(once, twice);
    }
}
