//! # Species/Breed Inference
//!
//! Maps classifier labels to a species and breed guess for the new-pet form.
//!
//! The policy is first-match, not best-match:
//!
//! 1. Species rows are tried in table order; the first species name found in
//!    any label wins.
//! 2. That species' breeds are tried in table order; the first breed found
//!    in any label wins.
//! 3. A detected species with no matching breed falls back to its first breed.
//! 4. No species at all clears both fields.
//!
//! Table order is therefore part of the input. A label such as `"category"`
//! matches the species `cat`; that is the documented behavior.

use paws_core::{
    any_label_contains,
    types::{LabelSet, SpeciesBreedTable, SpeciesGuess},
};

/// Guess species and breed from `labels` using `table`.
#[must_use]
pub fn infer_species(labels: LabelSet, table: &SpeciesBreedTable) -> SpeciesGuess {
    let Some(entry) = table.entries().iter().find(|e| any_label_contains(&labels, &e.name)) else {
        return SpeciesGuess { species: String::new(), breed: String::new(), labels };
    };

    let breed = entry
        .breeds
        .iter()
        .find(|breed| any_label_contains(&labels, breed))
        .or_else(|| entry.breeds.first())
        .cloned()
        .unwrap_or_default();

    SpeciesGuess { species: entry.name.clone(), breed, labels }
}

// ── Tests ────────────────────────────────────────────────────────────
