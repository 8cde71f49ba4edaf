//! Case-insensitive text matching shared by the filter engine and the
//! species inference heuristic.
//!
//! All comparisons lower-case both sides with full Unicode case mapping so
//! the two components agree on what "matches" means.

/// Returns `true` when `haystack` contains `needle`, ignoring case.
///
/// An empty needle matches everything.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Returns `true` when both strings are equal, ignoring case.
#[must_use]
pub fn eq_ignore_case(lhs: &str, rhs: &str) -> bool {
    lhs == rhs || lhs.to_lowercase() == rhs.to_lowercase()
}

/// Returns `true` when any label contains `needle`, ignoring case.
#[must_use]
pub fn any_label_contains<S: AsRef<str>>(labels: &[S], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    labels.iter().any(|label| label.as_ref().to_lowercase().contains(&needle))
}
