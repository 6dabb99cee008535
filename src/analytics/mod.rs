//! Analytics Engine - taste pattern from visit history.
//!
//! Classification is first-match over a fixed rule order, not a score:
//!
//! 1. more than 5 categories and more than 10 visits → `Adventurous`
//! 2. at most 2 categories → `Traditional`
//! 3. average rating ≥ 4.5 (with at least one rating) → `Gourmet`
//! 4. fewer than 5 visits → `Casual`
//! 5. otherwise → `Balanced`

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collection::VisitRecord;

const ADVENTUROUS_CATEGORIES_ABOVE: usize = 5;
const ADVENTUROUS_VISITS_ABOVE: u64 = 10;
const TRADITIONAL_MAX_CATEGORIES: usize = 2;
const GOURMET_MIN_RATING: f64 = 4.5;
const CASUAL_VISITS_BELOW: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TastePattern {
    Adventurous,
    Traditional,
    Gourmet,
    Casual,
    Balanced,
}

impl TastePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            TastePattern::Adventurous => "adventurous",
            TastePattern::Traditional => "traditional",
            TastePattern::Gourmet => "gourmet",
            TastePattern::Casual => "casual",
            TastePattern::Balanced => "balanced",
        }
    }

    /// One-line summary for display.
    pub fn description(&self) -> &'static str {
        match self {
            TastePattern::Adventurous => "Explores many kinds of places, often",
            TastePattern::Traditional => "Sticks to a few familiar kinds of places",
            TastePattern::Gourmet => "Rates what they visit highly",
            TastePattern::Casual => "Visits now and then",
            TastePattern::Balanced => "A steady mix of variety and routine",
        }
    }
}

impl fmt::Display for TastePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived summary of a visit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasteAnalysis {
    pub favorite_categories: BTreeMap<String, u64>,
    pub favorite_locations: BTreeMap<String, u64>,
    pub visit_frequency: u64,
    /// Mean of the ratings given, 0 when none were.
    pub average_rating: f64,
    pub taste_pattern: TastePattern,
}

impl TasteAnalysis {
    pub fn unique_categories(&self) -> usize {
        self.favorite_categories.len()
    }

    /// The `n` most visited categories, most visited first, ties by name.
    pub fn top_categories(&self, n: usize) -> Vec<(&str, u64)> {
        top(&self.favorite_categories, n)
    }

    /// The `n` most visited locations, most visited first, ties by name.
    pub fn top_locations(&self, n: usize) -> Vec<(&str, u64)> {
        top(&self.favorite_locations, n)
    }
}

fn top(table: &BTreeMap<String, u64>, n: usize) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = table.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    // BTreeMap order is by name, and the sort is stable.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

/// Analyze a visit history. `None` for an empty history, which callers
/// treat as "keep whatever analysis you already have".
pub fn analyze(visits: &[VisitRecord]) -> Option<TasteAnalysis> {
    if visits.is_empty() {
        return None;
    }

    let mut favorite_categories = BTreeMap::new();
    let mut favorite_locations = BTreeMap::new();
    let mut rating_sum = 0u64;
    let mut rated = 0u64;

    for visit in visits {
        if let Some(category) = present(&visit.category) {
            *favorite_categories.entry(category.to_string()).or_insert(0) += 1;
        }
        if let Some(location) = present(&visit.location) {
            *favorite_locations.entry(location.to_string()).or_insert(0) += 1;
        }
        if let Some(rating) = visit.rating {
            rating_sum += u64::from(rating);
            rated += 1;
        }
    }

    let visit_frequency = visits.len() as u64;
    let average_rating = if rated == 0 {
        0.0
    } else {
        rating_sum as f64 / rated as f64
    };
    let taste_pattern = classify(
        favorite_categories.len(),
        visit_frequency,
        (rated > 0).then_some(average_rating),
    );

    Some(TasteAnalysis {
        favorite_categories,
        favorite_locations,
        visit_frequency,
        average_rating,
        taste_pattern,
    })
}

/// Apply the classification rules in order. `average_rating` is `None`
/// when no visit was rated.
pub fn classify(
    unique_categories: usize,
    visit_frequency: u64,
    average_rating: Option<f64>,
) -> TastePattern {
    if unique_categories > ADVENTUROUS_CATEGORIES_ABOVE
        && visit_frequency > ADVENTUROUS_VISITS_ABOVE
    {
        TastePattern::Adventurous
    } else if unique_categories <= TRADITIONAL_MAX_CATEGORIES {
        TastePattern::Traditional
    } else if average_rating.is_some_and(|avg| avg >= GOURMET_MIN_RATING) {
        TastePattern::Gourmet
    } else if visit_frequency < CASUAL_VISITS_BELOW {
        TastePattern::Casual
    } else {
        TastePattern::Balanced
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
