//! Sort resolution.
//!
//! ```text
//! relevance   → _score desc, popularity desc
//! popularity  → popularity desc, _score desc
//! created_at  → createdAt desc
//! price_asc   → price asc
//! price_desc  → price desc
//! ```

use serde::{Deserialize, Serialize};

use super::document::fields;
use super::filters::SortOption;

/// Pseudo-field for the relevance score
pub const SCORE: &str = "_score";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One (field, direction) pair of an ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Desc }
    }
}

/// Ordered sort keys for an option. Never empty.
pub fn resolve_sort(option: SortOption) -> Vec<SortKey> {
    match option {
        SortOption::Relevance => vec![SortKey::desc(SCORE), SortKey::desc(fields::POPULARITY)],
        SortOption::Popularity => vec![SortKey::desc(fields::POPULARITY), SortKey::desc(SCORE)],
        SortOption::CreatedAt => vec![SortKey::desc(fields::CREATED_AT)],
        SortOption::PriceAsc => vec![SortKey::asc(fields::PRICE)],
        SortOption::PriceDesc => vec![SortKey::desc(fields::PRICE)],
    }
}

/// Resolve a raw wire value; unknown values get the relevance ordering.
pub fn resolve_sort_str(value: &str) -> Vec<SortKey> {
    resolve_sort(SortOption::parse(value))
}
