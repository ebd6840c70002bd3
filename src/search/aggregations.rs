// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Facet definitions and extraction.
//!
//! The facet shape is fixed; only the counts depend on the filtered result set.
//!
//! ```text
//! categories     terms(category, size 50)
//! subcategories  terms(subcategories, size 100)
//! price_ranges   range(price): 0-50 | 50-100 | 100-500 | 500-1000 | 1000+
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::fields;

pub const CATEGORIES_FACET: &str = "categories";
pub const SUBCATEGORIES_FACET: &str = "subcategories";
pub const PRICE_RANGES_FACET: &str = "price_ranges";

const CATEGORIES_SIZE: usize = 50;
const SUBCATEGORIES_SIZE: usize = 100;

/// Facet name → buckets, in engine order
pub type Facets = BTreeMap<String, Vec<FacetBucket>>;

/// One facet value with its document count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub key: String,
    pub count: u64,
}

/// Named price bucket. `from` is inclusive, `to` exclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBucket {
    pub key: &'static str,
    pub from: Option<f64>,
    pub to: Option<f64>,
}

/// Fixed price buckets
pub const PRICE_BUCKETS: [PriceBucket; 5] = [
    PriceBucket { key: "0-50", from: None, to: Some(50.0) },
    PriceBucket { key: "50-100", from: Some(50.0), to: Some(100.0) },
    PriceBucket { key: "100-500", from: Some(100.0), to: Some(500.0) },
    PriceBucket { key: "500-1000", from: Some(500.0), to: Some(1000.0) },
    PriceBucket { key: "1000+", from: Some(1000.0), to: None },
];

/// A facet computation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AggregationSpec {
    /// Top terms by document count
    Terms {
        name: &'static str,
        field: &'static str,
        size: usize,
    },
    /// Fixed numeric ranges
    Range {
        name: &'static str,
        field: &'static str,
        buckets: Vec<PriceBucket>,
    },
}

impl AggregationSpec {
    pub fn name(&self) -> &'static str {
        match self {
            AggregationSpec::Terms { name, .. } | AggregationSpec::Range { name, .. } => name,
        }
    }
}

/// The facet requests sent with every search.
pub fn aggregation_specs() -> Vec<AggregationSpec> {
    vec![
        AggregationSpec::Terms {
            name: CATEGORIES_FACET,
            field: fields::CATEGORY,
            size: CATEGORIES_SIZE,
        },
        AggregationSpec::Terms {
            name: SUBCATEGORIES_FACET,
            field: fields::SUBCATEGORIES,
            size: SUBCATEGORIES_SIZE,
        },
        AggregationSpec::Range {
            name: PRICE_RANGES_FACET,
            field: fields::PRICE,
            buckets: PRICE_BUCKETS.to_vec(),
        },
    ]
}

/// Read facets out of the engine's raw `aggregations` object.
///
/// Returns `None` when the response had no aggregations at all. A missing
/// aggregation is left out of the map; one without a `buckets` array maps to
/// an empty list.
pub fn extract_facets(aggregations: Option<&Value>) -> Option<Facets> {
    let aggregations = aggregations?.as_object()?;

    let mut facets = Facets::new();
    for spec in aggregation_specs() {
        let Some(agg) = aggregations.get(spec.name()) else {
            continue;
        };
        let buckets: Vec<FacetBucket> = agg
            .get("buckets")
            .and_then(|b| b.as_array())
            .map(|b| b.iter().map(to_facet_bucket).collect())
            .unwrap_or_default();
        facets.insert(spec.name().to_string(), buckets);
    }
    Some(facets)
}

fn to_facet_bucket(bucket: &Value) -> FacetBucket {
    let key = match bucket.get("key") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let count = bucket.get("doc_count").and_then(|c| c.as_u64()).unwrap_or(0);
    FacetBucket { key, count }
}
