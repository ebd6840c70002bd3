// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Infrastructure
//!
//! Pure query construction for the product index. Nothing in here performs I/O;
//! every function may be called concurrently from any number of tasks.
//!
//! # Architecture
//!
//! ```text
//! SearchFilters ──→ compile_search_query ──┐
//! SortOption ─────→ resolve_sort ──────────┼─→ EsTranslator → Query DSL
//!                   aggregation_specs ─────┤
//! autocomplete text → compile_autocomplete_query
//! ```
//!
//! # Example
//!
//! ```rust
//! use catalog_search::search::{compile_search_query, EsTranslator, SearchFilters};
//!
//! let filters = SearchFilters {
//!     text: Some("laptop".into()),
//!     min_price: Some(100.0),
//!     max_price: Some(1000.0),
//!     ..Default::default()
//! };
//!
//! let query = compile_search_query(&filters).unwrap();
//! let dsl = EsTranslator::translate(&query);
//! assert_eq!(dsl["bool"]["filter"][0]["range"]["price"]["gte"], 100.0);
//! ```

mod aggregations;
mod autocomplete;
mod compiler;
mod document;
mod es_translator;
mod filters;
mod index_manager;
mod query_builder;
mod sort;

pub use aggregations::{
    aggregation_specs, extract_facets, AggregationSpec, FacetBucket, Facets, PriceBucket,
    CATEGORIES_FACET, PRICE_BUCKETS, PRICE_RANGES_FACET, SUBCATEGORIES_FACET,
};
pub use autocomplete::{compile_autocomplete_query, FUZZY_BOOST, PHRASE_PREFIX_BOOST, PREFIX_BOOST};
pub use compiler::{compile_search_query, DESCRIPTION_BOOST, NAME_BOOST};
pub use document::{fields, DocumentError, GeoPoint, ProductDocument};
pub use es_translator::EsTranslator;
pub use filters::{
    AutocompleteQuery, FilterError, SearchFilters, SortOption, DEFAULT_AUTOCOMPLETE_LIMIT,
    DEFAULT_LIMIT, MAX_AUTOCOMPLETE_LIMIT, MAX_LIMIT, MAX_RESULT_WINDOW, MAX_TEXT_LEN,
};
pub use index_manager::{ProductIndex, AUTOCOMPLETE_ANALYZER, AUTOCOMPLETE_SEARCH_ANALYZER};
pub use query_builder::{
    BoolQuery, BoostedField, Fuzziness, MatchOperator, MultiMatchQuery, Query, QueryBuilder,
    QueryNode,
};
pub use sort::{resolve_sort, resolve_sort_str, SortDirection, SortKey, SCORE};
