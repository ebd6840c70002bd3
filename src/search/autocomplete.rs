//! Autocomplete matcher.
//!
//! Three independent `should` clauses on the product name, scores summed:
//!
//! | clause                     | field               | boost |
//! |----------------------------|---------------------|-------|
//! | edge-n-gram prefix match   | `name.autocomplete` | 3     |
//! | phrase prefix              | `name`              | 2     |
//! | fuzzy (AUTO)               | `name`              | 1     |
//!
//! The `name.autocomplete` sub-field only works with the asymmetric analyzer
//! pair defined in [`index_manager`](super::index_manager).

use super::document::fields;
use super::query_builder::{Query, QueryBuilder};

pub const PREFIX_BOOST: f32 = 3.0;
pub const PHRASE_PREFIX_BOOST: f32 = 2.0;
pub const FUZZY_BOOST: f32 = 1.0;

/// Compile partial text into the weighted autocomplete query.
pub fn compile_autocomplete_query(text: &str) -> Query {
    QueryBuilder::new()
        .should(Query::matches(fields::NAME_AUTOCOMPLETE, text, Some(PREFIX_BOOST)))
        .should(Query::phrase_prefix(fields::NAME, text, Some(PHRASE_PREFIX_BOOST)))
        .should(Query::fuzzy(fields::NAME, text, Some(FUZZY_BOOST)))
        .minimum_should_match(1)
        .build()
}
