// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Builder - AST for search-engine queries
//!
//! Provides a type-safe way to build boolean queries that the
//! [`EsTranslator`](super::EsTranslator) renders as Elasticsearch Query DSL.
//!
//! # Example
//!
//! ```rust
//! use catalog_search::search::{Query, QueryBuilder};
//!
//! // Single clause
//! let query = Query::term("category", "Electronics");
//!
//! // Boolean query with scored and non-scored clauses
//! let query = QueryBuilder::new()
//!     .must(Query::phrase_prefix("name", "lapt", Some(2.0)))
//!     .filter(Query::range("price", Some(100.0), Some(1000.0)))
//!     .build();
//!
//! // Nothing added: match everything
//! assert!(QueryBuilder::new().build().is_match_all());
//! ```

use serde::{Deserialize, Serialize};

/// Search query AST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Root query node
    pub root: QueryNode,
}

impl Query {
    /// Create a new query from a root node
    pub fn new(root: QueryNode) -> Self {
        Self { root }
    }

    /// Match every document
    pub fn match_all() -> Self {
        Self::new(QueryNode::MatchAll)
    }

    /// Exact match on a keyword field
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(QueryNode::Term {
            field: field.into(),
            value: value.into(),
        })
    }

    /// Field contains at least one of the given keywords
    pub fn terms(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(QueryNode::Terms {
            field: field.into(),
            values,
        })
    }

    /// Numeric range, inclusive on both ends; `None` leaves that end open
    pub fn range(field: impl Into<String>, gte: Option<f64>, lte: Option<f64>) -> Self {
        Self::new(QueryNode::Range {
            field: field.into(),
            gte,
            lte,
        })
    }

    /// Documents within `distance_km` of (lat, lon)
    pub fn geo_distance(field: impl Into<String>, lat: f64, lon: f64, distance_km: f64) -> Self {
        Self::new(QueryNode::GeoDistance {
            field: field.into(),
            lat,
            lon,
            distance_km,
        })
    }

    /// Full-text match across several boosted fields
    pub fn multi_match(query: impl Into<String>, fields: Vec<BoostedField>) -> MultiMatchQuery {
        MultiMatchQuery {
            query: query.into(),
            fields,
            fuzziness: None,
            operator: MatchOperator::Or,
        }
    }

    /// Analyzed full-text match on a single field
    pub fn matches(field: impl Into<String>, query: impl Into<String>, boost: Option<f32>) -> Self {
        Self::new(QueryNode::Match {
            field: field.into(),
            query: query.into(),
            boost,
        })
    }

    /// Phrase match where the last term is treated as a prefix
    pub fn phrase_prefix(field: impl Into<String>, query: impl Into<String>, boost: Option<f32>) -> Self {
        Self::new(QueryNode::MatchPhrasePrefix {
            field: field.into(),
            query: query.into(),
            boost,
        })
    }

    /// Edit-distance match on a single field
    pub fn fuzzy(field: impl Into<String>, value: impl Into<String>, boost: Option<f32>) -> Self {
        Self::new(QueryNode::Fuzzy {
            field: field.into(),
            value: value.into(),
            fuzziness: Fuzziness::Auto,
            boost,
        })
    }

    /// True for the "match everything" marker
    pub fn is_match_all(&self) -> bool {
        matches!(self.root, QueryNode::MatchAll)
    }

    /// Borrow the root as a boolean query, if it is one
    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match &self.root {
            QueryNode::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl From<MultiMatchQuery> for Query {
    fn from(mm: MultiMatchQuery) -> Self {
        Query::new(QueryNode::MultiMatch(mm))
    }
}

/// Query AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryNode {
    /// Every document matches
    MatchAll,
    /// Boolean combination of clause groups
    Bool(BoolQuery),
    /// Full-text across boosted fields
    MultiMatch(MultiMatchQuery),
    /// Exact keyword
    Term { field: String, value: String },
    /// Any of the keywords (OR semantics)
    Terms { field: String, values: Vec<String> },
    /// Inclusive numeric range
    Range {
        field: String,
        gte: Option<f64>,
        lte: Option<f64>,
    },
    /// Radius around a point, in kilometers
    GeoDistance {
        field: String,
        lat: f64,
        lon: f64,
        distance_km: f64,
    },
    /// Analyzed match on one field
    Match {
        field: String,
        query: String,
        boost: Option<f32>,
    },
    /// Phrase with trailing prefix
    MatchPhrasePrefix {
        field: String,
        query: String,
        boost: Option<f32>,
    },
    /// Levenshtein match
    Fuzzy {
        field: String,
        value: String,
        fuzziness: Fuzziness,
        boost: Option<f32>,
    },
}

/// Boolean query: `must` clauses score, `filter` clauses only restrict,
/// `should` clauses score and are optional unless `minimum_should_match` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    pub must: Vec<QueryNode>,
    pub filter: Vec<QueryNode>,
    pub should: Vec<QueryNode>,
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.filter.is_empty() && self.should.is_empty()
    }
}

/// Multi-field full-text query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiMatchQuery {
    pub query: String,
    pub fields: Vec<BoostedField>,
    pub fuzziness: Option<Fuzziness>,
    pub operator: MatchOperator,
}

impl MultiMatchQuery {
    pub fn fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = Some(fuzziness);
        self
    }

    pub fn operator(mut self, operator: MatchOperator) -> Self {
        self.operator = operator;
        self
    }
}

/// Field name with a relative scoring weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedField {
    pub name: String,
    pub boost: f32,
}

impl BoostedField {
    pub fn new(name: impl Into<String>, boost: f32) -> Self {
        Self { name: name.into(), boost }
    }
}

/// Allowed edit distance for fuzzy matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fuzziness {
    /// Engine picks the distance from the term length
    Auto,
    /// Fixed number of edits
    Edits(u8),
}

/// How the terms of a full-text query combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOperator {
    And,
    Or,
}

/// Builder for boolean queries
#[derive(Default)]
pub struct QueryBuilder {
    bool_query: BoolQuery,
}

impl QueryBuilder {
    /// Create a new query builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scored clause that must match
    pub fn must(mut self, query: impl Into<Query>) -> Self {
        self.bool_query.must.push(query.into().root);
        self
    }

    /// Add a non-scoring clause that must match
    pub fn filter(mut self, query: impl Into<Query>) -> Self {
        self.bool_query.filter.push(query.into().root);
        self
    }

    /// Add an optional scored clause
    pub fn should(mut self, query: impl Into<Query>) -> Self {
        self.bool_query.should.push(query.into().root);
        self
    }

    /// Require at least `n` should clauses to match
    pub fn minimum_should_match(mut self, n: u32) -> Self {
        self.bool_query.minimum_should_match = Some(n);
        self
    }

    /// Build the query; an empty builder yields match-all, never an empty bool
    pub fn build(self) -> Query {
        if self.bool_query.is_empty() {
            Query::match_all()
        } else {
            Query::new(QueryNode::Bool(self.bool_query))
        }
    }
}
