//! Elasticsearch Translator
//!
//! Renders the Query AST, sort keys and facet specs as Elasticsearch Query DSL.
//!
//! ```text
//! MatchAll              → {"match_all": {}}
//! Bool                  → {"bool": {"must": [..], "filter": [..], "should": [..], "minimum_should_match": n}}
//! MultiMatch            → {"multi_match": {"query", "fields": ["name^2", "description"], "fuzziness", "operator"}}
//! Term / Terms          → {"term": {field: value}} / {"terms": {field: [..]}}
//! Range                 → {"range": {field: {"gte", "lte"}}}
//! GeoDistance           → {"geo_distance": {"distance": "10km", field: {"lat", "lon"}}}
//! Match / PhrasePrefix  → {"match": {field: {"query", "boost"}}}
//! Fuzzy                 → {"fuzzy": {field: {"value", "fuzziness", "boost"}}}
//! ```
//!
//! Empty clause groups and absent bounds are left out rather than rendered
//! as empty arrays or nulls.

use serde_json::{json, Map, Value};

use super::aggregations::AggregationSpec;
use super::query_builder::{BoolQuery, BoostedField, Fuzziness, MatchOperator, Query, QueryNode};
use super::sort::{SortDirection, SortKey};

/// Elasticsearch Query DSL translator
pub struct EsTranslator;

impl EsTranslator {
    /// Translate a Query AST into a Query DSL object
    pub fn translate(query: &Query) -> Value {
        Self::translate_node(&query.root)
    }

    /// Translate sort keys into the `sort` array
    pub fn translate_sort(keys: &[SortKey]) -> Value {
        Value::Array(
            keys.iter()
                .map(|key| {
                    let order = match key.direction {
                        SortDirection::Asc => "asc",
                        SortDirection::Desc => "desc",
                    };
                    json!({ key.field.as_str(): { "order": order } })
                })
                .collect(),
        )
    }

    /// Translate facet specs into the `aggs` object
    pub fn translate_aggregations(specs: &[AggregationSpec]) -> Value {
        let mut aggs = Map::new();
        for spec in specs {
            let body = match spec {
                AggregationSpec::Terms { field, size, .. } => {
                    json!({ "terms": { "field": field, "size": size } })
                }
                AggregationSpec::Range { field, buckets, .. } => {
                    let ranges: Vec<Value> = buckets
                        .iter()
                        .map(|b| {
                            let mut range = Map::new();
                            range.insert("key".into(), json!(b.key));
                            if let Some(from) = b.from {
                                range.insert("from".into(), json!(from));
                            }
                            if let Some(to) = b.to {
                                range.insert("to".into(), json!(to));
                            }
                            Value::Object(range)
                        })
                        .collect();
                    json!({ "range": { "field": field, "ranges": ranges } })
                }
            };
            aggs.insert(spec.name().to_string(), body);
        }
        Value::Object(aggs)
    }

    fn translate_node(node: &QueryNode) -> Value {
        match node {
            QueryNode::MatchAll => json!({ "match_all": {} }),
            QueryNode::Bool(b) => Self::translate_bool(b),
            QueryNode::MultiMatch(mm) => {
                let fields: Vec<String> = mm.fields.iter().map(Self::boosted_field).collect();
                let mut body = Map::new();
                body.insert("query".into(), json!(mm.query));
                body.insert("fields".into(), json!(fields));
                if let Some(fuzziness) = mm.fuzziness {
                    body.insert("fuzziness".into(), Self::fuzziness(fuzziness));
                }
                body.insert("operator".into(), json!(Self::operator(mm.operator)));
                json!({ "multi_match": body })
            }
            QueryNode::Term { field, value } => json!({ "term": { field.as_str(): value } }),
            QueryNode::Terms { field, values } => json!({ "terms": { field.as_str(): values } }),
            QueryNode::Range { field, gte, lte } => {
                let mut bounds = Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".into(), json!(gte));
                }
                if let Some(lte) = lte {
                    bounds.insert("lte".into(), json!(lte));
                }
                json!({ "range": { field.as_str(): bounds } })
            }
            QueryNode::GeoDistance { field, lat, lon, distance_km } => json!({
                "geo_distance": {
                    "distance": format!("{}km", distance_km),
                    field.as_str(): { "lat": lat, "lon": lon },
                }
            }),
            QueryNode::Match { field, query, boost } => {
                json!({ "match": { field.as_str(): Self::with_boost(json!({ "query": query }), *boost) } })
            }
            QueryNode::MatchPhrasePrefix { field, query, boost } => json!({
                "match_phrase_prefix": { field.as_str(): Self::with_boost(json!({ "query": query }), *boost) }
            }),
            QueryNode::Fuzzy { field, value, fuzziness, boost } => {
                let body = json!({ "value": value, "fuzziness": Self::fuzziness(*fuzziness) });
                json!({ "fuzzy": { field.as_str(): Self::with_boost(body, *boost) } })
            }
        }
    }

    fn translate_bool(b: &BoolQuery) -> Value {
        let mut body = Map::new();
        for (name, clauses) in [("must", &b.must), ("filter", &b.filter), ("should", &b.should)] {
            if !clauses.is_empty() {
                let rendered: Vec<Value> = clauses.iter().map(Self::translate_node).collect();
                body.insert(name.into(), Value::Array(rendered));
            }
        }
        if let Some(n) = b.minimum_should_match {
            body.insert("minimum_should_match".into(), json!(n));
        }
        json!({ "bool": body })
    }

    /// `name^2`; a boost of 1 is the engine default and is left off
    fn boosted_field(field: &BoostedField) -> String {
        if field.boost == 1.0 {
            field.name.clone()
        } else {
            format!("{}^{}", field.name, field.boost)
        }
    }

    fn with_boost(mut body: Value, boost: Option<f32>) -> Value {
        if let (Some(boost), Some(obj)) = (boost, body.as_object_mut()) {
            obj.insert("boost".into(), json!(boost));
        }
        body
    }

    fn fuzziness(fuzziness: Fuzziness) -> Value {
        match fuzziness {
            Fuzziness::Auto => json!("AUTO"),
            Fuzziness::Edits(n) => json!(n),
        }
    }

    fn operator(operator: MatchOperator) -> &'static str {
        match operator {
            MatchOperator::And => "and",
            MatchOperator::Or => "or",
        }
    }
}
