// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search query compiler.
//!
//! Maps [`SearchFilters`] onto a boolean [`Query`]:
//!
//! ```text
//! text           → must:   multi_match(name^2, description) fuzzy AUTO, operator AND
//! category       → filter: term(category)
//! subcategories  → filter: terms(subcategories)        (skipped when empty)
//! min/max price  → filter: range(price, gte, lte)      (open on a missing bound)
//! lat+lon+radius → filter: geo_distance(location, km)  (skipped without a positive radius)
//! nothing        → match_all
//! ```
//!
//! Filter clause order is fixed as category, subcategories, price, geo.

use super::document::fields;
use super::filters::{check_price_range, FilterError, SearchFilters};
use super::query_builder::{BoostedField, Fuzziness, MatchOperator, Query, QueryBuilder};

/// Relative weight of a name hit over a description hit
pub const NAME_BOOST: f32 = 2.0;
pub const DESCRIPTION_BOOST: f32 = 1.0;

/// Compile search filters into an engine query.
///
/// Only the price range is re-checked here; the rest of
/// [`SearchFilters::validate`] is the caller's job.
pub fn compile_search_query(filters: &SearchFilters) -> Result<Query, FilterError> {
    check_price_range(filters.min_price, filters.max_price)?;

    let mut builder = QueryBuilder::new();

    if let Some(text) = filters.text.as_deref().filter(|t| !t.trim().is_empty()) {
        builder = builder.must(
            Query::multi_match(
                text,
                vec![
                    BoostedField::new(fields::NAME, NAME_BOOST),
                    BoostedField::new(fields::DESCRIPTION, DESCRIPTION_BOOST),
                ],
            )
            .fuzziness(Fuzziness::Auto)
            .operator(MatchOperator::And),
        );
    }

    if let Some(category) = filters.category.as_deref().filter(|c| !c.is_empty()) {
        builder = builder.filter(Query::term(fields::CATEGORY, category));
    }

    if let Some(subcategories) = filters.subcategories.as_ref().filter(|s| !s.is_empty()) {
        builder = builder.filter(Query::terms(fields::SUBCATEGORIES, subcategories.clone()));
    }

    if filters.min_price.is_some() || filters.max_price.is_some() {
        builder = builder.filter(Query::range(fields::PRICE, filters.min_price, filters.max_price));
    }

    if let (Some(lat), Some(lon), Some(radius)) = (filters.lat, filters.lon, filters.radius_km.filter(|r| *r > 0.0)) {
        builder = builder.filter(Query::geo_distance(fields::LOCATION, lat, lon, radius));
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query_builder::QueryNode;

    #[test]
    fn test_no_filters_is_match_all() {
        let query = compile_search_query(&SearchFilters::default()).unwrap();
        assert_eq!(query, Query::match_all());
    }

    #[test]
    fn test_text_only_single_must_clause() {
        let filters = SearchFilters { text: Some("laptop".into()), page: 1, limit: 20, ..Default::default() };
        let query = compile_search_query(&filters).unwrap();
        let b = query.as_bool().expect("Expected Bool node");

        assert_eq!(b.must.len(), 1);
        assert!(b.filter.is_empty());
        match &b.must[0] {
            QueryNode::MultiMatch(mm) => {
                assert_eq!(mm.query, "laptop");
                assert_eq!(
                    mm.fields,
                    vec![BoostedField::new("name", 2.0), BoostedField::new("description", 1.0)]
                );
                assert_eq!(mm.fuzziness, Some(Fuzziness::Auto));
                assert_eq!(mm.operator, MatchOperator::And);
            }
            other => panic!("Expected MultiMatch node, got {:?}", other),
        }
    }

    #[test]
    fn test_price_range_both_bounds() {
        let filters = SearchFilters { min_price: Some(100.0), max_price: Some(1000.0), ..Default::default() };
        let query = compile_search_query(&filters).unwrap();
        let b = query.as_bool().unwrap();

        assert!(b.must.is_empty());
        assert_eq!(
            b.filter,
            vec![QueryNode::Range { field: "price".into(), gte: Some(100.0), lte: Some(1000.0) }]
        );
    }

    #[test]
    fn test_price_range_open_ended() {
        let filters = SearchFilters { max_price: Some(50.0), ..Default::default() };
        let query = compile_search_query(&filters).unwrap();

        assert_eq!(
            query.as_bool().unwrap().filter,
            vec![QueryNode::Range { field: "price".into(), gte: None, lte: Some(50.0) }]
        );
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let filters = SearchFilters { min_price: Some(10.0), max_price: Some(5.0), ..Default::default() };
        assert_eq!(
            compile_search_query(&filters),
            Err(FilterError::InvertedPriceRange { min: 10.0, max: 5.0 })
        );
    }

    #[test]
    fn test_empty_subcategories_same_as_absent() {
        let with_empty = SearchFilters { subcategories: Some(vec![]), ..Default::default() };
        assert_eq!(
            compile_search_query(&with_empty).unwrap(),
            compile_search_query(&SearchFilters::default()).unwrap()
        );
    }

    #[test]
    fn test_geo_requires_radius() {
        let filters = SearchFilters { lat: Some(40.0), lon: Some(-3.7), ..Default::default() };
        assert!(compile_search_query(&filters).unwrap().is_match_all());

        let filters = SearchFilters { lat: Some(40.0), lon: Some(-3.7), radius_km: Some(0.0), ..Default::default() };
        assert!(compile_search_query(&filters).unwrap().is_match_all());

        let filters = SearchFilters { lat: Some(40.0), lon: Some(-3.7), radius_km: Some(10.0), ..Default::default() };
        assert_eq!(
            compile_search_query(&filters).unwrap().as_bool().unwrap().filter,
            vec![QueryNode::GeoDistance { field: "location".into(), lat: 40.0, lon: -3.7, distance_km: 10.0 }]
        );
    }

    #[test]
    fn test_filter_clause_order_is_fixed() {
        let filters = SearchFilters {
            text: Some("phone".into()),
            category: Some("Electronics".into()),
            subcategories: Some(vec!["Smartphones".into(), "Apple".into()]),
            min_price: Some(100.0),
            lat: Some(40.0),
            lon: Some(-3.7),
            radius_km: Some(5.0),
            ..Default::default()
        };
        let query = compile_search_query(&filters).unwrap();
        let b = query.as_bool().unwrap();

        assert_eq!(b.must.len(), 1);
        assert_eq!(b.filter.len(), 4);
        assert!(matches!(&b.filter[0], QueryNode::Term { field, value } if field == "category" && value == "Electronics"));
        assert!(matches!(&b.filter[1], QueryNode::Terms { field, values } if field == "subcategories" && values.len() == 2));
        assert!(matches!(&b.filter[2], QueryNode::Range { .. }));
        assert!(matches!(&b.filter[3], QueryNode::GeoDistance { .. }));
    }

    #[test]
    fn test_blank_text_emits_no_clause() {
        let filters = SearchFilters { text: Some("   ".into()), ..Default::default() };
        assert!(compile_search_query(&filters).unwrap().is_match_all());
    }
}
