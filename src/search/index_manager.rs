//! Index Manager
//!
//! Product index definition: analysis settings plus field mapping.
//!
//! # Autocomplete analysis
//!
//! ```text
//! index time   autocomplete         standard → lowercase → asciifolding → edge_ngram(2..20)
//! search time  autocomplete_search  standard → lowercase → asciifolding
//! ```
//!
//! The two analyzers must stay asymmetric. N-gramming the search text too would
//! make every 2-character fragment of the input match.

use serde_json::{json, Value};

use super::document::fields;

pub const AUTOCOMPLETE_ANALYZER: &str = "autocomplete";
pub const AUTOCOMPLETE_SEARCH_ANALYZER: &str = "autocomplete_search";
const EDGE_NGRAM_FILTER: &str = "autocomplete_filter";

pub const MIN_GRAM: u32 = 2;
pub const MAX_GRAM: u32 = 20;

/// Product index definition
#[derive(Debug, Clone, PartialEq)]
pub struct ProductIndex {
    /// Index name
    pub name: String,
    pub shards: u32,
    pub replicas: u32,
}

impl ProductIndex {
    /// Create an index definition with a single shard and replica
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shards: 1,
            replicas: 1,
        }
    }

    pub fn shards(mut self, shards: u32) -> Self {
        self.shards = shards;
        self
    }

    pub fn replicas(mut self, replicas: u32) -> Self {
        self.replicas = replicas;
        self
    }

    /// `settings` block: shard layout and the autocomplete analyzers
    pub fn settings(&self) -> Value {
        json!({
            "number_of_shards": self.shards,
            "number_of_replicas": self.replicas,
            "analysis": {
                "analyzer": {
                    AUTOCOMPLETE_ANALYZER: {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "asciifolding", EDGE_NGRAM_FILTER]
                    },
                    AUTOCOMPLETE_SEARCH_ANALYZER: {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "asciifolding"]
                    }
                },
                "filter": {
                    EDGE_NGRAM_FILTER: {
                        "type": "edge_ngram",
                        "min_gram": MIN_GRAM,
                        "max_gram": MAX_GRAM
                    }
                }
            }
        })
    }

    /// `mappings` block for [`ProductDocument`](super::ProductDocument)
    pub fn mappings(&self) -> Value {
        json!({
            "properties": {
                (fields::ID): { "type": "keyword" },
                (fields::NAME): {
                    "type": "text",
                    "analyzer": "standard",
                    "fields": {
                        "keyword": { "type": "keyword" },
                        "autocomplete": {
                            "type": "text",
                            "analyzer": AUTOCOMPLETE_ANALYZER,
                            "search_analyzer": AUTOCOMPLETE_SEARCH_ANALYZER
                        }
                    }
                },
                (fields::DESCRIPTION): { "type": "text", "analyzer": "standard" },
                (fields::CATEGORY): { "type": "keyword" },
                (fields::SUBCATEGORIES): { "type": "keyword" },
                (fields::PRICE): { "type": "double" },
                (fields::LOCATION): { "type": "geo_point" },
                (fields::POPULARITY): { "type": "integer" },
                (fields::CREATED_AT): { "type": "date" },
                (fields::UPDATED_AT): { "type": "date" }
            }
        })
    }

    /// Full body for the create-index call
    pub fn create_body(&self) -> Value {
        json!({
            "settings": self.settings(),
            "mappings": self.mappings(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let index = ProductIndex::new("products");
        assert_eq!(index.shards, 1);
        assert_eq!(index.replicas, 1);
        assert_eq!(index.settings()["number_of_shards"], 1);
    }

    #[test]
    fn test_shard_layout_builder() {
        let index = ProductIndex::new("products").shards(3).replicas(0);
        let settings = index.settings();
        assert_eq!(settings["number_of_shards"], 3);
        assert_eq!(settings["number_of_replicas"], 0);
    }

    #[test]
    fn test_analyzers_are_asymmetric() {
        let settings = ProductIndex::new("products").settings();
        let analyzers = &settings["analysis"]["analyzer"];

        assert_eq!(
            analyzers["autocomplete"]["filter"],
            json!(["lowercase", "asciifolding", "autocomplete_filter"])
        );
        assert_eq!(analyzers["autocomplete_search"]["filter"], json!(["lowercase", "asciifolding"]));
        assert_eq!(
            settings["analysis"]["filter"]["autocomplete_filter"],
            json!({ "type": "edge_ngram", "min_gram": 2, "max_gram": 20 })
        );
    }

    #[test]
    fn test_name_sub_fields() {
        let mappings = ProductIndex::new("products").mappings();
        let name = &mappings["properties"]["name"];

        assert_eq!(name["type"], "text");
        assert_eq!(name["fields"]["keyword"]["type"], "keyword");
        assert_eq!(name["fields"]["autocomplete"]["analyzer"], "autocomplete");
        assert_eq!(name["fields"]["autocomplete"]["search_analyzer"], "autocomplete_search");
    }

    #[test]
    fn test_field_types() {
        let mappings = ProductIndex::new("products").mappings();
        let props = &mappings["properties"];

        assert_eq!(props["id"]["type"], "keyword");
        assert_eq!(props["category"]["type"], "keyword");
        assert_eq!(props["subcategories"]["type"], "keyword");
        assert_eq!(props["price"]["type"], "double");
        assert_eq!(props["location"]["type"], "geo_point");
        assert_eq!(props["popularity"]["type"], "integer");
        assert_eq!(props["createdAt"]["type"], "date");
        assert_eq!(props["updatedAt"]["type"], "date");
        assert_eq!(props.as_object().unwrap().len(), 10);
    }

    #[test]
    fn test_create_body() {
        let body = ProductIndex::new("products").create_body();
        assert!(body["settings"]["analysis"].is_object());
        assert!(body["mappings"]["properties"].is_object());
    }
}
