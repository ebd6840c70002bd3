//! Search-engine document for a product.
//!
//! Field names and types here are a compatibility contract with the index
//! mapping in [`index_manager`](super::index_manager); renaming a field breaks
//! every existing index.
//!
//! ```json
//! {
//!   "id": "8f0c...",
//!   "name": "Laptop HP Pavilion",
//!   "description": "...",
//!   "category": "Electronics",
//!   "subcategories": ["Laptops", "Computers"],
//!   "price": 999.99,
//!   "location": { "lat": 40.7128, "lon": -74.006 },
//!   "popularity": 150,
//!   "createdAt": "2024-01-01T10:00:00.000Z",
//!   "updatedAt": "2024-01-01T10:00:00.000Z"
//! }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::product::{Product, ProductError, ProductProps};

/// Indexed field names.
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const NAME_AUTOCOMPLETE: &str = "name.autocomplete";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const SUBCATEGORIES: &str = "subcategories";
    pub const PRICE: &str = "price";
    pub const LOCATION: &str = "location";
    pub const POPULARITY: &str = "popularity";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// Paired coordinates (`geo_point`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Wire representation of a [`Product`] in the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    pub price: f64,
    pub location: GeoPoint,
    #[serde(default)]
    pub popularity: u64,
    /// RFC 3339, millisecond precision
    pub created_at: String,
    pub updated_at: String,
}

/// Why a document could not be turned back into a [`Product`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Invalid timestamp in field '{field}': {value}")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error(transparent)]
    InvalidProduct(#[from] ProductError),
}

impl ProductDocument {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            category: product.category().to_string(),
            subcategories: product.subcategories(),
            price: product.price(),
            location: GeoPoint {
                lat: product.latitude(),
                lon: product.longitude(),
            },
            popularity: product.popularity(),
            created_at: format_timestamp(product.created_at()),
            updated_at: format_timestamp(product.updated_at()),
        }
    }

    /// Rebuild the domain product; re-runs product validation.
    pub fn into_product(self) -> Result<Product, DocumentError> {
        let created_at = parse_timestamp(fields::CREATED_AT, &self.created_at)?;
        let updated_at = parse_timestamp(fields::UPDATED_AT, &self.updated_at)?;

        Ok(Product::reconstitute(ProductProps {
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            subcategories: self.subcategories,
            price: self.price,
            latitude: self.location.lat,
            longitude: self.location.lon,
            popularity: Some(self.popularity),
            created_at,
            updated_at,
        })?)
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, DocumentError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| DocumentError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_product() -> Product {
        Product::reconstitute(ProductProps {
            id: "p-42".into(),
            name: "Laptop".into(),
            description: "Fast".into(),
            category: "Electronics".into(),
            subcategories: vec!["Laptops".into(), "Computers".into(), "Laptops".into()],
            price: 1299.5,
            latitude: 40.4168,
            longitude: -3.7038,
            popularity: Some(12),
            created_at: Utc.timestamp_millis_opt(1_704_103_200_123).unwrap(),
            updated_at: Utc.timestamp_millis_opt(1_704_189_600_456).unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_document_field_names() {
        let doc = ProductDocument::from_product(&sample_product());
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["id"], "p-42");
        assert_eq!(value["location"], json!({"lat": 40.4168, "lon": -3.7038}));
        assert_eq!(value["createdAt"], "2024-01-01T10:00:00.123Z");
        assert_eq!(value["updatedAt"], "2024-01-02T10:00:00.456Z");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let product = sample_product();
        let rebuilt = ProductDocument::from_product(&product).into_product().unwrap();

        assert_eq!(rebuilt, product);
        assert_eq!(rebuilt.subcategories(), vec!["Laptops", "Computers", "Laptops"]);
    }

    #[test]
    fn test_missing_popularity_reads_as_zero() {
        let doc: ProductDocument = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Mouse",
            "description": "",
            "category": "Electronics",
            "price": 10.0,
            "location": {"lat": 0.0, "lon": 0.0},
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();

        let product = doc.into_product().unwrap();
        assert_eq!(product.popularity(), 0);
        assert!(product.subcategories().is_empty());
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let mut doc = ProductDocument::from_product(&sample_product());
        doc.created_at = "yesterday".into();

        assert!(matches!(
            doc.into_product(),
            Err(DocumentError::InvalidTimestamp { field: "createdAt", .. })
        ));
    }

    #[test]
    fn test_invalid_product_rejected() {
        let mut doc = ProductDocument::from_product(&sample_product());
        doc.name = "  ".into();

        assert_eq!(
            doc.into_product(),
            Err(DocumentError::InvalidProduct(ProductError::MissingName))
        );
    }
}
