//! Product value object.
//!
//! The [`Product`] is the catalog record that flows through the search facade.
//! It is immutable once built: every constructor normalizes and validates, and
//! accessors hand out snapshots rather than the internal storage.
//!
//! # Example
//!
//! ```
//! use catalog_search::{NewProduct, Product};
//!
//! let product = Product::create(NewProduct {
//!     name: "  Laptop HP Pavilion ".into(),
//!     description: "High-performance laptop".into(),
//!     category: "Electronics".into(),
//!     subcategories: vec!["Laptops".into(), "  ".into(), " Computers".into()],
//!     price: 999.99,
//!     latitude: 40.7128,
//!     longitude: -74.006,
//! })
//! .unwrap();
//!
//! assert_eq!(product.name(), "Laptop HP Pavilion");
//! assert_eq!(product.subcategories(), vec!["Laptops", "Computers"]);
//! assert_eq!(product.popularity(), 0);
//! ```

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Reasons a product cannot be built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProductError {
    #[error("Product id is required")]
    MissingId,
    #[error("Product name is required")]
    MissingName,
    #[error("Product category is required")]
    MissingCategory,
    #[error("Product price must be a non-negative number, got {0}")]
    InvalidPrice(f64),
    #[error("Latitude must be within [-90, 90], got {0}")]
    InvalidLatitude(f64),
    #[error("Longitude must be within [-180, 180], got {0}")]
    InvalidLongitude(f64),
}

/// Input for [`Product::create`]. Identity, timestamps and popularity are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Full set of product attributes, as persisted or indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProps {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Missing popularity is read as zero
    #[serde(default)]
    pub popularity: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated, normalized catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: String,
    name: String,
    description: String,
    category: String,
    subcategories: Vec<String>,
    price: f64,
    latitude: f64,
    longitude: f64,
    popularity: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a brand new product with a fresh id, current timestamps and zero popularity.
    ///
    /// Timestamps are truncated to milliseconds, the precision of the search document.
    pub fn create(input: NewProduct) -> Result<Self, ProductError> {
        let now = Utc::now().trunc_subsecs(3);
        Self::reconstitute(ProductProps {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            category: input.category,
            subcategories: input.subcategories,
            price: input.price,
            latitude: input.latitude,
            longitude: input.longitude,
            popularity: Some(0),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a product from a persisted or indexed representation.
    ///
    /// Id and timestamps are kept as given; strings are normalized and the
    /// invariants re-checked exactly as in [`Product::create`].
    pub fn reconstitute(props: ProductProps) -> Result<Self, ProductError> {
        let id = props.id.trim().to_string();
        let name = props.name.trim().to_string();
        let category = props.category.trim().to_string();
        let subcategories = normalize_subcategories(props.subcategories);

        if id.is_empty() {
            return Err(ProductError::MissingId);
        }
        if name.is_empty() {
            return Err(ProductError::MissingName);
        }
        if category.is_empty() {
            return Err(ProductError::MissingCategory);
        }
        if !props.price.is_finite() || props.price < 0.0 {
            return Err(ProductError::InvalidPrice(props.price));
        }
        if !(-90.0..=90.0).contains(&props.latitude) {
            return Err(ProductError::InvalidLatitude(props.latitude));
        }
        if !(-180.0..=180.0).contains(&props.longitude) {
            return Err(ProductError::InvalidLongitude(props.longitude));
        }

        Ok(Self {
            id,
            name,
            description: props.description.trim().to_string(),
            category,
            subcategories,
            price: props.price,
            latitude: props.latitude,
            longitude: props.longitude,
            popularity: props.popularity.unwrap_or(0),
            created_at: props.created_at,
            updated_at: props.updated_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Owned snapshot of the subcategories, in their original order.
    pub fn subcategories(&self) -> Vec<String> {
        self.subcategories.clone()
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn popularity(&self) -> u64 {
        self.popularity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Owned copy of every attribute (for adapters and response shaping).
    pub fn to_props(&self) -> ProductProps {
        ProductProps {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            subcategories: self.subcategories.clone(),
            price: self.price,
            latitude: self.latitude,
            longitude: self.longitude,
            popularity: Some(self.popularity),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn normalize_subcategories(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
