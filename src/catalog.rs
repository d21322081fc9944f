//! # Catalog
//!
//! Wire shapes shared with the storefront backend.
//!
//! ## Products
//! - `GET /products` and `GET /products/search?value=` both return a list of [`CatalogItem`]
//! - Replaced wholesale on every successful fetch, never patched
//! - A rating above [`MAX_RATING`] fails decoding like any other malformed field
//!
//! ## Cart
//! - `GET /cart` and `POST /cart` return a list of [`CartEntry`]
//! - Quantities are at least 1, the store deletes lines instead of storing zero
use serde::{Deserialize, Deserializer, Serialize, de};

pub const MAX_RATING: u8 = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(rename = "cost")]
    pub unit_cost: f64,
    #[serde(deserialize_with = "rating")]
    pub rating: u8,
    #[serde(rename = "image")]
    pub image_ref: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub product_id: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = u8::deserialize(deserializer)?;

    if value > MAX_RATING {
        return Err(de::Error::custom(format!(
            "rating {value} is out of range 0-{MAX_RATING}"
        )));
    }

    Ok(value)
}

impl CartEntry {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}
