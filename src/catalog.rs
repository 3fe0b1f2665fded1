//! Product Catalog
//!
//! The storefront sells a fixed set of products. The catalog is seeded once
//! at startup and never changes for the lifetime of the process.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const PLACEHOLDER_IMAGE: &str = "https://g-bpixyxtm9l0.vusercontent.net/placeholder.svg";

/// A product offered by the storefront
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier
    pub id: u32,

    /// Display name
    pub name: String,

    /// Unit price in the major currency unit (rupees)
    pub price: Decimal,

    /// Image URL, display only
    pub image: String,

    /// Display text
    pub description: String,

    /// Average rating in `[0, 5]`
    pub rating: f32,

    /// Number of reviews behind `rating`
    pub reviews: u32,
}

/// Immutable list of products available for the session
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Catalog {
    /// Builds a catalog from an explicit product list
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The storefront's built-in product line
    pub fn seeded() -> Self {
        let seed: [(u32, &str, i64, &str, &str, f32, u32); 8] = [
            (1, "Classic T-Shirt", 1499, PLACEHOLDER_IMAGE, "A comfortable and stylish t-shirt for everyday wear.", 4.5, 120),
            (2, "Denim Jeans", 3999, PLACEHOLDER_IMAGE, "High-quality denim jeans that are both durable and fashionable.", 4.2, 85),
            (3, "Sneakers", 5999, "https://chandogi.com/wp-content/uploads/2024/01/Dhadkan_20Blue.jpg", "Lightweight and comfortable sneakers perfect for any casual occasion.", 4.7, 200),
            (4, "Leather Wallet", 2499, PLACEHOLDER_IMAGE, "A sleek and practical leather wallet with multiple card slots.", 4.0, 50),
            (5, "Sunglasses", 2999, PLACEHOLDER_IMAGE, "Stylish sunglasses that offer 100% UV protection.", 4.3, 75),
            (6, "Wristwatch", 7999, PLACEHOLDER_IMAGE, "An elegant wristwatch that combines style with functionality.", 4.6, 110),
            (7, "Backpack", 3499, PLACEHOLDER_IMAGE, "A spacious and durable backpack for your daily adventures.", 4.4, 95),
            (8, "Wireless Earbuds", 8999, PLACEHOLDER_IMAGE, "High-quality wireless earbuds with noise cancellation.", 4.8, 150),
        ];

        let products = seed
            .into_iter()
            .map(|(id, name, price, image, description, rating, reviews)| Product {
                id,
                name: name.to_string(),
                price: Decimal::from(price),
                image: image.to_string(),
                description: description.to_string(),
                rating,
                reviews,
            })
            .collect();

        Self { products }
    }

    /// All products in display order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks a product up by id
    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_has_unique_ids() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.products().len(), 8);

        let mut ids: Vec<u32> = catalog.products().iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 8, "product ids must be unique");
    }

    #[test]
    fn lookup_by_id() {
        let catalog = Catalog::seeded();
        let jeans = catalog.get(2).unwrap();
        assert_eq!(jeans.name, "Denim Jeans");
        assert_eq!(jeans.price, Decimal::from(3999));
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn ratings_within_bounds() {
        for product in Catalog::seeded().products() {
            assert!((0.0..=5.0).contains(&product.rating), "{}", product.name);
        }
    }
}
