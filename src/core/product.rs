//! Products available for purchase

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An amount in minor currency units (cents).
pub type Cents = u64;

/// A product available for purchase.
///
/// Two products are equal when their names are equal; price, details and
/// preview media are ignored. Hashing follows the same rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub details: String,
    /// Price in minor units of the source currency.
    pub price: Cents,
    /// Reference to a promotional video or image.
    #[serde(default)]
    pub preview_media: Option<String>,
}

impl Product {
    pub fn new(name: &str, details: &str, price: Cents, preview_media: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            details: details.to_string(),
            price,
            preview_media: preview_media.map(str::to_string),
        }
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_uses_name_only() {
        let p1 = Product::new("Product A", "", 100, None);
        let p2 = Product::new("Product B", "", 100, None);
        let p3 = Product::new("Product A", "Something else", 200, Some("a.m4v"));

        assert_eq!(p1, p3);
        assert_ne!(p1, p2);
        assert_ne!(p2, p3);
    }

    #[test]
    fn test_hash_agrees_with_equality() {
        let mut set = HashSet::new();
        set.insert(Product::new("Milk", "One bottle of milk", 130, None));
        set.insert(Product::new("Milk", "Two bottles of milk", 260, None));

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let yaml = r#"
name: "Beans"
price: 73
"#;
        let product: Product = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(product.name, "Beans");
        assert_eq!(product.price, 73);
        assert!(product.details.is_empty());
        assert!(product.preview_media.is_none());
    }
}
