//! Shopping cart

use super::product::{Cents, Product};

/// A shopping cart that products can be added to or removed from.
///
/// Line items keep insertion order and the same product may appear more than
/// once. Indexing past the end is a caller bug and panics.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    products: Vec<Product>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a product to the end of the cart.
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Removes and returns the product at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.count()`.
    pub fn remove(&mut self, index: usize) -> Product {
        assert!(
            index < self.products.len(),
            "cart index {index} out of range for {} items",
            self.products.len()
        );
        self.products.remove(index)
    }

    /// Total number of line items, not unique products.
    pub fn count(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Returns the product at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.count()`.
    pub fn product(&self, index: usize) -> &Product {
        assert!(
            index < self.products.len(),
            "cart index {index} out of range for {} items",
            self.products.len()
        );
        &self.products[index]
    }

    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Sum of all line item prices.
    pub fn total_price(&self) -> Cents {
        self.products.iter().map(|p| p.price).sum()
    }
}
