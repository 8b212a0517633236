use super::product::Product;

/// Products on offer.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The built-in demo catalog.
    pub fn prototype() -> Self {
        Self::new(vec![
            Product::new("Beans", "One can of beans", 73, None),
            Product::new("Eggs", "One dozen eggs", 210, None),
            Product::new("Milk", "One bottle of milk", 130, None),
            Product::new("Peas", "One bag of peas", 95, None),
        ])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive lookup by product name.
    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::prototype()
    }
}
