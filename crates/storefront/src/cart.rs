use catalog_products::Product;

/// Selected products, at most one per `code`.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a product with the same code is already present.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(&product.code) {
            return false;
        }
        self.items.push(product);
        true
    }

    pub fn remove(&mut self, code: &str) -> Option<Product> {
        let index = self.items.iter().position(|p| p.code == code)?;
        Some(self.items.remove(index))
    }

    /// Add if absent, remove if present. Returns whether it is now in the cart.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.remove(&product.code).is_some() {
            false
        } else {
            self.items.push(product.clone());
            true
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.items.iter().any(|p| p.code == code)
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of item price values.
    pub fn total(&self) -> f64 {
        self.items.iter().map(|p| p.price.value).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
