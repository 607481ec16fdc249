//! Search and facet state, and its translation to request parameters.

use catalog_products::{EnergyClass, ProductField};

use crate::types::ProductsRequest;

/// Sort choices offered to shoppers. Always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    Price,
    Capacity,
}

impl SortOption {
    pub fn field(&self) -> ProductField {
        match self {
            SortOption::Price => ProductField::PriceValue,
            SortOption::Capacity => ProductField::Capacity,
        }
    }
}

/// Explicit filter state owned by the caller.
///
/// Facets keep the order in which values were toggled on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    query: String,
    sort: Option<SortOption>,
    capacity: Vec<f64>,
    energy_class: Vec<EnergyClass>,
    feature: Vec<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> Option<SortOption> {
        self.sort
    }

    pub fn capacity(&self) -> &[f64] {
        &self.capacity
    }

    pub fn energy_class(&self) -> &[EnergyClass] {
        &self.energy_class
    }

    pub fn feature(&self) -> &[String] {
        &self.feature
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_sort(&mut self, sort: Option<SortOption>) {
        self.sort = sort;
    }

    /// Returns whether `value` is selected afterwards.
    pub fn toggle_capacity(&mut self, value: f64) -> bool {
        toggle(&mut self.capacity, value)
    }

    pub fn toggle_energy_class(&mut self, value: EnergyClass) -> bool {
        toggle(&mut self.energy_class, value)
    }

    pub fn toggle_feature(&mut self, value: impl Into<String>) -> bool {
        toggle(&mut self.feature, value.into())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Request parameters for one page of results.
    pub fn to_request(&self, page: u64, limit: u64) -> ProductsRequest {
        let query = self.query.trim();
        ProductsRequest {
            code: (!query.is_empty()).then(|| query.to_string()),
            energy_class: join(&self.energy_class),
            capacity: join(&self.capacity),
            features: join(&self.feature),
            sort_by: self.sort.map(|s| s.field().path().to_string()),
            order: self.sort.map(|_| "asc".to_string()),
            page,
            limit,
        }
    }
}

fn toggle<T: PartialEq>(values: &mut Vec<T>, value: T) -> bool {
    match values.iter().position(|v| *v == value) {
        Some(index) => {
            values.remove(index);
            false
        }
        None => {
            values.push(value);
            true
        }
    }
}

fn join<T: ToString>(values: &[T]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(T::to_string).collect::<Vec<_>>().join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_requests_only_pagination() {
        let request = FilterState::new().to_request(1, 10);
        assert_eq!(
            request,
            ProductsRequest {
                page: 1,
                limit: 10,
                ..ProductsRequest::default()
            }
        );
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded, serde_json::json!({ "page": 1, "limit": 10 }));
    }

    #[test]
    fn toggling_twice_removes_the_value() {
        let mut state = FilterState::new();
        assert!(state.toggle_energy_class(EnergyClass::A));
        assert!(state.toggle_energy_class(EnergyClass::C));
        assert!(!state.toggle_energy_class(EnergyClass::A));
        assert_eq!(state.energy_class(), &[EnergyClass::C]);
    }

    #[test]
    fn facets_join_in_selection_order() {
        let mut state = FilterState::new();
        state.toggle_capacity(10.5);
        state.toggle_capacity(8.0);
        state.toggle_energy_class(EnergyClass::B);
        state.toggle_energy_class(EnergyClass::A);
        state.toggle_feature("Panel AI Control");
        state.toggle_feature("Drzwi AddWash™");

        let request = state.to_request(2, 10);
        assert_eq!(request.capacity.as_deref(), Some("10.5,8"));
        assert_eq!(request.energy_class.as_deref(), Some("B,A"));
        assert_eq!(request.features.as_deref(), Some("Panel AI Control,Drzwi AddWash™"));
        assert_eq!(request.page, 2);
    }

    #[test]
    fn sort_maps_to_field_path_ascending() {
        let mut state = FilterState::new();
        state.set_sort(Some(SortOption::Price));
        let request = state.to_request(1, 10);
        assert_eq!(request.sort_by.as_deref(), Some("price.value"));
        assert_eq!(request.order.as_deref(), Some("asc"));

        state.set_sort(Some(SortOption::Capacity));
        assert_eq!(state.to_request(1, 10).sort_by.as_deref(), Some("capacity"));

        state.set_sort(None);
        assert_eq!(state.to_request(1, 10).order, None);
    }

    #[test]
    fn search_text_becomes_trimmed_code() {
        let mut state = FilterState::new();
        state.set_query("  ww90 ");
        assert_eq!(state.to_request(1, 10).code.as_deref(), Some("ww90"));

        state.set_query("   ");
        assert_eq!(state.to_request(1, 10).code, None);
    }
}
