use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{DocumentId, DomainError, DomainResult};

/// Energy efficiency rating, `A` (best) through `G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergyClass {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl EnergyClass {
    pub const ALL: [EnergyClass; 7] = [
        EnergyClass::A,
        EnergyClass::B,
        EnergyClass::C,
        EnergyClass::D,
        EnergyClass::E,
        EnergyClass::F,
        EnergyClass::G,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyClass::A => "A",
            EnergyClass::B => "B",
            EnergyClass::C => "C",
            EnergyClass::D => "D",
            EnergyClass::E => "E",
            EnergyClass::F => "F",
            EnergyClass::G => "G",
        }
    }
}

impl core::fmt::Display for EnergyClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for EnergyClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnergyClass::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(format!("energy class must be one of A-G, got {s:?}"))
            })
    }
}

/// Installment plan: per-period payment value and number of periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub value: f64,
    pub period: f64,
}

/// Product price with its installment plan and validity window.
///
/// No ordering is enforced between `valid_from` and `valid_to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub value: f64,
    pub currency: String,
    pub installment: Installment,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

/// Product as supplied to seeding (no store identity yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub image: String,
    pub code: String,
    pub name: String,
    pub color: String,
    pub capacity: f64,
    pub dimensions: String,
    pub features: Vec<String>,
    pub energy_class: EnergyClass,
    pub price: Price,
}

/// Catalog document: the only persistent entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub image: String,
    pub code: String,
    pub name: String,
    pub color: String,
    pub capacity: f64,
    pub dimensions: String,
    pub features: Vec<String>,
    pub energy_class: EnergyClass,
    pub price: Price,
}

impl Product {
    /// Validate an input and assign it a fresh document id.
    pub fn create(input: ProductInput) -> DomainResult<Self> {
        Self::create_with_id(DocumentId::new(), input)
    }

    pub fn create_with_id(id: DocumentId, input: ProductInput) -> DomainResult<Self> {
        if input.code.trim().is_empty() {
            return Err(DomainError::validation("code cannot be empty"));
        }
        if input.name.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "name cannot be empty (code {})",
                input.code
            )));
        }
        if !input.capacity.is_finite() {
            return Err(DomainError::validation(format!(
                "capacity must be a finite number (code {})",
                input.code
            )));
        }
        if !input.price.value.is_finite() {
            return Err(DomainError::validation(format!(
                "price value must be a finite number (code {})",
                input.code
            )));
        }

        Ok(Self {
            id,
            image: input.image,
            code: input.code,
            name: input.name,
            color: input.color,
            capacity: input.capacity,
            dimensions: input.dimensions,
            features: input.features,
            energy_class: input.energy_class,
            price: input.price,
        })
    }

    /// Read a sortable field.
    pub fn field_value(&self, field: ProductField) -> FieldValue<'_> {
        match field {
            ProductField::Name => FieldValue::Text(&self.name),
            ProductField::Code => FieldValue::Text(&self.code),
            ProductField::Color => FieldValue::Text(&self.color),
            ProductField::Capacity => FieldValue::Number(self.capacity),
            ProductField::Dimensions => FieldValue::Text(&self.dimensions),
            ProductField::EnergyClass => FieldValue::Text(self.energy_class.as_str()),
            ProductField::PriceValue => FieldValue::Number(self.price.value),
            ProductField::PriceCurrency => FieldValue::Text(&self.price.currency),
            ProductField::InstallmentValue => FieldValue::Number(self.price.installment.value),
            ProductField::InstallmentPeriod => FieldValue::Number(self.price.installment.period),
            ProductField::ValidFrom => FieldValue::Timestamp(self.price.valid_from),
            ProductField::ValidTo => FieldValue::Timestamp(self.price.valid_to),
        }
    }
}

/// Scalar document fields addressable by their dotted JSON path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Code,
    Color,
    Capacity,
    Dimensions,
    EnergyClass,
    PriceValue,
    PriceCurrency,
    InstallmentValue,
    InstallmentPeriod,
    ValidFrom,
    ValidTo,
}

impl ProductField {
    pub const ALL: [ProductField; 12] = [
        ProductField::Name,
        ProductField::Code,
        ProductField::Color,
        ProductField::Capacity,
        ProductField::Dimensions,
        ProductField::EnergyClass,
        ProductField::PriceValue,
        ProductField::PriceCurrency,
        ProductField::InstallmentValue,
        ProductField::InstallmentPeriod,
        ProductField::ValidFrom,
        ProductField::ValidTo,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            ProductField::Name => "name",
            ProductField::Code => "code",
            ProductField::Color => "color",
            ProductField::Capacity => "capacity",
            ProductField::Dimensions => "dimensions",
            ProductField::EnergyClass => "energyClass",
            ProductField::PriceValue => "price.value",
            ProductField::PriceCurrency => "price.currency",
            ProductField::InstallmentValue => "price.installment.value",
            ProductField::InstallmentPeriod => "price.installment.period",
            ProductField::ValidFrom => "price.validFrom",
            ProductField::ValidTo => "price.validTo",
        }
    }

    /// Path segments, as used for JSON document lookups.
    pub fn segments(&self) -> Vec<&'static str> {
        self.path().split('.').collect()
    }

    pub fn from_path(path: &str) -> Option<Self> {
        ProductField::ALL.into_iter().find(|f| f.path() == path)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ProductField::Capacity
                | ProductField::PriceValue
                | ProductField::InstallmentValue
                | ProductField::InstallmentPeriod
        )
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, ProductField::ValidFrom | ProductField::ValidTo)
    }
}

impl core::fmt::Display for ProductField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

/// Borrowed value of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Timestamp(DateTime<Utc>),
}

impl FieldValue<'_> {
    /// Total order across values; mixed kinds order Number < Text < Timestamp.
    pub fn total_cmp(&self, other: &FieldValue<'_>) -> core::cmp::Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Number(_) => 0,
            FieldValue::Text(_) => 1,
            FieldValue::Timestamp(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_input() -> ProductInput {
        ProductInput {
            image: "https://example.com/image1.jpg".to_string(),
            code: "WW90T754ABT".to_string(),
            name: "Pralka QuickDrive™".to_string(),
            color: "biała".to_string(),
            capacity: 9.0,
            dimensions: "55 x 60 x 85 cm".to_string(),
            features: vec!["Drzwi AddWash™".to_string(), "Panel AI Control".to_string()],
            energy_class: EnergyClass::A,
            price: Price {
                value: 2999.1,
                currency: "zł".to_string(),
                installment: Installment {
                    value: 53.31,
                    period: 60.0,
                },
                valid_from: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
                valid_to: Utc.with_ymd_and_hms(2021, 12, 31, 0, 0, 0).unwrap(),
            },
        }
    }

    #[test]
    fn create_assigns_id_and_keeps_fields() {
        let product = Product::create(test_input()).unwrap();
        assert_eq!(product.code, "WW90T754ABT");
        assert_eq!(product.energy_class, EnergyClass::A);
    }

    #[test]
    fn create_rejects_blank_code() {
        let mut input = test_input();
        input.code = "   ".to_string();
        let err = Product::create(input).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_blank_name() {
        let mut input = test_input();
        input.name = String::new();
        assert!(Product::create(input).is_err());
    }

    #[test]
    fn create_rejects_non_finite_capacity() {
        let mut input = test_input();
        input.capacity = f64::NAN;
        assert!(Product::create(input).is_err());
    }

    #[test]
    fn price_window_is_not_validated() {
        let mut input = test_input();
        core::mem::swap(&mut input.price.valid_from, &mut input.price.valid_to);
        assert!(Product::create(input).is_ok());
    }

    #[test]
    fn serializes_with_document_field_names() {
        let product = Product::create(test_input()).unwrap();
        let json = serde_json::to_value(&product).unwrap();

        assert!(json.get("_id").is_some());
        assert_eq!(json["energyClass"], "A");
        assert_eq!(json["capacity"], 9.0);
        assert_eq!(json["price"]["installment"]["period"], 60.0);
        assert!(json["price"]["validFrom"].as_str().unwrap().starts_with("2021-01-01"));
    }

    #[test]
    fn input_rejects_unknown_energy_class() {
        let mut json = serde_json::to_value(test_input()).unwrap();
        json["energyClass"] = serde_json::json!("Z");
        assert!(serde_json::from_value::<ProductInput>(json).is_err());
    }

    #[test]
    fn energy_class_parses_only_exact_letters() {
        assert_eq!("C".parse::<EnergyClass>().unwrap(), EnergyClass::C);
        assert!("c".parse::<EnergyClass>().is_err());
        assert!("H".parse::<EnergyClass>().is_err());
    }

    #[test]
    fn every_field_path_resolves_back_to_itself() {
        for field in ProductField::ALL {
            assert_eq!(ProductField::from_path(field.path()), Some(field));
        }
        assert_eq!(ProductField::from_path("price"), None);
        assert_eq!(ProductField::from_path("features"), None);
    }

    #[test]
    fn field_value_reads_nested_price_fields() {
        let product = Product::create(test_input()).unwrap();
        assert_eq!(
            product.field_value(ProductField::PriceValue),
            FieldValue::Number(2999.1)
        );
        assert_eq!(
            product.field_value(ProductField::EnergyClass),
            FieldValue::Text("A")
        );
        assert_eq!(ProductField::InstallmentPeriod.segments(), vec!["price", "installment", "period"]);
    }

    proptest::proptest! {
        #[test]
        fn number_ordering_is_antisymmetric(a in -1e9f64..1e9, b in -1e9f64..1e9) {
            let x = FieldValue::Number(a);
            let y = FieldValue::Number(b);
            proptest::prop_assert_eq!(x.total_cmp(&y), y.total_cmp(&x).reverse());
        }
    }
}
