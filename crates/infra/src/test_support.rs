use chrono::{TimeZone, Utc};

use catalog_products::{EnergyClass, Installment, Price, Product, ProductInput};

pub fn input(code: &str, name: &str) -> ProductInput {
    ProductInput {
        image: format!("https://img.example/{code}.png"),
        code: code.to_string(),
        name: name.to_string(),
        color: "biała".to_string(),
        capacity: 8.0,
        dimensions: "55 x 60 x 85 cm".to_string(),
        features: vec!["Panel AI Control".to_string()],
        energy_class: EnergyClass::B,
        price: Price {
            value: 2499.99,
            currency: "zł".to_string(),
            installment: Installment {
                value: 53.2,
                period: 60.0,
            },
            valid_from: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            valid_to: Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap(),
        },
    }
}

pub fn product(code: &str, name: &str) -> Product {
    Product::create(input(code, name)).unwrap()
}

pub fn product_with(code: &str, name: &str, edit: impl FnOnce(&mut Product)) -> Product {
    let mut p = product(code, name);
    edit(&mut p);
    p
}
