//! Product listing query: raw request parameters → filter/sort/pagination.
//!
//! Parsing never fails. Malformed tokens are dropped and malformed numbers fall
//! back to defaults, so every parameter combination yields a [`ProductQuery`].

use serde::{Deserialize, Serialize};

use catalog_products::{Product, ProductField};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Recognized query-string parameters of `GET /api/products`.
///
/// Every key is optional and kept as raw text; coercion happens in
/// [`ProductQuery::from_params`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQueryParams {
    pub code: Option<String>,
    pub energy_class: Option<String>,
    pub capacity: Option<String>,
    pub features: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ProductQueryParams {
    /// Collect recognized keys from decoded query-string pairs.
    ///
    /// Unknown keys are ignored; a repeated key keeps its last value.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "code" => &mut params.code,
                "energyClass" => &mut params.energy_class,
                "capacity" => &mut params.capacity,
                "features" => &mut params.features,
                "sortBy" => &mut params.sort_by,
                "order" => &mut params.order,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }
}

/// Resolved predicate over product documents.
///
/// Text matchers hold the literal user text; each store escapes it for its
/// own pattern dialect before use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive substring of `code`.
    pub code: Option<String>,
    /// `energyClass` must be one of these (uppercased) tokens.
    pub energy_classes: Option<Vec<String>>,
    /// `capacity` must equal one of these values.
    pub capacities: Option<Vec<f64>>,
    /// Every token must match some feature as `^token\W*$`, case-insensitively.
    pub features: Vec<String>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.energy_classes.is_none()
            && self.capacities.is_none()
            && self.features.is_empty()
    }

    /// Number of predicates applied.
    pub fn len(&self) -> usize {
        usize::from(self.code.is_some())
            + usize::from(self.energy_classes.is_some())
            + usize::from(self.capacities.is_some())
            + self.features.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` in any casing is descending; everything else ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: ProductField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: ProductField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: ProductField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    pub fn compare(&self, a: &Product, b: &Product) -> core::cmp::Ordering {
        let ord = a
            .field_value(self.field)
            .total_cmp(&b.field_value(self.field));
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Filter specification for one listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: Vec<SortKey>,
    pub page: u64,
    pub limit: u64,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            filter: ProductFilter::default(),
            sort: default_sort(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProductQuery {
    pub fn from_params(params: &ProductQueryParams) -> Self {
        Self {
            filter: ProductFilter {
                code: parse_code(params.code.as_deref()),
                energy_classes: parse_energy_classes(params.energy_class.as_deref()),
                capacities: parse_capacities(params.capacity.as_deref()),
                features: parse_features(params.features.as_deref()),
            },
            sort: parse_sort(params.sort_by.as_deref(), params.order.as_deref()),
            page: parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(params.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Number of matching records to skip: `(page - 1) * limit`.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Paths compared against typed (numeric or timestamp) fields, filter first.
    pub fn typed_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.filter.capacities.is_some() {
            paths.push(ProductField::Capacity.path());
        }
        for key in &self.sort {
            if (key.field.is_numeric() || key.field.is_timestamp())
                && !paths.contains(&key.field.path())
            {
                paths.push(key.field.path());
            }
        }
        paths
    }
}

pub fn default_sort() -> Vec<SortKey> {
    vec![SortKey::asc(ProductField::Name)]
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}

fn parse_code(raw: Option<&str>) -> Option<String> {
    non_blank(raw).map(|s| s.trim().to_string())
}

fn parse_energy_classes(raw: Option<&str>) -> Option<Vec<String>> {
    non_blank(raw).map(|s| s.split(',').map(|c| c.trim().to_uppercase()).collect())
}

fn parse_capacities(raw: Option<&str>) -> Option<Vec<f64>> {
    let capacities: Vec<f64> = non_blank(raw)?
        .split(',')
        .filter_map(|c| parse_leading_float(c.trim()))
        .collect();
    (!capacities.is_empty()).then_some(capacities)
}

fn parse_features(raw: Option<&str>) -> Vec<String> {
    match non_blank(raw) {
        Some(s) => s.split(',').map(|f| f.trim().to_string()).collect(),
        None => Vec::new(),
    }
}

fn parse_sort(sort_by: Option<&str>, order: Option<&str>) -> Vec<SortKey> {
    let Some(sort_by) = non_blank(sort_by) else {
        return default_sort();
    };
    let orders: Vec<&str> = order.unwrap_or("asc").split(',').collect();

    let mut keys: Vec<SortKey> = Vec::new();
    for (index, raw_field) in sort_by.split(',').enumerate() {
        let Some(field) = ProductField::from_path(raw_field.trim()) else {
            tracing::debug!(field = raw_field.trim(), "ignoring unknown sort field");
            continue;
        };
        let direction = SortDirection::parse(orders.get(index).copied());
        match keys.iter_mut().find(|k| k.field == field) {
            Some(existing) => existing.direction = direction,
            None => keys.push(SortKey { field, direction }),
        }
    }

    if keys.is_empty() { default_sort() } else { keys }
}

/// Leading-integer parse; zero, negative or missing values yield `None`.
fn parse_positive(raw: Option<&str>) -> Option<u64> {
    parse_leading_int(raw?).and_then(|n| u64::try_from(n).ok()).filter(|n| *n > 0)
}

/// Parse the integer prefix of `s` (after leading whitespace), e.g. `"12abc"` → 12.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = split_sign(s);
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude = rest[..digits]
        .bytes()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the decimal prefix of `s`, e.g. `"10.5kg"` → 10.5. `NaN` is never produced.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let (negative, rest) = split_sign(s);
    if rest.starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let bytes = rest.as_bytes();
    let mut end = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let mut mantissa_digits = end;
    if bytes.get(end) == Some(&b'.') {
        let frac = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        mantissa_digits += frac;
        if mantissa_digits > 0 {
            end += 1 + frac;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    let value: f64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}
