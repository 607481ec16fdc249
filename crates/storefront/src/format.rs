use std::fmt;

/// Price split for display as `unit.decimal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPrice {
    pub unit: String,
    /// Always two digits.
    pub decimal: String,
}

impl fmt::Display for FormattedPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.unit, self.decimal)
    }
}

/// Round to cents and split into whole and fractional parts.
pub fn format_price(value: f64) -> FormattedPrice {
    let cents = (value * 100.0).round();
    let negative = cents < 0.0;
    let cents = cents.abs();
    let unit = (cents / 100.0).trunc();
    let decimal = cents - unit * 100.0;

    FormattedPrice {
        unit: format!("{}{unit:.0}", if negative { "-" } else { "" }),
        decimal: format!("{decimal:02.0}"),
    }
}
