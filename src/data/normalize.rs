//! Row Normalization Module
//! Coerces raw string rows into immutable order records.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Column names expected in the source table.
pub const COL_CITY: &str = "City";
pub const COL_PRODUCT: &str = "Product";
pub const COL_PURCHASE_TYPE: &str = "Purchase Type";
pub const COL_PRICE: &str = "Price";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_DATE: &str = "Date";

/// Why a single row was rejected during normalization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("missing value in column `{0}`")]
    Missing(&'static str),
    #[error("value `{value}` in column `{column}` is not numeric")]
    NonNumeric { column: &'static str, value: String },
    #[error("negative price {0}")]
    NegativePrice(f64),
}

/// One normalized order line. Immutable once constructed; `revenue` is
/// always derived from `price` and `quantity`, never read from the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub city: String,
    pub product: String,
    /// Canonical purchase channel; `None` when the source value reduced to
    /// empty or the literal `Unknown`.
    pub purchase_type: Option<String>,
    pub price: f64,
    pub quantity: u64,
    pub date: Option<NaiveDate>,
    pub revenue: f64,
}

impl Record {
    pub fn new(
        city: String,
        product: String,
        purchase_type: Option<String>,
        price: f64,
        quantity: u64,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            city,
            product,
            purchase_type,
            price,
            quantity,
            date,
            revenue: price * quantity as f64,
        }
    }
}

/// Raw field values for one row, exactly as read from the table.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawRow {
    pub city: Option<String>,
    pub product: Option<String>,
    pub purchase_type: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub date: Option<String>,
}

/// Validate and coerce one raw row. Strict: a missing or malformed
/// price/quantity rejects the row instead of propagating NaN into sums.
pub(crate) fn normalize_row(raw: &RawRow) -> Result<Record, SkipReason> {
    let city = non_empty(raw.city.as_deref(), COL_CITY)?;
    let product = non_empty(raw.product.as_deref(), COL_PRODUCT)?;
    let price = parse_price(raw.price.as_deref())?;
    let quantity = parse_quantity(raw.quantity.as_deref())?;
    let purchase_type = raw.purchase_type.as_deref().and_then(canonical_purchase_type);
    let date = raw.date.as_deref().and_then(parse_date);

    Ok(Record::new(city, product, purchase_type, price, quantity, date))
}

/// Trimmed, non-empty string field. Blank and absent are treated alike so
/// incidental whitespace cannot create phantom group keys.
fn non_empty(value: Option<&str>, column: &'static str) -> Result<String, SkipReason> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(SkipReason::Missing(column)),
    }
}

fn parse_price(value: Option<&str>) -> Result<f64, SkipReason> {
    let raw = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(SkipReason::Missing(COL_PRICE)),
    };
    let price: f64 = raw.parse().map_err(|_| SkipReason::NonNumeric {
        column: COL_PRICE,
        value: raw.to_string(),
    })?;
    if !price.is_finite() {
        return Err(SkipReason::NonNumeric {
            column: COL_PRICE,
            value: raw.to_string(),
        });
    }
    if price < 0.0 {
        return Err(SkipReason::NegativePrice(price));
    }
    Ok(price)
}

fn parse_quantity(value: Option<&str>) -> Result<u64, SkipReason> {
    let raw = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(SkipReason::Missing(COL_QUANTITY)),
    };
    raw.parse().map_err(|_| SkipReason::NonNumeric {
        column: COL_QUANTITY,
        value: raw.to_string(),
    })
}

/// Canonical purchase channel: the segment before the first tab or run of
/// two-or-more spaces, trimmed. Compound qualifiers after the separator
/// (e.g. `"Online   Gift Card"`) are dropped. Empty and literal `Unknown`
/// values carry no category.
pub(crate) fn canonical_purchase_type(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let cut = match (trimmed.find("  "), trimmed.find('\t')) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    let head = match cut {
        Some(i) => trimmed[..i].trim_end(),
        None => trimmed,
    };
    if head.is_empty() || head == "Unknown" {
        None
    } else {
        Some(head.to_string())
    }
}

/// Dates arrive in day-month-year order with `-` separators.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d-%m-%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(city: &str, product: &str, ptype: &str, price: &str, qty: &str) -> RawRow {
        RawRow {
            city: Some(city.to_string()),
            product: Some(product.to_string()),
            purchase_type: Some(ptype.to_string()),
            price: Some(price.to_string()),
            quantity: Some(qty.to_string()),
            date: None,
        }
    }

    #[test]
    fn revenue_is_derived_from_price_and_quantity() {
        let record = normalize_row(&raw("Paris", "Burger", "Online", "5", "2")).unwrap();
        assert_eq!(record.revenue, 10.0);
        assert_eq!(record.price, 5.0);
        assert_eq!(record.quantity, 2);
    }

    #[test]
    fn string_fields_are_trimmed() {
        let record = normalize_row(&raw("  Paris ", " Burger", "Online", "5", "2")).unwrap();
        assert_eq!(record.city, "Paris");
        assert_eq!(record.product, "Burger");
    }

    #[test]
    fn missing_price_rejects_the_row() {
        let mut row = raw("Paris", "Burger", "Online", "5", "2");
        row.price = None;
        assert_eq!(normalize_row(&row), Err(SkipReason::Missing(COL_PRICE)));
        row.price = Some("   ".to_string());
        assert_eq!(normalize_row(&row), Err(SkipReason::Missing(COL_PRICE)));
    }

    #[test]
    fn non_numeric_quantity_rejects_the_row() {
        let row = raw("Paris", "Burger", "Online", "5", "two");
        assert!(matches!(
            normalize_row(&row),
            Err(SkipReason::NonNumeric { column, .. }) if column == COL_QUANTITY
        ));
    }

    #[test]
    fn negative_price_rejects_the_row() {
        let row = raw("Paris", "Burger", "Online", "-1.5", "2");
        assert_eq!(normalize_row(&row), Err(SkipReason::NegativePrice(-1.5)));
    }

    #[test]
    fn blank_city_rejects_the_row() {
        let row = raw("   ", "Burger", "Online", "5", "2");
        assert_eq!(normalize_row(&row), Err(SkipReason::Missing(COL_CITY)));
    }

    #[test]
    fn purchase_type_keeps_segment_before_compound_separator() {
        assert_eq!(
            canonical_purchase_type("Online \t Gift Card"),
            Some("Online".to_string())
        );
        assert_eq!(
            canonical_purchase_type("Online   Gift Card"),
            Some("Online".to_string())
        );
        assert_eq!(canonical_purchase_type("In-store  "), Some("In-store".to_string()));
    }

    #[test]
    fn single_spaced_purchase_type_is_kept_whole() {
        assert_eq!(
            canonical_purchase_type("Home Delivery"),
            Some("Home Delivery".to_string())
        );
    }

    #[test]
    fn empty_and_unknown_purchase_types_carry_no_category() {
        assert_eq!(canonical_purchase_type(""), None);
        assert_eq!(canonical_purchase_type("   "), None);
        assert_eq!(canonical_purchase_type("Unknown"), None);
        let record = normalize_row(&raw("Paris", "Burger", "Unknown", "5", "2")).unwrap();
        assert_eq!(record.purchase_type, None);
        assert_eq!(record.revenue, 10.0);
    }

    #[test]
    fn dates_parse_day_month_year() {
        let mut row = raw("Paris", "Burger", "Online", "5", "2");
        row.date = Some("17-08-2022".to_string());
        let record = normalize_row(&row).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2022, 8, 17));
    }

    #[test]
    fn malformed_dates_leave_the_record_dateless() {
        let mut row = raw("Paris", "Burger", "Online", "5", "2");
        row.date = Some("2022/08/17".to_string());
        assert_eq!(normalize_row(&row).unwrap().date, None);
        row.date = Some("not a date".to_string());
        assert_eq!(normalize_row(&row).unwrap().date, None);
    }
}
