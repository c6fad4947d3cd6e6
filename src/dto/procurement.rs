use chrono::NaiveDate;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::errors::ServiceError;

/// Distinct item requested on an RFQ, with the quantity asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfqItem {
    pub item_code: String,
    pub item_name: String,
    pub uom: String,
    pub qty: f64,
}

/// A line from a submitted supplier quotation, joined with its parent quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    /// Supplier Quotation Item identifier
    pub name: String,
    /// Parent Supplier Quotation identifier
    pub quotation: String,
    pub supplier: String,
    pub item_code: String,
    pub item_name: String,
    pub uom: String,
    pub qty: f64,
    pub rate: Option<f64>,
    pub currency: Option<String>,
    pub custom_po_created: bool,
}

/// The fields of a Purchase Order line that take part in duplicate detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    pub item_code: String,
    pub qty: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPurchaseOrder {
    pub supplier: String,
    pub company: String,
    pub currency: String,
    pub transaction_date: NaiveDate,
    pub schedule_date: NaiveDate,
    pub items: Vec<NewPurchaseOrderLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPurchaseOrderLine {
    pub item_code: String,
    pub item_name: Option<String>,
    pub uom: Option<String>,
    pub qty: f64,
    pub rate: f64,
    pub schedule_date: NaiveDate,
    pub uom_conversion_factor: f64,
}

/// A quotation line picked in the comparison report for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Selection {
    #[validate(length(min = 1, message = "supplier is required"))]
    pub supplier: String,
    #[validate(length(min = 1, message = "item_code is required"))]
    pub item_code: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub qty: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub rate: f64,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub uom: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Supplier Quotation Item the selection came from
    #[serde(default)]
    pub quotation_item: Option<String>,
}

impl Selection {
    pub fn new(supplier: &str, item_code: &str, qty: f64, rate: f64) -> Self {
        Self {
            supplier: supplier.to_string(),
            item_code: item_code.to_string(),
            qty,
            rate,
            item_name: None,
            uom: None,
            currency: None,
            quotation_item: None,
        }
    }
}

/// Canonical (item_code, qty, rate) triple used to compare item sets.
pub type CanonicalLine = (String, f64, f64);

/// Anything that can be reduced to a canonical line.
pub trait AsCanonicalLine {
    fn canonical_line(&self) -> CanonicalLine;
}

impl AsCanonicalLine for Selection {
    fn canonical_line(&self) -> CanonicalLine {
        (self.item_code.clone(), self.qty, self.rate)
    }
}

impl AsCanonicalLine for PurchaseOrderLine {
    fn canonical_line(&self) -> CanonicalLine {
        (self.item_code.clone(), self.qty, self.rate)
    }
}

/// Sorted canonical form of an item set. Two sets are the same order iff their
/// canonical forms are equal.
pub fn canonicalize<'a, T, I>(lines: I) -> Vec<CanonicalLine>
where
    T: AsCanonicalLine + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut canonical: Vec<CanonicalLine> = lines.into_iter().map(|l| l.canonical_line()).collect();
    canonical.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.total_cmp(&b.1))
            .then_with(|| a.2.total_cmp(&b.2))
    });
    canonical
}

/// A list argument that callers may send either as a JSON array or as a
/// JSON-encoded string holding that array.
///
/// Elements stay raw until [`JsonOrList::into_vec`], so a malformed element is an
/// input error of the caller rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JsonOrList {
    List(Vec<Value>),
    Encoded(String),
}

impl JsonOrList {
    pub fn into_vec<T: DeserializeOwned>(self) -> Result<Vec<T>, ServiceError> {
        let values = match self {
            JsonOrList::List(values) => values,
            JsonOrList::Encoded(raw) => serde_json::from_str::<Vec<Value>>(&raw).map_err(|e| {
                ServiceError::InvalidInput(format!("Invalid list data received: {}", e))
            })?,
        };

        values
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| ServiceError::InvalidInput(format!("Invalid list data received: {}", e)))
    }
}

impl From<Vec<Value>> for JsonOrList {
    fn from(values: Vec<Value>) -> Self {
        JsonOrList::List(values)
    }
}

/// Accepts a finite number or a numeric string.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    let value = match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => n,
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("expected a number, got {:?}", s)))?,
    };

    if !value.is_finite() {
        return Err(de::Error::custom(format!("expected a finite number, got {}", value)));
    }
    Ok(value)
}
