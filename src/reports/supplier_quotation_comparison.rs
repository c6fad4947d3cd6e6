//! Side-by-side comparison of supplier quotations against a Request for Quotation.
//!
//! One row per RFQ item, one column per supplier that quoted anything. Each quoted
//! cell carries the rate, a best/worst highlight and the payload the UI needs to
//! turn the cell into a Purchase Order selection.

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::ProcurementDefaults;
use crate::dto::procurement::{QuoteLine, RfqItem};
use crate::errors::ServiceError;
use crate::repositories::ProcurementStore;

pub const RFQ_QTY: &str = "rfq_qty";
pub const UOM: &str = "uom";
pub const ITEM_CODE: &str = "item_code";
pub const ITEM_NAME: &str = "item_name";

const SUPPLIER_COLUMN_WIDTH: u32 = 300;
const FIXED_FIELDS: [&str; 4] = [RFQ_QTY, UOM, ITEM_CODE, ITEM_NAME];
const SUPPLIER_FIELD_PREFIX: &str = "supplier_";

/// Row key of a supplier column. Suppliers named like a fixed column, or already
/// carrying the prefix, are prefixed so no two columns share a key.
pub fn supplier_fieldname(supplier: &str) -> String {
    if FIXED_FIELDS.contains(&supplier) || supplier.starts_with(SUPPLIER_FIELD_PREFIX) {
        format!("{}{}", SUPPLIER_FIELD_PREFIX, supplier)
    } else {
        supplier.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    Float,
    Data,
    #[serde(rename = "HTML")]
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub label: String,
    pub fieldname: String,
    pub fieldtype: FieldType,
    pub width: u32,
    /// First quotation seen for a supplier column; the header links to it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotation: Option<String>,
}

impl ColumnDescriptor {
    fn fixed(label: &str, fieldname: &str, fieldtype: FieldType, width: u32) -> Self {
        Self {
            label: label.to_string(),
            fieldname: fieldname.to_string(),
            fieldtype,
            width,
            quotation: None,
        }
    }

    fn supplier(supplier: &str, quotation: &str) -> Self {
        Self {
            label: supplier.to_string(),
            fieldname: supplier_fieldname(supplier),
            fieldtype: FieldType::Html,
            width: SUPPLIER_COLUMN_WIDTH,
            quotation: Some(quotation.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateHighlight {
    Best,
    Worst,
    Neutral,
}

/// Data attached to a cell's selection checkbox.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionControl {
    pub item_code: String,
    pub item_name: String,
    pub uom: String,
    pub qty: f64,
    pub rate: Option<f64>,
    pub supplier: String,
    pub currency: String,
    pub quotation_item: String,
    /// Already used in a Purchase Order
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotedCell {
    pub rate: Option<f64>,
    pub highlight: RateHighlight,
    pub selection: SelectionControl,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Quoted(QuotedCell),
}

impl Cell {
    pub fn as_quoted(&self) -> Option<&QuotedCell> {
        match self {
            Cell::Quoted(cell) => Some(cell),
            Cell::Empty => None,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_str(""),
            Cell::Quoted(cell) => cell.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub rfq_qty: f64,
    pub uom: String,
    pub item_code: String,
    pub item_name: String,
    /// Keyed by [`supplier_fieldname`], flattened next to the fixed columns
    #[serde(flatten)]
    pub cells: BTreeMap<String, Cell>,
}

impl ComparisonRow {
    pub fn quoted(&self, supplier: &str) -> Option<&QuotedCell> {
        self.cells
            .get(&supplier_fieldname(supplier))
            .and_then(Cell::as_quoted)
    }

    pub fn quoted_count(&self) -> usize {
        self.cells.values().filter(|c| c.as_quoted().is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<ComparisonRow>,
}

/// Builds the comparison grid from RFQ items and the quotation lines fetched for them.
///
/// Lines for item codes that are not on the RFQ are ignored. When several lines share
/// an (item_code, supplier) pair the last one wins. `fallback_currency` stands in for
/// lines whose quotation has no currency.
pub fn build_comparison_table(
    rfq_items: &[RfqItem],
    quotes: &[QuoteLine],
    fallback_currency: &str,
) -> ComparisonTable {
    let mut supplier_meta: BTreeMap<&str, &str> = BTreeMap::new();
    for quote in quotes {
        supplier_meta
            .entry(quote.supplier.as_str())
            .or_insert(quote.quotation.as_str());
    }

    let mut columns = vec![
        ColumnDescriptor::fixed("QTY", RFQ_QTY, FieldType::Float, 80),
        ColumnDescriptor::fixed("UOM", UOM, FieldType::Data, 80),
        ColumnDescriptor::fixed("ITEM CODE", ITEM_CODE, FieldType::Data, 120),
        ColumnDescriptor::fixed("ITEM NAME", ITEM_NAME, FieldType::Data, 260),
    ];
    columns.extend(
        supplier_meta
            .iter()
            .map(|(supplier, quotation)| ColumnDescriptor::supplier(supplier, quotation)),
    );

    let rate_map: HashMap<(&str, &str), &QuoteLine> = quotes
        .iter()
        .map(|q| ((q.item_code.as_str(), q.supplier.as_str()), q))
        .collect();

    let rows = rfq_items
        .iter()
        .map(|item| {
            let quoted_rates: Vec<f64> = supplier_meta
                .keys()
                .filter_map(|supplier| rate_map.get(&(item.item_code.as_str(), *supplier)))
                .filter_map(|quote| quote.rate)
                .collect();
            let bounds = rate_bounds(&quoted_rates);

            let cells = supplier_meta
                .keys()
                .map(|supplier| {
                    let cell = match rate_map.get(&(item.item_code.as_str(), *supplier)) {
                        Some(quote) => Cell::Quoted(quoted_cell(item, quote, bounds, fallback_currency)),
                        None => Cell::Empty,
                    };
                    (supplier_fieldname(supplier), cell)
                })
                .collect();

            ComparisonRow {
                rfq_qty: item.qty,
                uom: item.uom.clone(),
                item_code: item.item_code.clone(),
                item_name: item.item_name.clone(),
                cells,
            }
        })
        .collect();

    ComparisonTable { columns, rows }
}

fn quoted_cell(
    item: &RfqItem,
    quote: &QuoteLine,
    bounds: Option<(f64, f64)>,
    fallback_currency: &str,
) -> QuotedCell {
    let currency = quote
        .currency
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(fallback_currency)
        .to_string();

    QuotedCell {
        rate: quote.rate,
        highlight: classify_rate(quote.rate, bounds),
        selection: SelectionControl {
            item_code: item.item_code.clone(),
            item_name: quote.item_name.clone(),
            uom: quote.uom.clone(),
            qty: quote.qty,
            rate: quote.rate,
            supplier: quote.supplier.clone(),
            currency,
            quotation_item: quote.name.clone(),
            disabled: quote.custom_po_created,
        },
    }
}

/// (min, max) over the quoted rates, or `None` when nothing was quoted.
pub fn rate_bounds(rates: &[f64]) -> Option<(f64, f64)> {
    let (first, rest) = rates.split_first()?;
    Some(
        rest.iter()
            .fold((*first, *first), |(min, max), &rate| (min.min(rate), max.max(rate))),
    )
}

/// The minimum check runs first, so a lone or all-equal rate is `Best`.
pub fn classify_rate(rate: Option<f64>, bounds: Option<(f64, f64)>) -> RateHighlight {
    match (rate, bounds) {
        (Some(rate), Some((min, _))) if rate == min => RateHighlight::Best,
        (Some(rate), Some((_, max))) if rate == max => RateHighlight::Worst,
        _ => RateHighlight::Neutral,
    }
}

/// Filters accepted by the report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilters {
    pub rfq: Option<String>,
}

impl ReportFilters {
    pub fn for_rfq(rfq: impl Into<String>) -> Self {
        Self {
            rfq: Some(rfq.into()),
        }
    }
}

/// Reasons the report comes back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportNotice {
    MissingRfq,
    MissingCurrency,
    NoItems,
    NoSuppliers,
    NoQuotations,
}

impl ReportNotice {
    pub fn code(&self) -> &'static str {
        match self {
            ReportNotice::MissingRfq => "missing_rfq",
            ReportNotice::MissingCurrency => "missing_currency",
            ReportNotice::NoItems => "no_items",
            ReportNotice::NoSuppliers => "no_suppliers",
            ReportNotice::NoQuotations => "no_quotations",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportNotice::MissingRfq => "Missing RFQ",
            ReportNotice::MissingCurrency => "Configuration Error",
            ReportNotice::NoItems => "No Items",
            ReportNotice::NoSuppliers => "No Suppliers",
            ReportNotice::NoQuotations => "No Quotations",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ReportNotice::MissingRfq => "Please select an RFQ to generate the report.",
            ReportNotice::MissingCurrency => {
                "Default company currency not found. Please set it up."
            }
            ReportNotice::NoItems => "No items found in the selected Request for Quotation.",
            ReportNotice::NoSuppliers => {
                "No suppliers linked to the selected Request for Quotation."
            }
            ReportNotice::NoQuotations => {
                "No submitted supplier quotations found for the linked suppliers and RFQ items."
            }
        }
    }
}

impl Serialize for ReportNotice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ReportNotice", 3)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("title", self.title())?;
        state.serialize_field("message", self.message())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOutput {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<ComparisonRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<ReportNotice>,
}

impl ReportOutput {
    fn notice(notice: ReportNotice) -> Self {
        info!(notice = notice.code(), "{}", notice.message());
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            notice: Some(notice),
        }
    }
}

impl From<ComparisonTable> for ReportOutput {
    fn from(table: ComparisonTable) -> Self {
        Self {
            columns: table.columns,
            rows: table.rows,
            notice: None,
        }
    }
}

/// Report entry point: fetches RFQ items, linked suppliers and their submitted
/// quotation lines, then tabulates them.
#[derive(Clone)]
pub struct SupplierQuotationComparisonReport {
    store: Arc<dyn ProcurementStore>,
    defaults: ProcurementDefaults,
}

impl SupplierQuotationComparisonReport {
    pub fn new(store: Arc<dyn ProcurementStore>, defaults: ProcurementDefaults) -> Self {
        Self { store, defaults }
    }

    /// Each unmet precondition yields empty columns and rows plus its own notice.
    #[instrument(skip(self))]
    pub async fn execute(&self, filters: &ReportFilters) -> Result<ReportOutput, ServiceError> {
        let Some(rfq) = filters.rfq.as_deref().filter(|r| !r.trim().is_empty()) else {
            return Ok(ReportOutput::notice(ReportNotice::MissingRfq));
        };

        let Some(company_currency) = self.defaults.currency.as_deref() else {
            warn!("No default currency configured");
            return Ok(ReportOutput::notice(ReportNotice::MissingCurrency));
        };

        let rfq_items = self.store.rfq_items(rfq).await?;
        if rfq_items.is_empty() {
            return Ok(ReportOutput::notice(ReportNotice::NoItems));
        }

        let suppliers = self.store.rfq_suppliers(rfq).await?;
        if suppliers.is_empty() {
            return Ok(ReportOutput::notice(ReportNotice::NoSuppliers));
        }

        let quotes = self.store.supplier_quote_lines(&suppliers, rfq).await?;
        if quotes.is_empty() {
            return Ok(ReportOutput::notice(ReportNotice::NoQuotations));
        }

        let table = build_comparison_table(&rfq_items, &quotes, company_currency);
        info!(
            rfq,
            rows = table.rows.len(),
            suppliers = table.columns.len() - 4,
            "Built supplier quotation comparison"
        );

        Ok(table.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(code: &str, qty: f64) -> RfqItem {
        RfqItem {
            item_code: code.to_string(),
            item_name: format!("{} name", code),
            uom: "Nos".to_string(),
            qty,
        }
    }

    fn quote(supplier: &str, code: &str, rate: Option<f64>) -> QuoteLine {
        QuoteLine {
            name: format!("SQI-{}-{}", supplier, code),
            quotation: format!("SQ-{}", supplier),
            supplier: supplier.to_string(),
            item_code: code.to_string(),
            item_name: format!("{} name", code),
            uom: "Nos".to_string(),
            qty: 1.0,
            rate,
            currency: None,
            custom_po_created: false,
        }
    }

    #[test]
    fn columns_are_fixed_then_sorted_suppliers() {
        let quotes = vec![
            quote("Zeta", "A", Some(3.0)),
            quote("Alpha", "A", Some(4.0)),
            quote("Mid", "A", Some(5.0)),
        ];

        let table = build_comparison_table(&[item("A", 1.0)], &quotes, "USD");
        let names: Vec<&str> = table.columns.iter().map(|c| c.fieldname.as_str()).collect();

        assert_eq!(
            names,
            vec![RFQ_QTY, UOM, ITEM_CODE, ITEM_NAME, "Alpha", "Mid", "Zeta"]
        );
        assert_eq!(table.columns[4].quotation.as_deref(), Some("SQ-Alpha"));
        assert_eq!(table.columns[4].fieldtype, FieldType::Html);
    }

    #[test]
    fn rows_follow_rfq_order() {
        let items = vec![item("C", 3.0), item("A", 1.0), item("B", 2.0)];
        let table = build_comparison_table(&items, &[quote("S1", "A", Some(1.0))], "USD");

        let codes: Vec<&str> = table.rows.iter().map(|r| r.item_code.as_str()).collect();
        assert_eq!(codes, vec!["C", "A", "B"]);
        assert_eq!(table.rows[0].rfq_qty, 3.0);
    }

    #[test]
    fn highlights_cheapest_and_dearest() {
        let quotes = vec![
            quote("S1", "A", Some(10.0)),
            quote("S2", "A", Some(7.5)),
            quote("S3", "A", Some(12.0)),
            quote("S4", "A", Some(11.0)),
        ];

        let table = build_comparison_table(&[item("A", 1.0)], &quotes, "USD");
        let row = &table.rows[0];

        assert_eq!(row.quoted("S2").unwrap().highlight, RateHighlight::Best);
        assert_eq!(row.quoted("S3").unwrap().highlight, RateHighlight::Worst);
        assert_eq!(row.quoted("S1").unwrap().highlight, RateHighlight::Neutral);
        assert_eq!(row.quoted("S4").unwrap().highlight, RateHighlight::Neutral);
    }

    #[test]
    fn single_rate_is_best_not_worst() {
        let table = build_comparison_table(&[item("A", 1.0)], &[quote("S1", "A", Some(4.0))], "USD");
        assert_eq!(table.rows[0].quoted("S1").unwrap().highlight, RateHighlight::Best);
    }

    #[test]
    fn missing_quotes_render_empty() {
        let quotes = vec![quote("S1", "A", Some(1.0)), quote("S2", "B", Some(2.0))];
        let table = build_comparison_table(&[item("A", 1.0), item("B", 1.0)], &quotes, "USD");

        assert_eq!(table.rows[0].cells["S2"], Cell::Empty);
        assert_eq!(table.rows[1].cells["S1"], Cell::Empty);

        let json = serde_json::to_value(&table.rows[0]).unwrap();
        assert_eq!(json["S2"], serde_json::json!(""));
        assert_eq!(json["item_code"], serde_json::json!("A"));
    }

    #[test]
    fn null_rates_are_excluded_from_bounds() {
        let quotes = vec![quote("S1", "A", None), quote("S2", "A", Some(9.0)), quote("S3", "A", Some(6.0))];
        let table = build_comparison_table(&[item("A", 1.0)], &quotes, "USD");
        let row = &table.rows[0];

        assert_eq!(row.quoted("S1").unwrap().highlight, RateHighlight::Neutral);
        assert_eq!(row.quoted("S1").unwrap().rate, None);
        assert_eq!(row.quoted("S3").unwrap().highlight, RateHighlight::Best);
        assert_eq!(row.quoted("S2").unwrap().highlight, RateHighlight::Worst);
    }

    #[test]
    fn selection_carries_line_data_and_currency_fallback() {
        let mut used = quote("S1", "A", Some(2.5));
        used.custom_po_created = true;
        used.qty = 40.0;
        let mut priced_in_eur = quote("S2", "A", Some(3.0));
        priced_in_eur.currency = Some("EUR".into());

        let table = build_comparison_table(&[item("A", 1.0)], &[used, priced_in_eur], "KES");
        let row = &table.rows[0];

        let first = &row.quoted("S1").unwrap().selection;
        assert!(first.disabled);
        assert_eq!(first.currency, "KES");
        assert_eq!(first.qty, 40.0);
        assert_eq!(first.quotation_item, "SQI-S1-A");

        let second = &row.quoted("S2").unwrap().selection;
        assert!(!second.disabled);
        assert_eq!(second.currency, "EUR");
    }

    #[test]
    fn later_line_for_same_item_and_supplier_wins() {
        let quotes = vec![quote("S1", "A", Some(5.0)), quote("S1", "A", Some(4.0))];
        let table = build_comparison_table(&[item("A", 1.0)], &quotes, "USD");

        assert_eq!(table.rows[0].quoted("S1").unwrap().rate, Some(4.0));
    }

    #[test]
    fn supplier_named_like_a_fixed_column_keeps_both_values() {
        let quotes = vec![quote(ITEM_CODE, "A", Some(3.0)), quote("supplier_x", "A", Some(4.0))];
        let table = build_comparison_table(&[item("A", 1.0)], &quotes, "USD");

        let names: Vec<&str> = table.columns.iter().map(|c| c.fieldname.as_str()).collect();
        assert_eq!(&names[4..], ["supplier_item_code", "supplier_supplier_x"]);
        assert_eq!(table.columns[4].label, ITEM_CODE);

        let row = &table.rows[0];
        assert_eq!(row.quoted(ITEM_CODE).unwrap().rate, Some(3.0));

        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json[ITEM_CODE], serde_json::json!("A"));
        assert_eq!(json["supplier_item_code"]["rate"], serde_json::json!(3.0));
        assert_eq!(json["supplier_supplier_x"]["rate"], serde_json::json!(4.0));
    }

    #[test]
    fn bounds_of_nothing_is_none() {
        assert_eq!(rate_bounds(&[]), None);
        assert_eq!(classify_rate(Some(1.0), None), RateHighlight::Neutral);
        assert_eq!(rate_bounds(&[3.0, 1.0, 2.0]), Some((1.0, 3.0)));
    }

    proptest! {
        #[test]
        fn quoted_cells_match_quote_lines(
            rates in proptest::collection::vec(proptest::option::of(1u32..500), 1..6)
        ) {
            let quotes: Vec<QuoteLine> = rates
                .iter()
                .enumerate()
                .filter_map(|(i, rate)| rate.map(|r| quote(&format!("S{}", i), "A", Some(r as f64))))
                .collect();

            let table = build_comparison_table(&[item("A", 1.0)], &quotes, "USD");
            let row = &table.rows[0];

            prop_assert_eq!(row.quoted_count(), quotes.len());
            if !quotes.is_empty() {
                let best = row
                    .cells
                    .values()
                    .filter_map(Cell::as_quoted)
                    .filter(|c| c.highlight == RateHighlight::Best)
                    .count();
                prop_assert!(best >= 1);
            }
        }

        #[test]
        fn all_equal_rates_are_all_best(count in 1usize..6, rate in 1u32..1000) {
            let quotes: Vec<QuoteLine> = (0..count)
                .map(|i| quote(&format!("S{}", i), "A", Some(rate as f64)))
                .collect();

            let table = build_comparison_table(&[item("A", 1.0)], &quotes, "USD");
            for cell in table.rows[0].cells.values().filter_map(Cell::as_quoted) {
                prop_assert_eq!(cell.highlight, RateHighlight::Best);
            }
        }
    }
}
