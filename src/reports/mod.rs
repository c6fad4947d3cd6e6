pub mod supplier_quotation_comparison;

pub use supplier_quotation_comparison::{
    build_comparison_table, Cell, ColumnDescriptor, ComparisonRow, ComparisonTable, QuotedCell,
    RateHighlight, ReportFilters, ReportNotice, ReportOutput, SupplierQuotationComparisonReport,
    supplier_fieldname, ITEM_CODE, ITEM_NAME, RFQ_QTY, UOM,
};
