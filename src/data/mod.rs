//! The tabular view engine.
//!
//! This module turns an immutable set of row records and a column list into
//! a searched, sorted, paginated view, and exports the full dataset as
//! delimited text.
//!
//! ## Submodules
//!
//! - [`value`]: Typed field values and their natural ordering
//! - [`dataset`]: Row records normalised against a shared schema
//! - [`table`]: Column descriptors validated against a dataset ([`Table`])
//! - [`format`]: Display formatters for column values
//! - [`view`]: View state, the search/sort/paginate pipeline, and transitions
//! - [`pagination`]: Page arithmetic and the page-number window
//! - [`export`]: Delimited-text export and file naming
//!
//! ## Data Flow
//!
//! ```text
//! Vec<Record>
//!        │
//!        ▼
//! Dataset::from_records()  ──▶  Table::new(title, columns, dataset)
//!                                      │
//!                                      ▼
//!                              TableView::page()   (search → sort → paginate)
//!                              TableView::export() (full dataset, raw values)
//! ```

pub mod dataset;
pub mod export;
pub mod format;
pub mod pagination;
pub mod table;
pub mod value;
pub mod view;

pub use dataset::{Dataset, Record, Row};
pub use export::{export_table, slugify, Export};
pub use format::Formatter;
pub use table::{header_from_key, Column, Table};
pub use value::Value;
pub use view::{
    Page, RowClickHandler, SortConfig, SortDirection, TableView, ViewEvent, ViewOptions,
    ViewState, EMPTY_PLACEHOLDER,
};
