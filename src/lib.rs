//! # tabview
//!
//! A tabular view engine and terminal browser for row records.
//!
//! Given a list of records and column descriptors, the engine produces a
//! searchable, sortable, paginated view and a delimited-text export of the
//! full dataset. The binary wraps it in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │ (engine) │    │(render) │    │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | ChannelSource | FallbackSource │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: The view engine: [`Table`], the search → sort → paginate
//!   pipeline in [`TableView`], formatters and export
//! - **[`source`]**: Where datasets come from ([`DataSource`])
//! - **[`app`]**: Interactive state on top of a [`TableView`]
//! - **[`settings`]** and **[`session`]**: Startup configuration and
//!   app-lifetime values
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Browse a dataset
//! tabview --file cases.json --page-size 10
//!
//! # Export it without opening the UI
//! tabview --file cases.json --export cases.csv
//! ```
//!
//! ### As a library
//!
//! ```
//! use tabview::{Column, Dataset, Table, TableView, Value, ViewEvent, ViewOptions};
//!
//! let records = vec![
//!     [("name".to_string(), Value::from("Ann")), ("age".to_string(), Value::from(30))]
//!         .into_iter()
//!         .collect(),
//!     [("name".to_string(), Value::from("Bob")), ("age".to_string(), Value::from(25))]
//!         .into_iter()
//!         .collect(),
//! ];
//! let columns = vec![Column::new("name", "Name"), Column::new("age", "Age")];
//! let table = Table::new("People", columns, Dataset::from_records(records)).unwrap();
//!
//! let mut view = TableView::new(table, ViewOptions::default());
//! view.dispatch(ViewEvent::ToggleSort("age".to_string()));
//! assert_eq!(view.page().rows[0].get(view.table().field_of("name").unwrap()), &Value::from("Bob"));
//! ```
//!
//! ### With a channel source
//!
//! ```
//! use tabview::{App, ChannelSource, MemorySession, Settings};
//!
//! let (tx, source) = ChannelSource::create("in-process");
//! let app = App::new(Box::new(source), Settings::default(), Box::new(MemorySession::new()));
//! ```

pub mod app;
pub mod data;
pub mod error;
pub mod events;
pub mod session;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    Column, Dataset, Export, Formatter, Record, Row, SortConfig, SortDirection, Table, TableView,
    Value, ViewEvent, ViewOptions, ViewState,
};
pub use error::TableError;
pub use session::{MemorySession, Session};
pub use settings::{Settings, ThemeMode};
pub use source::{
    ChannelSource, ColumnSpec, DataSource, DatasetDocument, FallbackSource, FileSource,
};
