//! Data source abstraction for receiving datasets.
//!
//! The view engine never performs I/O itself. A [`DataSource`] hands it
//! already-loaded [`DatasetDocument`]s from a file, an in-process channel,
//! or a fixture standing in for an unreachable backend.

mod channel;
mod document;
mod fallback;
mod file;

pub use channel::ChannelSource;
pub use document::{ColumnSpec, DatasetDocument};
pub use fallback::FallbackSource;
pub use file::FileSource;

use std::fmt::Debug;

/// Trait for receiving datasets from various sources.
///
/// # Example
///
/// ```
/// use tabview::{DataSource, FileSource};
///
/// let mut source = FileSource::new("cases.json");
/// if let Some(document) = source.poll() {
///     println!("Got {} rows", document.rows.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest dataset.
    ///
    /// Returns `Some(document)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<DatasetDocument>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;

    /// Returns the error message if the last poll failed.
    fn error(&self) -> Option<&str>;
}
