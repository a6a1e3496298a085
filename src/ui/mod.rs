//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`table`]: The current page of the table view, with sort arrows and the
//!   empty-result placeholder
//! - [`common`]: Shared components (header, pager, status bar, help overlay)
//! - [`detail`]: Modal overlay showing the activated row record
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` lays out the screen and calls into these
//! modules:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Table (table::render)                │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Pager (common::render_pager)         │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod detail;
pub mod table;
pub mod theme;

pub use theme::Theme;
