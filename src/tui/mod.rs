//! TUI module
//!
//! Table views over live models, drawn with ratatui. The interactive
//! terminal loop needs the `tui` feature; views and text dumps do not.

mod table;
#[cfg(feature = "tui")]
mod terminal;
mod theme;

pub use table::{TableView, ViewRow};
#[cfg(feature = "tui")]
pub use terminal::run;
pub use theme::Theme;
