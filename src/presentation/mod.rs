//! Presentation layer handling terminal UI and user input.
//!
//! Draws the Teachers page with ratatui and maps key presses onto
//! application actions.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
