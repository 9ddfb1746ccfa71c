//! Application layer managing state and data synchronization.
//!
//! This module sits between the backend contract and the presentation
//! layer: it caches remote lists, coordinates mutations, and derives what
//! the screen should show.

pub mod cache;
pub mod dialog;
pub mod errors;
pub mod mutations;
pub mod runtime;
pub mod state;
pub mod view;

pub use cache::*;
pub use dialog::*;
pub use errors::*;
pub use mutations::*;
pub use runtime::*;
pub use state::*;
pub use view::*;
