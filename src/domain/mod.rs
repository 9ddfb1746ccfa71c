pub mod api;
pub mod models;
pub mod errors;

pub use api::*;
pub use models::*;
pub use errors::*;
