pub mod aggregate;
pub mod errors;
pub mod store;
pub mod types;

pub use errors::*;
