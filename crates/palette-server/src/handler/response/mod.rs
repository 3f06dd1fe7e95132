//! Response types for HTTP handlers.

mod errors;
mod nodes;

pub use errors::*;
pub use nodes::*;
