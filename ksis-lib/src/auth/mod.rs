//! Authentication
//!
//! Token supply for requests and the user context read from token claims.

mod claims;
mod token;

pub use claims::*;
pub use token::*;
