//! Web API operations

mod bulk;
mod fetch;
pub mod query;

pub use bulk::*;
pub use fetch::*;

use serde_json::Value;

/// Sends numeric ids as JSON numbers and everything else as strings.
pub(crate) fn id_value(id: &str) -> Value {
    id.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.to_string()))
}
