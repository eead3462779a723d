use anyhow::Result;
use serde::Serialize;

/// Writes one JSON document per line to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
