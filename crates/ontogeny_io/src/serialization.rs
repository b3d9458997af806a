//! JSON serialization helpers with validation-first error handling.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializes data to JSON.
pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    Ok(serde_json::to_string(data)?)
}

/// Serializes data to pretty-printed JSON.
pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(data)?)
}

/// Deserializes data from a JSON string.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("empty JSON string"));
    }
    Ok(serde_json::from_str(json)?)
}

/// Writes pretty-printed JSON to a file.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = to_json_pretty(data)?;
    std::fs::write(&path, json).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", path.as_ref()))
    })?;
    Ok(())
}

/// Reads JSON from a file.
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let json = std::fs::read_to_string(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path.as_ref()))
    })?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontogeny_data::Dimensions;

    #[test]
    fn test_dimensions_json_roundtrip() {
        let dims = Dimensions {
            neurons: 12,
            input_neurons: 5,
            output_neurons: 7,
            synapses: 30,
        };
        let json = to_json(&dims).unwrap();
        let restored: Dimensions = from_json(&json).unwrap();
        assert_eq!(restored, dims);
    }

    #[test]
    fn test_empty_json_fails() {
        let result: Result<Dimensions> = from_json("");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_json_fails() {
        let result: Result<Dimensions> = from_json("{ invalid");
        assert!(result.is_err());
    }
}
