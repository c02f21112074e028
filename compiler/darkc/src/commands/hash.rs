//! `darkc hash`: print the argument hash of a list of values.

use dark_value::Dval;

use super::HashOptions;
use crate::CliError;

pub fn run_hash(options: &HashOptions) -> Result<String, CliError> {
    let text = std::fs::read_to_string(&options.path).map_err(|source| CliError::Read {
        path: options.path.clone(),
        source,
    })?;
    hash_values(&text, options.version)
}

/// Hash a JSON array of roundtrippable values.
pub fn hash_values(json: &str, version: u32) -> Result<String, CliError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let args = values
        .iter()
        .map(|value| dark_repr::roundtrip::of_json(&value.to_string()))
        .collect::<Result<Vec<Dval>, _>>()?;
    Ok(dark_repr::hash(version, &args)?)
}
