use std::path::Path;

use tracing::debug;

use crate::{car::RawCar, error::LoadError};

pub fn load(path: &Path) -> Result<Vec<RawCar>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse(&content).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), records = records.len(), "loaded cars document");

    Ok(records)
}

/// Parses a JSON array of car objects. Field-level problems are left to the validator.
pub fn parse(content: &str) -> Result<Vec<RawCar>, serde_json::Error> {
    serde_json::from_str(content)
}
