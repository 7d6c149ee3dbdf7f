use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{Error, Result},
    logger,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// JSON output is pretty-printed.
pub fn encode<T: Serialize>(value: &T, format: Format) -> Result<String> {
    let document = match format {
        Format::Json => serde_json::to_string_pretty(value)?,
        Format::Yaml => serde_yaml::to_string(value)?,
    };

    Ok(document)
}

pub fn decode<T: DeserializeOwned>(document: &str, format: Format) -> Result<T> {
    let value = match format {
        Format::Json => serde_json::from_str(document)?,
        Format::Yaml => serde_yaml::from_str(document)?,
    };

    Ok(value)
}

/// Decodes a file, choosing the format from its extension.
pub fn read<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();

    let format = Format::from_path(path)
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;

    logger!(debug, "Decoding {} as {:?}", path.display(), format);

    decode(&fs::read_to_string(path)?, format)
}
