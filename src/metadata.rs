//! Save and load engines
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Engine;

/// On-disk representation of an engine
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SerializedType {
    Json,
    Yaml,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serialize the full engine (data, states, samples, and RNG state) so a
/// load resumes exactly where the save left off.
pub fn save_engine<P: AsRef<Path>>(
    engine: &Engine,
    path: P,
    ser_type: SerializedType,
) -> Result<(), Error> {
    let writer = BufWriter::new(File::create(path)?);
    match ser_type {
        SerializedType::Json => serde_json::to_writer(writer, engine)?,
        SerializedType::Yaml => serde_yaml::to_writer(writer, engine)?,
    }
    Ok(())
}

pub fn load_engine<P: AsRef<Path>>(
    path: P,
    ser_type: SerializedType,
) -> Result<Engine, Error> {
    let reader = BufReader::new(File::open(path)?);
    let engine = match ser_type {
        SerializedType::Json => serde_json::from_reader(reader)?,
        SerializedType::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(engine)
}
