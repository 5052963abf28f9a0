//! Facility network datasets: file loading (TOML or JSON) and the built-in
//! reference network.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::network::{FacilityGraph, NetworkError};
use crate::types::{Connection, Facility};

const REFERENCE_NETWORK: &str = include_str!("../data/reference_network.toml");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML dataset: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported dataset format '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Static facility/connection data, as loaded from disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Dataset {
    /// The embedded nine-facility reference network.
    pub fn reference() -> Result<Self, DatasetError> {
        Self::from_toml_str(REFERENCE_NETWORK)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, DatasetError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load by file extension (`.toml` or `.json`).
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = match extension.as_str() {
            "toml" => Self::from_toml_str(&contents)?,
            "json" => Self::from_json_str(&contents)?,
            other => return Err(DatasetError::UnsupportedFormat(other.to_string())),
        };
        info!(
            path = %path.display(),
            facilities = dataset.facilities.len(),
            connections = dataset.connections.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    pub fn facility(&self, id: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    /// Validate references and build the graph.
    pub fn into_graph(self) -> Result<FacilityGraph, DatasetError> {
        Ok(FacilityGraph::new(self.facilities, self.connections)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FacilityCategory;

    #[test]
    fn reference_network_parses_and_builds() {
        let dataset = Dataset::reference().unwrap();
        assert_eq!(dataset.facilities.len(), 9);
        assert_eq!(dataset.connections.len(), 11);

        let sep = dataset.facility("sep-1").unwrap();
        assert_eq!(sep.category, FacilityCategory::Separator);
        assert_eq!(sep.install_year(), Some(2018));
        assert!(dataset.facility("wh-2").unwrap().install_year().is_none());

        let graph = dataset.into_graph().unwrap();
        assert_eq!(graph.facility_count(), 9);
        assert_eq!(graph.connection_count(), 11);
    }

    #[test]
    fn json_dataset_parses() {
        let json = r#"{
            "facilities": [
                {"id": "a", "name": "A", "category": "pump", "co2_factor": 1.0,
                 "energy_factor": 1.0, "capacity": 10.0},
                {"id": "b", "name": "B", "category": "compressor", "co2_factor": 2.0,
                 "energy_factor": 1.0, "capacity": 10.0}
            ],
            "connections": [
                {"id": "c1", "from": "a", "to": "b", "distance": 1.0, "pipeline_co2": 0.1}
            ]
        }"#;
        let dataset = Dataset::from_json_str(json).unwrap();
        assert_eq!(dataset.facilities[1].category, FacilityCategory::Other);
        assert!(dataset.into_graph().is_ok());
    }

    #[test]
    fn dangling_reference_surfaces_as_network_error() {
        let toml = r#"
            [[facilities]]
            id = "a"
            name = "A"
            category = "pump"
            co2_factor = 1.0
            energy_factor = 1.0
            capacity = 10.0

            [[connections]]
            id = "c1"
            from = "a"
            to = "missing"
            distance = 1.0
            pipeline_co2 = 0.1
        "#;
        let err = Dataset::from_toml_str(toml).unwrap().into_graph().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Network(NetworkError::InvalidReference { .. })
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.yaml");
        std::fs::write(&path, "facilities: []").unwrap();
        assert!(matches!(
            Dataset::load(&path),
            Err(DatasetError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.toml");
        std::fs::write(&path, REFERENCE_NETWORK).unwrap();
        assert_eq!(Dataset::load(&path).unwrap().facilities.len(), 9);
    }
}
