//! Read-only adjacency index over facilities and directed connections

use std::collections::HashMap;

use tracing::debug;

use super::NetworkError;
use crate::types::{Connection, Facility};

/// Immutable view of the facility network.
///
/// Built once from an already-loaded dataset; every connection is checked to
/// reference known facilities. Outgoing edges keep dataset order, which fixes
/// the discovery order (and therefore the route numbering) of enumeration.
#[derive(Debug, Clone)]
pub struct FacilityGraph {
    facilities: Vec<Facility>,
    index: HashMap<String, usize>,
    outgoing: HashMap<String, Vec<Connection>>,
    connection_count: usize,
}

impl FacilityGraph {
    /// Build the graph, failing on duplicate ids or dangling connection ends.
    pub fn new(facilities: Vec<Facility>, connections: Vec<Connection>) -> Result<Self, NetworkError> {
        let mut index = HashMap::with_capacity(facilities.len());
        for (i, facility) in facilities.iter().enumerate() {
            if index.insert(facility.id.clone(), i).is_some() {
                return Err(NetworkError::DuplicateFacility(facility.id.clone()));
            }
        }

        let connection_count = connections.len();
        let mut outgoing: HashMap<String, Vec<Connection>> = HashMap::new();
        for conn in connections {
            for end in [&conn.from, &conn.to] {
                if !index.contains_key(end) {
                    return Err(NetworkError::InvalidReference {
                        connection: conn.id.clone(),
                        facility: end.clone(),
                    });
                }
            }
            outgoing.entry(conn.from.clone()).or_default().push(conn);
        }

        debug!(
            facilities = facilities.len(),
            connections = connection_count,
            "Facility graph built"
        );

        Ok(Self {
            facilities,
            index,
            outgoing,
            connection_count,
        })
    }

    /// Look up a facility by id.
    pub fn facility(&self, id: &str) -> Result<&Facility, NetworkError> {
        self.index
            .get(id)
            .map(|&i| &self.facilities[i])
            .ok_or_else(|| NetworkError::FacilityNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Outgoing connections in dataset order; empty when there are none.
    pub fn outgoing(&self, id: &str) -> &[Connection] {
        self.outgoing.get(id).map_or(&[], Vec::as_slice)
    }

    /// All facilities in dataset order.
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connection_count
    }
}
