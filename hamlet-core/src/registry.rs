//! The location graph and the registry of location handlers.
//!
//! Every reference a node makes (exits and its return target) is checked
//! when the registry is built, so a dangling exit is reported at startup
//! rather than the first time a player tries to use it.

use crate::location::{Location, LocationId, LocationNode};
use std::collections::BTreeMap;
use thiserror::Error;

/// Configuration errors. These are fatal for the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{from} has an exit to unregistered location {to}")]
    DanglingExit { from: LocationId, to: LocationId },

    #[error("{from} returns to unregistered location {to}")]
    DanglingReturn { from: LocationId, to: LocationId },

    #[error("{0} is registered twice")]
    DuplicateLocation(LocationId),

    #[error("Navigation to unregistered location {0}")]
    UnknownDestination(LocationId),

    #[error("Tick interval must be at least 1")]
    ZeroTickInterval,

    #[error("{name} must be a percentage between 0 and 100, got {value}")]
    InvalidPercentage { name: &'static str, value: u8 },
}

// ============================================================================
// Graph
// ============================================================================

/// Validated, read-only table of location nodes.
#[derive(Debug, Clone, Default)]
pub struct LocationGraph {
    nodes: BTreeMap<LocationId, LocationNode>,
}

impl LocationGraph {
    /// Build a graph, rejecting duplicates and dangling references.
    pub fn from_nodes(nodes: impl IntoIterator<Item = LocationNode>) -> Result<Self, ConfigError> {
        let mut table = BTreeMap::new();
        for node in nodes {
            let id = node.id;
            if table.insert(id, node).is_some() {
                return Err(ConfigError::DuplicateLocation(id));
            }
        }

        let graph = Self { nodes: table };
        graph.validate()?;
        Ok(graph)
    }

    /// Check that every exit and return target resolves to a registered node.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for node in self.nodes.values() {
            if let Some(to) = node.exits.iter().find(|exit| !self.contains(**exit)) {
                return Err(ConfigError::DanglingExit {
                    from: node.id,
                    to: *to,
                });
            }
            if let Some(to) = node.returns_to.filter(|to| !self.contains(*to)) {
                return Err(ConfigError::DanglingReturn { from: node.id, to });
            }
        }
        Ok(())
    }

    pub fn contains(&self, id: LocationId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: LocationId) -> Option<&LocationNode> {
        self.nodes.get(&id)
    }

    /// Display name of a registered node, or the id's label.
    pub fn name_of(&self, id: LocationId) -> &str {
        self.nodes
            .get(&id)
            .map(|node| node.name.as_str())
            .unwrap_or(id.label())
    }

    pub fn ids(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The graph plus one handler per node.
pub struct LocationRegistry {
    graph: LocationGraph,
    handlers: BTreeMap<LocationId, Box<dyn Location>>,
}

impl LocationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn graph(&self) -> &LocationGraph {
        &self.graph
    }

    pub fn contains(&self, id: LocationId) -> bool {
        self.handlers.contains_key(&id)
    }

    /// Fail with a configuration error unless `id` is registered.
    pub fn ensure(&self, id: LocationId) -> Result<(), ConfigError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(ConfigError::UnknownDestination(id))
        }
    }

    /// Borrow what a controller needs to run `id`.
    pub fn parts_mut(
        &mut self,
        id: LocationId,
    ) -> Option<(&LocationNode, &LocationGraph, &mut dyn Location)> {
        let node = self.graph.nodes.get(&id)?;
        let handler = self.handlers.get_mut(&id)?;
        Some((node, &self.graph, handler.as_mut()))
    }
}

/// Collects location handlers and validates them as a whole.
#[derive(Default)]
pub struct RegistryBuilder {
    locations: Vec<Box<dyn Location>>,
}

impl RegistryBuilder {
    pub fn register(mut self, location: impl Location + 'static) -> Self {
        self.locations.push(Box::new(location));
        self
    }

    pub fn register_boxed(mut self, location: Box<dyn Location>) -> Self {
        self.locations.push(location);
        self
    }

    pub fn build(self) -> Result<LocationRegistry, ConfigError> {
        let graph =
            LocationGraph::from_nodes(self.locations.iter().map(|location| location.node().clone()))?;

        let handlers = self
            .locations
            .into_iter()
            .map(|location| (location.node().id, location))
            .collect();

        Ok(LocationRegistry { graph, handlers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn street() -> LocationNode {
        LocationNode::new(LocationId::MainStreet, "Main Street")
            .with_exits([LocationId::Inn, LocationId::Bank])
    }

    fn inn() -> LocationNode {
        LocationNode::new(LocationId::Inn, "The Drowsy Dragon").returning_to(LocationId::MainStreet)
    }

    fn bank() -> LocationNode {
        LocationNode::new(LocationId::Bank, "Bank").returning_to(LocationId::MainStreet)
    }

    #[test]
    fn test_valid_graph() {
        let graph = LocationGraph::from_nodes([street(), inn(), bank()]).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.name_of(LocationId::Inn), "The Drowsy Dragon");
        assert_eq!(graph.name_of(LocationId::Prison), "Prison");
    }

    #[test]
    fn test_dangling_exit_rejected() {
        let err = LocationGraph::from_nodes([street(), inn()]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DanglingExit {
                from: LocationId::MainStreet,
                to: LocationId::Bank,
            }
        );
    }

    #[test]
    fn test_dangling_return_rejected() {
        let err = LocationGraph::from_nodes([inn()]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DanglingReturn {
                from: LocationId::Inn,
                to: LocationId::MainStreet,
            }
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = LocationGraph::from_nodes([street(), inn(), bank(), inn()]).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateLocation(LocationId::Inn));
    }
}
