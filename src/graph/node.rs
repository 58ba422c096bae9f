//! Node entity for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{Label, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A node in the property graph.
///
/// Nodes carry a unique id, a deduplicated set of labels, a schemaless
/// property map, and creation/update timestamps in Unix milliseconds.
/// `updated_at` never precedes `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Set of labels for this node
    pub labels: HashSet<Label>,

    /// Properties associated with this node
    pub properties: PropertyMap,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Node {
    /// Create a new node with the given labels
    pub fn new(id: NodeId, labels: Vec<Label>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Node {
            id,
            labels: labels.into_iter().collect(),
            properties: PropertyMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new node with a single label
    pub fn with_label(id: NodeId, label: impl Into<Label>) -> Self {
        Node::new(id, vec![label.into()])
    }

    /// Create a new node with labels and properties
    pub fn with_properties(id: NodeId, labels: Vec<Label>, properties: PropertyMap) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Node {
            id,
            labels: labels.into_iter().collect(),
            properties,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a label to this node
    pub fn add_label(&mut self, label: impl Into<Label>) {
        self.labels.insert(label.into());
        self.touch();
    }

    /// Remove a label from this node
    pub fn remove_label(&mut self, label: &Label) -> bool {
        let removed = self.labels.remove(label);
        if removed {
            self.touch();
        }
        removed
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Set a property value, returning the previous value if any
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        let old = self.properties.insert(key.into(), value.into());
        self.touch();
        old
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Remove a property
    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        let removed = self.properties.remove(key);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Get number of labels
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    fn touch(&mut self) {
        let now = chrono::Utc::now().timestamp_millis();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
