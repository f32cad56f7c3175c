//! record.json data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root structure for record.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordJson {
    pub node: Vec<NodeRecord>,
    pub container: Vec<ComposableNodeContainerRecord>,
    pub load_node: Vec<LoadNodeRecord>,
    pub lifecycle_node: Vec<String>,
    /// Contents of files referenced by parameters, keyed by path
    pub file_data: BTreeMap<String, String>,
}

impl RecordJson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load-node entry by node name
    pub fn load_node_named(&self, node_name: &str) -> Option<&LoadNodeRecord> {
        self.load_node.iter().find(|n| n.node_name == node_name)
    }
}

/// Process record; a container is launched as one of these
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub executable: String,
    pub package: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub exec_name: Option<String>,
    pub params: Vec<(String, String)>,
    pub remaps: Vec<(String, String)>,
    pub cmd: Vec<String>,
    pub output: Option<String>,
    pub respawn: Option<bool>,
    pub respawn_delay: Option<f64>,
}

/// Composable node container record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposableNodeContainerRecord {
    pub name: String,
    pub namespace: String,
}

/// Load node record (for composable nodes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadNodeRecord {
    pub package: String,
    pub plugin: String,
    pub target_container_name: String,
    pub node_name: String,
    pub namespace: String,
    pub log_level: Option<String>,
    pub remaps: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
    pub extra_args: BTreeMap<String, String>,
    pub env: Option<Vec<(String, String)>>,
}

impl LoadNodeRecord {
    /// Value of a parameter by name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Target of a remapping by its source topic
    pub fn remap(&self, from: &str) -> Option<&str> {
        self.remaps
            .iter()
            .find(|(key, _)| key == from)
            .map(|(_, to)| to.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_node() -> LoadNodeRecord {
        LoadNodeRecord {
            package: "map_loader".to_string(),
            plugin: "PointCloudMapLoaderNode".to_string(),
            target_container_name: "/map/map_container".to_string(),
            node_name: "pointcloud_map_loader".to_string(),
            namespace: "/map".to_string(),
            log_level: None,
            remaps: vec![(
                "output/pointcloud_map".to_string(),
                "pointcloud_map".to_string(),
            )],
            params: vec![(
                "pcd_paths_or_directory".to_string(),
                "[/data/pointcloud_map.pcd]".to_string(),
            )],
            extra_args: BTreeMap::from([(
                "use_intra_process_comms".to_string(),
                "false".to_string(),
            )]),
            env: None,
        }
    }

    #[test]
    fn test_serialize_empty() {
        let record = RecordJson::new();
        let json = record.to_json().unwrap();
        assert!(json.contains("\"node\""));
        assert!(json.contains("\"container\""));
        assert!(json.contains("\"load_node\""));
        assert!(json.contains("\"lifecycle_node\""));
        assert!(json.contains("\"file_data\""));
    }

    #[test]
    fn test_tuple_serialization() {
        let json = serde_json::to_string(&load_node()).unwrap();
        // Tuples should serialize as arrays
        assert!(json.contains("[\"output/pointcloud_map\",\"pointcloud_map\"]"));
        assert!(json.contains("\"extra_args\":{\"use_intra_process_comms\":\"false\"}"));
    }

    #[test]
    fn test_lookup_helpers() {
        let node = load_node();
        assert_eq!(
            node.param("pcd_paths_or_directory"),
            Some("[/data/pointcloud_map.pcd]")
        );
        assert_eq!(node.param("missing"), None);
        assert_eq!(node.remap("output/pointcloud_map"), Some("pointcloud_map"));

        let mut record = RecordJson::new();
        record.load_node.push(node);
        assert!(record.load_node_named("pointcloud_map_loader").is_some());
        assert!(record.load_node_named("map_tf_generator").is_none());
    }

    #[test]
    fn test_json_reload() {
        let mut record = RecordJson::new();
        record.load_node.push(load_node());
        record.container.push(ComposableNodeContainerRecord {
            name: "map_container".to_string(),
            namespace: "/map".to_string(),
        });

        let reloaded = RecordJson::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.container, record.container);
        assert_eq!(reloaded.load_node[0].node_name, "pointcloud_map_loader");
    }
}
