//! Container action for composable nodes

use crate::condition::should_process_entity;
use crate::error::Result;
use crate::record::{ComposableNodeContainerRecord, LoadNodeRecord};
use crate::substitution::{join_name, parse_substitutions, resolve_substitutions, LaunchContext};
use crate::xml::{Entity, EntityExt, XmlEntity};
use std::collections::BTreeMap;

/// Container action representing a composable node container
#[derive(Debug, Clone)]
pub struct ContainerAction {
    pub package: String,
    pub executable: String,
    pub name: String,
    /// Effective namespace after applying pushed namespaces
    pub namespace: String,
    pub output: Option<String>,
    pub respawn: bool,
    pub respawn_delay: Option<f64>,
    pub composable_nodes: Vec<ComposableNodeAction>,
}

/// Composable node action
#[derive(Debug, Clone)]
pub struct ComposableNodeAction {
    pub package: String,
    pub plugin: String,
    pub name: String,
    pub namespace: Option<String>,
    pub parameters: Vec<(String, String)>,
    pub remappings: Vec<(String, String)>,
    pub extra_args: BTreeMap<String, String>,
}

/// Parse and resolve an attribute in one step
fn resolve_attr<E: Entity>(entity: &E, name: &str, context: &LaunchContext) -> Result<String> {
    let raw = entity.required_attr_str(name)?;
    Ok(resolve_substitutions(&parse_substitutions(&raw)?, context)?)
}

fn resolve_optional_attr<E: Entity>(
    entity: &E,
    name: &str,
    context: &LaunchContext,
) -> Result<Option<String>> {
    entity
        .optional_attr_str(name)
        .map(|raw| -> Result<String> {
            Ok(resolve_substitutions(&parse_substitutions(&raw)?, context)?)
        })
        .transpose()
}

impl ContainerAction {
    pub fn from_entity(entity: &XmlEntity, context: &LaunchContext) -> Result<Self> {
        let package = resolve_attr(entity, "pkg", context)?;
        let executable = resolve_attr(entity, "exec", context)?;
        let name = resolve_attr(entity, "name", context)?;
        let namespace = resolve_optional_attr(entity, "namespace", context)?.unwrap_or_default();
        let namespace = context.resolve_namespace(&namespace);

        let mut composable_nodes = Vec::new();
        for child in entity.children() {
            if !should_process_entity(&child, context)? {
                log::debug!("Skipping {} in node_container due to condition", child.type_name());
                continue;
            }
            match child.type_name() {
                "composable_node" | "composable-node" => {
                    composable_nodes.push(ComposableNodeAction::from_entity(&child, context)?);
                }
                other => {
                    log::warn!("Unexpected element '{}' in node_container", other);
                }
            }
        }

        Ok(Self {
            package,
            executable,
            name,
            namespace,
            output: resolve_optional_attr(entity, "output", context)?,
            respawn: entity.optional_attr::<bool>("respawn")?.unwrap_or(false),
            respawn_delay: entity.optional_attr::<f64>("respawn_delay")?,
            composable_nodes,
        })
    }

    /// Fully qualified container name, the load target of its nodes
    pub fn full_name(&self) -> String {
        join_name(&self.namespace, &self.name)
    }

    pub fn to_container_record(&self) -> ComposableNodeContainerRecord {
        ComposableNodeContainerRecord {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
        }
    }

    pub fn to_load_node_records(&self) -> Vec<LoadNodeRecord> {
        let target = self.full_name();
        self.composable_nodes
            .iter()
            .map(|node| node.to_load_node_record(&target, &self.namespace))
            .collect()
    }
}

impl ComposableNodeAction {
    pub fn from_entity(entity: &XmlEntity, context: &LaunchContext) -> Result<Self> {
        let package = resolve_attr(entity, "pkg", context)?;
        let plugin = resolve_attr(entity, "plugin", context)?;
        let name = resolve_attr(entity, "name", context)?;
        let namespace = resolve_optional_attr(entity, "namespace", context)?
            .filter(|ns| !ns.is_empty())
            .map(|ns| context.resolve_namespace(&ns));

        let mut parameters = Vec::new();
        let mut remappings = Vec::new();
        let mut extra_args = BTreeMap::new();

        for child in entity.children() {
            if !should_process_entity(&child, context)? {
                continue;
            }
            match child.type_name() {
                "param" => {
                    parameters.push((
                        resolve_attr(&child, "name", context)?,
                        resolve_attr(&child, "value", context)?,
                    ));
                }
                "remap" => {
                    remappings.push((
                        resolve_attr(&child, "from", context)?,
                        resolve_attr(&child, "to", context)?,
                    ));
                }
                "extra_arg" | "extra-arg" => {
                    extra_args.insert(
                        resolve_attr(&child, "name", context)?,
                        resolve_attr(&child, "value", context)?,
                    );
                }
                other => {
                    log::debug!("Skipping '{}' in composable_node", other);
                }
            }
        }

        Ok(Self {
            package,
            plugin,
            name,
            namespace,
            parameters,
            remappings,
            extra_args,
        })
    }

    pub fn to_load_node_record(
        &self,
        target_container_name: &str,
        container_namespace: &str,
    ) -> LoadNodeRecord {
        LoadNodeRecord {
            package: self.package.clone(),
            plugin: self.plugin.clone(),
            target_container_name: target_container_name.to_string(),
            node_name: self.name.clone(),
            namespace: self
                .namespace
                .clone()
                .unwrap_or_else(|| container_namespace.to_string()),
            log_level: None,
            remaps: self.remappings.clone(),
            params: self.parameters.clone(),
            extra_args: self.extra_args.clone(),
            env: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const CONTAINER_XML: &str = r#"
        <node_container pkg="rclcpp_components" exec="$(var container_executable)" name="map_container" namespace="" output="screen">
            <composable_node pkg="map_loader" plugin="Lanelet2MapLoaderNode" name="lanelet2_map_loader">
                <remap from="output/lanelet2_map" to="vector_map"/>
                <param name="center_line_resolution" value="5.0"/>
                <param name="lanelet2_map_path" value="$(var map_path)/lanelet2_map.osm"/>
                <extra_arg name="use_intra_process_comms" value="$(var use_intra_process)"/>
            </composable_node>
            <composable_node pkg="map_tf_generator" plugin="MapTFGeneratorNode" name="map_tf_generator" namespace="tf"/>
        </node_container>
    "#;

    fn context() -> LaunchContext {
        let mut context = LaunchContext::new();
        context.set_configuration(
            "container_executable".to_string(),
            "component_container".to_string(),
        );
        context.set_configuration("map_path".to_string(), "/data/map".to_string());
        context.set_configuration("use_intra_process".to_string(), "false".to_string());
        context
    }

    #[test]
    fn test_parse_container() {
        let doc = Document::parse(CONTAINER_XML).unwrap();
        let entity = XmlEntity::new(doc.root_element());
        let container = ContainerAction::from_entity(&entity, &context()).unwrap();

        assert_eq!(container.package, "rclcpp_components");
        assert_eq!(container.executable, "component_container");
        assert_eq!(container.name, "map_container");
        assert_eq!(container.namespace, "/");
        assert_eq!(container.output.as_deref(), Some("screen"));
        assert!(!container.respawn);
        assert_eq!(container.composable_nodes.len(), 2);
    }

    #[test]
    fn test_container_inherits_pushed_namespace() {
        let doc = Document::parse(CONTAINER_XML).unwrap();
        let entity = XmlEntity::new(doc.root_element());
        let mut context = context();
        context.push_namespace("map".to_string());

        let container = ContainerAction::from_entity(&entity, &context).unwrap();
        assert_eq!(container.namespace, "/map");
        assert_eq!(container.full_name(), "/map/map_container");

        let record = container.to_container_record();
        assert_eq!(record.name, "map_container");
        assert_eq!(record.namespace, "/map");
    }

    #[test]
    fn test_load_node_records() {
        let doc = Document::parse(CONTAINER_XML).unwrap();
        let entity = XmlEntity::new(doc.root_element());
        let mut context = context();
        context.push_namespace("map".to_string());

        let container = ContainerAction::from_entity(&entity, &context).unwrap();
        let records = container.to_load_node_records();

        assert_eq!(records.len(), 2);
        let loader = &records[0];
        assert_eq!(loader.target_container_name, "/map/map_container");
        assert_eq!(loader.node_name, "lanelet2_map_loader");
        assert_eq!(loader.namespace, "/map");
        assert_eq!(
            loader.remaps,
            vec![("output/lanelet2_map".to_string(), "vector_map".to_string())]
        );
        assert_eq!(
            loader.params,
            vec![
                ("center_line_resolution".to_string(), "5.0".to_string()),
                (
                    "lanelet2_map_path".to_string(),
                    "/data/map/lanelet2_map.osm".to_string()
                ),
            ]
        );
        assert_eq!(
            loader.extra_args.get("use_intra_process_comms"),
            Some(&"false".to_string())
        );

        // Relative node namespace resolves against the pushed namespace
        assert_eq!(records[1].namespace, "/map/tf");
    }

    #[test]
    fn test_missing_plugin() {
        let xml = r#"<node_container pkg="rclcpp_components" exec="component_container" name="c">
            <composable_node pkg="map_loader" name="no_plugin"/>
        </node_container>"#;
        let doc = Document::parse(xml).unwrap();
        let entity = XmlEntity::new(doc.root_element());

        assert!(ContainerAction::from_entity(&entity, &LaunchContext::new()).is_err());
    }

    #[test]
    fn test_conditional_composable_node() {
        let xml = r#"<node_container pkg="rclcpp_components" exec="component_container" name="c">
            <composable_node pkg="map_loader" plugin="A" name="a" if="$(var enable_a)"/>
            <composable_node pkg="map_loader" plugin="B" name="b"/>
        </node_container>"#;
        let doc = Document::parse(xml).unwrap();
        let entity = XmlEntity::new(doc.root_element());
        let mut context = LaunchContext::new();
        context.set_configuration("enable_a".to_string(), "false".to_string());

        let container = ContainerAction::from_entity(&entity, &context).unwrap();
        assert_eq!(container.composable_nodes.len(), 1);
        assert_eq!(container.composable_nodes[0].name, "b");
    }
}
