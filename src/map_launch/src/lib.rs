//! map_launch library
//!
//! Evaluates the map-serving launch description and renders the container
//! and composable-node records the component runtime would load.

pub mod actions;
pub mod condition;
pub mod error;
pub mod params;
pub mod record;
pub mod substitution;
pub mod xml;

use actions::{
    ArgAction, ArgumentMetadata, ContainerAction, GroupAction, LetAction, PushRosNamespaceAction,
};
use condition::should_process_entity;
use error::{GenerationError, ParseError, Result};
use params::load_param_file;
use record::{CommandGenerator, ComposableNodeContainerRecord, LoadNodeRecord, NodeRecord, RecordJson};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use substitution::LaunchContext;
use xml::{Entity, XmlEntity};

/// The map launch description shipped with this package
pub const MAP_LAUNCH_XML: &str = include_str!("../launch/map.launch.xml");

/// Package providing the launch description and its config files
pub const PACKAGE_NAME: &str = "map_launch";

/// Parameters whose value names a YAML file captured into `file_data`
const PARAM_FILE_KEYS: &[&str] = &["param_file_path"];

/// Launch tree traverser for evaluating launch files
pub struct LaunchTraverser {
    context: LaunchContext,
    cli_args: HashMap<String, String>,
    arguments: Vec<ArgumentMetadata>,
    records: Vec<NodeRecord>,
    containers: Vec<ComposableNodeContainerRecord>,
    load_nodes: Vec<LoadNodeRecord>,
    file_data: BTreeMap<String, String>,
}

impl LaunchTraverser {
    /// Traverser using the sourced ROS environment for package lookup
    pub fn new(cli_args: HashMap<String, String>) -> Self {
        Self::with_context(map_launch_context(), cli_args)
    }

    pub fn with_context(mut context: LaunchContext, cli_args: HashMap<String, String>) -> Self {
        // CLI args take effect as initial configurations
        for (k, v) in &cli_args {
            context.set_configuration(k.clone(), v.clone());
        }

        Self {
            context,
            cli_args,
            arguments: Vec::new(),
            records: Vec::new(),
            containers: Vec::new(),
            load_nodes: Vec::new(),
            file_data: BTreeMap::new(),
        }
    }

    pub fn traverse_file(&mut self, path: &Path) -> Result<()> {
        self.context.set_current_file(path.to_path_buf());
        let content = std::fs::read_to_string(path)?;
        self.traverse_str(&content)
    }

    pub fn traverse_str(&mut self, content: &str) -> Result<()> {
        log::debug!(
            "Evaluating {}",
            self.context
                .current_file()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "embedded launch description".to_string())
        );
        let doc = roxmltree::Document::parse(content)?;
        let root = XmlEntity::new(doc.root_element());
        if root.type_name() != "launch" {
            return Err(ParseError::UnexpectedElement {
                parent: "document".to_string(),
                child: root.type_name().to_string(),
            });
        }
        self.traverse_entity(&root)?;
        self.warn_undeclared_args();
        Ok(())
    }

    fn traverse_entity(&mut self, entity: &XmlEntity) -> Result<()> {
        if !should_process_entity(entity, &self.context)? {
            log::debug!("Skipping {} due to condition", entity.type_name());
            return Ok(());
        }

        match entity.type_name() {
            "launch" => {
                for child in entity.children() {
                    self.traverse_entity(&child)?;
                }
            }
            "arg" => {
                let arg = ArgAction::from_entity(entity)?;
                let value = arg.apply(&mut self.context)?;
                log::debug!("Argument {} = {}", arg.name, value);
                self.arguments.push(arg.metadata());
            }
            "let" => {
                LetAction::from_entity(entity)?.apply(&mut self.context)?;
            }
            "group" => {
                let group = GroupAction::from_entity(entity)?;
                let scope = group.enter(&mut self.context)?;
                let result = entity
                    .children()
                    .try_for_each(|child| self.traverse_entity(&child));
                scope.exit(&mut self.context);
                result?;
            }
            "push-ros-namespace" | "push_ros_namespace" => {
                PushRosNamespaceAction::from_entity(entity)?.apply(&mut self.context)?;
            }
            "node_container" | "node-container" => {
                let container = ContainerAction::from_entity(entity, &self.context)?;
                self.process_container(&container);
            }
            "composable_node" | "composable-node" => {
                let name = entity.optional_attr_str("name").unwrap_or_default();
                return Err(GenerationError::OrphanComposableNode(name).into());
            }
            other => {
                log::warn!("Unsupported action type: {}", other);
            }
        }
        Ok(())
    }

    fn process_container(&mut self, container: &ContainerAction) {
        log::info!(
            "Container {} ({}/{}) with {} composable nodes",
            container.full_name(),
            container.package,
            container.executable,
            container.composable_nodes.len()
        );

        self.records
            .push(CommandGenerator::generate_container_record(container, &self.context));
        self.containers.push(container.to_container_record());

        for load_node in container.to_load_node_records() {
            self.capture_param_files(&load_node);
            self.load_nodes.push(load_node);
        }
    }

    fn capture_param_files(&mut self, load_node: &LoadNodeRecord) {
        for key in PARAM_FILE_KEYS {
            let Some(path) = load_node.param(key) else {
                continue;
            };
            if self.file_data.contains_key(path) {
                continue;
            }
            match load_param_file(Path::new(path)) {
                Ok(content) => {
                    self.file_data.insert(path.to_string(), content);
                }
                Err(e) => {
                    log::warn!(
                        "{}: cannot read parameter file {}: {}",
                        load_node.node_name,
                        path,
                        e
                    );
                }
            }
        }
    }

    fn warn_undeclared_args(&self) {
        for name in self.undeclared_args() {
            log::warn!("Launch argument '{}' is not declared by this launch file", name);
        }
    }

    /// Command-line arguments no `<arg>` declared, sorted by name
    fn undeclared_args(&self) -> BTreeSet<&str> {
        self.cli_args
            .keys()
            .filter(|name| !self.arguments.iter().any(|arg| &arg.name == *name))
            .map(String::as_str)
            .collect()
    }

    /// Arguments declared so far, in declaration order
    pub fn declared_arguments(&self) -> &[ArgumentMetadata] {
        &self.arguments
    }

    pub fn into_record_json(self) -> RecordJson {
        RecordJson {
            node: self.records,
            container: self.containers,
            load_node: self.load_nodes,
            lifecycle_node: Vec::new(),
            file_data: self.file_data,
        }
    }
}

/// Directory of this package's sources, used as its share when not installed
pub fn source_share_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Context from the environment, falling back to this source tree for the
/// `map_launch` share directory
pub fn map_launch_context() -> LaunchContext {
    let mut context = LaunchContext::from_env();
    if context.find_package_share(PACKAGE_NAME).is_none() {
        log::debug!(
            "Package {} not installed; using {}",
            PACKAGE_NAME,
            source_share_dir().display()
        );
        context.register_package_share(PACKAGE_NAME, source_share_dir());
    }
    context
}

/// Parse launch file and generate record.json
pub fn parse_launch_file(path: &Path, cli_args: HashMap<String, String>) -> Result<RecordJson> {
    let mut traverser = LaunchTraverser::new(cli_args);
    traverser.traverse_file(path)?;
    Ok(traverser.into_record_json())
}

/// Render the map launch description with the given launch arguments
pub fn render_map_launch(cli_args: HashMap<String, String>) -> Result<RecordJson> {
    render_map_launch_with(map_launch_context(), cli_args)
}

/// Render the map launch description against an explicit context
pub fn render_map_launch_with(
    context: LaunchContext,
    cli_args: HashMap<String, String>,
) -> Result<RecordJson> {
    let mut traverser = LaunchTraverser::with_context(context, cli_args);
    traverser.traverse_str(MAP_LAUNCH_XML)?;
    Ok(traverser.into_record_json())
}

/// List every `<arg>` declared in a launch document without evaluating it
pub fn declared_arguments(content: &str) -> Result<Vec<ArgumentMetadata>> {
    fn collect(entity: &XmlEntity, out: &mut Vec<ArgumentMetadata>) -> Result<()> {
        for child in entity.children() {
            if child.type_name() == "arg" {
                out.push(ArgAction::from_entity(&child)?.metadata());
            } else {
                collect(&child, out)?;
            }
        }
        Ok(())
    }

    let doc = roxmltree::Document::parse(content)?;
    let mut arguments = Vec::new();
    collect(&XmlEntity::new(doc.root_element()), &mut arguments)?;
    Ok(arguments)
}
