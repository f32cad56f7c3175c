//! Command-line and record generation

use crate::actions::ContainerAction;
use crate::record::types::NodeRecord;
use crate::substitution::LaunchContext;

pub struct CommandGenerator;

impl CommandGenerator {
    /// Process record for a container
    pub fn generate_container_record(
        container: &ContainerAction,
        context: &LaunchContext,
    ) -> NodeRecord {
        NodeRecord {
            executable: container.executable.clone(),
            package: Some(container.package.clone()),
            name: Some(container.name.clone()),
            namespace: Some(container.namespace.clone()),
            exec_name: Some(container.name.clone()),
            params: Vec::new(),
            remaps: Vec::new(),
            cmd: Self::generate_container_command(container, context),
            output: container.output.clone(),
            respawn: Some(container.respawn),
            respawn_delay: container.respawn_delay,
        }
    }

    pub fn generate_container_command(
        container: &ContainerAction,
        context: &LaunchContext,
    ) -> Vec<String> {
        vec![
            Self::resolve_executable_path(&container.package, &container.executable, context),
            "--ros-args".to_string(),
            "-r".to_string(),
            format!("__node:={}", container.name),
            "-r".to_string(),
            format!("__ns:={}", container.namespace),
        ]
    }

    fn resolve_executable_path(package: &str, executable: &str, context: &LaunchContext) -> String {
        match context.find_executable(package, executable) {
            Some(path) => path.to_string_lossy().into_owned(),
            None => {
                log::warn!(
                    "Executable '{}' of package '{}' not found under any prefix; recording bare name",
                    executable,
                    package
                );
                executable.to_string()
            }
        }
    }
}
