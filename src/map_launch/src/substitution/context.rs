//! Launch context for managing configurations

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Distributions probed under /opt/ros when no prefix path provides a package
const KNOWN_DISTROS: &[&str] = &["jazzy", "iron", "humble", "galactic", "foxy"];

/// Launch context holding configurations and state
#[derive(Debug, Clone)]
pub struct LaunchContext {
    configurations: HashMap<String, String>,
    current_file: Option<PathBuf>,
    namespace_stack: Vec<String>,
    package_shares: HashMap<String, PathBuf>,
    prefix_paths: Vec<PathBuf>,
}

impl LaunchContext {
    /// Empty context. Package lookup only sees explicit registrations.
    pub fn new() -> Self {
        Self {
            configurations: HashMap::new(),
            current_file: None,
            namespace_stack: vec!["/".to_string()],
            package_shares: HashMap::new(),
            prefix_paths: Vec::new(),
        }
    }

    /// Context whose package lookup follows the sourced ROS environment
    pub fn from_env() -> Self {
        Self::from_ros_env(
            std::env::var_os("AMENT_PREFIX_PATH"),
            std::env::var("ROS_DISTRO").ok(),
        )
    }

    /// Prefix search order: `AMENT_PREFIX_PATH` entries as listed, then
    /// `/opt/ros/<ROS_DISTRO>`, then the known distributions
    pub(crate) fn from_ros_env(
        ament_prefix_path: Option<OsString>,
        ros_distro: Option<String>,
    ) -> Self {
        let mut context = Self::new();
        if let Some(prefix_path) = ament_prefix_path {
            context.prefix_paths = std::env::split_paths(&prefix_path)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }
        let distros = ros_distro
            .into_iter()
            .chain(KNOWN_DISTROS.iter().map(|d| d.to_string()));
        for distro in distros {
            let prefix = PathBuf::from(format!("/opt/ros/{}", distro));
            if !context.prefix_paths.contains(&prefix) {
                context.prefix_paths.push(prefix);
            }
        }
        context
    }

    pub fn set_current_file(&mut self, path: PathBuf) {
        self.current_file = Some(path);
    }

    pub fn current_file(&self) -> Option<&PathBuf> {
        self.current_file.as_ref()
    }

    pub fn set_configuration(&mut self, name: String, value: String) {
        self.configurations.insert(name, value);
    }

    pub fn get_configuration(&self, name: &str) -> Option<String> {
        self.configurations.get(name).cloned()
    }

    pub fn configurations(&self) -> &HashMap<String, String> {
        &self.configurations
    }

    pub(crate) fn replace_configurations(&mut self, configurations: HashMap<String, String>) {
        self.configurations = configurations;
    }

    /// Install prefixes searched for `share/<pkg>` and `lib/<pkg>`
    pub fn set_prefix_paths(&mut self, prefixes: Vec<PathBuf>) {
        self.prefix_paths = prefixes;
    }

    pub fn prefix_paths(&self) -> &[PathBuf] {
        &self.prefix_paths
    }

    /// Pin a package's share directory, taking precedence over prefix lookup
    pub fn register_package_share(&mut self, package: impl Into<String>, share: PathBuf) {
        self.package_shares.insert(package.into(), share);
    }

    /// Locate `<prefix>/share/<package>`
    pub fn find_package_share(&self, package: &str) -> Option<PathBuf> {
        if let Some(share) = self.package_shares.get(package) {
            return Some(share.clone());
        }

        self.prefix_paths
            .iter()
            .map(|prefix| prefix.join("share").join(package))
            .find(|share| share.is_dir())
    }

    /// Locate `<prefix>/lib/<package>/<executable>`
    pub fn find_executable(&self, package: &str, executable: &str) -> Option<PathBuf> {
        self.prefix_paths
            .iter()
            .map(|prefix| prefix.join("lib").join(package).join(executable))
            .find(|path| path.is_file())
    }

    /// Push a namespace onto the stack
    pub fn push_namespace(&mut self, namespace: String) {
        let resolved = self.resolve_namespace(&namespace);
        self.namespace_stack.push(resolved);
    }

    pub(crate) fn namespace_depth(&self) -> usize {
        self.namespace_stack.len()
    }

    pub(crate) fn truncate_namespaces(&mut self, depth: usize) {
        self.namespace_stack.truncate(depth.max(1));
    }

    /// Get the current namespace
    pub fn current_namespace(&self) -> String {
        self.namespace_stack
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    /// Resolve an entity namespace against the current one.
    ///
    /// Empty means "inherit", relative names are appended, absolute names win.
    pub fn resolve_namespace(&self, namespace: &str) -> String {
        let trimmed = namespace.trim();
        let current = self.current_namespace();
        let normalized = normalize_namespace(trimmed);

        if normalized.is_empty() {
            if trimmed.starts_with('/') {
                return "/".to_string();
            }
            return current;
        }

        if trimmed.starts_with('/') {
            format!("/{}", normalized)
        } else if current == "/" {
            format!("/{}", normalized)
        } else {
            format!("{}/{}", current, normalized)
        }
    }
}

/// Strip surrounding slashes from a namespace
fn normalize_namespace(ns: &str) -> String {
    ns.trim().trim_matches('/').to_string()
}

/// Join a namespace and a base name into a fully qualified name
pub fn join_name(namespace: &str, name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else if namespace == "/" || namespace.is_empty() {
        format!("/{}", name)
    } else {
        format!("{}/{}", namespace.trim_end_matches('/'), name)
    }
}

impl Default for LaunchContext {
    fn default() -> Self {
        Self::new()
    }
}
