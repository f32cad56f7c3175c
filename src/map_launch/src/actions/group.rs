//! Group and namespace actions

use crate::{
    error::Result,
    substitution::{parse_substitutions, resolve_substitutions, LaunchContext, Substitution},
    xml::{Entity, EntityExt},
};
use std::collections::HashMap;

/// Group action for scoping namespaces and configurations
#[derive(Debug, Clone)]
pub struct GroupAction {
    pub namespace: Option<Vec<Substitution>>,
    pub scoped: bool,
}

/// `<push-ros-namespace namespace="..."/>`
#[derive(Debug, Clone)]
pub struct PushRosNamespaceAction {
    pub namespace: Vec<Substitution>,
}

/// State captured on group entry, restored on exit
#[derive(Debug)]
pub struct GroupScope {
    configurations: Option<HashMap<String, String>>,
    namespace_depth: usize,
}

impl GroupAction {
    pub fn from_entity<E: Entity>(entity: &E) -> Result<Self> {
        let namespace = entity
            .optional_attr_str("ns")
            .map(|s| parse_substitutions(&s))
            .transpose()?;
        let scoped = entity.optional_attr::<bool>("scoped")?.unwrap_or(true);

        Ok(Self { namespace, scoped })
    }

    /// Enter the group, pushing its namespace if any
    pub fn enter(&self, context: &mut LaunchContext) -> Result<GroupScope> {
        let scope = GroupScope {
            configurations: self.scoped.then(|| context.configurations().clone()),
            namespace_depth: context.namespace_depth(),
        };

        if let Some(ns) = &self.namespace {
            let ns = resolve_substitutions(ns, context)?;
            context.push_namespace(ns);
        }

        Ok(scope)
    }
}

impl GroupScope {
    /// Leave the group, undoing namespace pushes and scoped configuration changes
    pub fn exit(self, context: &mut LaunchContext) {
        context.truncate_namespaces(self.namespace_depth);
        if let Some(configurations) = self.configurations {
            context.replace_configurations(configurations);
        }
    }
}

impl PushRosNamespaceAction {
    pub fn from_entity<E: Entity>(entity: &E) -> Result<Self> {
        Ok(Self {
            namespace: parse_substitutions(&entity.required_attr_str("namespace")?)?,
        })
    }

    pub fn apply(&self, context: &mut LaunchContext) -> Result<()> {
        let ns = resolve_substitutions(&self.namespace, context)?;
        context.push_namespace(ns);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlEntity;

    #[test]
    fn test_parse_group_with_namespace() {
        let xml = r#"<group ns="map" />"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let group = GroupAction::from_entity(&XmlEntity::new(doc.root_element())).unwrap();

        assert!(group.namespace.is_some());
        assert!(group.scoped);
    }

    #[test]
    fn test_scoped_group_restores_state() {
        let xml = r#"<group ns="map" />"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let group = GroupAction::from_entity(&XmlEntity::new(doc.root_element())).unwrap();

        let mut context = LaunchContext::new();
        context.set_configuration("outer".to_string(), "1".to_string());

        let scope = group.enter(&mut context).unwrap();
        assert_eq!(context.current_namespace(), "/map");
        context.set_configuration("inner".to_string(), "2".to_string());
        context.push_namespace("nested".to_string());
        assert_eq!(context.current_namespace(), "/map/nested");

        scope.exit(&mut context);
        assert_eq!(context.current_namespace(), "/");
        assert_eq!(context.get_configuration("outer"), Some("1".to_string()));
        assert!(context.get_configuration("inner").is_none());
    }

    #[test]
    fn test_unscoped_group_forwards_configurations() {
        let xml = r#"<group scoped="false" />"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let group = GroupAction::from_entity(&XmlEntity::new(doc.root_element())).unwrap();
        assert!(!group.scoped);

        let mut context = LaunchContext::new();
        let scope = group.enter(&mut context).unwrap();
        context.set_configuration("inner".to_string(), "2".to_string());
        scope.exit(&mut context);

        assert_eq!(context.get_configuration("inner"), Some("2".to_string()));
    }

    #[test]
    fn test_push_ros_namespace() {
        let xml = r#"<push-ros-namespace namespace="map" />"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let push = PushRosNamespaceAction::from_entity(&XmlEntity::new(doc.root_element())).unwrap();

        let mut context = LaunchContext::new();
        push.apply(&mut context).unwrap();
        assert_eq!(context.current_namespace(), "/map");
    }
}
