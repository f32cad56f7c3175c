//! Let action implementation

use crate::{
    error::Result,
    substitution::{parse_substitutions, resolve_substitutions, LaunchContext, Substitution},
    xml::Entity,
};

/// Let action for setting a launch configuration
#[derive(Debug, Clone)]
pub struct LetAction {
    pub name: String,
    pub value: Vec<Substitution>,
}

impl LetAction {
    pub fn from_entity<E: Entity>(entity: &E) -> Result<Self> {
        Ok(Self {
            name: entity.required_attr_str("name")?,
            value: parse_substitutions(&entity.required_attr_str("value")?)?,
        })
    }

    pub fn apply(&self, context: &mut LaunchContext) -> Result<()> {
        let value = resolve_substitutions(&self.value, context)?;
        log::debug!("let {} = {}", self.name, value);
        context.set_configuration(self.name.clone(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlEntity;

    #[test]
    fn test_parse_and_apply_let() {
        let xml = r#"<let name="container_executable" value="component_container_mt" />"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let let_action = LetAction::from_entity(&XmlEntity::new(doc.root_element())).unwrap();
        assert_eq!(let_action.name, "container_executable");

        let mut context = LaunchContext::new();
        let_action.apply(&mut context).unwrap();
        assert_eq!(
            context.get_configuration("container_executable"),
            Some("component_container_mt".to_string())
        );
    }

    #[test]
    fn test_let_missing_value() {
        let xml = r#"<let name="container_executable" />"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        assert!(LetAction::from_entity(&XmlEntity::new(doc.root_element())).is_err());
    }
}
