//! Arg action implementation

use crate::error::{ParseError, Result};
use crate::substitution::{parse_substitutions, resolve_substitutions, LaunchContext, Substitution};
use crate::xml::Entity;
use serde::Serialize;

/// Arg action representing a launch argument declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ArgAction {
    pub name: String,
    /// Parsed default, resolved only when no value was supplied
    pub default: Option<Vec<Substitution>>,
    pub description: Option<String>,
    pub choices: Option<Vec<String>>,
    default_text: Option<String>,
}

/// Declared argument as listed by `show-args`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentMetadata {
    pub name: String,
    pub default: Option<String>,
    pub description: Option<String>,
    pub choices: Option<Vec<String>>,
}

impl ArgAction {
    pub fn from_entity<E: Entity>(entity: &E) -> Result<Self> {
        let name = entity.required_attr_str("name")?;

        let default_text = entity.optional_attr_str("default");
        let default = default_text
            .as_deref()
            .map(parse_substitutions)
            .transpose()?;

        // Choices are a comma-separated list
        let choices = entity.optional_attr_str("choices").map(|choices| {
            choices
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(Self {
            name,
            default,
            description: entity.optional_attr_str("description"),
            choices,
            default_text,
        })
    }

    /// Apply the argument to the context.
    ///
    /// A value already present (from the command line) wins; otherwise the
    /// default is resolved against the configurations declared so far.
    pub fn apply(&self, context: &mut LaunchContext) -> Result<String> {
        let value = match context.get_configuration(&self.name) {
            Some(value) => value,
            None => {
                let default = self
                    .default
                    .as_ref()
                    .ok_or_else(|| ParseError::MissingArgument(self.name.clone()))?;
                resolve_substitutions(default, context)?
            }
        };

        if let Some(choices) = &self.choices {
            if !choices.contains(&value) {
                return Err(ParseError::InvalidChoice {
                    name: self.name.clone(),
                    value,
                    choices: choices.join(", "),
                });
            }
        }

        context.set_configuration(self.name.clone(), value.clone());
        Ok(value)
    }

    pub fn metadata(&self) -> ArgumentMetadata {
        ArgumentMetadata {
            name: self.name.clone(),
            default: self.default_text.clone(),
            description: self.description.clone(),
            choices: self.choices.clone(),
        }
    }
}
