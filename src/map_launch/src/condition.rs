//! Condition evaluation for if/unless attributes

use crate::{
    error::{ParseError, Result},
    substitution::{parse_substitutions, resolve_substitutions, LaunchContext},
    xml::Entity,
};

/// Evaluate whether an entity should be processed based on if/unless conditions
pub fn should_process_entity<E: Entity>(entity: &E, context: &LaunchContext) -> Result<bool> {
    if let Some(if_condition) = entity.optional_attr_str("if") {
        if !evaluate_condition(&if_condition, context)? {
            return Ok(false);
        }
    }

    if let Some(unless_condition) = entity.optional_attr_str("unless") {
        if evaluate_condition(&unless_condition, context)? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Evaluate a condition string (may contain substitutions)
pub fn evaluate_condition(condition: &str, context: &LaunchContext) -> Result<bool> {
    let subs = parse_substitutions(condition)?;
    let resolved = resolve_substitutions(&subs, context)?;

    parse_bool(&resolved).ok_or_else(|| ParseError::InvalidCondition {
        expression: condition.to_string(),
        value: resolved,
    })
}

/// Interpret a launch boolean. Only `true`/`false`/`1`/`0` are accepted,
/// case-insensitively.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
