//! Substitution types

use crate::error::SubstitutionError;
use crate::substitution::context::LaunchContext;

/// Substitution enum representing different types of substitutions.
///
/// Arguments are themselves substitution lists, so `$(var $(env KEY))`
/// resolves the inner expression first.
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    /// Plain text (no substitution)
    Text(String),
    /// $(var name) - Launch configuration variable
    LaunchConfiguration(Vec<Substitution>),
    /// $(env VAR [default]) - Environment variable with optional default
    EnvironmentVariable {
        name: Vec<Substitution>,
        default: Option<Vec<Substitution>>,
    },
    /// $(find-pkg-share package_name) - ROS 2 package share directory
    FindPackageShare(Vec<Substitution>),
}

impl Substitution {
    /// Resolve substitution to string value
    pub fn resolve(&self, context: &LaunchContext) -> Result<String, SubstitutionError> {
        match self {
            Substitution::Text(s) => Ok(s.clone()),
            Substitution::LaunchConfiguration(name) => {
                let name = resolve_substitutions(name, context)?;
                context
                    .get_configuration(&name)
                    .ok_or(SubstitutionError::UndefinedVariable(name))
            }
            Substitution::EnvironmentVariable { name, default } => {
                let name = resolve_substitutions(name, context)?;
                match std::env::var(&name) {
                    Ok(value) => Ok(value),
                    Err(_) => match default {
                        Some(default) => resolve_substitutions(default, context),
                        None => Err(SubstitutionError::UndefinedEnvVar(name)),
                    },
                }
            }
            Substitution::FindPackageShare(package) => {
                let package = resolve_substitutions(package, context)?;
                context
                    .find_package_share(&package)
                    .map(|share| share.to_string_lossy().into_owned())
                    .ok_or(SubstitutionError::PackageNotFound(package))
            }
        }
    }
}

/// Resolve list of substitutions to single string
pub fn resolve_substitutions(
    subs: &[Substitution],
    context: &LaunchContext,
) -> Result<String, SubstitutionError> {
    let mut result = String::new();
    for sub in subs {
        result.push_str(&sub.resolve(context)?);
    }
    Ok(result)
}
