//! Error types for map_launch

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML parsing error: {0}")]
    XmlError(#[from] roxmltree::Error),

    #[error("Missing required attribute '{attribute}' on element '<{element}>'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Type coercion failed for attribute '{attribute}' with value '{value}' (expected {expected_type})")]
    TypeCoercion {
        attribute: String,
        value: String,
        expected_type: &'static str,
    },

    #[error("Unexpected element '<{child}>' in '<{parent}>'")]
    UnexpectedElement { parent: String, child: String },

    #[error("Invalid substitution syntax: {0}")]
    InvalidSubstitution(String),

    #[error("Substitution error: {0}")]
    Substitution(#[from] SubstitutionError),

    #[error("Launch argument '{0}' has no default and was not provided (use {0}:=<value>)")]
    MissingArgument(String),

    #[error("Launch argument '{name}' got '{value}', expected one of: {choices}")]
    InvalidChoice {
        name: String,
        value: String,
        choices: String,
    },

    #[error("Condition '{expression}' resolved to '{value}', expected 'true', 'false', '1' or '0'")]
    InvalidCondition { expression: String, value: String },

    #[error("Record generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SubstitutionError {
    #[error("Undefined variable: '{0}'. Did you forget to declare it with <arg> or <let>?")]
    UndefinedVariable(String),

    #[error(
        "Undefined environment variable: '{0}'. Make sure the variable is set in your environment."
    )]
    UndefinedEnvVar(String),

    #[error("Package '{0}' not found. Ensure the package is installed and sourced.")]
    PackageNotFound(String),
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Composable node '{0}' is declared outside of a node_container")]
    OrphanComposableNode(String),

    #[error("Parameter file {path} is not valid YAML: {message}")]
    InvalidParamFile { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;
