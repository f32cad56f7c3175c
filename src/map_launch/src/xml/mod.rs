//! XML launch file access

pub mod entity;

pub use entity::{Entity, EntityExt, XmlEntity};
