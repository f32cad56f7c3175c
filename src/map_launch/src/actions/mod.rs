//! Launch actions

pub mod arg;
pub mod container;
pub mod group;
pub mod let_action;

pub use arg::{ArgAction, ArgumentMetadata};
pub use container::{ComposableNodeAction, ContainerAction};
pub use group::{GroupAction, GroupScope, PushRosNamespaceAction};
pub use let_action::LetAction;
