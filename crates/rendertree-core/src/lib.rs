#![doc = r"Element model, component traits and the in-memory rendering engine behind rendertree."]

pub extern crate self as rendertree_core;

pub mod collections;
pub mod component;
pub mod element;
pub mod engine;
mod error;
pub mod hash;
pub mod live;

pub use component::{
    short_type_name, AnyComponent, ClassType, Component, ComponentError, FunctionComponent,
    FunctionType, InstanceHandle,
};
pub use element::{
    Attributes, Children, Element, ElementType, HostHandle, Key, Leaf, PropValue, Props,
    RefHandle, RefTarget, Renderable, CHILDREN,
};
pub use engine::{Engine, EngineConfig, RenderMode, TextCoercion, DEFAULT_MAX_DEPTH};
pub use error::{LifecyclePhase, TreeError};
pub use live::{ConstructKind, InstanceGraph, LiveNode, LiveTree, NodeView, TreeState};

pub type NodeId = usize;

/// Builds [`Attributes`] from `name => value` pairs.
///
/// ```
/// use rendertree_core::attrs;
///
/// let attributes = attrs! { "className" => "Foo", "special" => true };
/// assert_eq!(attributes.len(), 2);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Attributes::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut attributes = $crate::Attributes::new();
        $(attributes.insert($name, $value);)+
        attributes
    }};
}

#[cfg(test)]
#[path = "tests/element_tests.rs"]
mod element_tests;

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod engine_tests;
