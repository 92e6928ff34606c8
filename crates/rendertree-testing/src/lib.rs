//! Testing utilities and harness for rendertree

pub mod assertions;
pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::assertions;
    pub use crate::assertions::{
        assert_instance_of, assert_leaves, assert_rendered_len, assert_tree_eq,
    };
    pub use crate::testing::*;
    pub use rendertree_adapter::{
        Adapter, AdapterOptions, NodeType, Rendered, RendererOptions, RstChild, RstNode,
    };
    pub use rendertree_core::{
        attrs, Component, ComponentError, Element, FunctionComponent, Key, Leaf, Props, RefHandle,
        RenderMode, Renderable, TreeError,
    };
}
