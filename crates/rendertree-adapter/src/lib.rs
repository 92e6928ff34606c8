#![doc = r"Canonical render tree nodes, the normalizer that builds them from live instance trees, and the adapter facade test harnesses drive."]

pub mod adapter;
pub mod normalize;
pub mod rst;

pub use adapter::{Adapter, AdapterOptions, RendererOptions, TreeRenderer};
pub use normalize::{children_to_rendered, element_to_node, normalize, renderable_to_rendered};
pub use rst::{NodeType, Rendered, RstChild, RstNode, Walk};

#[cfg(test)]
#[path = "tests/rst_tests.rs"]
mod rst_tests;

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod normalize_tests;

#[cfg(test)]
#[path = "tests/adapter_tests.rs"]
mod adapter_tests;
