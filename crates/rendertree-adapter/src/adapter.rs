//! Adapter facade: renderers bound to an engine configuration, plus the
//! conversions between elements and canonical nodes.

use std::mem;

use rendertree_core::{
    Children, Element, Engine, EngineConfig, LiveTree, RenderMode, Renderable, TextCoercion,
    TreeError,
};

use crate::normalize;
use crate::rst::{NodeType, Rendered, RstChild, RstNode};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AdapterOptions {
    pub engine: EngineConfig,
}

impl AdapterOptions {
    /// Engines that keep numeric text children as numbers.
    pub fn legacy() -> Self {
        Self::with_text_coercion(TextCoercion::Preserve)
    }

    /// Engines that stringify every text child.
    pub fn modern() -> Self {
        Self::with_text_coercion(TextCoercion::Stringify)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.engine.max_depth = max_depth;
        self
    }

    fn with_text_coercion(text_coercion: TextCoercion) -> Self {
        Self {
            engine: EngineConfig {
                text_coercion,
                ..EngineConfig::default()
            },
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RendererOptions {
    pub mode: RenderMode,
}

impl RendererOptions {
    pub fn mount() -> Self {
        Self {
            mode: RenderMode::Mount,
        }
    }

    pub fn shallow() -> Self {
        Self {
            mode: RenderMode::Shallow,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Adapter {
    options: AdapterOptions,
}

impl Adapter {
    pub fn new(options: AdapterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    pub fn create_renderer(&self, options: RendererOptions) -> TreeRenderer {
        log::debug!("creating {} renderer", options.mode);
        TreeRenderer {
            engine: Engine::new(self.options.engine),
            mode: options.mode,
            state: RendererState::Idle,
        }
    }

    /// Element tree projection; see [`normalize::element_to_node`].
    pub fn element_to_node(&self, element: &Element) -> Option<RstNode> {
        normalize::element_to_node(element)
    }

    /// Rebuilds an element from a node: same type, attributes, key and ref,
    /// with the rendered output turned back into children.
    pub fn node_to_element(&self, node: &RstNode) -> Element {
        let children = match &node.rendered {
            Rendered::Null => Children::None,
            Rendered::One(child) => Children::One(Box::new(child_to_renderable(self, child))),
            Rendered::Many(children) => Children::Many(
                children
                    .iter()
                    .map(|child| child_to_renderable(self, child))
                    .collect(),
            ),
        };
        let mut element = Element::new(node.ty.clone())
            .attributes(node.props.clone())
            .with_children(children);
        if let Some(key) = &node.key {
            element = element.key(key.clone());
        }
        if let Some(handle) = &node.ref_handle {
            element = element.with_ref(handle);
        }
        element
    }

    pub fn display_name_of_node(&self, node: &RstNode) -> String {
        node.display_name().to_owned()
    }

    /// First host node at or below `node`, in document order.
    pub fn node_to_host_node<'a>(&self, node: &'a RstNode) -> Option<&'a RstNode> {
        node.find(|candidate| candidate.node_type == NodeType::Host)
    }
}

fn child_to_renderable(adapter: &Adapter, child: &RstChild) -> Renderable {
    match child {
        RstChild::Node(node) => adapter.node_to_element(node).into(),
        RstChild::Leaf(leaf) => leaf.clone().into(),
    }
}

enum RendererState {
    Idle,
    Rendered(LiveTree),
    Failed,
    Unmounted,
}

/// Renders one root at a time and hands out canonical snapshots of it.
pub struct TreeRenderer {
    engine: Engine,
    mode: RenderMode,
    state: RendererState,
}

impl TreeRenderer {
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Renders `element`, replacing (and unmounting) any previous tree.
    ///
    /// On failure the component's error is returned and the renderer holds
    /// no tree until the next successful render.
    pub fn render(&mut self, element: &Element) -> Result<(), TreeError> {
        let previous = mem::replace(&mut self.state, RendererState::Idle);
        if let RendererState::Rendered(mut tree) = previous {
            tree.unmount()?;
        }
        match self.engine.render(element, self.mode) {
            Ok(tree) => {
                self.state = RendererState::Rendered(tree);
                Ok(())
            }
            Err(err) => {
                log::debug!("{} render of {} failed", self.mode, element.ty().name());
                self.state = RendererState::Failed;
                Err(err)
            }
        }
    }

    /// Canonical snapshot of the current tree; `Ok(None)` only when the
    /// render produced nothing.
    pub fn get_node(&self) -> Result<Option<RstNode>, TreeError> {
        match &self.state {
            RendererState::Idle => Err(TreeError::InvalidInstanceState {
                reason: "nothing has been rendered yet",
            }),
            RendererState::Rendered(tree) => normalize::normalize(tree, self.mode),
            RendererState::Failed => Err(TreeError::InvalidInstanceState {
                reason: "the last render failed",
            }),
            RendererState::Unmounted => Err(TreeError::InvalidInstanceState {
                reason: "renderer has been unmounted",
            }),
        }
    }

    pub fn unmount(&mut self) -> Result<(), TreeError> {
        match mem::replace(&mut self.state, RendererState::Unmounted) {
            RendererState::Rendered(mut tree) => tree.unmount(),
            RendererState::Idle | RendererState::Failed => Ok(()),
            RendererState::Unmounted => Err(TreeError::InvalidInstanceState {
                reason: "renderer has already been unmounted",
            }),
        }
    }

    /// The live tree behind the last successful render.
    pub fn live_tree(&self) -> Option<&LiveTree> {
        match &self.state {
            RendererState::Rendered(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn dump_tree(&self) -> String {
        match &self.state {
            RendererState::Rendered(tree) => tree.dump_tree(),
            RendererState::Idle => "(not rendered)\n".to_owned(),
            RendererState::Failed => "(render failed)\n".to_owned(),
            RendererState::Unmounted => "(unmounted)\n".to_owned(),
        }
    }
}
