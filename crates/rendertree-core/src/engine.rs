//! In-memory rendering engine.
//!
//! The engine turns an [`Element`] into a [`LiveTree`]. In [`RenderMode::Mount`]
//! every composite is constructed and rendered down to host elements and
//! text. In [`RenderMode::Shallow`] only the root is constructed and
//! rendered; its output is kept as element data and nothing beneath it is
//! ever instantiated.
//!
//! There is no reconciliation: each call builds a fresh tree.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::collections::KeySet;
use crate::component::{ClassType, ComponentError, LiveInstance};
use crate::element::{Element, ElementType, Leaf, Props, Renderable};
use crate::live::{ChildIds, LiveKind, LiveNode, LiveTree};
use crate::{LifecyclePhase, NodeId, TreeError};

pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Expand every composite down to host elements and text.
    #[default]
    Mount,
    /// Render the root only and keep its output unexpanded.
    Shallow,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Mount => f.write_str("mount"),
            RenderMode::Shallow => f.write_str("shallow"),
        }
    }
}

/// How mounted text leaves are stored.
///
/// Older engines kept numeric children as numbers; newer ones turn every text
/// child into a string. Element data (shallow output, children props) is
/// never coerced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextCoercion {
    Preserve,
    #[default]
    Stringify,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub text_coercion: TextCoercion,
    /// Nesting limit for mounted elements and nested child lists.
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            text_coercion: TextCoercion::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render `element` into a fresh live tree.
    ///
    /// A failing construction or render aborts the whole pass: the partial
    /// tree is discarded without running any lifecycle hooks and the
    /// component's error is returned.
    pub fn render(&self, element: &Element, mode: RenderMode) -> Result<LiveTree, TreeError> {
        log::debug!("render pass for {} in {mode} mode", element.ty().name());
        let mut tree = LiveTree::new(mode);
        let root = match mode {
            RenderMode::Mount => self.mount_element(&mut tree, element.clone(), None, 0),
            RenderMode::Shallow => self.render_shallow(&mut tree, element.clone()),
        };
        match root {
            Ok(root) => {
                tree.set_root(root);
                tree.commit_mount();
                log::debug!("render pass produced {} live nodes", tree.len());
                Ok(tree)
            }
            Err(err) => {
                log::debug!("render pass failed: {err}");
                tree.discard();
                Err(err)
            }
        }
    }

    fn render_shallow(&self, tree: &mut LiveTree, element: Element) -> Result<NodeId, TreeError> {
        let (ty, props, key, ref_handle) = element.into_parts();
        let (kind, output) = resolve(ty, &props)?;
        let id = tree.insert(LiveNode::new(kind, props, key, ref_handle, None));
        tree.set_output(id, output, None)?;
        Ok(id)
    }

    fn mount_element(
        &self,
        tree: &mut LiveTree,
        element: Element,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Result<NodeId, TreeError> {
        self.check_depth(depth)?;
        let (ty, props, key, ref_handle) = element.into_parts();
        let (kind, output) = resolve(ty, &props)?;
        let id = tree.insert(LiveNode::new(kind, props, key, ref_handle, parent));
        log::trace!("mounted node {id} at depth {depth}");
        // Only the root keeps its raw output; shallow projection reads nothing else.
        let kept = match parent {
            None => output.clone(),
            Some(_) => Renderable::Empty,
        };
        let mut children = ChildIds::new();
        self.mount_renderable(tree, output, id, depth + 1, &mut children)?;
        tree.set_output(id, kept, Some(children))?;
        Ok(id)
    }

    fn mount_renderable(
        &self,
        tree: &mut LiveTree,
        renderable: Renderable,
        parent: NodeId,
        depth: usize,
        ids: &mut ChildIds,
    ) -> Result<(), TreeError> {
        match renderable {
            Renderable::Empty => {}
            Renderable::Leaf(leaf) => {
                let leaf = self.coerce(leaf);
                let mut node = LiveNode::new(
                    LiveKind::Text(leaf),
                    Props::default(),
                    None,
                    None,
                    Some(parent),
                );
                node.children = Some(ChildIds::new());
                ids.push(tree.insert(node));
            }
            Renderable::Element(element) => {
                ids.push(self.mount_element(tree, element, Some(parent), depth)?);
            }
            Renderable::List(items) => {
                warn_duplicate_keys(&items, parent);
                for item in items {
                    // nested lists count toward the limit like elements do
                    let item_depth = match item {
                        Renderable::List(_) => {
                            self.check_depth(depth + 1)?;
                            depth + 1
                        }
                        _ => depth,
                    };
                    self.mount_renderable(tree, item, parent, item_depth, ids)?;
                }
            }
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<(), TreeError> {
        if depth > self.config.max_depth {
            return Err(TreeError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    fn coerce(&self, leaf: Leaf) -> Leaf {
        match self.config.text_coercion {
            TextCoercion::Preserve => leaf,
            TextCoercion::Stringify => leaf.stringified(),
        }
    }
}

/// Runs the construct behind `ty`: composites are constructed and rendered,
/// hosts and fragments yield their children.
fn resolve(ty: ElementType, props: &Props) -> Result<(LiveKind, Renderable), TreeError> {
    let resolved = match ty {
        ElementType::Class(class_ty) => {
            let instance = construct(class_ty, props)?;
            let output = render_class(class_ty.name(), &instance, props)?;
            (
                LiveKind::Class {
                    ty: class_ty,
                    instance,
                },
                output,
            )
        }
        ElementType::Function(function_ty) => {
            let output = function_ty.render(props).map_err(|source| {
                component_failure(function_ty.name(), LifecyclePhase::Render, source)
            })?;
            (LiveKind::Function(function_ty), output)
        }
        ElementType::Host(tag) => (LiveKind::Host(tag), props.children().to_renderable()),
        ElementType::Fragment => (LiveKind::Fragment, props.children().to_renderable()),
    };
    Ok(resolved)
}

fn construct(ty: ClassType, props: &Props) -> Result<LiveInstance, TreeError> {
    let instance = ty
        .construct(props)
        .map_err(|source| component_failure(ty.name(), LifecyclePhase::Construct, source))?;
    Ok(Rc::new(RefCell::new(instance)))
}

fn render_class(
    name: &'static str,
    instance: &LiveInstance,
    props: &Props,
) -> Result<Renderable, TreeError> {
    instance
        .borrow()
        .render_dyn(props)
        .map_err(|source| component_failure(name, LifecyclePhase::Render, source))
}

fn component_failure(
    component: &'static str,
    phase: LifecyclePhase,
    source: ComponentError,
) -> TreeError {
    TreeError::Component {
        component,
        phase,
        source,
    }
}

fn warn_duplicate_keys(items: &[Renderable], parent: NodeId) {
    let mut seen = KeySet::default();
    for item in items {
        if let Renderable::Element(element) = item {
            if let Some(key) = element.get_key() {
                if !seen.insert(key.as_str()) {
                    log::warn!("duplicate key `{key}` among children of node {parent}");
                }
            }
        }
    }
}
