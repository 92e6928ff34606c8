//! Live instance arena produced by the engine, and the read-only graph view
//! normalizers consume.

use std::fmt::Write as _;

use smallvec::SmallVec;

use crate::component::{ClassType, FunctionType, InstanceHandle, LiveInstance};
use crate::element::{HostHandle, Key, Leaf, Props, RefHandle, RefTarget, Renderable};
use crate::engine::RenderMode;
use crate::{NodeId, TreeError};

pub(crate) type ChildIds = SmallVec<[NodeId; 4]>;

/// What a live node was built from.
pub(crate) enum LiveKind {
    Class {
        ty: ClassType,
        instance: LiveInstance,
    },
    Function(FunctionType),
    Host(String),
    Text(Leaf),
    Fragment,
}

pub struct LiveNode {
    pub(crate) kind: LiveKind,
    pub(crate) props: Props,
    pub(crate) key: Option<Key>,
    pub(crate) ref_handle: Option<RefHandle>,
    /// Raw render output of the root; for hosts and fragments, their children.
    /// Empty on every other node.
    pub(crate) output: Renderable,
    /// Mounted output in emission order, `None` when the output was never
    /// instantiated (shallow roots). Text leaves have an empty list.
    pub(crate) children: Option<ChildIds>,
    pub(crate) parent: Option<NodeId>,
}

impl LiveNode {
    pub(crate) fn new(
        kind: LiveKind,
        props: Props,
        key: Option<Key>,
        ref_handle: Option<RefHandle>,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            kind,
            props,
            key,
            ref_handle,
            output: Renderable::Empty,
            children: None,
            parent,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    fn view(&self) -> NodeView<'_> {
        let kind = match &self.kind {
            LiveKind::Class { ty, instance } => ConstructKind::Class {
                ty: *ty,
                instance: InstanceHandle::new(instance, *ty),
            },
            LiveKind::Function(ty) => ConstructKind::Function(*ty),
            LiveKind::Host(tag) => ConstructKind::Host(tag),
            LiveKind::Text(leaf) => ConstructKind::Text(leaf),
            LiveKind::Fragment => ConstructKind::Fragment,
        };
        NodeView {
            kind,
            props: &self.props,
            key: self.key.as_ref(),
            ref_handle: self.ref_handle.as_ref(),
            output: &self.output,
            children: self.children.as_deref(),
        }
    }

    fn describe(&self) -> String {
        match &self.kind {
            LiveKind::Class { ty, .. } => format!("class {}", ty.name()),
            LiveKind::Function(ty) => format!("function {}", ty.name()),
            LiveKind::Host(tag) => format!("host {tag}"),
            LiveKind::Text(leaf) => format!("text {leaf:?}"),
            LiveKind::Fragment => "fragment".to_owned(),
        }
    }
}

/// Construct kinds a graph can report.
///
/// New kinds may be added; consumers must treat kinds they do not know as
/// unsupported rather than skipping them.
#[non_exhaustive]
pub enum ConstructKind<'a> {
    Class {
        ty: ClassType,
        instance: InstanceHandle,
    },
    Function(FunctionType),
    Host(&'a str),
    Text(&'a Leaf),
    Fragment,
    /// A construct the graph exposes only by name.
    Unknown(&'a str),
}

/// Borrowed snapshot of one node.
pub struct NodeView<'a> {
    pub kind: ConstructKind<'a>,
    pub props: &'a Props,
    pub key: Option<&'a Key>,
    pub ref_handle: Option<&'a RefHandle>,
    /// Raw render output as element data, never coerced. Only the root
    /// carries it; other nodes report `Renderable::Empty`.
    pub output: &'a Renderable,
    /// Mounted children, or `None` when the output was not instantiated.
    pub children: Option<&'a [NodeId]>,
}

/// Read-only access to a rendered instance tree.
pub trait InstanceGraph {
    /// Root node, or `None` when nothing was rendered.
    fn root(&self) -> Result<Option<NodeId>, TreeError>;

    fn node(&self, id: NodeId) -> Result<NodeView<'_>, TreeError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TreeState {
    Mounted,
    Unmounted,
}

/// Arena of live nodes for one render pass.
pub struct LiveTree {
    nodes: Vec<Option<LiveNode>>,
    root: Option<NodeId>,
    mode: RenderMode,
    state: TreeState,
}

impl LiveTree {
    pub(crate) fn new(mode: RenderMode) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            mode,
            state: TreeState::Mounted,
        }
    }

    pub(crate) fn insert(&mut self, node: LiveNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(node));
        id
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub(crate) fn set_output(
        &mut self,
        id: NodeId,
        output: Renderable,
        children: Option<ChildIds>,
    ) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        node.output = output;
        node.children = children;
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Result<&LiveNode, TreeError> {
        self.nodes
            .get(id)
            .ok_or(TreeError::Missing { id })?
            .as_ref()
            .ok_or(TreeError::Missing { id })
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut LiveNode, TreeError> {
        self.nodes
            .get_mut(id)
            .ok_or(TreeError::Missing { id })?
            .as_mut()
            .ok_or(TreeError::Missing { id })
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn state(&self) -> TreeState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.state == TreeState::Mounted
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in depth-first pre-order, starting at the root.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            if let Ok(node) = self.get(id) {
                order.push(id);
                stack.extend(node.children().iter().rev().copied());
            }
        }
        order
    }

    /// Ids in depth-first post-order: every child before its parent, siblings
    /// in emission order.
    pub fn postorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, bool)> = self.root.map(|id| (id, false)).into_iter().collect();
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if let Ok(node) = self.get(id) {
                stack.push((id, true));
                stack.extend(node.children().iter().rev().map(|child| (*child, false)));
            }
        }
        order
    }

    /// Runs mount hooks and attaches refs, children before parents.
    pub(crate) fn commit_mount(&self) {
        for id in self.postorder() {
            let Ok(node) = self.get(id) else { continue };
            match &node.kind {
                LiveKind::Class { ty, instance } => {
                    instance.borrow_mut().did_mount();
                    if let Some(handle) = &node.ref_handle {
                        handle.attach(RefTarget::Instance(InstanceHandle::new(instance, *ty)));
                    }
                }
                LiveKind::Host(tag) => {
                    if let Some(handle) = &node.ref_handle {
                        handle.attach(RefTarget::Host(HostHandle {
                            id,
                            tag: tag.clone(),
                        }));
                    }
                }
                _ => {}
            }
        }
    }

    /// Tears the tree down: unmount hooks run parents first, refs detach and
    /// every instance is dropped. Unmounting twice is an error.
    pub fn unmount(&mut self) -> Result<(), TreeError> {
        if !self.is_mounted() {
            return Err(TreeError::InvalidInstanceState {
                reason: "tree has already been unmounted",
            });
        }
        log::debug!("unmounting {} live nodes", self.len());
        for id in self.preorder() {
            let Ok(node) = self.get(id) else { continue };
            if let LiveKind::Class { instance, .. } = &node.kind {
                instance.borrow_mut().will_unmount();
            }
            if let Some(handle) = &node.ref_handle {
                handle.detach();
            }
        }
        self.nodes.clear();
        self.root = None;
        self.state = TreeState::Unmounted;
        Ok(())
    }

    /// Drops a partially built tree without running lifecycle hooks.
    pub(crate) fn discard(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.state = TreeState::Unmounted;
    }

    /// Dump the live tree as indented text for debugging.
    pub fn dump_tree(&self) -> String {
        let mut output = String::new();
        match self.root {
            Some(root) => self.dump_node(&mut output, root, 0),
            None => output.push_str("(no root)\n"),
        }
        output
    }

    fn dump_node(&self, output: &mut String, id: NodeId, depth: usize) {
        let indent = "  ".repeat(depth);
        match self.get(id) {
            Ok(node) => {
                let _ = write!(output, "{indent}[{id}] {}", node.describe());
                if let Some(key) = &node.key {
                    let _ = write!(output, " key={key}");
                }
                if !node.is_expanded() {
                    output.push_str(" (deferred)");
                }
                output.push('\n');
                for child in node.children() {
                    self.dump_node(output, *child, depth + 1);
                }
            }
            Err(_) => {
                let _ = writeln!(output, "{indent}[{id}] (missing)");
            }
        }
    }
}

impl InstanceGraph for LiveTree {
    fn root(&self) -> Result<Option<NodeId>, TreeError> {
        if !self.is_mounted() {
            return Err(TreeError::InvalidInstanceState {
                reason: "tree has been unmounted",
            });
        }
        Ok(self.root)
    }

    fn node(&self, id: NodeId) -> Result<NodeView<'_>, TreeError> {
        if !self.is_mounted() {
            return Err(TreeError::InvalidInstanceState {
                reason: "tree has been unmounted",
            });
        }
        Ok(self.get(id)?.view())
    }
}

impl Drop for LiveTree {
    fn drop(&mut self) {
        if self.is_mounted() {
            let _ = self.unmount();
        }
    }
}
