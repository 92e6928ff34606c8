//! Live instance graph to canonical node conversion.
//!
//! [`normalize`] walks an [`InstanceGraph`] and produces the [`RstNode`]
//! snapshot of its root. In mount mode every composite is followed down to
//! host nodes and leaves. In shallow mode only the root is resolved and its
//! render output is projected from element data; nested composites stay
//! opaque and never carry an instance.
//!
//! Normalization is read-only: it never constructs, renders or tears down a
//! component.

use rendertree_core::{
    Children, ConstructKind, Element, ElementType, InstanceGraph, InstanceHandle, NodeId,
    NodeView, RenderMode, Renderable, TreeError,
};

use crate::rst::{NodeType, Rendered, RstChild, RstNode};

const NOT_EXPANDED: TreeError = TreeError::InvalidInstanceState {
    reason: "node output was never mounted; mount normalization needs a mounted tree",
};

/// Snapshot the graph's root as a canonical node.
///
/// Returns `Ok(None)` when the graph rendered nothing.
pub fn normalize<G>(graph: &G, mode: RenderMode) -> Result<Option<RstNode>, TreeError>
where
    G: InstanceGraph + ?Sized,
{
    let Some(root) = graph.root()? else {
        return Ok(None);
    };
    let normalizer = Normalizer { graph };
    let view = graph.node(root)?;
    match mode {
        RenderMode::Mount => normalizer.mount_root(view),
        RenderMode::Shallow => shallow_root(view),
    }
}

struct Normalizer<'g, G: ?Sized> {
    graph: &'g G,
}

impl<G: InstanceGraph + ?Sized> Normalizer<'_, G> {
    fn mount_root(&self, view: NodeView<'_>) -> Result<Option<RstNode>, TreeError> {
        match view.kind {
            ConstructKind::Fragment => {
                let mut children = Vec::new();
                self.collect(view.children.ok_or(NOT_EXPANDED)?, &mut children)?;
                single_root(children)
            }
            ConstructKind::Text(_) => Err(TreeError::UnsupportedConstructKind {
                kind: "text root".to_owned(),
            }),
            _ => self.mount_node(view).map(Some),
        }
    }

    fn mount_node(&self, view: NodeView<'_>) -> Result<RstNode, TreeError> {
        let ids = view.children.ok_or(NOT_EXPANDED)?;
        let mut children = Vec::with_capacity(ids.len());
        self.collect(ids, &mut children)?;
        let (node_type, ty, instance) = classify(&view)?;
        let rendered = match node_type {
            NodeType::Host => Rendered::Many(children),
            NodeType::Class | NodeType::Function => Rendered::from_children(children),
        };
        Ok(RstNode {
            node_type,
            ty,
            props: view.props.attributes().clone(),
            key: view.key.cloned(),
            ref_handle: view.ref_handle.cloned(),
            instance,
            rendered,
        })
    }

    /// Appends the normalized children in `ids`, splicing fragments in place.
    fn collect(&self, ids: &[NodeId], out: &mut Vec<RstChild>) -> Result<(), TreeError> {
        for &id in ids {
            let view = self.graph.node(id)?;
            match view.kind {
                ConstructKind::Text(leaf) => out.push(RstChild::Leaf(leaf.clone())),
                ConstructKind::Fragment => {
                    self.collect(view.children.ok_or(NOT_EXPANDED)?, out)?
                }
                _ => out.push(RstChild::Node(self.mount_node(view)?)),
            }
        }
        Ok(())
    }
}

fn shallow_root(view: NodeView<'_>) -> Result<Option<RstNode>, TreeError> {
    match view.kind {
        ConstructKind::Fragment => {
            let mut children = Vec::new();
            flatten_into(view.output, &mut children);
            single_root(children)
        }
        ConstructKind::Text(_) => Err(TreeError::UnsupportedConstructKind {
            kind: "text root".to_owned(),
        }),
        _ => {
            let (node_type, ty, instance) = classify(&view)?;
            Ok(Some(RstNode {
                node_type,
                ty,
                props: view.props.attributes().clone(),
                key: view.key.cloned(),
                ref_handle: view.ref_handle.cloned(),
                instance,
                rendered: renderable_to_rendered(view.output),
            }))
        }
    }
}

fn single_root(mut children: Vec<RstChild>) -> Result<Option<RstNode>, TreeError> {
    match children.len() {
        0 => Ok(None),
        1 => match children.pop() {
            Some(RstChild::Node(node)) => Ok(Some(node)),
            Some(RstChild::Leaf(_)) => Err(TreeError::UnsupportedConstructKind {
                kind: "text root".to_owned(),
            }),
            None => Ok(None),
        },
        count => Err(TreeError::UnsupportedConstructKind {
            kind: format!("fragment root with {count} children"),
        }),
    }
}

fn classify(
    view: &NodeView<'_>,
) -> Result<(NodeType, ElementType, Option<InstanceHandle>), TreeError> {
    match &view.kind {
        ConstructKind::Class { ty, instance } => Ok((
            NodeType::Class,
            ElementType::Class(*ty),
            Some(instance.clone()),
        )),
        ConstructKind::Function(ty) => Ok((NodeType::Function, ElementType::Function(*ty), None)),
        ConstructKind::Host(tag) => Ok((NodeType::Host, ElementType::host(*tag), None)),
        ConstructKind::Unknown(name) => Err(TreeError::UnsupportedConstructKind {
            kind: (*name).to_owned(),
        }),
        ConstructKind::Text(_) => Err(TreeError::UnsupportedConstructKind {
            kind: "text".to_owned(),
        }),
        ConstructKind::Fragment => Err(TreeError::UnsupportedConstructKind {
            kind: "fragment".to_owned(),
        }),
        _ => Err(TreeError::UnsupportedConstructKind {
            kind: "unrecognized construct".to_owned(),
        }),
    }
}

/// Projects an element as an opaque node: no instance, `rendered` taken
/// from its `children` data. Fragments have no node of their own.
pub fn element_to_node(element: &Element) -> Option<RstNode> {
    let node_type = NodeType::of(element.ty())?;
    Some(RstNode {
        node_type,
        ty: element.ty().clone(),
        props: element.props().attributes().clone(),
        key: element.get_key().cloned(),
        ref_handle: element.ref_handle().cloned(),
        instance: None,
        rendered: children_to_rendered(element.props().children()),
    })
}

/// Element-data cardinality: no children is `Null`, a single child is
/// `One` and a list is `Many`. Lists drop `Empty` entries and flatten nested
/// lists and fragments.
pub fn children_to_rendered(children: &Children) -> Rendered {
    match children {
        Children::None => Rendered::Null,
        Children::One(child) => renderable_to_rendered(child),
        Children::Many(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                flatten_into(item, &mut out);
            }
            Rendered::Many(out)
        }
    }
}

/// Same projection for a raw render output.
pub fn renderable_to_rendered(renderable: &Renderable) -> Rendered {
    match renderable {
        Renderable::Empty => Rendered::Null,
        Renderable::Leaf(leaf) => Rendered::One(Box::new(RstChild::Leaf(leaf.clone()))),
        Renderable::Element(element) => match element_to_node(element) {
            Some(node) => node.into(),
            None => children_to_rendered(element.props().children()),
        },
        Renderable::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                flatten_into(item, &mut out);
            }
            Rendered::Many(out)
        }
    }
}

fn flatten_into(renderable: &Renderable, out: &mut Vec<RstChild>) {
    match renderable {
        Renderable::Empty => {}
        Renderable::Leaf(leaf) => out.push(RstChild::Leaf(leaf.clone())),
        Renderable::Element(element) => match element_to_node(element) {
            Some(node) => out.push(RstChild::Node(node)),
            None => {
                for child in element.props().children().iter() {
                    flatten_into(child, out);
                }
            }
        },
        Renderable::List(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
    }
}
