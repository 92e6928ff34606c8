//! Canonical render tree (RST) nodes.
//!
//! An [`RstNode`] is a plain data snapshot of one class, function or host
//! construct. Text never becomes a node; it appears as a [`Leaf`] inside the
//! parent's [`Rendered`] value.

use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use rendertree_core::hash::{self, hash_f64};
use rendertree_core::{
    Attributes, Component, ElementType, FunctionComponent, InstanceHandle, Key, Leaf, PropValue,
    RefHandle,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Class,
    Function,
    Host,
}

impl NodeType {
    /// Node type for an element type; fragments have none.
    pub fn of(ty: &ElementType) -> Option<NodeType> {
        match ty {
            ElementType::Class(_) => Some(NodeType::Class),
            ElementType::Function(_) => Some(NodeType::Function),
            ElementType::Host(_) => Some(NodeType::Host),
            ElementType::Fragment => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Class => "class",
            NodeType::Function => "function",
            NodeType::Host => "host",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a node's rendered output.
#[derive(Clone, Debug, PartialEq)]
pub enum RstChild {
    Node(RstNode),
    Leaf(Leaf),
}

impl RstChild {
    pub fn as_node(&self) -> Option<&RstNode> {
        match self {
            RstChild::Node(node) => Some(node),
            RstChild::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            RstChild::Leaf(leaf) => Some(leaf),
            RstChild::Node(_) => None,
        }
    }
}

impl From<RstNode> for RstChild {
    fn from(node: RstNode) -> Self {
        RstChild::Node(node)
    }
}

impl From<Leaf> for RstChild {
    fn from(leaf: Leaf) -> Self {
        RstChild::Leaf(leaf)
    }
}

impl From<&str> for RstChild {
    fn from(text: &str) -> Self {
        RstChild::Leaf(text.into())
    }
}

impl From<String> for RstChild {
    fn from(text: String) -> Self {
        RstChild::Leaf(text.into())
    }
}

impl From<i32> for RstChild {
    fn from(value: i32) -> Self {
        RstChild::Leaf(value.into())
    }
}

impl From<i64> for RstChild {
    fn from(value: i64) -> Self {
        RstChild::Leaf(value.into())
    }
}

impl From<f64> for RstChild {
    fn from(value: f64) -> Self {
        RstChild::Leaf(value.into())
    }
}

/// Rendered output of a node: nothing, a single child, or a sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Rendered {
    #[default]
    Null,
    One(Box<RstChild>),
    Many(Vec<RstChild>),
}

impl Rendered {
    /// Picks the cardinality from the number of children: none is `Null`,
    /// one is `One`, anything else is `Many`.
    pub fn from_children(mut children: Vec<RstChild>) -> Self {
        match children.len() {
            0 => Rendered::Null,
            1 => children
                .pop()
                .map_or(Rendered::Null, |child| Rendered::One(Box::new(child))),
            _ => Rendered::Many(children),
        }
    }

    pub fn many<I, C>(children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<RstChild>,
    {
        Rendered::Many(children.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Rendered::Null)
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn as_slice(&self) -> &[RstChild] {
        match self {
            Rendered::Null => &[],
            Rendered::One(child) => std::slice::from_ref(&**child),
            Rendered::Many(children) => children,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RstChild> {
        self.as_slice().iter()
    }

    /// The single node when the output is `One(Node)`.
    pub fn as_node(&self) -> Option<&RstNode> {
        match self {
            Rendered::One(child) => child.as_node(),
            _ => None,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RstNode> {
        self.iter().filter_map(RstChild::as_node)
    }

    fn children_mut(&mut self) -> &mut [RstChild] {
        match self {
            Rendered::Null => &mut [],
            Rendered::One(child) => std::slice::from_mut(&mut **child),
            Rendered::Many(children) => children,
        }
    }
}

impl From<RstNode> for Rendered {
    fn from(node: RstNode) -> Self {
        Rendered::One(Box::new(RstChild::Node(node)))
    }
}

impl From<RstChild> for Rendered {
    fn from(child: RstChild) -> Self {
        Rendered::One(Box::new(child))
    }
}

impl From<Vec<RstChild>> for Rendered {
    fn from(children: Vec<RstChild>) -> Self {
        Rendered::Many(children)
    }
}

/// Canonical snapshot of one class, function or host construct.
#[derive(Clone, Debug, PartialEq)]
pub struct RstNode {
    pub node_type: NodeType,
    pub ty: ElementType,
    /// Attributes only; the `children` name cannot be stored here.
    pub props: Attributes,
    pub key: Option<Key>,
    pub ref_handle: Option<RefHandle>,
    /// Weak handle on the live class instance. Absent for functions, hosts
    /// and anything that was never instantiated.
    pub instance: Option<InstanceHandle>,
    pub rendered: Rendered,
}

impl RstNode {
    pub fn new(node_type: NodeType, ty: ElementType) -> Self {
        Self {
            node_type,
            ty,
            props: Attributes::new(),
            key: None,
            ref_handle: None,
            instance: None,
            rendered: Rendered::Null,
        }
    }

    pub fn class<C: Component>() -> Self {
        Self::new(NodeType::Class, ElementType::class::<C>())
    }

    pub fn function<F: FunctionComponent>() -> Self {
        Self::new(NodeType::Function, ElementType::function::<F>())
    }

    pub fn host(tag: impl Into<String>) -> Self {
        Self::new(NodeType::Host, ElementType::host(tag))
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name, value);
        self
    }

    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_ref(mut self, handle: &RefHandle) -> Self {
        self.ref_handle = Some(handle.clone());
        self
    }

    pub fn rendered(mut self, rendered: impl Into<Rendered>) -> Self {
        self.rendered = rendered.into();
        self
    }

    pub fn rendered_one(self, child: impl Into<RstChild>) -> Self {
        self.rendered(Rendered::One(Box::new(child.into())))
    }

    pub fn rendered_many<I, C>(self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<RstChild>,
    {
        self.rendered(Rendered::many(children))
    }

    pub fn display_name(&self) -> &str {
        self.ty.name()
    }

    /// Clears every `instance` in this subtree so trees can be compared
    /// structurally.
    pub fn clean(&mut self) {
        self.instance = None;
        for child in self.rendered.children_mut() {
            if let RstChild::Node(node) = child {
                node.clean();
            }
        }
    }

    pub fn cleaned(mut self) -> Self {
        self.clean();
        self
    }

    /// Depth-first pre-order walk over this node and every node below it.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    pub fn find(&self, mut predicate: impl FnMut(&RstNode) -> bool) -> Option<&RstNode> {
        self.walk().find(|node| predicate(node))
    }

    /// Every leaf in this subtree, in document order.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Leaf>) {
        for child in self.rendered.iter() {
            match child {
                RstChild::Leaf(leaf) => leaves.push(leaf),
                RstChild::Node(node) => node.collect_leaves(leaves),
            }
        }
    }

    /// Structural hash of the subtree. Instances are left out, and refs
    /// only count by presence.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = hash::default::new();
        self.hash_structure(&mut hasher);
        hasher.finish()
    }

    fn hash_structure<H: Hasher>(&self, hasher: &mut H) {
        self.node_type.hash(hasher);
        self.ty.hash(hasher);
        self.props.len().hash(hasher);
        for (name, value) in self.props.iter() {
            name.hash(hasher);
            hash_prop(value, hasher);
        }
        self.key.hash(hasher);
        self.ref_handle.is_some().hash(hasher);
        match &self.rendered {
            Rendered::Null => 0u8.hash(hasher),
            Rendered::One(child) => {
                1u8.hash(hasher);
                hash_child(child, hasher);
            }
            Rendered::Many(children) => {
                2u8.hash(hasher);
                children.len().hash(hasher);
                for child in children {
                    hash_child(child, hasher);
                }
            }
        }
    }
}

fn hash_child<H: Hasher>(child: &RstChild, hasher: &mut H) {
    match child {
        RstChild::Node(node) => {
            0u8.hash(hasher);
            node.hash_structure(hasher);
        }
        RstChild::Leaf(leaf) => {
            1u8.hash(hasher);
            hash_leaf(leaf, hasher);
        }
    }
}

fn hash_leaf<H: Hasher>(leaf: &Leaf, hasher: &mut H) {
    match leaf {
        Leaf::Text(text) => {
            0u8.hash(hasher);
            text.hash(hasher);
        }
        Leaf::Int(value) => {
            1u8.hash(hasher);
            value.hash(hasher);
        }
        Leaf::Float(value) => {
            2u8.hash(hasher);
            hash_f64(*value, hasher);
        }
    }
}

fn hash_prop<H: Hasher>(value: &PropValue, hasher: &mut H) {
    match value {
        PropValue::Null => 0u8.hash(hasher),
        PropValue::Bool(flag) => {
            1u8.hash(hasher);
            flag.hash(hasher);
        }
        PropValue::Int(value) => {
            2u8.hash(hasher);
            value.hash(hasher);
        }
        PropValue::Float(value) => {
            3u8.hash(hasher);
            hash_f64(*value, hasher);
        }
        PropValue::Str(text) => {
            4u8.hash(hasher);
            text.hash(hasher);
        }
        PropValue::List(items) => {
            5u8.hash(hasher);
            items.len().hash(hasher);
            for item in items {
                hash_prop(item, hasher);
            }
        }
    }
}

/// Pre-order iterator returned by [`RstNode::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a RstNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a RstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let children: Vec<&'a RstNode> = node.rendered.nodes().collect();
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}

/// JSON-like rendering, two-space indented. Component types print as bare
/// names, host tags as strings, instances as `<Name instance>`.
impl fmt::Display for RstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, 0)
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rendered(f, self, 0)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &RstNode, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth + 1);
    f.write_str("{\n")?;
    writeln!(f, "{pad}\"nodeType\": \"{}\",", node.node_type)?;
    match &node.ty {
        ElementType::Host(tag) => {
            write!(f, "{pad}\"type\": ")?;
            write_json_str(f, tag)?;
            f.write_str(",\n")?;
        }
        other => writeln!(f, "{pad}\"type\": {},", other.name())?,
    }
    write!(f, "{pad}\"props\": ")?;
    write_props(f, &node.props, depth + 1)?;
    write!(f, ",\n{pad}\"key\": ")?;
    match &node.key {
        Some(key) => write_json_str(f, key.as_str())?,
        None => f.write_str("null")?,
    }
    write!(f, ",\n{pad}\"ref\": ")?;
    f.write_str(if node.ref_handle.is_some() { "<ref>" } else { "null" })?;
    write!(f, ",\n{pad}\"instance\": ")?;
    match &node.instance {
        Some(instance) if instance.is_alive() => {
            write!(f, "<{} instance>", instance.class_type().name())?
        }
        Some(instance) => write!(f, "<dead {} instance>", instance.class_type().name())?,
        None => f.write_str("null")?,
    }
    write!(f, ",\n{pad}\"rendered\": ")?;
    write_rendered(f, &node.rendered, depth + 1)?;
    write!(f, "\n{}}}", "  ".repeat(depth))
}

fn write_rendered(f: &mut fmt::Formatter<'_>, rendered: &Rendered, depth: usize) -> fmt::Result {
    match rendered {
        Rendered::Null => f.write_str("null"),
        Rendered::One(child) => write_child(f, child, depth),
        Rendered::Many(children) if children.is_empty() => f.write_str("[]"),
        Rendered::Many(children) => {
            let pad = "  ".repeat(depth + 1);
            f.write_str("[\n")?;
            for (index, child) in children.iter().enumerate() {
                if index > 0 {
                    f.write_str(",\n")?;
                }
                f.write_str(&pad)?;
                write_child(f, child, depth + 1)?;
            }
            write!(f, "\n{}]", "  ".repeat(depth))
        }
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, child: &RstChild, depth: usize) -> fmt::Result {
    match child {
        RstChild::Node(node) => write_node(f, node, depth),
        RstChild::Leaf(Leaf::Text(text)) => write_json_str(f, text),
        RstChild::Leaf(leaf) => write!(f, "{leaf}"),
    }
}

fn write_props(f: &mut fmt::Formatter<'_>, props: &Attributes, depth: usize) -> fmt::Result {
    if props.is_empty() {
        return f.write_str("{}");
    }
    let pad = "  ".repeat(depth + 1);
    f.write_str("{\n")?;
    for (index, (name, value)) in props.iter().enumerate() {
        if index > 0 {
            f.write_str(",\n")?;
        }
        f.write_str(&pad)?;
        write_json_str(f, name)?;
        f.write_str(": ")?;
        write_prop(f, value)?;
    }
    write!(f, "\n{}}}", "  ".repeat(depth))
}

fn write_prop(f: &mut fmt::Formatter<'_>, value: &PropValue) -> fmt::Result {
    match value {
        PropValue::Null => f.write_str("null"),
        PropValue::Bool(flag) => write!(f, "{flag}"),
        PropValue::Int(value) => write!(f, "{value}"),
        PropValue::Float(value) => write!(f, "{}", Leaf::Float(*value)),
        PropValue::Str(text) => write_json_str(f, text),
        PropValue::List(items) => {
            f.write_char('[')?;
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write_prop(f, item)?;
            }
            f.write_char(']')
        }
    }
}

fn write_json_str(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in text.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
