//! Element descriptions handed to the engine.
//!
//! An [`Element`] is an inert description of something to render: a class
//! or function composite, a host tag, or a fragment. Elements carry their
//! attributes and children separately so that the reserved `children`
//! attribute never shows up in an attribute map.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::component::{ClassType, Component, FunctionComponent, FunctionType, InstanceHandle};
use crate::NodeId;

/// Name of the attribute that is represented structurally instead of as data.
pub const CHILDREN: &str = "children";

/// Primitive content rendered directly into a parent's child list.
#[derive(Clone, Debug, PartialEq)]
pub enum Leaf {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Leaf {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Leaf::Int(_) | Leaf::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Leaf::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the leaf as text. Numbers print without a trailing `.0` when
    /// they are integral, matching how script engines stringify them.
    pub fn stringified(&self) -> Leaf {
        match self {
            Leaf::Text(_) => self.clone(),
            other => Leaf::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Text(text) => f.write_str(text),
            Leaf::Int(value) => write!(f, "{value}"),
            Leaf::Float(value) => write_number(f, *value),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        write!(f, "{}", value as i64)
    } else {
        write!(f, "{value}")
    }
}

impl From<&str> for Leaf {
    fn from(value: &str) -> Self {
        Leaf::Text(value.to_owned())
    }
}

impl From<String> for Leaf {
    fn from(value: String) -> Self {
        Leaf::Text(value)
    }
}

impl From<i32> for Leaf {
    fn from(value: i32) -> Self {
        Leaf::Int(i64::from(value))
    }
}

impl From<i64> for Leaf {
    fn from(value: i64) -> Self {
        Leaf::Int(value)
    }
}

impl From<f64> for Leaf {
    fn from(value: f64) -> Self {
        Leaf::Float(value)
    }
}

/// Value of a single attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<PropValue>),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Loose truthiness: `Null`, `false`, `0`, `NaN` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Null => false,
            PropValue::Bool(value) => *value,
            PropValue::Int(value) => *value != 0,
            PropValue::Float(value) => *value != 0.0 && !value.is_nan(),
            PropValue::Str(value) => !value.is_empty(),
            PropValue::List(_) => true,
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(i64::from(value))
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropValue::Null, Into::into)
    }
}

impl<T: Into<PropValue>> From<Vec<T>> for PropValue {
    fn from(values: Vec<T>) -> Self {
        PropValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered attribute map. Never holds a `children` entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    values: IndexMap<String, PropValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an attribute. Returns `false` and drops the value
    /// when `name` is the reserved [`CHILDREN`] attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) -> bool {
        let name = name.into();
        if name == CHILDREN {
            log::warn!("ignoring `{CHILDREN}` attribute; pass children structurally");
            return false;
        }
        self.values.insert(name, value.into());
        true
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.values.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

/// Children exactly as the caller supplied them.
///
/// `One` and `Many` are kept apart because a single child and a one-element
/// list normalize differently in element projections.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Children {
    #[default]
    None,
    One(Box<Renderable>),
    Many(Vec<Renderable>),
}

impl Children {
    pub fn is_none(&self) -> bool {
        matches!(self, Children::None)
    }

    pub fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Renderable> {
        match self {
            Children::None => [].iter(),
            Children::One(item) => std::slice::from_ref(&**item).iter(),
            Children::Many(items) => items.iter(),
        }
    }

    /// Appends a child, promoting `One` to `Many`.
    pub fn push(&mut self, child: Renderable) {
        *self = match std::mem::take(self) {
            Children::None => Children::One(Box::new(child)),
            Children::One(first) => Children::Many(vec![*first, child]),
            Children::Many(mut items) => {
                items.push(child);
                Children::Many(items)
            }
        };
    }

    /// The children as a single renderable, for passing them through.
    pub fn to_renderable(&self) -> Renderable {
        match self {
            Children::None => Renderable::Empty,
            Children::One(item) => (**item).clone(),
            Children::Many(items) => Renderable::List(items.clone()),
        }
    }
}

/// Attributes plus children: everything a component is invoked with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    attributes: Attributes,
    children: Children,
}

impl Props {
    pub fn new(attributes: Attributes, children: Children) -> Self {
        Self {
            attributes,
            children,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Children {
        &mut self.children
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.attributes.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropValue::as_str)
    }

    /// Truthiness of an attribute; absent attributes are falsy.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(PropValue::is_truthy)
    }
}

/// Output of a render: nothing, a leaf, an element, or a sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Renderable {
    #[default]
    Empty,
    Leaf(Leaf),
    Element(Element),
    List(Vec<Renderable>),
}

impl Renderable {
    pub fn is_empty(&self) -> bool {
        matches!(self, Renderable::Empty)
    }
}

impl From<Element> for Renderable {
    fn from(element: Element) -> Self {
        Renderable::Element(element)
    }
}

impl From<Leaf> for Renderable {
    fn from(leaf: Leaf) -> Self {
        Renderable::Leaf(leaf)
    }
}

impl From<&str> for Renderable {
    fn from(value: &str) -> Self {
        Renderable::Leaf(value.into())
    }
}

impl From<String> for Renderable {
    fn from(value: String) -> Self {
        Renderable::Leaf(value.into())
    }
}

impl From<i32> for Renderable {
    fn from(value: i32) -> Self {
        Renderable::Leaf(value.into())
    }
}

impl From<i64> for Renderable {
    fn from(value: i64) -> Self {
        Renderable::Leaf(value.into())
    }
}

impl From<f64> for Renderable {
    fn from(value: f64) -> Self {
        Renderable::Leaf(value.into())
    }
}

impl<T: Into<Renderable>> From<Option<T>> for Renderable {
    fn from(value: Option<T>) -> Self {
        value.map_or(Renderable::Empty, Into::into)
    }
}

impl<T: Into<Renderable>> From<Vec<T>> for Renderable {
    fn from(values: Vec<T>) -> Self {
        Renderable::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<&Children> for Renderable {
    fn from(children: &Children) -> Self {
        children.to_renderable()
    }
}

/// Ordering and identity hint for siblings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key(value.to_string())
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key(value.to_string())
    }
}

/// Handle to a mounted host element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostHandle {
    pub id: NodeId,
    pub tag: String,
}

/// What a [`RefHandle`] currently points at.
#[derive(Clone, Debug, PartialEq)]
pub enum RefTarget {
    Instance(InstanceHandle),
    Host(HostHandle),
}

/// Shared back-reference cell, filled by the engine on mount.
///
/// Two handles are equal only when they are the same cell.
#[derive(Clone, Default)]
pub struct RefHandle {
    current: Rc<RefCell<Option<RefTarget>>>,
}

impl RefHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<RefTarget> {
        self.current.borrow().clone()
    }

    pub fn is_attached(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub(crate) fn attach(&self, target: RefTarget) {
        *self.current.borrow_mut() = Some(target);
    }

    pub(crate) fn detach(&self) {
        self.current.borrow_mut().take();
    }
}

impl PartialEq for RefHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.current, &other.current)
    }
}

impl fmt::Debug for RefHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_attached() {
            "attached"
        } else {
            "detached"
        };
        write!(f, "RefHandle({state})")
    }
}

/// The construct an element asks the engine to produce.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Class(ClassType),
    Function(FunctionType),
    Host(String),
    Fragment,
}

impl ElementType {
    pub fn class<C: Component>() -> Self {
        ElementType::Class(ClassType::of::<C>())
    }

    pub fn function<F: FunctionComponent>() -> Self {
        ElementType::Function(FunctionType::of::<F>())
    }

    pub fn host(tag: impl Into<String>) -> Self {
        ElementType::Host(tag.into())
    }

    /// Human readable name: the component name or the host tag.
    pub fn name(&self) -> &str {
        match self {
            ElementType::Class(ty) => ty.name(),
            ElementType::Function(ty) => ty.name(),
            ElementType::Host(tag) => tag,
            ElementType::Fragment => "Fragment",
        }
    }
}

/// Inert description of one unit to render.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    ty: ElementType,
    props: Props,
    key: Option<Key>,
    ref_handle: Option<RefHandle>,
}

impl Element {
    pub fn new(ty: ElementType) -> Self {
        Self {
            ty,
            props: Props::default(),
            key: None,
            ref_handle: None,
        }
    }

    pub fn host(tag: impl Into<String>) -> Self {
        Self::new(ElementType::host(tag))
    }

    pub fn class<C: Component>() -> Self {
        Self::new(ElementType::class::<C>())
    }

    pub fn function<F: FunctionComponent>() -> Self {
        Self::new(ElementType::function::<F>())
    }

    pub fn fragment() -> Self {
        Self::new(ElementType::Fragment)
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.attributes.insert(name, value);
        self
    }

    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.props.attributes = attributes;
        self
    }

    /// Appends one child. A single call yields a lone child; repeated calls
    /// build a list.
    pub fn child(mut self, child: impl Into<Renderable>) -> Self {
        self.props.children.push(child.into());
        self
    }

    /// Replaces the children with a list, even when it holds one item.
    pub fn children<I, R>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Renderable>,
    {
        self.props.children = Children::Many(children.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the children verbatim, e.g. to pass a parent's children on.
    pub fn with_children(mut self, children: Children) -> Self {
        self.props.children = children;
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

    pub fn ty(&self) -> &ElementType {
        &self.ty
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn get_key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn ref_handle(&self) -> Option<&RefHandle> {
        self.ref_handle.as_ref()
    }

    pub(crate) fn into_parts(self) -> (ElementType, Props, Option<Key>, Option<RefHandle>) {
        (self.ty, self.props, self.key, self.ref_handle)
    }
}
