//! Composite component traits and their type descriptors.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::element::{Props, Renderable};

/// Failure raised by user component code while constructing or rendering.
///
/// The engine forwards it untouched inside [`crate::TreeError::Component`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentError {
    message: String,
}

impl ComponentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ComponentError {}

/// Last path segment of a type name, generic arguments kept.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(index) => &full[index + 2..],
        None => full,
    }
}

/// A class composite: constructed once per mount and rendered from a live
/// instance that persists until unmount.
pub trait Component: Any {
    fn construct(props: &Props) -> Result<Self, ComponentError>
    where
        Self: Sized;

    fn render(&self, props: &Props) -> Result<Renderable, ComponentError>;

    /// Runs after the whole tree mounted, children first.
    fn component_did_mount(&mut self) {}

    /// Runs before teardown, parents first.
    fn component_will_unmount(&mut self) {}

    fn display_name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name::<Self>()
    }
}

/// A function composite: a stateless render with no backing instance.
///
/// Implementors are usually unit structs that are never instantiated; the
/// type only provides identity.
pub trait FunctionComponent: 'static {
    fn render(props: &Props) -> Result<Renderable, ComponentError>;

    fn display_name() -> &'static str {
        short_type_name::<Self>()
    }
}

/// Object-safe view of a [`Component`], used for live instances.
pub trait AnyComponent: Any {
    fn render_dyn(&self, props: &Props) -> Result<Renderable, ComponentError>;
    fn did_mount(&mut self);
    fn will_unmount(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> AnyComponent for C {
    fn render_dyn(&self, props: &Props) -> Result<Renderable, ComponentError> {
        Component::render(self, props)
    }

    fn did_mount(&mut self) {
        self.component_did_mount();
    }

    fn will_unmount(&mut self) {
        self.component_will_unmount();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) type LiveInstance = Rc<RefCell<Box<dyn AnyComponent>>>;
type Constructor = fn(&Props) -> Result<Box<dyn AnyComponent>, ComponentError>;
type RenderFn = fn(&Props) -> Result<Renderable, ComponentError>;

fn construct_boxed<C: Component>(props: &Props) -> Result<Box<dyn AnyComponent>, ComponentError> {
    let instance = C::construct(props)?;
    Ok(Box::new(instance))
}

/// Identity of a class composite. Equal when the Rust types are equal.
#[derive(Clone, Copy)]
pub struct ClassType {
    id: TypeId,
    name: &'static str,
    construct: Constructor,
}

impl ClassType {
    pub fn of<C: Component>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: C::display_name(),
            construct: construct_boxed::<C>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<C: Component>(&self) -> bool {
        self.id == TypeId::of::<C>()
    }

    pub(crate) fn construct(&self, props: &Props) -> Result<Box<dyn AnyComponent>, ComponentError> {
        (self.construct)(props)
    }
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassType {}

impl std::hash::Hash for ClassType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)
    }
}

/// Identity of a function composite. Equal when the Rust types are equal.
#[derive(Clone, Copy)]
pub struct FunctionType {
    id: TypeId,
    name: &'static str,
    render: RenderFn,
}

impl FunctionType {
    pub fn of<F: FunctionComponent>() -> Self {
        Self {
            id: TypeId::of::<F>(),
            name: F::display_name(),
            render: F::render,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<F: FunctionComponent>(&self) -> bool {
        self.id == TypeId::of::<F>()
    }

    pub(crate) fn render(&self, props: &Props) -> Result<Renderable, ComponentError> {
        (self.render)(props)
    }
}

impl PartialEq for FunctionType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FunctionType {}

impl std::hash::Hash for FunctionType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function {}", self.name)
    }
}

/// Non-owning reference to a live class instance.
///
/// The engine owns instances; a handle stops resolving once the instance is
/// torn down.
#[derive(Clone)]
pub struct InstanceHandle {
    inner: Weak<RefCell<Box<dyn AnyComponent>>>,
    ty: ClassType,
}

impl InstanceHandle {
    pub(crate) fn new(instance: &LiveInstance, ty: ClassType) -> Self {
        Self {
            inner: Rc::downgrade(instance),
            ty,
        }
    }

    pub fn class_type(&self) -> ClassType {
        self.ty
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// True when the instance is alive and of type `C`.
    pub fn is<C: Component>(&self) -> bool {
        self.with(|_: &C| ()).is_some()
    }

    /// Runs `f` against the live instance if it is alive and of type `C`.
    pub fn with<C: Component, R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        let instance = self.inner.upgrade()?;
        let borrowed = instance.borrow();
        let typed = borrowed.as_any().downcast_ref::<C>()?;
        Some(f(typed))
    }

    /// Mutable variant of [`InstanceHandle::with`].
    pub fn with_mut<C: Component, R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        let instance = self.inner.upgrade()?;
        let mut borrowed = instance.borrow_mut();
        let typed = borrowed.as_any_mut().downcast_mut::<C>()?;
        Some(f(typed))
    }
}

impl PartialEq for InstanceHandle {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_alive() { "alive" } else { "dead" };
        write!(f, "InstanceHandle({}, {state})", self.ty.name)
    }
}
