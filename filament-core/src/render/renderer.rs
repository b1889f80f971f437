//! Backend and renderer traits.

use super::attribute::AttrValue;
use super::component::Component;
use crate::error::Result;

/// The shared state of a rendering backend.
///
/// Mounted components keep a weak reference to their backend and call
/// [`Backend::update_attribute`] whenever an attribute changes.
pub trait Backend: Send + Sync + Sized + 'static {
    /// What a mounted component holds on to, e.g. a host element.
    type Handle: Clone + Send + Sync + 'static;

    /// Push one attribute change for a mounted component.
    fn update_attribute(
        &self,
        component: &Component<Self>,
        handle: &Self::Handle,
        key: &str,
        value: &AttrValue,
    ) -> Result<()>;
}

/// Creates components and mounts them through a backend.
pub trait Renderer {
    type Backend: Backend;

    /// Create an unmounted component with a fresh id.
    fn new_component(&self, name: &str) -> Component<Self::Backend>;

    /// Mount each root and its subtree, depth-first, in order.
    fn render(&self, roots: &[Component<Self::Backend>]) -> Result<()>;

    /// Attach `child` under the mounted `parent`.
    ///
    /// An unmounted child is created first; a child that is already mounted
    /// is moved rather than created again.
    fn append(
        &self,
        parent: &Component<Self::Backend>,
        child: &Component<Self::Backend>,
    ) -> Result<()>;
}
