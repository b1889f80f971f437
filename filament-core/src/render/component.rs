//! Component tree nodes.
//!
//! A component owns its attributes and children and, once mounted, a handle
//! into the backend plus a weak reference to the backend itself. The weak
//! reference is only used to route attribute updates; dropping the renderer
//! turns later updates into local-only changes.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::attribute::AttrValue;
use super::renderer::Backend;
use crate::error::Result;

/// Identifier correlating a component with remote events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(u32);

impl ComponentId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out increasing component ids, starting at 1.
///
/// Each renderer owns one, so ids are unique per renderer rather than per
/// process.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> ComponentId {
        ComponentId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Backend state attached to a mounted component.
pub(crate) struct Mount<B: Backend> {
    pub(crate) renderer: Weak<B>,
    pub(crate) handle: B::Handle,
}

impl<B: Backend> Clone for Mount<B> {
    fn clone(&self) -> Self {
        Self {
            renderer: Weak::clone(&self.renderer),
            handle: self.handle.clone(),
        }
    }
}

struct ComponentState<B: Backend> {
    /// Last write wins; iteration follows first insertion.
    attributes: IndexMap<String, AttrValue>,
    children: SmallVec<[Component<B>; 4]>,
    parent: Option<Weak<ComponentInner<B>>>,
    mount: Option<Mount<B>>,
}

struct ComponentInner<B: Backend> {
    id: ComponentId,
    name: String,
    state: Mutex<ComponentState<B>>,
}

/// A named, attributed node with children.
///
/// `Component` is a shared handle: clones refer to the same node, which is
/// how effects capture the components they update.
pub struct Component<B: Backend> {
    inner: Arc<ComponentInner<B>>,
}

impl<B: Backend> Component<B> {
    pub(crate) fn new(id: ComponentId, name: &str) -> Self {
        Self {
            inner: Arc::new(ComponentInner {
                id,
                name: name.to_owned(),
                state: Mutex::new(ComponentState {
                    attributes: IndexMap::new(),
                    children: SmallVec::new(),
                    parent: None,
                    mount: None,
                }),
            }),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.inner.id
    }

    /// The element or kind name, e.g. `"button"`.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn attribute(&self, key: &str) -> Option<AttrValue> {
        self.inner.state.lock().attributes.get(key).cloned()
    }

    pub fn attributes(&self) -> IndexMap<String, AttrValue> {
        self.inner.state.lock().attributes.clone()
    }

    pub fn children(&self) -> Vec<Component<B>> {
        self.inner.state.lock().children.to_vec()
    }

    pub fn parent(&self) -> Option<Component<B>> {
        let parent = self.inner.state.lock().parent.clone()?;
        parent.upgrade().map(|inner| Component { inner })
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.state.lock().mount.is_some()
    }

    /// The backend handle, present once the component has been mounted.
    pub fn handle(&self) -> Option<B::Handle> {
        self.inner
            .state
            .lock()
            .mount
            .as_ref()
            .map(|mount| mount.handle.clone())
    }

    /// Set an attribute.
    ///
    /// Before mounting this only changes local state. Once mounted, the
    /// change is also pushed to the backend before this returns.
    pub fn set_attribute<K, V>(&self, key: K, value: V) -> Result<()>
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let key = key.into();
        let value = value.into();

        let mount = {
            let mut state = self.inner.state.lock();
            state.attributes.insert(key.clone(), value.clone());
            state.mount.clone()
        };

        let Some(mount) = mount else {
            return Ok(());
        };
        match mount.renderer.upgrade() {
            Some(backend) => backend.update_attribute(self, &mount.handle, &key, &value),
            None => Ok(()),
        }
    }

    /// Attach `child` as the last child of this component.
    ///
    /// A child that already has a parent is moved, not duplicated. This only
    /// edits the tree; use [`Renderer::append`](super::Renderer::append) to
    /// attach under a parent that is already mounted.
    pub fn add_child(&self, child: &Component<B>) {
        debug_assert!(!self.ptr_eq(child), "a component cannot be its own child");

        let previous = child
            .inner
            .state
            .lock()
            .parent
            .replace(Arc::downgrade(&self.inner))
            .and_then(|weak| weak.upgrade());

        if let Some(previous) = previous {
            if Arc::ptr_eq(&previous, &self.inner) {
                return;
            }
            previous
                .state
                .lock()
                .children
                .retain(|c| !Arc::ptr_eq(&c.inner, &child.inner));
        }

        self.inner.state.lock().children.push(child.clone());
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Component<B>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Attributes and children as they are right now.
    pub(crate) fn snapshot(&self) -> (IndexMap<String, AttrValue>, Vec<Component<B>>) {
        let state = self.inner.state.lock();
        (state.attributes.clone(), state.children.to_vec())
    }

    pub(crate) fn mount(&self, mount: Mount<B>) {
        self.inner.state.lock().mount = Some(mount);
    }
}

impl<B: Backend> Clone for Component<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: Backend> fmt::Debug for Component<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Component")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("attributes", &state.attributes.keys().collect::<Vec<_>>())
            .field("children", &state.children.len())
            .field("mounted", &state.mount.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend that records every update it is asked to apply.
    #[derive(Default)]
    struct Recorder {
        updates: Mutex<Vec<(ComponentId, String, String)>>,
    }

    impl Backend for Recorder {
        type Handle = ();

        fn update_attribute(
            &self,
            component: &Component<Self>,
            _handle: &(),
            key: &str,
            value: &AttrValue,
        ) -> Result<()> {
            self.updates
                .lock()
                .push((component.id(), key.to_owned(), value.to_string()));
            Ok(())
        }
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next_id(), ComponentId::new(1));
        assert_eq!(ids.next_id(), ComponentId::new(2));
        assert_eq!(ids.next_id(), ComponentId::new(3));
    }

    #[test]
    fn separate_generators_do_not_share_state() {
        let a = IdGenerator::new();
        let b = IdGenerator::new();
        a.next_id();
        assert_eq!(b.next_id(), ComponentId::new(1));
    }

    #[test]
    fn set_attribute_before_mount_is_local_only() {
        let recorder = Arc::new(Recorder::default());
        let component: Component<Recorder> = Component::new(ComponentId::new(1), "button");

        component.set_attribute("text", "hi").unwrap();
        component.set_attribute("text", "bye").unwrap();

        assert_eq!(component.attribute("text").unwrap().to_string(), "bye");
        assert!(recorder.updates.lock().is_empty());
    }

    #[test]
    fn set_attribute_after_mount_reaches_backend() {
        let recorder = Arc::new(Recorder::default());
        let component: Component<Recorder> = Component::new(ComponentId::new(7), "button");
        component.mount(Mount {
            renderer: Arc::downgrade(&recorder),
            handle: (),
        });

        component.set_attribute("text", "hi").unwrap();

        assert_eq!(
            *recorder.updates.lock(),
            vec![(ComponentId::new(7), "text".to_string(), "hi".to_string())]
        );
    }

    #[test]
    fn dropped_backend_makes_updates_local() {
        let recorder = Arc::new(Recorder::default());
        let component: Component<Recorder> = Component::new(ComponentId::new(1), "button");
        component.mount(Mount {
            renderer: Arc::downgrade(&recorder),
            handle: (),
        });
        drop(recorder);

        component.set_attribute("text", "still fine").unwrap();
        assert!(component.is_mounted());
    }

    #[test]
    fn add_child_moves_between_parents() {
        let a: Component<Recorder> = Component::new(ComponentId::new(1), "dialog");
        let b: Component<Recorder> = Component::new(ComponentId::new(2), "dialog");
        let child: Component<Recorder> = Component::new(ComponentId::new(3), "button");

        a.add_child(&child);
        a.add_child(&child);
        assert_eq!(a.children().len(), 1);

        b.add_child(&child);
        assert!(a.children().is_empty());
        assert_eq!(b.children().len(), 1);
        assert!(child.parent().unwrap().ptr_eq(&b));
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let component: Component<Recorder> = Component::new(ComponentId::new(1), "button");
        component.set_attribute("text", "a").unwrap();
        component.set_attribute("label", "b").unwrap();
        component.set_attribute("text", "c").unwrap();

        let keys: Vec<_> = component.attributes().keys().cloned().collect();
        assert_eq!(keys, vec!["text", "label"]);
    }
}
