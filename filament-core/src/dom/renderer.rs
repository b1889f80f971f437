//! DOM rendering: each component becomes one element of a [`Document`], and
//! attribute changes become property or attribute writes on it.

use std::sync::Arc;

use tracing::trace;

use super::Document;
use crate::error::{Error, Result};
use crate::render::{
    expect_listener, AttrValue, Backend, Component, IdGenerator, Mount, Renderer, EVENT_PREFIX,
};

/// Shared state of a [`DomRenderer`].
pub struct DomBackend<D: Document> {
    document: D,
    root: D::Element,
    ids: IdGenerator,
}

impl<D: Document> DomBackend<D> {
    /// Route one attribute to the matching document call.
    ///
    /// # Panics
    ///
    /// Panics for keys the DOM backend has no mapping for.
    fn apply_attribute(&self, element: &D::Element, key: &str, value: &AttrValue) {
        match key {
            "innerText" | "value" => self.document.set_property(element, key, value),
            "type" => self.document.set_attribute(element, key, &value.to_string()),
            _ => panic!("attribute `{key}` is not implemented by the DOM backend"),
        }
    }
}

impl<D: Document> Backend for DomBackend<D> {
    type Handle = D::Element;

    fn update_attribute(
        &self,
        component: &Component<Self>,
        element: &D::Element,
        key: &str,
        value: &AttrValue,
    ) -> Result<()> {
        trace!(id = %component.id(), key, "dom attribute update");
        self.apply_attribute(element, key, value);
        Ok(())
    }
}

/// Renders components straight into a host [`Document`].
///
/// # Example
///
/// ```rust
/// use filament_core::dom::{DomRenderer, MemoryDocument};
/// use filament_core::render::Renderer;
///
/// let document = MemoryDocument::new();
/// let body = document.create_root("body");
/// let renderer = DomRenderer::new(document.clone(), body);
///
/// let label = renderer.new_component("span");
/// label.set_attribute("innerText", 0).unwrap();
/// renderer.render(&[label.clone()]).unwrap();
///
/// label.set_attribute("innerText", 1).unwrap();
/// let el = label.handle().unwrap();
/// assert_eq!(document.property(el, "innerText").unwrap().to_string(), "1");
/// ```
pub struct DomRenderer<D: Document> {
    backend: Arc<DomBackend<D>>,
}

impl<D: Document> DomRenderer<D> {
    /// Create a renderer that mounts roots under `root`, typically the body.
    pub fn new(document: D, root: D::Element) -> Self {
        Self {
            backend: Arc::new(DomBackend {
                document,
                root,
                ids: IdGenerator::new(),
            }),
        }
    }

    pub fn document(&self) -> &D {
        &self.backend.document
    }

    /// Create the element for `component` and its subtree.
    fn create_element(&self, component: &Component<DomBackend<D>>) -> D::Element {
        let backend = &self.backend;
        let element = backend.document.create_element(component.name());
        component.mount(Mount {
            renderer: Arc::downgrade(backend),
            handle: element.clone(),
        });

        let (attributes, children) = component.snapshot();
        for (key, value) in &attributes {
            if let Some(event) = key.strip_prefix(EVENT_PREFIX) {
                let callback = expect_listener(key, value);
                backend.document.add_event_listener(&element, event, callback);
                continue;
            }
            backend.apply_attribute(&element, key, value);
        }

        for child in &children {
            let child_element = self.create_element(child);
            backend.document.append_child(&element, &child_element);
        }

        element
    }
}

impl<D: Document> Renderer for DomRenderer<D> {
    type Backend = DomBackend<D>;

    fn new_component(&self, name: &str) -> Component<DomBackend<D>> {
        Component::new(self.backend.ids.next_id(), name)
    }

    fn render(&self, roots: &[Component<DomBackend<D>>]) -> Result<()> {
        for root in roots {
            let element = self.create_element(root);
            self.backend.document.append_child(&self.backend.root, &element);
        }
        Ok(())
    }

    fn append(
        &self,
        parent: &Component<DomBackend<D>>,
        child: &Component<DomBackend<D>>,
    ) -> Result<()> {
        let parent_element = parent.handle().ok_or(Error::NotMounted(parent.id()))?;
        parent.add_child(child);

        let child_element = match child.handle() {
            Some(element) => element,
            None => self.create_element(child),
        };
        self.backend
            .document
            .append_child(&parent_element, &child_element);
        Ok(())
    }
}
