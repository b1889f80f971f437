//! Headless document.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::Document;
use crate::render::{AttrValue, Callback};

/// Handle to an element of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Default)]
struct ElementData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    properties: HashMap<String, AttrValue>,
    attributes: HashMap<String, String>,
    listeners: Vec<(String, Callback)>,
}

#[derive(Default)]
struct Tree {
    elements: Vec<ElementData>,
    root: Option<NodeId>,
}

/// An in-memory [`Document`] that keeps a plain element tree.
///
/// Clones share the same tree, so a test can keep one handle for
/// inspection while the renderer owns another.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    tree: Arc<Mutex<Tree>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the element that rendered roots are appended to.
    pub fn create_root(&self, tag: &str) -> NodeId {
        let root = self.create_element(tag);
        self.tree.lock().root = Some(root);
        root
    }

    pub fn root(&self) -> Option<NodeId> {
        self.tree.lock().root
    }

    pub fn tag(&self, element: NodeId) -> String {
        self.tree.lock().elements[element.0].tag.clone()
    }

    pub fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.tree.lock().elements[element.0].parent
    }

    pub fn children(&self, element: NodeId) -> Vec<NodeId> {
        self.tree.lock().elements[element.0].children.clone()
    }

    pub fn property(&self, element: NodeId, key: &str) -> Option<AttrValue> {
        self.tree.lock().elements[element.0].properties.get(key).cloned()
    }

    pub fn string_attribute(&self, element: NodeId, key: &str) -> Option<String> {
        self.tree.lock().elements[element.0].attributes.get(key).cloned()
    }

    /// Total number of elements ever created.
    pub fn element_count(&self) -> usize {
        self.tree.lock().elements.len()
    }

    /// Fire `event` on `element`, returning how many listeners ran.
    pub fn dispatch(&self, element: NodeId, event: &str) -> usize {
        let listeners: Vec<Callback> = self.tree.lock().elements[element.0]
            .listeners
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, callback)| callback.clone())
            .collect();

        for listener in &listeners {
            listener.call();
        }
        listeners.len()
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn create_element(&self, tag: &str) -> NodeId {
        let mut tree = self.tree.lock();
        tree.elements.push(ElementData {
            tag: tag.to_owned(),
            ..ElementData::default()
        });
        NodeId(tree.elements.len() - 1)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        let mut tree = self.tree.lock();
        if let Some(previous) = tree.elements[child.0].parent.take() {
            tree.elements[previous.0].children.retain(|c| c != child);
        }
        tree.elements[child.0].parent = Some(*parent);
        tree.elements[parent.0].children.push(*child);
    }

    fn set_property(&self, element: &NodeId, key: &str, value: &AttrValue) {
        self.tree.lock().elements[element.0]
            .properties
            .insert(key.to_owned(), value.clone());
    }

    fn set_attribute(&self, element: &NodeId, key: &str, value: &str) {
        self.tree.lock().elements[element.0]
            .attributes
            .insert(key.to_owned(), value.to_owned());
    }

    fn add_event_listener(&self, element: &NodeId, event: &str, callback: Callback) {
        self.tree.lock().elements[element.0]
            .listeners
            .push((event.to_owned(), callback));
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree.lock();
        f.debug_struct("MemoryDocument")
            .field("elements", &tree.elements.len())
            .field("root", &tree.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_child_detaches_from_previous_parent() {
        let document = MemoryDocument::new();
        let a = document.create_element("div");
        let b = document.create_element("div");
        let child = document.create_element("span");

        document.append_child(&a, &child);
        document.append_child(&b, &child);

        assert!(document.children(a).is_empty());
        assert_eq!(document.children(b), vec![child]);
        assert_eq!(document.parent(child), Some(b));
        assert_eq!(document.tag(child), "span");
    }

    #[test]
    fn dispatch_only_runs_matching_listeners() {
        let document = MemoryDocument::new();
        let el = document.create_element("button");
        document.add_event_listener(&el, "click", Callback::new(|| {}));
        document.add_event_listener(&el, "focus", Callback::new(|| {}));

        assert_eq!(document.dispatch(el, "click"), 1);
        assert_eq!(document.dispatch(el, "blur"), 0);
    }
}
