//! In-process DOM backend.
//!
//! The renderer drives a host document through the [`Document`] trait, which
//! is deliberately small: creating elements, appending children, setting
//! properties and string attributes, and adding event listeners. Anything a
//! real host (a browser binding, a test double) can do beyond that is not
//! used.
//!
//! [`MemoryDocument`] is a headless implementation for tests and tooling.

mod memory;
mod renderer;

pub use memory::{MemoryDocument, NodeId};
pub use renderer::{DomBackend, DomRenderer};

use crate::render::{AttrValue, Callback};

/// The host document API the DOM backend depends on.
pub trait Document: Send + Sync + 'static {
    type Element: Clone + Send + Sync + 'static;

    fn create_element(&self, tag: &str) -> Self::Element;

    /// Append `child` to `parent`, detaching it from its current parent.
    fn append_child(&self, parent: &Self::Element, child: &Self::Element);

    fn set_property(&self, element: &Self::Element, key: &str, value: &AttrValue);

    fn set_attribute(&self, element: &Self::Element, key: &str, value: &str);

    fn add_event_listener(&self, element: &Self::Element, event: &str, callback: Callback);
}
