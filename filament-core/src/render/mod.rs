//! Components and Renderers
//!
//! A [`Component`] is a named node with attributes and children. It is
//! created by a [`Renderer`], which materializes it through a [`Backend`]
//! when mounted. After mounting, [`Component::set_attribute`] pushes each
//! change to the backend immediately.
//!
//! Components are generic over their backend, so a component made by one
//! renderer cannot be handed to another: the mismatch is a type error rather
//! than a runtime check.

mod attribute;
mod component;
mod renderer;

pub use attribute::{AttrValue, Callback, EVENT_PREFIX};
pub(crate) use attribute::expect_listener;
pub(crate) use component::Mount;
pub use component::{Component, ComponentId, IdGenerator};
pub use renderer::{Backend, Renderer};
