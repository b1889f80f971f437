//! Filament Core
//!
//! This crate provides the core runtime for the Filament reactive UI
//! framework. It implements:
//!
//! - Reactive primitives (signals, dependencies, effects)
//! - A backend-agnostic component tree
//! - An in-process DOM backend over a minimal host document API
//! - A remote backend that mirrors the tree to a peer over a WebSocket
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: Signals and the dependencies they notify
//! - `render`: Components, attributes, and the `Renderer`/`Backend` traits
//! - `dom`: Direct rendering into a host document
//! - `remote`: Wire protocol, event dispatch, and connection lifecycle
//! - `config`, `logging`, `error`: Ambient plumbing
//!
//! # Example
//!
//! ```rust
//! use filament_core::dom::{DomRenderer, MemoryDocument};
//! use filament_core::reactive::Signal;
//! use filament_core::render::{Callback, Renderer};
//!
//! let document = MemoryDocument::new();
//! let body = document.create_root("body");
//! let renderer = DomRenderer::new(document.clone(), body);
//!
//! let counter = Signal::new(0_i64);
//!
//! let button = renderer.new_component("button");
//! button.set_attribute("innerText", "increment").unwrap();
//! let c = counter.clone();
//! button
//!     .set_attribute("on:click", Callback::new(move || c.set_with(|n| n + 1)))
//!     .unwrap();
//!
//! let label = renderer.new_component("span");
//! label.set_attribute("innerText", 0).unwrap();
//! let (c, l) = (counter.clone(), label.clone());
//! counter.effect(move || {
//!     l.set_attribute("innerText", c.value()).unwrap();
//! });
//!
//! renderer.render(&[button.clone(), label.clone()]).unwrap();
//!
//! document.dispatch(button.handle().unwrap(), "click");
//! let text = document.property(label.handle().unwrap(), "innerText").unwrap();
//! assert_eq!(text.to_string(), "1");
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod logging;
pub mod reactive;
pub mod remote;
pub mod render;

pub use config::RemoteConfig;
pub use error::{Error, Result};
