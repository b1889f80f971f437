//! Reactive Primitives
//!
//! This module implements the reactive core: signals and the dependencies
//! they push values to.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state plus an ordered list of
//! dependencies. Every `set` notifies each dependency exactly once, in
//! registration order, before returning.
//!
//! ## Dependencies
//!
//! A [`Dependency`] receives the new value. [`Reaction`] wraps a closure that
//! consumes it; a [`Signal`] registered on another signal mirrors it.
//!
//! ## Effects
//!
//! An [`Effect`] ignores the pushed value and re-reads current state. Effects
//! are how components are kept in sync: the closure typically calls
//! `set_attribute` on a mounted component.
//!
//! # Implementation Notes
//!
//! Dependencies are wired explicitly rather than discovered by tracking
//! reads. Propagation is synchronous and depth-first, so a chain of signals
//! and effects settles completely inside the outermost `set`.

mod signal;
mod dependency;
mod effect;

pub use signal::Signal;
pub use dependency::{Dependency, Reaction};
pub use effect::Effect;
