//! Dependency types for the reactive system.
//!
//! A dependency is anything that reacts to a signal's new value. Signals hold
//! their dependencies as trait objects so that plain reactions, effects, and
//! other signals can share one list.

/// Receives every value written to the signal it is registered on.
pub trait Dependency<T>: Send + Sync {
    /// Called synchronously from [`Signal::set`](super::Signal::set) with the
    /// value that was just written.
    fn update(&self, value: &T);
}

/// A dependency backed by a closure that consumes the pushed value.
///
/// # Example
///
/// ```rust
/// use filament_core::reactive::{Reaction, Signal};
///
/// let celsius = Signal::new(0.0_f64);
/// let fahrenheit = Signal::new(32.0_f64);
///
/// let target = fahrenheit.clone();
/// celsius.add_dependency(Reaction::new(move |c: &f64| target.set(c * 9.0 / 5.0 + 32.0)));
///
/// celsius.set(100.0);
/// assert_eq!(fahrenheit.value(), 212.0);
/// ```
pub struct Reaction<F> {
    react: F,
}

impl<F> Reaction<F> {
    pub fn new(react: F) -> Self {
        Self { react }
    }
}

impl<T, F> Dependency<T> for Reaction<F>
where
    F: Fn(&T) + Send + Sync,
{
    fn update(&self, value: &T) {
        (self.react)(value);
    }
}
