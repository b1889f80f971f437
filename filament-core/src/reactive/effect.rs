//! Effect Implementation
//!
//! An Effect is a dependency whose reaction ignores the pushed value. The
//! closure re-reads whatever state it needs, which lets one effect combine
//! several signals: register the same logic on each of them and it always
//! renders from current values.
//!
//! # Initial Run
//!
//! Registering an effect with [`Signal::effect`](super::Signal::effect) does
//! not run it. Until the first `set`, the UI shows whatever the components
//! were built with. Use [`Signal::effect_eager`](super::Signal::effect_eager)
//! to run the closure once at registration instead.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::dependency::Dependency;

/// A side-effecting reaction that runs whenever its signal is set.
///
/// # Example
///
/// ```rust
/// use filament_core::reactive::Signal;
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use std::sync::Arc;
///
/// let count = Signal::new(0_i64);
/// let shown = Arc::new(AtomicI64::new(-1));
///
/// let (c, s) = (count.clone(), shown.clone());
/// count.effect(move || s.store(c.value(), Ordering::SeqCst));
///
/// // Not run at registration.
/// assert_eq!(shown.load(Ordering::SeqCst), -1);
///
/// count.set(5);
/// assert_eq!(shown.load(Ordering::SeqCst), 5);
/// ```
pub struct Effect<F> {
    run: F,

    /// Number of times the effect has run, shared between clones.
    run_count: Arc<AtomicUsize>,
}

impl<F> Effect<F>
where
    F: Fn() + Send + Sync,
{
    /// Wrap a closure without running it.
    pub fn new(run: F) -> Self {
        Self {
            run,
            run_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Run the effect once, outside of any propagation.
    pub fn execute(&self) {
        (self.run)();
        self.run_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Get the number of times the effect has run.
    pub fn run_count(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }

    /// A counter that keeps tracking runs after the effect has been moved
    /// into a signal.
    pub fn run_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.run_count)
    }
}

impl<T, F> Dependency<T> for Effect<F>
where
    F: Fn() + Send + Sync,
{
    fn update(&self, _value: &T) {
        self.execute();
    }
}

impl<F> fmt::Debug for Effect<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("run_count", &self.run_count.load(Ordering::SeqCst))
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
