//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive. It holds a value and an
//! ordered list of dependencies that are pushed every new value.
//!
//! # How Signals Work
//!
//! 1. Dependencies are registered explicitly with [`Signal::add_dependency`]
//!    or [`Signal::effect`]. There is no removal; a dependency lives as long
//!    as the signal does.
//!
//! 2. [`Signal::set`] stores the value and then calls every dependency, in
//!    registration order, before returning. Nothing is batched and equal
//!    values are not filtered out.
//!
//! 3. There is no cycle detection. A dependency that sets the signal it is
//!    registered on recurses; avoiding that is up to the caller.
//!
//! # Thread Safety
//!
//! The value and the dependency list each sit behind a `parking_lot::RwLock`.
//! Neither lock is held while dependencies run, so a dependency may read or
//! set any signal, including its own, or register new dependencies. Those new
//! dependencies are first notified by the next `set`.

use std::fmt::{self, Debug};
use std::sync::Arc;

use parking_lot::RwLock;

use super::dependency::Dependency;
use super::effect::Effect;

/// A reactive signal holding a value of type T.
///
/// Cloning a signal yields another handle to the same cell.
///
/// # Example
///
/// ```rust
/// use filament_core::reactive::Signal;
///
/// let count = Signal::new(0);
/// count.set(5);
/// assert_eq!(count.value(), 5);
/// ```
pub struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// The current value.
    value: Arc<RwLock<T>>,

    /// Registered dependencies, in registration order. Duplicates are allowed.
    dependencies: Arc<RwLock<Vec<Arc<dyn Dependency<T>>>>>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new signal with the given initial value and no dependencies.
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
            dependencies: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Get the current value.
    pub fn value(&self) -> T {
        self.value.read().clone()
    }

    /// Replace the value and notify every dependency with it.
    ///
    /// Dependencies run synchronously, once each, in registration order.
    pub fn set(&self, value: T) {
        *self.value.write() = value.clone();

        // Snapshot so dependencies can register more dependencies without
        // deadlocking on the list.
        let dependencies = self.dependencies.read().clone();
        for dependency in dependencies.iter() {
            dependency.update(&value);
        }
    }

    /// Set the value computed from the current one.
    pub fn set_with<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = {
            let guard = self.value.read();
            f(&guard)
        };
        self.set(next);
    }

    /// Append a dependency.
    pub fn add_dependency<D>(&self, dependency: D)
    where
        D: Dependency<T> + 'static,
    {
        self.dependencies.write().push(Arc::new(dependency));
    }

    /// Register a zero-argument reaction that re-reads state on every `set`.
    ///
    /// The closure is not run at registration. Call it yourself, or use
    /// [`Signal::effect_eager`], to establish the initial UI state.
    pub fn effect<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.add_dependency(Effect::new(f));
    }

    /// Like [`Signal::effect`], but runs the closure once before registering.
    pub fn effect_eager<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let effect = Effect::new(f);
        effect.execute();
        self.add_dependency(effect);
    }

    /// Get the number of registered dependencies.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.read().len()
    }
}

/// A signal registered on another signal mirrors every value it is pushed.
impl<T> Dependency<T> for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn update(&self, value: &T) {
        self.set(value.clone());
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            dependencies: Arc::clone(&self.dependencies),
        }
    }
}

impl<T> Default for Signal<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.value.read())
            .field("dependency_count", &self.dependency_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
