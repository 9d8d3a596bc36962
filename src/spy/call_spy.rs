// Allow must_use_candidate since spy methods often have useful side effects
#![allow(clippy::must_use_candidate)]

//! The spy instance: method registration and stand-in dispatch.
//!
//! This module provides [`CallSpy`], the object handed to code under test in
//! place of a real dependency.
//!
//! # Example
//!
//! ```rust
//! use callspy::spy::{Arg, CallSpy};
//!
//! let spy = CallSpy::new();
//! spy.register("fetch").returns("hi");
//!
//! let value = spy.invoke("fetch", [Arg::from(1)]).unwrap();
//! assert_eq!(value, Some("hi".into()));
//! assert_eq!(spy.stats("fetch").unwrap().count(), 1);
//! ```

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::config::MethodConfig;
use super::record::{Arg, Callback, MethodRecord};
use super::stats::MethodStats;
use crate::error::{Error, Result};

/// Shared spy state: the mapping from method name to its record.
///
/// Accessor views hold an `Arc` to this and look records up by name on every
/// access, so all views of one method name observe the same data, including
/// after the name is re-registered.
pub(crate) struct SpyState {
    pub(crate) methods: Mutex<HashMap<String, MethodRecord>>,
}

/// A spy instance.
///
/// Registered method names each get a private method record; invocations
/// go through [`invoke`](CallSpy::invoke), history is read through
/// [`stats`](CallSpy::stats), and stubbing is done through the
/// [`MethodConfig`] returned by [`register`](CallSpy::register).
///
/// # Base composition
///
/// A spy may be built around a caller-supplied base value with
/// [`with_base`](CallSpy::with_base). The spy derefs to the base, so the
/// produced object also behaves as an instance of the base type:
///
/// ```rust
/// use callspy::spy::CallSpy;
///
/// struct Counter(std::cell::Cell<u32>);
/// impl Counter {
///     fn bump(&self) -> u32 {
///         self.0.set(self.0.get() + 1);
///         self.0.get()
///     }
/// }
///
/// let spy = CallSpy::with_base(Counter(std::cell::Cell::new(0)));
/// spy.register("fetch");
///
/// assert_eq!(spy.bump(), 1); // base behavior
/// spy.invoke("fetch", []).unwrap(); // spy behavior
/// ```
pub struct CallSpy<B = ()> {
    state: Arc<SpyState>,
    base: B,
}

impl CallSpy<()> {
    /// Create a spy with no base type and an empty method mapping.
    pub fn new() -> Self {
        Self::with_base(())
    }
}

impl Default for CallSpy<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> CallSpy<B> {
    /// Create a spy composed with `base`.
    ///
    /// The spy owns the base value and delegates to it via `Deref`, so the
    /// result can be used both as a spy and as the base type. The spy itself
    /// never calls into the base.
    pub fn with_base(base: B) -> Self {
        Self {
            state: Arc::new(SpyState {
                methods: Mutex::new(HashMap::new()),
            }),
            base,
        }
    }

    /// The composed base value.
    pub fn base(&self) -> &B {
        &self.base
    }

    /// Mutable access to the composed base value.
    pub fn base_mut(&mut self) -> &mut B {
        &mut self.base
    }

    /// Consume the spy, returning the base value.
    pub fn into_base(self) -> B {
        self.base
    }

    /// Register `name` as a stand-in method and return its configuration
    /// accessor.
    ///
    /// The method starts with empty history, no return value, and no
    /// injected callback arguments. Registering a name that already exists
    /// silently replaces its record, discarding prior history and stubbing.
    ///
    /// ```rust
    /// use callspy::spy::CallSpy;
    ///
    /// let spy = CallSpy::new();
    /// spy.register("fetch").returns(42).inject_callbacks(["ok"]);
    /// ```
    pub fn register(&self, name: impl Into<String>) -> MethodConfig {
        let name = name.into();
        self.state
            .methods
            .lock()
            .insert(name.clone(), MethodRecord::new());
        MethodConfig::new(Arc::clone(&self.state), name)
    }

    /// Invoke the stand-in registered under `name`.
    ///
    /// In order: the full argument list is appended to the method's call
    /// history, the call count is incremented, and every callback-shaped
    /// argument is invoked synchronously with the configured injection
    /// arguments (with no arguments if [`inject_callbacks`] was never
    /// called). Returns the configured return value: the next queued value
    /// if any, else the sticky [`returns`] value, else `None`.
    ///
    /// The internal lock is released before callbacks run, so a callback may
    /// re-enter the spy (including invoking another registered method).
    /// Panics raised by a callback propagate to the caller unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownMethod`] if `name` was never registered.
    ///
    /// [`inject_callbacks`]: MethodConfig::inject_callbacks
    /// [`returns`]: MethodConfig::returns
    pub fn invoke<I>(&self, name: &str, args: I) -> Result<Option<Value>>
    where
        I: IntoIterator<Item = Arg>,
    {
        let args: Vec<Arg> = args.into_iter().collect();

        let (callbacks, callback_args, return_value) = {
            let mut methods = self.state.methods.lock();
            let record = methods
                .get_mut(name)
                .ok_or_else(|| Error::unknown_method(name))?;

            record.args.push(args.clone());
            record.count += 1;

            let callbacks: Vec<Callback> =
                args.iter().filter_map(|arg| arg.as_callback().cloned()).collect();
            let callback_args = record.callback_args.clone().unwrap_or_default();
            let return_value = record
                .return_queue
                .pop_front()
                .or_else(|| record.return_value.clone());

            (callbacks, callback_args, return_value)
        };

        for callback in callbacks {
            callback(&callback_args);
        }

        Ok(return_value)
    }

    /// The stats accessor for `name`, or `None` if it was never registered.
    ///
    /// A registered-but-uncalled method yields `Some` with `count() == 0`
    /// and empty `args()`.
    pub fn stats(&self, name: &str) -> Option<MethodStats> {
        self.is_registered(name)
            .then(|| MethodStats::new(Arc::clone(&self.state), name.to_owned()))
    }

    /// The configuration accessor for `name`, or `None` if it was never
    /// registered. Allows restubbing without discarding call history.
    pub fn config(&self, name: &str) -> Option<MethodConfig> {
        self.is_registered(name)
            .then(|| MethodConfig::new(Arc::clone(&self.state), name.to_owned()))
    }

    /// Whether `name` is currently registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.state.methods.lock().contains_key(name)
    }

    /// The currently registered method names, sorted.
    pub fn registered_methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.methods.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<B> Deref for CallSpy<B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.base
    }
}

impl<B> DerefMut for CallSpy<B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut self.base
    }
}

impl<B> Debug for CallSpy<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSpy")
            .field("methods", &self.registered_methods())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_register_then_invoke() {
        let spy = CallSpy::new();
        spy.register("fetch");

        let value = spy.invoke("fetch", [Arg::from("a")]).unwrap();
        assert_eq!(value, None);

        let stats = spy.stats("fetch").unwrap();
        assert_eq!(stats.count(), 1);
        assert_eq!(stats.args(), vec![vec![Arg::from("a")]]);
    }

    #[test]
    fn test_invoke_unregistered() {
        let spy = CallSpy::new();

        let err = spy.invoke("nope", []).unwrap_err();
        assert!(matches!(err, Error::UnknownMethod(name) if name == "nope"));
    }

    #[test]
    fn test_stats_for_unregistered_is_none() {
        let spy = CallSpy::new();
        spy.register("present");

        assert!(spy.stats("present").is_some());
        assert!(spy.stats("absent").is_none());
        assert!(spy.config("absent").is_none());
    }

    #[test]
    fn test_count_tracks_history_length() {
        let spy = CallSpy::new();
        spy.register("testme");

        spy.invoke("testme", []).unwrap();
        spy.invoke("testme", [Arg::from("two")]).unwrap();
        spy.invoke("testme", [Arg::from(3)]).unwrap();

        let stats = spy.stats("testme").unwrap();
        assert_eq!(stats.count(), 3);
        assert_eq!(stats.count(), stats.args().len());
    }

    #[test]
    fn test_instances_are_independent() {
        let first = CallSpy::new();
        let second = CallSpy::new();
        first.register("shared_name");
        second.register("shared_name");

        first.invoke("shared_name", []).unwrap();

        assert_eq!(first.stats("shared_name").unwrap().count(), 1);
        assert_eq!(second.stats("shared_name").unwrap().count(), 0);
    }

    #[test]
    fn test_reregistration_discards_history() {
        let spy = CallSpy::new();
        spy.register("flaky").returns("old");
        spy.invoke("flaky", [Arg::from(1)]).unwrap();

        spy.register("flaky");

        let stats = spy.stats("flaky").unwrap();
        assert_eq!(stats.count(), 0);
        assert!(stats.args().is_empty());
        assert_eq!(spy.invoke("flaky", []).unwrap(), None);
    }

    #[test]
    fn test_stats_view_survives_reregistration() {
        let spy = CallSpy::new();
        spy.register("watched");
        let stats = spy.stats("watched").unwrap();

        spy.invoke("watched", []).unwrap();
        assert_eq!(stats.count(), 1);

        // The view reads through the live mapping, so it observes the
        // replacement record.
        spy.register("watched");
        assert_eq!(stats.count(), 0);
    }

    #[test]
    fn test_callback_may_reenter_spy() {
        let spy = Arc::new(CallSpy::new());
        spy.register("outer");
        spy.register("inner").returns("done");

        let inner_spy = Arc::clone(&spy);
        let result = Arc::new(Mutex::new(None));
        let result_slot = Arc::clone(&result);
        spy.invoke(
            "outer",
            [Arg::callback(move |_| {
                let value = inner_spy.invoke("inner", []).unwrap();
                *result_slot.lock() = value;
            })],
        )
        .unwrap();

        assert_eq!(*result.lock(), Some(json!("done")));
        assert_eq!(spy.stats("outer").unwrap().count(), 1);
        assert_eq!(spy.stats("inner").unwrap().count(), 1);
    }

    #[test]
    fn test_callbacks_invoked_in_argument_order() {
        let spy = CallSpy::new();
        spy.register("multi");

        let order = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&order);
        let second = Arc::clone(&order);
        spy.invoke(
            "multi",
            [
                Arg::callback(move |_| first.lock().push(1)),
                Arg::from("between"),
                Arg::callback(move |_| second.lock().push(2)),
            ],
        )
        .unwrap();

        assert_eq!(*order.lock(), vec![1, 2]);
    }

    #[test]
    fn test_unconfigured_callback_invoked_with_no_args() {
        let spy = CallSpy::new();
        spy.register("gimme");

        let seen = Arc::new(AtomicUsize::new(usize::MAX));
        let seen_len = Arc::clone(&seen);
        spy.invoke(
            "gimme",
            [Arg::callback(move |args| {
                seen_len.store(args.len(), Ordering::SeqCst);
            })],
        )
        .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_registered_methods_sorted() {
        let spy = CallSpy::new();
        spy.register("zeta");
        spy.register("alpha");

        assert_eq!(spy.registered_methods(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_base_composition() {
        let spy = CallSpy::with_base(String::from("base"));
        spy.register("fetch");

        assert_eq!(spy.len(), 4); // deref to the base String
        assert_eq!(spy.base(), "base");

        spy.invoke("fetch", []).unwrap();
        assert_eq!(spy.stats("fetch").unwrap().count(), 1);

        assert_eq!(spy.into_base(), "base");
    }

    #[test]
    fn test_debug_lists_methods() {
        let spy = CallSpy::new();
        spy.register("fetch");

        let debug = format!("{spy:?}");
        assert!(debug.contains("CallSpy"));
        assert!(debug.contains("fetch"));
    }
}
