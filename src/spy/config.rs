// Allow must_use_candidate since chained configuration calls drop the final
// accessor by design
#![allow(clippy::must_use_candidate)]

//! Write view used to stub a registered method's behavior.

use std::fmt::{self, Debug};
use std::sync::Arc;

use serde_json::Value;

use super::call_spy::SpyState;
use super::record::MethodRecord;

/// The configuration accessor for one registered method name.
///
/// Returned by [`CallSpy::register`](super::CallSpy::register) and
/// retrievable later with [`CallSpy::config`](super::CallSpy::config).
/// Every write goes through to the spy's live record; the accessor itself
/// holds no stubbing state. Calls chain:
///
/// ```rust
/// use callspy::spy::CallSpy;
///
/// let spy = CallSpy::new();
/// spy.register("fetch").returns("hi").inject_callbacks(["herro"]);
/// ```
pub struct MethodConfig {
    state: Arc<SpyState>,
    name: String,
}

impl MethodConfig {
    pub(crate) fn new(state: Arc<SpyState>, name: String) -> Self {
        Self { state, name }
    }

    /// The method name this accessor is bound to.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.name
    }

    /// Set the sticky return value: every invocation returns `value` until
    /// `returns` is called again.
    pub fn returns(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.with_record_mut(|record| record.return_value = Some(value));
        self
    }

    /// Queue return values consumed one per invocation, in order, ahead of
    /// the sticky [`returns`](MethodConfig::returns) value.
    ///
    /// ```rust
    /// use callspy::spy::CallSpy;
    ///
    /// let spy = CallSpy::new();
    /// spy.register("pop").returns_in_order(["first", "second"]);
    ///
    /// assert_eq!(spy.invoke("pop", []).unwrap(), Some("first".into()));
    /// assert_eq!(spy.invoke("pop", []).unwrap(), Some("second".into()));
    /// assert_eq!(spy.invoke("pop", []).unwrap(), None);
    /// ```
    pub fn returns_in_order<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.with_record_mut(|record| record.return_queue = values.into());
        self
    }

    /// Set the ordered arguments passed to every callback-shaped argument
    /// the stand-in receives.
    pub fn inject_callbacks<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.with_record_mut(|record| record.callback_args = Some(values));
        self
    }

    fn with_record_mut(&self, write: impl FnOnce(&mut MethodRecord)) {
        // The record exists for as long as the name stays registered; a
        // replaced record is simply the new target of the write.
        if let Some(record) = self.state.methods.lock().get_mut(&self.name) {
            write(record);
        }
    }
}

impl Debug for MethodConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodConfig")
            .field("method", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spy::{Arg, CallSpy};
    use serde_json::json;

    #[test]
    fn test_returns_is_sticky() {
        let spy = CallSpy::new();
        spy.register("fake").returns("hi");

        assert_eq!(spy.invoke("fake", []).unwrap(), Some(json!("hi")));
        assert_eq!(spy.invoke("fake", []).unwrap(), Some(json!("hi")));
    }

    #[test]
    fn test_returns_can_be_reconfigured() {
        let spy = CallSpy::new();
        spy.register("fake").returns(1);
        assert_eq!(spy.invoke("fake", []).unwrap(), Some(json!(1)));

        spy.config("fake").unwrap().returns(2);
        assert_eq!(spy.invoke("fake", []).unwrap(), Some(json!(2)));

        // Reconfiguring never touches history.
        assert_eq!(spy.stats("fake").unwrap().count(), 2);
    }

    #[test]
    fn test_unconfigured_return_is_none() {
        let spy = CallSpy::new();
        spy.register("silent");
        assert_eq!(spy.invoke("silent", []).unwrap(), None);
    }

    #[test]
    fn test_queued_returns_then_sticky_fallback() {
        let spy = CallSpy::new();
        spy.register("pop")
            .returns("fallback")
            .returns_in_order(["one", "two"]);

        assert_eq!(spy.invoke("pop", []).unwrap(), Some(json!("one")));
        assert_eq!(spy.invoke("pop", []).unwrap(), Some(json!("two")));
        assert_eq!(spy.invoke("pop", []).unwrap(), Some(json!("fallback")));
    }

    #[test]
    fn test_inject_callbacks() {
        let spy = CallSpy::new();
        spy.register("inject_me").inject_callbacks(["herro"]);

        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        spy.invoke(
            "inject_me",
            [Arg::callback(move |injected| {
                sink.lock().extend(injected.iter().cloned());
            })],
        )
        .unwrap();

        assert_eq!(*seen.lock(), vec![json!("herro")]);
    }

    #[test]
    fn test_inject_callbacks_multiple_values() {
        let spy = CallSpy::new();
        spy.register("pair").inject_callbacks([json!("c1"), json!("c2")]);

        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        spy.invoke(
            "pair",
            [Arg::callback(move |injected| {
                sink.lock().extend(injected.iter().cloned());
            })],
        )
        .unwrap();

        assert_eq!(*seen.lock(), vec![json!("c1"), json!("c2")]);
    }

    #[test]
    fn test_chaining() {
        let spy = CallSpy::new();
        let config = spy.register("chained").returns(7).inject_callbacks(["x"]);
        assert_eq!(config.method_name(), "chained");

        assert_eq!(spy.invoke("chained", []).unwrap(), Some(json!(7)));
    }
}
