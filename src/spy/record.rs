//! The per-method record and the argument model.
//!
//! A [`MethodRecord`] backs one registered method name. It is private to the
//! crate: external code reads it through [`MethodStats`](super::MethodStats)
//! and writes it through [`MethodConfig`](super::MethodConfig), so call
//! history cannot be corrupted from outside.

use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::sync::Arc;

use serde_json::Value;

/// A callback-shaped argument: invoked by the stand-in with the configured
/// injection arguments (or none, if never configured).
pub type Callback = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// One positional argument passed to a stand-in method.
///
/// Arguments are either plain [`Value`]s, which the spy records for later
/// assertions, or callbacks, which the stand-in invokes during the call.
///
/// # Example
///
/// ```rust
/// use callspy::spy::Arg;
///
/// let plain = Arg::from("some");
/// let cb = Arg::callback(|args| assert!(args.is_empty()));
///
/// assert!(!plain.is_callback());
/// assert!(cb.is_callback());
/// ```
#[derive(Clone)]
pub enum Arg {
    /// A plain value, recorded verbatim into the call history.
    Value(Value),
    /// A callback, invoked synchronously by the stand-in.
    Callback(Callback),
}

impl Arg {
    /// Wrap a closure as a callback-shaped argument.
    #[must_use]
    pub fn callback(func: impl Fn(&[Value]) + Send + Sync + 'static) -> Self {
        Self::Callback(Arc::new(func))
    }

    /// The plain value, if this argument is not a callback.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Callback(_) => None,
        }
    }

    /// Whether this argument is callback-shaped.
    #[must_use]
    pub fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }

    pub(crate) fn as_callback(&self) -> Option<&Callback> {
        match self {
            Self::Value(_) => None,
            Self::Callback(callback) => Some(callback),
        }
    }
}

impl<'a> From<&'a str> for Arg {
    fn from(value: &'a str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<u64> for Arg {
    fn from(value: u64) -> Self {
        Self::Value(value.into())
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Value(value.into())
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            // Callbacks have no value identity; compare by allocation.
            (Self::Callback(a), Self::Callback(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => Debug::fmt(value, f),
            Self::Callback(_) => f.write_str("<callback>"),
        }
    }
}

/// The private state backing one registered method name.
///
/// Created empty at registration, mutated only by stand-in invocation and by
/// the configuration accessor. `count == args.len()` at all times.
pub(crate) struct MethodRecord {
    /// Ordered call history; each element is one invocation's argument list.
    pub(crate) args: Vec<Vec<Arg>>,
    /// Number of invocations so far.
    pub(crate) count: usize,
    /// Sticky return value; `None` means never configured.
    pub(crate) return_value: Option<Value>,
    /// Values consumed one per call, ahead of `return_value`.
    pub(crate) return_queue: VecDeque<Value>,
    /// Arguments fed to callback-shaped parameters; `None` means never configured.
    pub(crate) callback_args: Option<Vec<Value>>,
}

impl MethodRecord {
    pub(crate) fn new() -> Self {
        Self {
            args: Vec::new(),
            count: 0,
            return_value: None,
            return_queue: VecDeque::new(),
            callback_args: None,
        }
    }
}
