// Allow must_use_candidate since stats getters are often called for their
// assertion side effects in test helpers
#![allow(clippy::must_use_candidate)]

//! Read-only view over one method's recorded call history.

use std::fmt::{self, Debug};
use std::sync::Arc;

use serde_json::Value;

use super::call_spy::SpyState;
use super::record::{Arg, MethodRecord};
use crate::error::{Error, Result};

/// The stats accessor for one registered method name.
///
/// Holds no history of its own: every read goes through to the spy's live
/// record, so multiple accessors for the same name always agree, and reads
/// reflect calls made after the accessor was obtained.
///
/// # Example
///
/// ```rust
/// use callspy::spy::{Arg, CallSpy};
///
/// let spy = CallSpy::new();
/// spy.register("callme");
/// spy.invoke("callme", [Arg::from("yes")]).unwrap();
///
/// let stats = spy.stats("callme").unwrap();
/// assert_eq!(stats.count(), 1);
/// assert!(stats.called_with("yes").is_ok());
/// assert!(stats.called_with("no").is_err());
/// ```
pub struct MethodStats {
    state: Arc<SpyState>,
    name: String,
}

impl MethodStats {
    pub(crate) fn new(state: Arc<SpyState>, name: String) -> Self {
        Self { state, name }
    }

    /// The method name this accessor is bound to.
    pub fn method_name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the recorded call history, in call order.
    ///
    /// Each element is the full ordered argument list of one invocation.
    pub fn args(&self) -> Vec<Vec<Arg>> {
        self.with_record(|record| record.args.clone())
            .unwrap_or_default()
    }

    /// Number of invocations so far.
    pub fn count(&self) -> usize {
        self.with_record(|record| record.count).unwrap_or(0)
    }

    /// Whether the method was invoked at least once.
    pub fn was_called(&self) -> bool {
        self.count() > 0
    }

    /// Whether the method was invoked exactly `n` times.
    pub fn was_called_times(&self, n: usize) -> bool {
        self.count() == n
    }

    /// The argument list of the Nth invocation (0-indexed).
    pub fn nth_call(&self, n: usize) -> Option<Vec<Arg>> {
        self.with_record(|record| record.args.get(n).cloned())
            .flatten()
    }

    /// The argument list of the most recent invocation.
    pub fn last_call(&self) -> Option<Vec<Arg>> {
        self.with_record(|record| record.args.last().cloned())
            .flatten()
    }

    /// Assert that `search` appears as a direct member of at least one
    /// recorded argument list.
    ///
    /// Membership uses [`Value`] equality, not deep matching; callback
    /// arguments never match.
    ///
    /// # Errors
    ///
    /// [`Error::AssertionFailed`] naming the search value and the method
    /// name, if no recorded argument list contains `search`.
    pub fn called_with(&self, search: impl Into<Value>) -> Result<()> {
        let search = search.into();
        let found = self
            .with_record(|record| {
                record
                    .args
                    .iter()
                    .any(|call| call.iter().any(|arg| arg.as_value() == Some(&search)))
            })
            .unwrap_or(false);

        if found {
            Ok(())
        } else {
            Err(Error::assertion_failed(format!(
                "`{search}` not found in `{}` call args",
                self.name
            )))
        }
    }

    fn with_record<T>(&self, read: impl FnOnce(&MethodRecord) -> T) -> Option<T> {
        self.state.methods.lock().get(&self.name).map(read)
    }
}

impl Debug for MethodStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodStats")
            .field("method", &self.name)
            .field("count", &self.count())
            .field("args", &self.args())
            .finish()
    }
}
