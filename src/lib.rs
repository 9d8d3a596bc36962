//! # callspy
//!
//! > Call-spy test doubles for Rust
//!
//! **callspy** builds spy objects that stand in for a dependency during unit
//! tests: register method names at runtime, stub their return values, inject
//! arguments into callback-shaped parameters, and afterwards assert on how
//! the methods were invoked.
//!
//! ## Quick Start
//!
//! ```rust
//! use callspy::prelude::*;
//!
//! let spy = CallSpy::new();
//! spy.register("fetch").returns("hi");
//!
//! let value = spy.invoke("fetch", [Arg::from("a"), Arg::from("b")]).unwrap();
//! assert_eq!(value, Some("hi".into()));
//!
//! let stats = spy.stats("fetch").unwrap();
//! assert_eq!(stats.count(), 1);
//! stats.called_with("a").unwrap();
//! ```
//!
//! ## Features
//!
//! - 📼 **Call Recording** - Every invocation's full argument list, in order
//! - 🎛️ **Stubbed Returns** - Sticky return values or a per-call queue
//! - 📞 **Callback Injection** - Configure the arguments fed to callback-shaped parameters
//! - 🔍 **Membership Assertions** - `called_with` with descriptive failures
//! - 🧬 **Base Composition** - A spy can also behave as an instance of a caller-supplied type

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod spy;

/// Prelude for convenient imports
///
/// ```rust
/// use callspy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::spy::{Arg, CallSpy, MethodConfig, MethodStats};
}

// Re-exports
pub use error::{Error, Result};
pub use spy::{Arg, CallSpy, Callback, MethodConfig, MethodStats};
