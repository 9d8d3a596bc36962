//! The spy factory and its accessor views.
//!
//! This module provides the pieces of a call spy:
//!
//! - [`CallSpy`] - The spy instance itself; registers and invokes stand-in methods
//! - [`MethodStats`] - Read-only view over one method's recorded call history
//! - [`MethodConfig`] - Write view used to stub return values and callback arguments
//! - [`Arg`] - A stand-in argument: a plain value or a callback
//!
//! # Recording calls
//!
//! ```rust
//! use callspy::spy::{Arg, CallSpy};
//!
//! let spy = CallSpy::new();
//! spy.register("send");
//!
//! spy.invoke("send", [Arg::from("payload")]).unwrap();
//!
//! let stats = spy.stats("send").unwrap();
//! assert_eq!(stats.count(), 1);
//! ```
//!
//! # Injecting callback arguments
//!
//! ```rust
//! use callspy::spy::{Arg, CallSpy};
//!
//! let spy = CallSpy::new();
//! spy.register("subscribe").inject_callbacks(["herro"]);
//!
//! spy.invoke(
//!     "subscribe",
//!     [Arg::callback(|injected| assert_eq!(injected[0], "herro"))],
//! )
//! .unwrap();
//! ```

mod call_spy;
mod config;
mod record;
mod stats;

pub use call_spy::CallSpy;
pub use config::MethodConfig;
pub use record::{Arg, Callback};
pub use stats::MethodStats;
