//! Failure trapping for fallible computations.
//!
//! `enact-trap` runs a computation — a zero-argument closure or a pending
//! future — and hands back an [`Outcome`] with the result in one arm or the
//! captured failure in the other. Both `Err` returns and runtime panics are
//! captured; the trap itself never raises, so calling code needs no
//! enclosing catch.
//!
//! The two invocation forms are separate entry points rather than one
//! argument-sniffing function: call [`trap`] when you hold a closure,
//! [`trap_future`] when you hold a future.
//!
//! ```
//! use enact_trap::{trap, Outcome, Panicked};
//!
//! let outcome: Outcome<&str, Panicked> = trap(|| Ok("ready"));
//! assert!(outcome.is_value());
//!
//! let faulted: Outcome<&str, Panicked> = trap(|| panic!("wires crossed"));
//! assert_eq!(faulted.failure().map(Panicked::message), Some("wires crossed"));
//! ```

pub mod outcome;
pub mod trap;

pub use outcome::Outcome;
pub use trap::{trap, trap_future, Panicked};
