//! DBC Core - design by contract at function call boundaries
//!
//! Functions declare the acceptable types of their parameters and return
//! value; the engine checks actual values against those declarations and
//! raises diagnostics naming the function, the parameter, and the expected
//! types.
//!
//! # Architecture
//!
//! ```text
//! Annotation → ConstraintSet ──────────────→ message (format_message)
//!                   ↓                                ↓
//! Signature → Frame (explicit call chain) → checker (check_argument, check_output)
//!                   ↓
//!              signature (check_all_declared_arguments)
//! ```
//!
//! # Guarantees
//!
//! - **Stateless**: nothing persists between checks; every diagnostic is built fresh
//! - **Reentrant**: call chains are borrowed values on the caller's own stack
//! - **Loud**: violations are returned immediately, never retried or suppressed
//! - **Attributed**: diagnostics name the function that asked for the check
//!
//! # Example
//!
//! ```
//! use dbc_core::{check_all_declared_arguments, Frame, Signature, TypeDescriptor, Value};
//!
//! let sig = Signature::new("f")
//!     .param("x", TypeDescriptor::INT)
//!     .param("y", TypeDescriptor::STR);
//! let frame = Frame::root(&sig, vec![Value::from(1), Value::from(2)]).unwrap();
//!
//! let err = check_all_declared_arguments(&frame).unwrap_err();
//! assert_eq!(err.to_string(), "f requires str for y.");
//! ```

pub mod checker;
pub mod constraint;
pub mod error;
pub mod frame;
pub mod message;
pub mod signature;
pub mod value;

pub use checker::{check_argument, check_declared_output, check_output};
pub use constraint::{Annotation, ConstraintSet, TypeDescriptor, NUM};
pub use error::{Error, ErrorKind, Result};
pub use frame::Frame;
pub use message::{format_message, render_types, Diagnostic, ViolationKind};
pub use signature::{check_all_declared_arguments, check_declared_arguments_at, Parameter, Signature};
pub use value::Value;

/// Version of the contract engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
